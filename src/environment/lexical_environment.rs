//! # Lexical Environment
//!
//! A scope frame holds a table of named bindings, a link to its parent
//! frame, and a tag telling `var` declarations apart from `let`/`const`
//! ones: `var` targets the nearest enclosing *function* frame, `let` and
//! `const` target the frame they appear in.
//!
//! Frames are garbage-collected because closures keep their creation frame
//! alive past the block or call that introduced it, and mutually recursive
//! closures make the resulting graph cyclic.

use crate::value::Value;
use gc::{Finalize, Gc, GcCell, Trace};
use rustc_hash::FxHashMap;

/// A shared, mutable scope frame.
pub type Environment = Gc<GcCell<Scope>>;

/// Distinguishes the binding target of `var` from `let`/`const`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Finalize)]
pub enum ScopeKind {
    /// Introduced for the global program and for every function invocation.
    Function,
    /// Introduced for blocks, `for` headers, `switch` bodies and `catch`
    /// clauses.
    Block,
}

unsafe impl Trace for ScopeKind {
    gc::unsafe_empty_trace!();
}

/// A single frame in the environment chain.
///
/// Presence of a key in `bindings` is the "declared" bit; a declared name
/// whose value is undefined is distinct from an undeclared one.
#[derive(Debug, Trace, Finalize)]
pub struct Scope {
    bindings: FxHashMap<String, Value>,
    kind: ScopeKind,
    outer: Option<Environment>,
}

impl Scope {
    pub fn new(kind: ScopeKind, outer: Option<Environment>) -> Self {
        Self {
            bindings: FxHashMap::default(),
            kind,
            outer,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn outer(&self) -> Option<Environment> {
        self.outer.as_ref().cloned()
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn binding(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).cloned()
    }

    pub fn insert_binding<N: Into<String>>(&mut self, name: N, value: Value) {
        self.bindings.insert(name.into(), value);
    }
}

/// Allocates a fresh frame linked to `outer`.
pub fn new_scope(kind: ScopeKind, outer: Option<Environment>) -> Environment {
    Gc::new(GcCell::new(Scope::new(kind, outer)))
}

/// The frame stack of one interpreter.
///
/// The top of the stack is the frame evaluation currently runs in; name
/// resolution walks the top frame's *outer links*, not the stack itself,
/// because a function frame's parent is the function's captured scope
/// rather than whatever happened to be on the stack at call time.
#[derive(Debug)]
pub struct LexicalEnvironment {
    stack: Vec<Environment>,
}

impl LexicalEnvironment {
    /// Creates the environment with its global function frame.
    pub fn new() -> Self {
        Self {
            stack: vec![new_scope(ScopeKind::Function, None)],
        }
    }

    /// Creates an environment rooted at an existing global frame; the
    /// `eval` gate uses this to run dynamic code at global scope without
    /// dragging the caller's frames along.
    pub fn with_global(global: Environment) -> Self {
        Self {
            stack: vec![global],
        }
    }

    /// The global frame; it is never popped.
    pub fn global(&self) -> &Environment {
        self.stack.first().expect("global frame missing")
    }

    /// The frame evaluation currently runs in.
    pub fn current(&self) -> &Environment {
        self.stack.last().expect("environment stack underflow")
    }

    /// Pushes a block frame chained to the current frame.
    pub fn push_block(&mut self) {
        let outer = self.current().clone();
        self.stack.push(new_scope(ScopeKind::Block, Some(outer)));
    }

    /// Pushes a function frame chained to the given captured scope.
    pub fn push_function(&mut self, captured: Environment) {
        self.stack
            .push(new_scope(ScopeKind::Function, Some(captured)));
    }

    pub fn pop(&mut self) -> Option<Environment> {
        debug_assert!(self.stack.len() > 1, "attempted to pop the global frame");
        self.stack.pop()
    }

    /// Walks the chain from the current frame outwards.
    fn chain(&self) -> impl Iterator<Item = Environment> {
        let mut next = Some(self.current().clone());
        std::iter::from_fn(move || {
            let env = next.take()?;
            next = env.borrow().outer();
            Some(env)
        })
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.chain().any(|env| env.borrow().has_binding(name))
    }

    /// Resolves `name`, or `None` when no frame in the chain declares it.
    pub fn get(&self, name: &str) -> Option<Value> {
        self.chain().find_map(|env| env.borrow().binding(name))
    }

    /// Assigns `name` in the innermost frame that declares it.
    ///
    /// When no frame declares the name, the binding is created in the
    /// *current* frame. All `var`s are hoisted before evaluation, so this
    /// fallback is only reached for assignments to never-declared names;
    /// targeting the current frame rather than the global one is the
    /// engine's documented deviation from non-strict ES5.
    pub fn set(&mut self, name: &str, value: Value) {
        for env in self.chain() {
            if env.borrow().has_binding(name) {
                env.borrow_mut().insert_binding(name, value);
                return;
            }
        }
        self.current().borrow_mut().insert_binding(name, value);
    }

    /// Binds a `var`-scoped name: walks past block frames to the nearest
    /// function frame and assigns there.
    pub fn declare_var<N: Into<String>>(&mut self, name: N, value: Value) {
        let env = self
            .chain()
            .find(|env| env.borrow().kind() == ScopeKind::Function)
            .expect("no function frame in scope chain");
        env.borrow_mut().insert_binding(name, value);
    }

    /// Binds a `let`/`const`-scoped name in the current frame.
    pub fn declare_let<N: Into<String>>(&mut self, name: N, value: Value) {
        self.current().borrow_mut().insert_binding(name, value);
    }

    /// Like [`declare_var`](Self::declare_var), but keeps an existing
    /// binding's value. The hoisting pre-pass uses this so a `var` seen
    /// twice does not clobber the first value.
    pub fn declare_var_if_absent(&mut self, name: &str, value: Value) {
        let env = self
            .chain()
            .find(|env| env.borrow().kind() == ScopeKind::Function)
            .expect("no function frame in scope chain");
        let mut scope = env.borrow_mut();
        if !scope.has_binding(name) {
            scope.insert_binding(name, value);
        }
    }
}

impl Default for LexicalEnvironment {
    fn default() -> Self {
        Self::new()
    }
}
