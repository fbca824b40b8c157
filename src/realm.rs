//! A realm is one isolation domain: a global frame, the engine's intrinsic
//! prototype objects, and everything reachable from them. Interpreters
//! never share realms; embedders wanting isolation between scripts create
//! separate interpreters.

use crate::builtins;
use crate::environment::LexicalEnvironment;
use crate::value::Value;

/// The prototype objects literals and builtins hang off. These stay fixed
/// for the realm's lifetime even when the embedder replaces the
/// corresponding global bindings.
#[derive(Debug, Clone)]
pub struct Intrinsics {
    pub object_prototype: Value,
    pub array_prototype: Value,
    pub string_prototype: Value,
    pub number_prototype: Value,
    pub boolean_prototype: Value,
    pub error_prototype: Value,
    pub regexp_prototype: Value,
    pub date_prototype: Value,
}

#[derive(Debug)]
pub struct Realm {
    pub(crate) environment: LexicalEnvironment,
    pub(crate) intrinsics: Intrinsics,
}

impl Realm {
    /// Builds the global frame: the default capability table first, then
    /// the embedder's globals merged over it.
    pub fn create<G>(globals: G) -> Self
    where
        G: IntoIterator<Item = (String, Value)>,
    {
        let (defaults, intrinsics) = builtins::init();
        let environment = LexicalEnvironment::new();
        {
            let mut scope = environment.global().borrow_mut();
            scope.insert_binding("this", Value::undefined());
            for (name, value) in defaults {
                scope.insert_binding(name, value);
            }
            for (name, value) in globals {
                scope.insert_binding(name, value);
            }
        }
        Self {
            environment,
            intrinsics,
        }
    }

    pub fn environment(&self) -> &LexicalEnvironment {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut LexicalEnvironment {
        &mut self.environment
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }
}
