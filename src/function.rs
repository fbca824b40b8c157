//! Function objects: native built-ins, script closures and bound variants.

use crate::ast::FunctionBody;
use crate::environment::Environment;
use crate::error::Completion;
use crate::exec::Interpreter;
use crate::value::{Object, ObjectData, PropertyMap, Value};
use bitflags::bitflags;
use gc::{Finalize, Trace};
use std::fmt::{self, Debug};
use std::rc::Rc;

/// The signature every native (host-side) function has. `this` is the
/// receiver, `args` the evaluated argument list, and the interpreter
/// reference lets natives re-enter script code.
pub type NativeFunctionData = fn(&Value, &[Value], &mut Interpreter) -> Completion;

/// A native function pointer. Pointers carry no GC references, so the
/// trace is empty.
#[derive(Clone, Copy, Finalize)]
pub struct BuiltInFunction(pub(crate) NativeFunctionData);

unsafe impl Trace for BuiltInFunction {
    gc::unsafe_empty_trace!();
}

impl Debug for BuiltInFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[native]")
    }
}

bitflags! {
    #[derive(Finalize, Default)]
    pub struct FunctionFlags: u8 {
        /// `new` may be applied to this function.
        const CONSTRUCTABLE = 0b0000_0001;
        /// Arrow functions: no own `this`/`arguments` binding.
        const LEXICAL_THIS = 0b0000_0010;
        /// One of the engine's own constructors (Object, Array, …); the
        /// reflective-access filter blanks `constructor` reads that
        /// resolve to such a function.
        const BUILTIN_CONSTRUCTOR = 0b0000_0100;
    }
}

unsafe impl Trace for FunctionFlags {
    gc::unsafe_empty_trace!();
}

/// A callable script value.
#[derive(Clone, Trace, Finalize)]
pub enum Function {
    Native(NativeFunction),
    Script(ScriptFunction),
    Bound(BoundFunction),
}

/// A built-in exposed to scripts, with its statics (`Array.isArray`,
/// `prototype`, …) in `properties`.
#[derive(Clone, Debug, Trace, Finalize)]
pub struct NativeFunction {
    pub(crate) function: BuiltInFunction,
    pub(crate) name: String,
    pub(crate) flags: FunctionFlags,
    pub(crate) properties: PropertyMap,
}

/// A user-defined function: parameter list, body and the scope frame in
/// effect at creation. The syntax subtree is engine-opaque data shared by
/// reference (it contains no GC pointers, hence the ignored traces).
#[derive(Clone, Debug, Trace, Finalize)]
pub struct ScriptFunction {
    #[unsafe_ignore_trace]
    pub(crate) params: Rc<[String]>,
    #[unsafe_ignore_trace]
    pub(crate) body: Rc<FunctionBody>,
    pub(crate) environment: Environment,
    /// The self-name a named function expression binds inside its own
    /// frame; also set for declarations.
    pub(crate) name: Option<String>,
    pub(crate) flags: FunctionFlags,
    pub(crate) properties: PropertyMap,
}

/// The result of `bind`: a non-constructible forwarder to `target` with a
/// fixed receiver and leading arguments.
#[derive(Clone, Debug, Trace, Finalize)]
pub struct BoundFunction {
    pub(crate) target: Value,
    pub(crate) this: Value,
    pub(crate) bound_args: Vec<Value>,
    pub(crate) properties: PropertyMap,
}

impl Function {
    pub fn native<N: Into<String>>(name: N, function: NativeFunctionData) -> Self {
        Function::Native(NativeFunction {
            function: BuiltInFunction(function),
            name: name.into(),
            flags: FunctionFlags::empty(),
            properties: PropertyMap::new(),
        })
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Function::Native(native) => Some(&native.name),
            Function::Script(script) => script.name.as_deref(),
            Function::Bound(_) => None,
        }
    }

    pub fn flags(&self) -> FunctionFlags {
        match self {
            Function::Native(native) => native.flags,
            Function::Script(script) => script.flags,
            Function::Bound(_) => FunctionFlags::empty(),
        }
    }

    /// The script-visible `length`: the declared parameter count.
    pub fn arity(&self) -> u32 {
        match self {
            Function::Native(_) => 0,
            Function::Script(script) => script.params.len() as u32,
            Function::Bound(bound) => {
                let inner = bound
                    .target
                    .as_function()
                    .map(|cell| cell.borrow().arity())
                    .unwrap_or(0);
                inner.saturating_sub(bound.bound_args.len() as u32)
            }
        }
    }

    pub fn properties(&self) -> &PropertyMap {
        match self {
            Function::Native(native) => &native.properties,
            Function::Script(script) => &script.properties,
            Function::Bound(bound) => &bound.properties,
        }
    }

    pub fn properties_mut(&mut self) -> &mut PropertyMap {
        match self {
            Function::Native(native) => &mut native.properties,
            Function::Script(script) => &mut script.properties,
            Function::Bound(bound) => &mut bound.properties,
        }
    }
}

impl Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "[function {}]", name),
            None => f.write_str("[function]"),
        }
    }
}

/// True when the resolved value is one of the engine's own constructors;
/// the member-read filter consults this for `constructor` lookups.
pub(crate) fn is_builtin_constructor(value: &Value) -> bool {
    value.as_function().map_or(false, |cell| {
        cell.borrow()
            .flags()
            .contains(FunctionFlags::BUILTIN_CONSTRUCTOR)
    })
}

/// The members every function value answers before its own property table:
/// the `call`/`apply`/`bind` adapters and the derived `name`/`length`.
pub(crate) fn function_member(value: &Value, key: &str) -> Option<Value> {
    let cell = value.as_function()?;
    let function = cell.borrow();
    match key {
        "call" => Some(Value::native_function("call", function_prototype_call)),
        "apply" => Some(Value::native_function("apply", function_prototype_apply)),
        "bind" => Some(Value::native_function("bind", function_prototype_bind)),
        "name" => Some(Value::string(function.name().unwrap_or(""))),
        "length" => Some(Value::number(function.arity())),
        _ => function.properties().get(key).cloned(),
    }
}

/// `f.call(thisArg, …args)`: `this` at the call site is `f` itself.
pub(crate) fn function_prototype_call(
    this: &Value,
    args: &[Value],
    interpreter: &mut Interpreter,
) -> Completion {
    let receiver = args.first().cloned().unwrap_or_else(Value::undefined);
    let rest: Vec<Value> = args.iter().skip(1).cloned().collect();
    interpreter.call(this, &receiver, &rest)
}

/// `f.apply(thisArg, argsArray)`.
pub(crate) fn function_prototype_apply(
    this: &Value,
    args: &[Value],
    interpreter: &mut Interpreter,
) -> Completion {
    let receiver = args.first().cloned().unwrap_or_else(Value::undefined);
    let arguments = match args.get(1) {
        None => Vec::new(),
        Some(list) if list.is_null_or_undefined() => Vec::new(),
        Some(list) => match extract_array_elements(list) {
            Some(elements) => elements,
            None => {
                return Err(interpreter
                    .throw_error("Function.prototype.apply: arguments must be an array"))
            }
        },
    };
    interpreter.call(this, &receiver, &arguments)
}

/// `f.bind(thisArg, …boundArgs)`.
///
/// Binding an already-bound function extends the argument prefix but keeps
/// the original receiver; the new `thisArg` is ignored.
pub(crate) fn function_prototype_bind(
    this: &Value,
    args: &[Value],
    interpreter: &mut Interpreter,
) -> Completion {
    let cell = match this.as_function() {
        Some(cell) => cell,
        None => return Err(interpreter.throw_error("Value is not a function")),
    };
    let bound = match &*cell.borrow() {
        Function::Bound(existing) => BoundFunction {
            target: existing.target.clone(),
            this: existing.this.clone(),
            bound_args: existing
                .bound_args
                .iter()
                .cloned()
                .chain(args.iter().skip(1).cloned())
                .collect(),
            properties: PropertyMap::new(),
        },
        _ => BoundFunction {
            target: this.clone(),
            this: args.first().cloned().unwrap_or_else(Value::undefined),
            bound_args: args.iter().skip(1).cloned().collect(),
            properties: PropertyMap::new(),
        },
    };
    Ok(Value::function(Function::Bound(bound)))
}

/// Reads the indexed elements out of an array or arguments object.
pub(crate) fn extract_array_elements(value: &Value) -> Option<Vec<Value>> {
    let cell = value.as_object()?;
    let object = cell.borrow();
    if !matches!(object.data, ObjectData::Array | ObjectData::Arguments) {
        return None;
    }
    let length = object
        .properties()
        .get("length")
        .map(|v| v.to_uint32())
        .unwrap_or(0);
    Some(
        (0..length)
            .map(|index| {
                object
                    .properties()
                    .get(&index.to_string())
                    .cloned()
                    .unwrap_or_else(Value::undefined)
            })
            .collect(),
    )
}

/// Builds the `arguments` object a function body sees: an indexable
/// sequence with a `length`, not a live mapping.
pub(crate) fn create_arguments_object(interpreter: &Interpreter, args: &[Value]) -> Value {
    let value = Value::object(Object::new(
        ObjectData::Arguments,
        interpreter.intrinsics().object_prototype.clone(),
    ));
    for (index, arg) in args.iter().enumerate() {
        value.set_field(index.to_string(), arg.clone());
    }
    value.set_field("length", Value::number(args.len() as u32));
    value
}
