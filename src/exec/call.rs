//! Call and construction sites: the native/script dispatch boundary.

use super::block::run_statement_list;
use super::field::{get_member, member_key};
use super::{Executable, Interpreter};
use crate::ast::{CallExpression, Expression, FunctionBody, NewExpression};
use crate::error::{Abrupt, Completion};
use crate::function::{create_arguments_object, Function, FunctionFlags, ScriptFunction};
use crate::profiler::Profiler;
use crate::value::{Object, ObjectData, Value, ValueData};

impl Executable for CallExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let _timer = Profiler::global().start_event("Call", "exec");

        // A member callee supplies its receiver as `this`; anything else
        // gets undefined.
        let (this, function) = match &*self.callee {
            Expression::MemberExpression(member) => {
                let object = member.object.run(interpreter)?;
                let key = member_key(interpreter, member)?;
                let function = get_member(interpreter, &object, &key)?;
                (object, function)
            }
            callee => (Value::undefined(), callee.run(interpreter)?),
        };

        let mut arguments = Vec::with_capacity(self.arguments.len());
        for argument in &self.arguments {
            arguments.push(argument.run(interpreter)?);
        }

        interpreter.call(&function, &this, &arguments)
    }
}

impl Executable for NewExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let constructor = self.callee.run(interpreter)?;
        let mut arguments = Vec::with_capacity(self.arguments.len());
        for argument in &self.arguments {
            arguments.push(argument.run(interpreter)?);
        }
        interpreter.construct(&constructor, &arguments)
    }
}

impl Interpreter {
    /// Invokes any callable value. This is also the host's entry point for
    /// calling script functions it has been handed; host callables receive
    /// the interpreter back and may re-enter through here.
    pub fn call(&mut self, function: &Value, this: &Value, arguments: &[Value]) -> Completion {
        match function.data() {
            ValueData::Function(cell) => {
                let callable = cell.borrow().clone();
                match callable {
                    Function::Native(ref native) => (native.function.0)(this, arguments, self),
                    Function::Script(ref script) => self.invoke(function, script, this, arguments),
                    Function::Bound(ref bound) => {
                        let mut combined =
                            Vec::with_capacity(bound.bound_args.len() + arguments.len());
                        combined.extend(bound.bound_args.iter().cloned());
                        combined.extend(arguments.iter().cloned());
                        self.call(&bound.target, &bound.this, &combined)
                    }
                }
            }
            ValueData::Host(host) if host.is_callable() => {
                let host = host.clone();
                host.call(this, arguments, self)
            }
            _ => Err(self.throw_error("Value is not a function")),
        }
    }

    /// `new` on any constructible value.
    ///
    /// For script functions: fresh instance linked to the function's
    /// `prototype`, which the constructor's return value replaces only
    /// when that value is an object (null and the other primitives keep
    /// the instance).
    pub fn construct(&mut self, constructor: &Value, arguments: &[Value]) -> Completion {
        match constructor.data() {
            ValueData::Function(cell) => {
                let callable = cell.borrow().clone();
                match callable {
                    Function::Script(ref script) => {
                        if !script.flags.contains(FunctionFlags::CONSTRUCTABLE) {
                            return Err(self.throw_error("Value is not a constructor"));
                        }
                        let prototype = {
                            let linked = constructor.get_field("prototype");
                            if linked.is_object() {
                                linked
                            } else {
                                self.intrinsics().object_prototype.clone()
                            }
                        };
                        let this = Value::object(Object::new(ObjectData::Ordinary, prototype));
                        let result = self.invoke(constructor, script, &this, arguments)?;
                        Ok(if result.is_object_like() { result } else { this })
                    }
                    // Engine constructors build and return their own
                    // objects; `new Array(…)` and `Array(…)` coincide.
                    Function::Native(ref native) => {
                        (native.function.0)(&Value::undefined(), arguments, self)
                    }
                    Function::Bound(_) => Err(self.throw_error("Value is not a constructor")),
                }
            }
            ValueData::Host(host) if host.is_callable() => {
                let host = host.clone();
                host.construct(arguments, self)
            }
            _ => Err(self.throw_error("Value is not a constructor")),
        }
    }

    /// Runs a script function: fresh function frame over the captured
    /// scope, self-name, hoisting pre-pass, parameters, `arguments`,
    /// `this`, then the body.
    fn invoke(
        &mut self,
        function_value: &Value,
        script: &ScriptFunction,
        this: &Value,
        arguments: &[Value],
    ) -> Completion {
        let _timer = Profiler::global().start_event("invoke", "exec");
        self.realm_mut()
            .environment
            .push_function(script.environment.clone());
        let result = self.invoke_in_frame(function_value, script, this, arguments);
        self.realm_mut().environment.pop();
        result
    }

    fn invoke_in_frame(
        &mut self,
        function_value: &Value,
        script: &ScriptFunction,
        this: &Value,
        arguments: &[Value],
    ) -> Completion {
        if let Some(name) = &script.name {
            self.realm_mut()
                .environment
                .declare_let(name.clone(), function_value.clone());
        }

        for (index, parameter) in script.params.iter().enumerate() {
            let value = arguments
                .get(index)
                .cloned()
                .unwrap_or_else(Value::undefined);
            self.realm_mut()
                .environment
                .declare_let(parameter.clone(), value);
        }

        // Arrows have no `this`/`arguments` of their own; both resolve
        // lexically through the captured scope.
        if !script.flags.contains(FunctionFlags::LEXICAL_THIS) {
            let arguments_object = create_arguments_object(self, arguments);
            self.realm_mut()
                .environment
                .declare_let("arguments", arguments_object);
            self.realm_mut()
                .environment
                .declare_let("this", this.clone());
        }

        match &*script.body {
            FunctionBody::Block(block) => {
                self.hoist(&block.body);
                match run_statement_list(&block.body, self) {
                    Err(Abrupt::Return(value)) => Ok(value),
                    Err(other) => Err(other),
                    Ok(_) => Ok(Value::undefined()),
                }
            }
            FunctionBody::Expression(expression) => expression.run(self),
        }
    }
}
