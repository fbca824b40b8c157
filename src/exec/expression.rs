//! Aggregate literals, conditionals, logical short-circuiting and
//! sequences.

use super::field::property_key;
use super::{Executable, Interpreter};
use crate::ast::{
    ArrayExpression, ConditionalExpression, FunctionBody, LogicalExpression, LogicalOp,
    ObjectExpression, ObjectMember, SequenceExpression,
};
use crate::builtins::array;
use crate::error::Completion;
use crate::value::Value;

impl Executable for ArrayExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let array = array::new_array(interpreter);
        for (index, element) in self.elements.iter().enumerate() {
            let value = match element {
                Some(expression) => expression.run(interpreter)?,
                None => Value::undefined(),
            };
            array.set_field(index.to_string(), value);
        }
        Ok(array)
    }
}

impl Executable for ObjectExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let object = interpreter.new_object();
        for member in &self.properties {
            match member {
                ObjectMember::ObjectProperty(property) => {
                    let key = property_key(interpreter, &property.key, property.computed)?;
                    let value = property.value.run(interpreter)?;
                    object.set_field(key, value);
                }
                ObjectMember::ObjectMethod(method) => {
                    let key = property_key(interpreter, &method.key, method.computed)?;
                    let function = interpreter.create_function(
                        &method.params,
                        FunctionBody::Block(method.body.clone()),
                        None,
                        false,
                    );
                    object.set_field(key, function);
                }
                ObjectMember::SpreadElement(spread) => {
                    let source = spread.argument.run(interpreter)?;
                    for (key, value) in source.enumerable_entries() {
                        object.set_field(key, value);
                    }
                }
            }
        }
        Ok(object)
    }
}

impl Executable for ConditionalExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        if self.test.run(interpreter)?.to_boolean() {
            self.consequent.run(interpreter)
        } else {
            self.alternate.run(interpreter)
        }
    }
}

impl Executable for LogicalExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        // Short-circuit, and yield the deciding operand itself rather than
        // a boolean.
        let left = self.left.run(interpreter)?;
        match self.operator {
            LogicalOp::And => {
                if left.to_boolean() {
                    self.right.run(interpreter)
                } else {
                    Ok(left)
                }
            }
            LogicalOp::Or => {
                if left.to_boolean() {
                    Ok(left)
                } else {
                    self.right.run(interpreter)
                }
            }
        }
    }
}

impl Executable for SequenceExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let mut result = Value::undefined();
        for expression in &self.expressions {
            result = expression.run(interpreter)?;
        }
        Ok(result)
    }
}
