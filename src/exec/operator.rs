//! Binary, unary, update and assignment operators.

use super::field::{get_member, member_key, set_member};
use super::{Executable, Interpreter};
use crate::ast::{
    AssignmentExpression, BinaryExpression, BinaryOp, Expression, UnaryExpression, UnaryOp,
    UpdateExpression, UpdateOp,
};
use crate::error::{Abrupt, Completion, Error};
use crate::function::Function;
use crate::value::{Value, ValueData};

impl Executable for BinaryExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let left = self.left.run(interpreter)?;
        let right = self.right.run(interpreter)?;
        apply_binary(interpreter, self.operator, &left, &right)
    }
}

/// Applies one binary operator to already-evaluated operands; compound
/// assignment reuses this.
pub(crate) fn apply_binary(
    interpreter: &mut Interpreter,
    operator: BinaryOp,
    left: &Value,
    right: &Value,
) -> Completion {
    Ok(match operator {
        BinaryOp::Add => left + right,
        BinaryOp::Sub => left - right,
        BinaryOp::Mul => left * right,
        BinaryOp::Div => left / right,
        BinaryOp::Mod => left % right,
        // Loose equality is strict equality in this engine.
        BinaryOp::Equal => Value::boolean(left.equals(right)),
        BinaryOp::NotEqual => Value::boolean(!left.equals(right)),
        BinaryOp::StrictEqual => Value::boolean(left.strict_equals(right)),
        BinaryOp::StrictNotEqual => Value::boolean(!left.strict_equals(right)),
        BinaryOp::LessThan => Value::boolean(left.lt(right)),
        BinaryOp::LessThanOrEqual => Value::boolean(left.le(right)),
        BinaryOp::GreaterThan => Value::boolean(left.gt(right)),
        BinaryOp::GreaterThanOrEqual => Value::boolean(left.ge(right)),
        BinaryOp::Shl => left << right,
        BinaryOp::Shr => left >> right,
        BinaryOp::UShr => left.ushr(right),
        BinaryOp::And => left & right,
        BinaryOp::Or => left | right,
        BinaryOp::Xor => left ^ right,
        BinaryOp::In => {
            let key = left.to_js_string();
            match right.data() {
                ValueData::Object(_) | ValueData::Function(_) | ValueData::Host(_) => {
                    Value::boolean(right.has_field(&key))
                }
                _ => {
                    return Err(interpreter.throw_error(format!(
                        "Cannot use 'in' operator to search for '{}' in {}",
                        key,
                        right.to_js_string()
                    )))
                }
            }
        }
        BinaryOp::InstanceOf => Value::boolean(instance_of(interpreter, left, right)?),
    })
}

/// `instanceof`: on a script or native function, walk the left operand's
/// prototype chain looking for the function's `prototype` object; on a
/// host callable, defer to the host's own notion of instance.
fn instance_of(
    interpreter: &mut Interpreter,
    value: &Value,
    constructor: &Value,
) -> Result<bool, Abrupt> {
    match constructor.data() {
        ValueData::Function(cell) => {
            let target_prototype = match &*cell.borrow() {
                Function::Bound(bound) => bound.target.get_field("prototype"),
                _ => constructor.get_field("prototype"),
            };
            if !target_prototype.is_object() {
                return Ok(false);
            }
            let mut current = match value.as_object() {
                Some(cell) => cell.borrow().prototype().clone(),
                None => return Ok(false),
            };
            loop {
                if current.ptr_eq(&target_prototype) {
                    return Ok(true);
                }
                current = match current.as_object() {
                    Some(cell) => cell.borrow().prototype().clone(),
                    None => return Ok(false),
                };
            }
        }
        ValueData::Host(host) if host.is_callable() => Ok(host.instance_of(value)),
        _ => Err(interpreter.throw_error("Right-hand side of 'instanceof' is not callable")),
    }
}

impl Executable for UnaryExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        match self.operator {
            UnaryOp::TypeOf => {
                // `typeof missing` must not raise a reference error.
                if let Expression::Identifier(identifier) = &*self.argument {
                    if !interpreter.realm().environment.has_binding(&identifier.name) {
                        return Ok(Value::string("undefined"));
                    }
                }
                let value = self.argument.run(interpreter)?;
                Ok(Value::string(value.type_of()))
            }
            UnaryOp::Delete => match &*self.argument {
                Expression::MemberExpression(member) => {
                    let object = member.object.run(interpreter)?;
                    let key = member_key(interpreter, member)?;
                    Ok(Value::boolean(object.remove_field(&key)))
                }
                Expression::Identifier(_) => Ok(Value::boolean(false)),
                _ => {
                    self.argument.run(interpreter)?;
                    Ok(Value::boolean(true))
                }
            },
            UnaryOp::Minus => {
                let value = self.argument.run(interpreter)?;
                Ok(-&value)
            }
            UnaryOp::Plus => {
                let value = self.argument.run(interpreter)?;
                Ok(Value::number(value.to_number()))
            }
            UnaryOp::Not => {
                let value = self.argument.run(interpreter)?;
                Ok(!&value)
            }
            UnaryOp::Tilde => {
                let value = self.argument.run(interpreter)?;
                Ok(value.bitnot())
            }
            UnaryOp::Void => {
                self.argument.run(interpreter)?;
                Ok(Value::undefined())
            }
        }
    }
}

impl Executable for UpdateExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        let (old, write_back): (Value, _) = match &*self.argument {
            Expression::Identifier(identifier) => {
                let name = identifier.name.clone();
                let old = match interpreter.realm().environment.get(&name) {
                    Some(value) => value,
                    None => {
                        return Err(
                            interpreter.throw_error(format!("{} is not defined", name))
                        )
                    }
                };
                (old, UpdateTarget::Binding(name))
            }
            Expression::MemberExpression(member) => {
                let object = member.object.run(interpreter)?;
                let key = member_key(interpreter, member)?;
                let old = get_member(interpreter, &object, &key)?;
                (old, UpdateTarget::Member(object, key))
            }
            other => {
                return Err(Abrupt::Fault(Error::UnhandledNode(format!(
                    "{} as an update target",
                    other.kind_name()
                ))))
            }
        };

        let old_number = old.to_number();
        let new_number = match self.operator {
            UpdateOp::Increment => old_number + 1.0,
            UpdateOp::Decrement => old_number - 1.0,
        };
        let new_value = Value::number(new_number);
        match write_back {
            UpdateTarget::Binding(name) => {
                interpreter
                    .realm_mut()
                    .environment
                    .set(&name, new_value.clone());
            }
            UpdateTarget::Member(object, key) => {
                set_member(interpreter, &object, &key, new_value.clone())?;
            }
        }
        Ok(if self.prefix {
            new_value
        } else {
            Value::number(old_number)
        })
    }
}

enum UpdateTarget {
    Binding(String),
    Member(Value, String),
}

impl Executable for AssignmentExpression {
    fn run(&self, interpreter: &mut Interpreter) -> Completion {
        match self.operator.binary_op() {
            // Plain `=`.
            None => {
                let value = self.right.run(interpreter)?;
                match &*self.left {
                    Expression::Identifier(identifier) => {
                        interpreter
                            .realm_mut()
                            .environment
                            .set(&identifier.name, value.clone());
                    }
                    Expression::MemberExpression(member) => {
                        let object = member.object.run(interpreter)?;
                        let key = member_key(interpreter, member)?;
                        set_member(interpreter, &object, &key, value.clone())?;
                    }
                    other => {
                        return Err(Abrupt::Fault(Error::UnhandledNode(format!(
                            "{} as an assignment target",
                            other.kind_name()
                        ))))
                    }
                }
                Ok(value)
            }
            // Compound: read, apply, write, yield the computed value.
            Some(operator) => match &*self.left {
                Expression::Identifier(identifier) => {
                    let old = match interpreter.realm().environment.get(&identifier.name) {
                        Some(value) => value,
                        None => {
                            return Err(interpreter
                                .throw_error(format!("{} is not defined", identifier.name)))
                        }
                    };
                    let rhs = self.right.run(interpreter)?;
                    let value = apply_binary(interpreter, operator, &old, &rhs)?;
                    interpreter
                        .realm_mut()
                        .environment
                        .set(&identifier.name, value.clone());
                    Ok(value)
                }
                Expression::MemberExpression(member) => {
                    let object = member.object.run(interpreter)?;
                    let key = member_key(interpreter, member)?;
                    let old = get_member(interpreter, &object, &key)?;
                    let rhs = self.right.run(interpreter)?;
                    let value = apply_binary(interpreter, operator, &old, &rhs)?;
                    set_member(interpreter, &object, &key, value.clone())?;
                    Ok(value)
                }
                other => Err(Abrupt::Fault(Error::UnhandledNode(format!(
                    "{} as an assignment target",
                    other.kind_name()
                )))),
            },
        }
    }
}
