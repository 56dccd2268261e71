// src/runtime/methods.rs
//! Built-in method dispatch by receiver kind, used by CALL_METHOD.
//!
//! Every collection method returns a fresh value; receivers are never
//! mutated.

use crate::errors::RuntimeError;
use crate::runtime::Value;

pub fn call_method(
    method: &str,
    receiver: Value,
    args: Vec<Value>,
) -> Result<Value, RuntimeError> {
    match receiver {
        Value::List(items) => list_method(method, items, args),
        Value::Tuple(items) => tuple_method(method, items, args),
        Value::Str(s) => string_method(method, s, args),
        Value::Int(i) => int_method(method, i, args),
        Value::Float(f) => float_method(method, f, args),
        other => Err(RuntimeError::UnknownMethod {
            receiver: other.type_name(),
            method: method.to_string(),
        }),
    }
}

fn expect_arity(
    receiver: &'static str,
    method: &str,
    expected: usize,
    found: usize,
) -> Result<(), RuntimeError> {
    if expected == found {
        Ok(())
    } else {
        Err(RuntimeError::MethodArity {
            receiver,
            method: method.to_string(),
            expected,
            found,
        })
    }
}

fn list_method(method: &str, items: Vec<Value>, mut args: Vec<Value>) -> Result<Value, RuntimeError> {
    match method {
        "length" => {
            expect_arity("List", method, 0, args.len())?;
            Ok(Value::Int(items.len() as i64))
        }
        "append" => {
            expect_arity("List", method, 1, args.len())?;
            let mut new_items = items;
            new_items.push(args.remove(0));
            Ok(Value::List(new_items))
        }
        "head" => {
            expect_arity("List", method, 0, args.len())?;
            items
                .into_iter()
                .next()
                .ok_or(RuntimeError::EmptyList { method: "head" })
        }
        "tail" => {
            expect_arity("List", method, 0, args.len())?;
            if items.is_empty() {
                return Err(RuntimeError::EmptyList { method: "tail" });
            }
            Ok(Value::List(items[1..].to_vec()))
        }
        "is_empty" => {
            expect_arity("List", method, 0, args.len())?;
            Ok(Value::Bool(items.is_empty()))
        }
        "reverse" => {
            expect_arity("List", method, 0, args.len())?;
            let mut new_items = items;
            new_items.reverse();
            Ok(Value::List(new_items))
        }
        "concat" => {
            expect_arity("List", method, 1, args.len())?;
            let Value::List(other) = args.remove(0) else {
                return Err(RuntimeError::MethodArgType {
                    receiver: "List",
                    method: "concat",
                    expected: "a List argument",
                });
            };
            let mut new_items = items;
            new_items.extend(other);
            Ok(Value::List(new_items))
        }
        _ => Err(RuntimeError::UnknownMethod {
            receiver: "List",
            method: method.to_string(),
        }),
    }
}

fn tuple_method(method: &str, items: Vec<Value>, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match method {
        "length" => {
            expect_arity("Tuple", method, 0, args.len())?;
            Ok(Value::Int(items.len() as i64))
        }
        _ => Err(RuntimeError::UnknownMethod {
            receiver: "Tuple",
            method: method.to_string(),
        }),
    }
}

fn string_method(method: &str, s: String, mut args: Vec<Value>) -> Result<Value, RuntimeError> {
    // Methods with one String argument share their checking
    let string_arg = |method: &'static str, args: &mut Vec<Value>| -> Result<String, RuntimeError> {
        match args.pop() {
            Some(Value::Str(arg)) => Ok(arg),
            _ => Err(RuntimeError::MethodArgType {
                receiver: "String",
                method,
                expected: "a String argument",
            }),
        }
    };

    match method {
        "length" => {
            expect_arity("String", method, 0, args.len())?;
            Ok(Value::Int(s.len() as i64))
        }
        "is_empty" => {
            expect_arity("String", method, 0, args.len())?;
            Ok(Value::Bool(s.is_empty()))
        }
        "contains" => {
            expect_arity("String", method, 1, args.len())?;
            let needle = string_arg("contains", &mut args)?;
            Ok(Value::Bool(s.contains(&needle)))
        }
        "starts_with" => {
            expect_arity("String", method, 1, args.len())?;
            let prefix = string_arg("starts_with", &mut args)?;
            Ok(Value::Bool(s.starts_with(&prefix)))
        }
        "ends_with" => {
            expect_arity("String", method, 1, args.len())?;
            let suffix = string_arg("ends_with", &mut args)?;
            Ok(Value::Bool(s.ends_with(&suffix)))
        }
        "to_upper" => {
            expect_arity("String", method, 0, args.len())?;
            Ok(Value::Str(s.to_uppercase()))
        }
        "to_lower" => {
            expect_arity("String", method, 0, args.len())?;
            Ok(Value::Str(s.to_lowercase()))
        }
        "trim" => {
            expect_arity("String", method, 0, args.len())?;
            Ok(Value::Str(
                s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
                    .to_string(),
            ))
        }
        _ => Err(RuntimeError::UnknownMethod {
            receiver: "String",
            method: method.to_string(),
        }),
    }
}

fn int_method(method: &str, i: i64, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match method {
        "to_string" => {
            expect_arity("Int", method, 0, args.len())?;
            Ok(Value::Str(i.to_string()))
        }
        "abs" => {
            expect_arity("Int", method, 0, args.len())?;
            Ok(Value::Int(i.wrapping_abs()))
        }
        _ => Err(RuntimeError::UnknownMethod {
            receiver: "Int",
            method: method.to_string(),
        }),
    }
}

fn float_method(method: &str, f: f64, args: Vec<Value>) -> Result<Value, RuntimeError> {
    match method {
        "to_string" => {
            expect_arity("Float", method, 0, args.len())?;
            Ok(Value::Str(format!("{}", f)))
        }
        "abs" => {
            expect_arity("Float", method, 0, args.len())?;
            Ok(Value::Float(f.abs()))
        }
        "floor" => {
            expect_arity("Float", method, 0, args.len())?;
            Ok(Value::Int(f.floor() as i64))
        }
        "ceil" => {
            expect_arity("Float", method, 0, args.len())?;
            Ok(Value::Int(f.ceil() as i64))
        }
        "round" => {
            expect_arity("Float", method, 0, args.len())?;
            Ok(Value::Int(f.round() as i64))
        }
        _ => Err(RuntimeError::UnknownMethod {
            receiver: "Float",
            method: method.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> Value {
        Value::List(values.iter().map(|&i| Value::Int(i)).collect())
    }

    #[test]
    fn list_length_and_is_empty() {
        assert_eq!(
            call_method("length", ints(&[1, 2, 3]), vec![]).unwrap(),
            Value::Int(3)
        );
        assert_eq!(
            call_method("is_empty", ints(&[]), vec![]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn list_append_returns_fresh_list() {
        let result = call_method("append", ints(&[1, 2]), vec![Value::Int(3)]).unwrap();
        assert_eq!(result, ints(&[1, 2, 3]));
    }

    #[test]
    fn list_head_and_tail() {
        assert_eq!(
            call_method("head", ints(&[7, 8]), vec![]).unwrap(),
            Value::Int(7)
        );
        assert_eq!(
            call_method("tail", ints(&[7, 8, 9]), vec![]).unwrap(),
            ints(&[8, 9])
        );

        assert!(matches!(
            call_method("head", ints(&[]), vec![]),
            Err(RuntimeError::EmptyList { method: "head" })
        ));
        assert!(matches!(
            call_method("tail", ints(&[]), vec![]),
            Err(RuntimeError::EmptyList { method: "tail" })
        ));
    }

    #[test]
    fn list_reverse_and_concat() {
        assert_eq!(
            call_method("reverse", ints(&[1, 2, 3]), vec![]).unwrap(),
            ints(&[3, 2, 1])
        );
        assert_eq!(
            call_method("concat", ints(&[1]), vec![ints(&[2, 3])]).unwrap(),
            ints(&[1, 2, 3])
        );
        assert!(matches!(
            call_method("concat", ints(&[1]), vec![Value::Int(2)]),
            Err(RuntimeError::MethodArgType { .. })
        ));
    }

    #[test]
    fn tuple_only_supports_length() {
        let tuple = Value::Tuple(vec![Value::Int(1), Value::Bool(true)]);
        assert_eq!(
            call_method("length", tuple.clone(), vec![]).unwrap(),
            Value::Int(2)
        );
        assert!(matches!(
            call_method("reverse", tuple, vec![]),
            Err(RuntimeError::UnknownMethod { receiver: "Tuple", .. })
        ));
    }

    #[test]
    fn string_predicates() {
        let s = Value::Str("Hello World".to_string());
        assert_eq!(
            call_method("length", s.clone(), vec![]).unwrap(),
            Value::Int(11)
        );
        assert_eq!(
            call_method("contains", s.clone(), vec![Value::Str("lo W".to_string())]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call_method("starts_with", s.clone(), vec![Value::Str("Hello".to_string())]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call_method("ends_with", s, vec![Value::Str("World".to_string())]).unwrap(),
            Value::Bool(true)
        );
    }

    #[test]
    fn string_transforms() {
        assert_eq!(
            call_method("to_upper", Value::Str("abc".to_string()), vec![]).unwrap(),
            Value::Str("ABC".to_string())
        );
        assert_eq!(
            call_method("to_lower", Value::Str("AbC".to_string()), vec![]).unwrap(),
            Value::Str("abc".to_string())
        );
        assert_eq!(
            call_method("trim", Value::Str(" \t x \n".to_string()), vec![]).unwrap(),
            Value::Str("x".to_string())
        );
    }

    #[test]
    fn int_methods() {
        assert_eq!(
            call_method("to_string", Value::Int(-3), vec![]).unwrap(),
            Value::Str("-3".to_string())
        );
        assert_eq!(
            call_method("abs", Value::Int(-3), vec![]).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn float_methods() {
        assert_eq!(
            call_method("abs", Value::Float(-1.5), vec![]).unwrap(),
            Value::Float(1.5)
        );
        assert_eq!(
            call_method("floor", Value::Float(1.9), vec![]).unwrap(),
            Value::Int(1)
        );
        assert_eq!(
            call_method("ceil", Value::Float(1.1), vec![]).unwrap(),
            Value::Int(2)
        );
        assert_eq!(
            call_method("round", Value::Float(1.5), vec![]).unwrap(),
            Value::Int(2)
        );
    }

    #[test]
    fn arity_mismatch_is_reported() {
        assert!(matches!(
            call_method("length", ints(&[1]), vec![Value::Int(1)]),
            Err(RuntimeError::MethodArity { expected: 0, found: 1, .. })
        ));
    }

    #[test]
    fn unknown_receiver_or_method() {
        assert!(matches!(
            call_method("length", Value::Bool(true), vec![]),
            Err(RuntimeError::UnknownMethod { receiver: "Bool", .. })
        ));
        assert!(matches!(
            call_method("pop", ints(&[1]), vec![]),
            Err(RuntimeError::UnknownMethod { receiver: "List", .. })
        ));
    }
}
