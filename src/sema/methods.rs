// src/sema/methods.rs
//! Built-in method signatures, selected by the receiver's type.
//!
//! The method surface is fixed: Lists, Tuples, Strings, Ints, and
//! Floats each have a small set of methods whose result types are
//! known statically. All collection methods return fresh values.

use crate::sema::Type;

/// A resolved method signature
#[derive(Debug, Clone)]
pub struct MethodSig {
    pub params: Vec<Type>,
    pub return_type: Type,
}

impl MethodSig {
    fn new(params: Vec<Type>, return_type: Type) -> Self {
        Self {
            params,
            return_type,
        }
    }

    fn nullary(return_type: Type) -> Self {
        Self::new(Vec::new(), return_type)
    }
}

/// Look up a method on a receiver type. Returns None when the receiver
/// has no such method (or no methods at all).
pub fn lookup_method(receiver: &Type, method: &str) -> Option<MethodSig> {
    match receiver {
        Type::List(element) => {
            let element = (**element).clone();
            let list = Type::List(Box::new(element.clone()));
            match method {
                "length" => Some(MethodSig::nullary(Type::Int)),
                "append" => Some(MethodSig::new(vec![element], list)),
                "head" => Some(MethodSig::nullary(element)),
                "tail" => Some(MethodSig::nullary(list)),
                "is_empty" => Some(MethodSig::nullary(Type::Bool)),
                "reverse" => Some(MethodSig::nullary(list)),
                "concat" => Some(MethodSig::new(vec![list.clone()], list)),
                _ => None,
            }
        }

        Type::Tuple(_) => match method {
            "length" => Some(MethodSig::nullary(Type::Int)),
            _ => None,
        },

        Type::String => match method {
            "length" => Some(MethodSig::nullary(Type::Int)),
            "is_empty" => Some(MethodSig::nullary(Type::Bool)),
            "contains" | "starts_with" | "ends_with" => {
                Some(MethodSig::new(vec![Type::String], Type::Bool))
            }
            "to_upper" | "to_lower" | "trim" => Some(MethodSig::nullary(Type::String)),
            _ => None,
        },

        Type::Int => match method {
            "to_string" => Some(MethodSig::nullary(Type::String)),
            "abs" => Some(MethodSig::nullary(Type::Int)),
            _ => None,
        },

        Type::Float => match method {
            "to_string" => Some(MethodSig::nullary(Type::String)),
            "abs" => Some(MethodSig::nullary(Type::Float)),
            "floor" | "ceil" | "round" => Some(MethodSig::nullary(Type::Int)),
            _ => None,
        },

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_methods_use_element_type() {
        let list = Type::List(Box::new(Type::Int));

        let append = lookup_method(&list, "append").unwrap();
        assert!(append.params[0].equals(&Type::Int));
        assert!(append.return_type.equals(&list));

        let head = lookup_method(&list, "head").unwrap();
        assert!(head.params.is_empty());
        assert!(head.return_type.equals(&Type::Int));

        let concat = lookup_method(&list, "concat").unwrap();
        assert!(concat.params[0].equals(&list));
    }

    #[test]
    fn tuple_only_has_length() {
        let tuple = Type::Tuple(vec![Type::Int, Type::Bool]);
        assert!(lookup_method(&tuple, "length").is_some());
        assert!(lookup_method(&tuple, "reverse").is_none());
    }

    #[test]
    fn string_predicates_take_string() {
        let contains = lookup_method(&Type::String, "contains").unwrap();
        assert!(contains.params[0].equals(&Type::String));
        assert!(contains.return_type.equals(&Type::Bool));

        let trim = lookup_method(&Type::String, "trim").unwrap();
        assert!(trim.return_type.equals(&Type::String));
    }

    #[test]
    fn float_rounding_returns_int() {
        for method in ["floor", "ceil", "round"] {
            let sig = lookup_method(&Type::Float, method).unwrap();
            assert!(sig.return_type.equals(&Type::Int), "{} -> Int", method);
        }
        let abs = lookup_method(&Type::Float, "abs").unwrap();
        assert!(abs.return_type.equals(&Type::Float));
    }

    #[test]
    fn bool_has_no_methods() {
        assert!(lookup_method(&Type::Bool, "to_string").is_none());
        assert!(lookup_method(&Type::Unknown, "length").is_none());
    }
}
