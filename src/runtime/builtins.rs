// src/runtime/builtins.rs
//! Host built-in functions dispatched by CALL_BUILTIN.
//!
//! print/println write to the VM's output sink; the file built-ins go
//! straight to the host filesystem. read_file deliberately maps every
//! failure to an empty string, and the write variants report success
//! as a Bool instead of failing.

use crate::bytecode::BuiltinId;
use crate::errors::RuntimeError;
use crate::runtime::Value;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

pub fn call_builtin(
    id: u16,
    args: Vec<Value>,
    output: &mut dyn Write,
) -> Result<Value, RuntimeError> {
    let builtin = BuiltinId::from_u16(id).ok_or(RuntimeError::UnknownBuiltin { id })?;

    match builtin {
        BuiltinId::Print => {
            let [value] = one_arg(args, "print", "1 argument")?;
            write!(output, "{}", value.display_raw())?;
            output.flush()?;
            Ok(Value::Int(0)) // Unit placeholder
        }

        BuiltinId::Println => {
            let [value] = one_arg(args, "println", "1 argument")?;
            writeln!(output, "{}", value.display_raw())?;
            output.flush()?;
            Ok(Value::Int(0)) // Unit placeholder
        }

        BuiltinId::ToString => {
            let [value] = one_arg(args, "to_string", "1 argument")?;
            Ok(Value::Str(value.to_string()))
        }

        BuiltinId::ReadFile => {
            let path = one_string(args, "read_file")?;
            // Missing or unreadable files yield "" rather than failing
            Ok(Value::Str(
                std::fs::read_to_string(&path).unwrap_or_default(),
            ))
        }

        BuiltinId::WriteFile => {
            let (path, content) = two_strings(args, "write_file")?;
            Ok(Value::Bool(std::fs::write(&path, content).is_ok()))
        }

        BuiltinId::AppendFile => {
            let (path, content) = two_strings(args, "append_file")?;
            let appended = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .and_then(|mut file| file.write_all(content.as_bytes()));
            Ok(Value::Bool(appended.is_ok()))
        }

        BuiltinId::FileExists => {
            let path = one_string(args, "file_exists")?;
            Ok(Value::Bool(Path::new(&path).exists()))
        }
    }
}

fn one_arg(
    args: Vec<Value>,
    name: &'static str,
    expected: &'static str,
) -> Result<[Value; 1], RuntimeError> {
    <[Value; 1]>::try_from(args).map_err(|_| RuntimeError::BuiltinArgs { name, expected })
}

fn one_string(args: Vec<Value>, name: &'static str) -> Result<String, RuntimeError> {
    match <[Value; 1]>::try_from(args) {
        Ok([Value::Str(s)]) => Ok(s),
        _ => Err(RuntimeError::BuiltinArgs {
            name,
            expected: "1 string argument",
        }),
    }
}

fn two_strings(args: Vec<Value>, name: &'static str) -> Result<(String, String), RuntimeError> {
    match <[Value; 2]>::try_from(args) {
        Ok([Value::Str(a), Value::Str(b)]) => Ok((a, b)),
        _ => Err(RuntimeError::BuiltinArgs {
            name,
            expected: "2 string arguments",
        }),
    }
}
