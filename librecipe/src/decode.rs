//! Phase 2: Value decoding
//!
//! Turns a raw value into a scalar: strips quotes, removes backslash escapes,
//! and resolves bare words against an injected constant table.

use crate::scanner::RawValue;
use crate::value::Scalar;
use indexmap::IndexMap;
use std::collections::HashMap;

/// A read-only table of named constants.
///
/// A decoded value that exactly names a known constant is replaced by the
/// constant's value. Implementations must be pure lookups.
pub trait Constants {
    fn lookup(&self, name: &str) -> Option<Scalar>;
}

/// The empty constant table.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConstants;

impl Constants for NoConstants {
    fn lookup(&self, _name: &str) -> Option<Scalar> {
        None
    }
}

impl<F> Constants for F
where
    F: Fn(&str) -> Option<Scalar>,
{
    fn lookup(&self, name: &str) -> Option<Scalar> {
        self(name)
    }
}

impl Constants for HashMap<String, Scalar> {
    fn lookup(&self, name: &str) -> Option<Scalar> {
        self.get(name).cloned()
    }
}

impl Constants for IndexMap<String, Scalar> {
    fn lookup(&self, name: &str) -> Option<Scalar> {
        self.get(name).cloned()
    }
}

/// Decode a raw value into its final scalar.
pub fn decode_value<C: Constants + ?Sized>(raw: RawValue<'_>, constants: &C) -> Scalar {
    let text = match raw {
        RawValue::DoubleQuoted(s) | RawValue::SingleQuoted(s) => strip_slashes(s),
        RawValue::Bare(s) => s.trim().to_string(),
    };

    if !text.is_empty() {
        if let Some(value) = constants.lookup(&text) {
            return value;
        }
    }

    Scalar::String(text)
}

/// Remove backslash escapes: `\x` becomes `x`, so `\\` is a backslash.
/// A lone trailing backslash is dropped.
fn strip_slashes(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                result.push(escaped);
            }
        } else {
            result.push(c);
        }
    }
    result
}
