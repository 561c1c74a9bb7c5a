//! Structural comparison over [`Value`]s.
//!
//! Dependency arrays are compared by structure, never by provenance: two
//! independently built but identical composites are equal. The one value this
//! model cannot order structurally is a non-finite float, and comparing one is
//! reported as an error instead of being treated as always-equal or
//! always-different.

use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::value::Value;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CompareError {
    #[error("cannot structurally compare non-finite float {0}")]
    NonFiniteFloat(f64),
}

/// Structural equality regardless of reference identity.
pub fn equal(a: &Value, b: &Value) -> Result<bool, CompareError> {
    match (a, b) {
        (Value::Null, Value::Null) => Ok(true),
        (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
        (Value::Int(x), Value::Int(y)) => Ok(x == y),
        (Value::Float(x), Value::Float(y)) => {
            check_finite(*x)?;
            check_finite(*y)?;
            Ok(x == y)
        }
        (Value::Str(x), Value::Str(y)) => Ok(x == y),
        (Value::List(xs), Value::List(ys)) => {
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (x, y) in xs.iter().zip(ys) {
                if !equal(x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Map(xs), Value::Map(ys)) => {
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for ((kx, vx), (ky, vy)) in xs.iter().zip(ys) {
                if kx != ky || !equal(vx, vy)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Structural hash, consistent with [`equal`].
pub fn fingerprint(v: &Value) -> Result<u64, CompareError> {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    feed(v, &mut hasher)?;
    Ok(hasher.finish())
}

fn feed(v: &Value, hasher: &mut impl Hasher) -> Result<(), CompareError> {
    match v {
        Value::Null => 0u8.hash(hasher),
        Value::Bool(b) => {
            1u8.hash(hasher);
            b.hash(hasher);
        }
        Value::Int(n) => {
            2u8.hash(hasher);
            n.hash(hasher);
        }
        Value::Float(f) => {
            check_finite(*f)?;
            3u8.hash(hasher);
            f.to_bits().hash(hasher);
        }
        Value::Str(s) => {
            4u8.hash(hasher);
            s.hash(hasher);
        }
        Value::List(items) => {
            5u8.hash(hasher);
            items.len().hash(hasher);
            for item in items {
                feed(item, hasher)?;
            }
        }
        Value::Map(entries) => {
            6u8.hash(hasher);
            entries.len().hash(hasher);
            for (k, v) in entries {
                k.hash(hasher);
                feed(v, hasher)?;
            }
        }
    }
    Ok(())
}

fn check_finite(f: f64) -> Result<(), CompareError> {
    if f.is_finite() {
        Ok(())
    } else {
        Err(CompareError::NonFiniteFloat(f))
    }
}
