//! JSON input flattening
//!
//! Circom addresses every input signal by a flat name. Nested records are
//! flattened the same way the Circom witness calculator expects them:
//! - objects become dot-separated keys (`credential.response.signature`)
//! - arrays of primitives, at any depth, are flattened row-major under one key
//! - arrays containing objects use indexed keys (`items[0].value`)

use std::collections::HashMap;

use ark_bn254::Fr;
use ark_ff::PrimeField;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::CheckedSub;
use serde_json::Value;

use crate::error::WitnessError;

/// Flatten a JSON object of circuit inputs into signal name -> field elements.
///
/// Strings holding a decimal or `0x` hex number become one element. Any other
/// string becomes one element per UTF-8 byte, which is how fixed-width string
/// inputs are laid out.
pub fn flatten_inputs(inputs: &Value) -> Result<HashMap<String, Vec<BigInt>>, WitnessError> {
    let fields = inputs
        .as_object()
        .ok_or_else(|| WitnessError::InvalidInput(String::from("inputs must be a JSON object")))?;

    let modulus: BigUint = Fr::MODULUS.into();
    let mut signals: HashMap<String, Vec<BigInt>> = HashMap::new();

    // (key, value) pairs still to visit
    let mut stack: Vec<(String, &Value)> = fields
        .iter()
        .map(|(key, value)| (key.clone(), value))
        .collect();

    while let Some((key, value)) = stack.pop() {
        match value {
            Value::Object(fields) => {
                for (field, nested) in fields {
                    stack.push((format!("{key}.{field}"), nested));
                }
            }
            Value::Array(items) if !is_pure_array(value) => {
                // reversed so that popping keeps the original order
                for (idx, item) in items.iter().enumerate().rev() {
                    stack.push((format!("{key}[{idx}]"), item));
                }
            }
            Value::Array(_) => {
                let elements = flatten_pure_array(&key, value, &modulus)?;
                signals.entry(key).or_default().extend(elements);
            }
            primitive => {
                let elements = primitive_elements(&key, primitive, &modulus)?;
                signals.entry(key).or_default().extend(elements);
            }
        }
    }

    Ok(signals)
}

/// Whether a JSON value holds no objects at any depth.
fn is_pure_array(value: &Value) -> bool {
    let mut stack: Vec<&Value> = vec![value];
    while let Some(current) = stack.pop() {
        match current {
            Value::Object(_) => return false,
            Value::Array(items) => stack.extend(items),
            _ => {}
        }
    }
    true
}

/// Flatten nested arrays of primitives in row-major order.
fn flatten_pure_array(
    key: &str,
    value: &Value,
    modulus: &BigUint,
) -> Result<Vec<BigInt>, WitnessError> {
    let mut elements = Vec::new();
    let mut pending: Vec<&Value> = vec![value];
    while let Some(current) = pending.pop() {
        match current {
            Value::Array(items) => pending.extend(items.iter().rev()),
            primitive => elements.extend(primitive_elements(key, primitive, modulus)?),
        }
    }
    Ok(elements)
}

fn primitive_elements(
    key: &str,
    value: &Value,
    modulus: &BigUint,
) -> Result<Vec<BigInt>, WitnessError> {
    let raw = match value {
        Value::Null => vec![BigInt::from(0u8)],
        Value::Bool(b) => vec![BigInt::from(u8::from(*b))],
        Value::Number(n) => {
            let bi = if let Some(i) = n.as_u64() {
                BigInt::from(i)
            } else if let Some(i) = n.as_i64() {
                BigInt::from(i)
            } else {
                return Err(WitnessError::InvalidInput(format!(
                    "non-integer number for {key}: {n}"
                )));
            };
            vec![bi]
        }
        Value::String(s) => {
            if let Some(hex) = s.strip_prefix("0x") {
                let bi = BigInt::parse_bytes(hex.as_bytes(), 16).ok_or_else(|| {
                    WitnessError::InvalidInput(format!("invalid hex for {key}: {s}"))
                })?;
                vec![bi]
            } else if let Some(bi) = BigInt::parse_bytes(s.as_bytes(), 10) {
                vec![bi]
            } else {
                s.bytes().map(BigInt::from).collect()
            }
        }
        Value::Array(_) | Value::Object(_) => {
            return Err(WitnessError::InvalidInput(format!(
                "expected a primitive value for {key}"
            )));
        }
    };

    raw.into_iter()
        .map(|bi| to_field_element(key, bi, modulus))
        .collect()
}

/// Map an integer to its canonical field representative.
/// Negative numbers become `p - |n|`.
fn to_field_element(key: &str, value: BigInt, modulus: &BigUint) -> Result<BigInt, WitnessError> {
    let magnitude = value.magnitude();
    if magnitude >= modulus {
        return Err(WitnessError::FieldOverflow {
            signal: key.to_owned(),
            value,
        });
    }
    match value.sign() {
        Sign::Minus => modulus
            .checked_sub(magnitude)
            .map(BigInt::from)
            .ok_or_else(|| WitnessError::FieldOverflow {
                signal: key.to_owned(),
                value: value.clone(),
            }),
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ints(values: &[i64]) -> Vec<BigInt> {
        values.iter().copied().map(BigInt::from).collect()
    }

    #[test]
    fn test_nested_objects_use_dot_keys() {
        let signals = flatten_inputs(&json!({
            "challenge": [1, 2, 3],
            "credential": {
                "id": { "storage": [104, 105, 0, 0], "len": 2 },
                "response": { "signature": { "storage": [1, 0], "len": 1 } }
            }
        }))
        .unwrap();

        assert_eq!(signals["challenge"], ints(&[1, 2, 3]));
        assert_eq!(signals["credential.id.storage"], ints(&[104, 105, 0, 0]));
        assert_eq!(signals["credential.id.len"], ints(&[2]));
        assert_eq!(signals["credential.response.signature.storage"], ints(&[1, 0]));
        assert_eq!(signals["credential.response.signature.len"], ints(&[1]));
        assert_eq!(signals.len(), 5);
    }

    #[test]
    fn test_text_strings_become_bytes() {
        let signals = flatten_inputs(&json!({
            "credential_type": "public-key",
            "decimal": "42",
            "hex": "0xff"
        }))
        .unwrap();

        let expected: Vec<BigInt> = b"public-key".iter().copied().map(BigInt::from).collect();
        assert_eq!(signals["credential_type"], expected);
        assert_eq!(signals["decimal"], ints(&[42]));
        assert_eq!(signals["hex"], ints(&[255]));
    }

    #[test]
    fn test_multidimensional_arrays_are_row_major() {
        let signals = flatten_inputs(&json!({ "m": [[1, 2], [3, [4, 5]], []] })).unwrap();
        assert_eq!(signals["m"], ints(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_arrays_of_objects_are_indexed() {
        let signals = flatten_inputs(&json!({
            "items": [{ "value": 1 }, { "value": 2, "flag": true }]
        }))
        .unwrap();

        assert_eq!(signals["items[0].value"], ints(&[1]));
        assert_eq!(signals["items[1].value"], ints(&[2]));
        assert_eq!(signals["items[1].flag"], ints(&[1]));
    }

    #[test]
    fn test_negative_numbers_wrap_around_modulus() {
        let signals = flatten_inputs(&json!({ "x": -1, "n": null })).unwrap();
        let modulus: BigUint = Fr::MODULUS.into();
        let expected = BigInt::from(modulus) - BigInt::from(1);

        assert_eq!(signals["x"], vec![expected]);
        assert_eq!(signals["n"], ints(&[0]));
    }

    #[test]
    fn test_values_beyond_modulus_are_rejected() {
        let modulus: BigUint = Fr::MODULUS.into();
        let err = flatten_inputs(&json!({ "x": modulus.to_string() })).unwrap_err();
        assert!(matches!(err, WitnessError::FieldOverflow { signal, .. } if signal == "x"));
    }

    #[test]
    fn test_rejects_non_object_and_floats() {
        assert!(matches!(
            flatten_inputs(&json!([1, 2])),
            Err(WitnessError::InvalidInput(_))
        ));
        assert!(matches!(
            flatten_inputs(&json!({ "x": 1.5 })),
            Err(WitnessError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_object_has_no_signals() {
        assert!(flatten_inputs(&json!({})).unwrap().is_empty());
    }
}
