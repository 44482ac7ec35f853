//! Computed witnesses

use ark_bn254::Fr;
use ark_ff::{BigInteger, One, PrimeField};
use num_bigint::{BigInt, BigUint};

use crate::error::WitnessError;

/// Field element size in bytes (BN254 scalar field)
pub const FIELD_SIZE: usize = 32;

/// Full assignment of a circuit's wires.
///
/// The layout is Circom's:
/// - `[0]`: the constant 1
/// - `[1..=num_public]`: public outputs, then public inputs
/// - the rest: private signals
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Witness {
    elements: Vec<Fr>,
}

impl Witness {
    /// Wrap wire values
    pub fn new(elements: Vec<Fr>) -> Self {
        Self { elements }
    }

    /// Build a witness from the calculator's integer output
    pub(crate) fn from_bigints(values: &[BigInt]) -> Result<Self, WitnessError> {
        let modulus: BigUint = Fr::MODULUS.into();
        let elements = values
            .iter()
            .map(|value| {
                // inputs are reduced before calculation, so every wire is canonical
                let value = value
                    .to_biguint()
                    .filter(|v| v < &modulus)
                    .ok_or_else(|| {
                        WitnessError::InvalidWitness(format!("wire value {value} is not canonical"))
                    })?;
                Ok(Fr::from_le_bytes_mod_order(&value.to_bytes_le()))
            })
            .collect::<Result<Vec<_>, WitnessError>>()?;
        Ok(Self { elements })
    }

    /// Number of wires
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether no wire is assigned
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Wire values
    pub fn elements(&self) -> &[Fr] {
        &self.elements
    }

    /// Whether wire 0 holds the constant one, as every Circom witness does
    pub fn has_unit_wire(&self) -> bool {
        self.elements.first().is_some_and(|e| e.is_one())
    }

    /// Public signals, skipping the constant wire
    pub fn public_inputs(&self, num_public: usize) -> Option<&[Fr]> {
        let end = num_public.checked_add(1)?;
        self.elements.get(1..end)
    }

    /// Serialize as Little-Endian bytes, 32 bytes per element
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.elements.len().saturating_mul(FIELD_SIZE));
        for element in &self.elements {
            bytes.extend_from_slice(&fr_to_le_bytes(element));
        }
        bytes
    }

    /// Parse Little-Endian witness bytes, 32 bytes per element
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WitnessError> {
        if !bytes.len().is_multiple_of(FIELD_SIZE) {
            return Err(WitnessError::InvalidWitness(format!(
                "{} bytes is not a multiple of {FIELD_SIZE}",
                bytes.len()
            )));
        }
        let elements = bytes
            .chunks_exact(FIELD_SIZE)
            .map(fr_from_le_bytes)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { elements })
    }
}

/// Convert Arkworks Fr field element to Little-Endian bytes
pub fn fr_to_le_bytes(fr: &Fr) -> [u8; FIELD_SIZE] {
    let mut out = [0u8; FIELD_SIZE];
    let bytes = fr.into_bigint().to_bytes_le();
    let n = bytes.len().min(FIELD_SIZE);
    out[..n].copy_from_slice(&bytes[..n]);
    out
}

/// Convert Little-Endian bytes to Arkworks Fr field element
pub fn fr_from_le_bytes(bytes: &[u8]) -> Result<Fr, WitnessError> {
    if bytes.len() != FIELD_SIZE {
        return Err(WitnessError::InvalidWitness(format!(
            "expected {FIELD_SIZE} bytes per element, got {}",
            bytes.len()
        )));
    }
    Ok(Fr::from_le_bytes_mod_order(bytes))
}
