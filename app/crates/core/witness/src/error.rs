use num_bigint::BigInt;
use thiserror::Error;

/// Errors from witness calculation
#[derive(Debug, Error)]
pub enum WitnessError {
    /// The compiled circuit program could not be loaded
    #[error("failed to load circuit program: {0}")]
    Module(String),
    /// The input document does not describe circuit signals
    #[error("invalid circuit input: {0}")]
    InvalidInput(String),
    /// An input value is outside the BN254 scalar field
    #[error("value {value} for {signal} exceeds the field modulus")]
    FieldOverflow {
        /// Flattened signal name
        signal: String,
        /// Offending value
        value: BigInt,
    },
    /// The circuit rejected the inputs
    #[error("witness calculation failed: {0}")]
    Calculation(String),
    /// Witness data is malformed
    #[error("invalid witness: {0}")]
    InvalidWitness(String),
}
