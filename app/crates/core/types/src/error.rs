//! Errors raised while turning a credential into circuit inputs

use thiserror::Error;

/// Failure to build a circuit input record from a credential.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The credential is not a public key credential.
    #[error("credential must have type 'public-key', got '{0}'")]
    UnsupportedCredentialType(String),
    /// A credential field does not fit into its circuit buffer.
    #[error("{field} in credential is too long: {len} bytes, capacity is {capacity}")]
    OversizedField {
        /// WebAuthn name of the offending field
        field: &'static str,
        /// Actual byte length
        len: usize,
        /// Capacity declared by the circuit
        capacity: usize,
    },
    /// A buffer view reaches past the end of its buffer.
    #[error(
        "buffer view of {length} bytes at offset {offset} exceeds its {buffer_len}-byte buffer"
    )]
    InvalidBufferView {
        /// Start of the view
        offset: usize,
        /// Length of the view
        length: usize,
        /// Length of the underlying buffer
        buffer_len: usize,
    },
    /// The request challenge is not exactly the width the circuit expects.
    #[error("challenge must be {expected} bytes, got {actual}")]
    InvalidChallengeLength {
        /// Width declared by the circuit
        expected: usize,
        /// Actual byte length
        actual: usize,
    },
}
