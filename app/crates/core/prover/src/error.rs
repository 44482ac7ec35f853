//! Error types of the proving pipeline

use std::{io, path::PathBuf};

use thiserror::Error;
use types::{CircuitKind, InputError};
use witness::WitnessError;

/// Failures of the Groth16 proving backend
#[derive(Debug, Error)]
pub enum ProvingError {
    /// The proving key could not be deserialized
    #[error("failed to load proving key: {0}")]
    ProvingKey(String),
    /// The R1CS file is malformed or does not match the proving key
    #[error("invalid constraint system: {0}")]
    ConstraintSystem(String),
    /// The witness does not fit the constraint system
    #[error("invalid witness: {0}")]
    Witness(String),
    /// Groth16 proof generation or verification failed
    #[error("proof generation failed: {0}")]
    Proof(String),
    /// Proof or key (de)serialization failed
    #[error("serialization failed: {0}")]
    Serialization(String),
    /// The blocking proving task did not complete
    #[error("proving task failed: {0}")]
    Task(String),
}

/// Why a proof request failed. Every stage's error is passed through as is.
#[derive(Debug, Error)]
pub enum ProveError {
    /// The credential could not be mapped onto the circuit input
    #[error(transparent)]
    Input(#[from] InputError),
    /// The circuit rejected the input record
    #[error(transparent)]
    WitnessGeneration(#[from] WitnessError),
    /// The backend failed on a valid witness
    #[error(transparent)]
    ProvingBackend(#[from] ProvingError),
}

/// Coarse classification of a [`ProveError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential type is not `public-key`
    UnsupportedCredentialType,
    /// A field exceeds its circuit capacity
    OversizedField,
    /// A buffer view reaches past the end of its buffer
    InvalidBufferView,
    /// The challenge is not 32 bytes
    InvalidChallengeLength,
    /// Witness generation failed
    WitnessGeneration,
    /// Proof generation failed
    ProvingBackend,
}

impl ProveError {
    /// Classify the failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProveError::Input(InputError::UnsupportedCredentialType(_)) => {
                ErrorKind::UnsupportedCredentialType
            }
            ProveError::Input(InputError::OversizedField { .. }) => ErrorKind::OversizedField,
            ProveError::Input(InputError::InvalidBufferView { .. }) => {
                ErrorKind::InvalidBufferView
            }
            ProveError::Input(InputError::InvalidChallengeLength { .. }) => {
                ErrorKind::InvalidChallengeLength
            }
            ProveError::WitnessGeneration(_) => ErrorKind::WitnessGeneration,
            ProveError::ProvingBackend(_) => ErrorKind::ProvingBackend,
        }
    }
}

/// Failures while loading configuration or circuit artifacts
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: io::Error,
    },
    /// The configuration file is not valid TOML for [`crate::ProverConfig`]
    #[error("invalid configuration {}: {source}", path.display())]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: toml::de::Error,
    },
    /// The circuit program could not be loaded into the witness runtime
    #[error("failed to initialise the {kind} witness calculator: {source}")]
    Executor {
        /// Circuit that failed
        kind: CircuitKind,
        /// Underlying error
        source: WitnessError,
    },
}
