//! Passkey proof generation
//!
//! Maps WebAuthn ceremonies onto the registration and authentication
//! circuits, computes their witnesses and proves them with Groth16.
//!
//! - [`Prover`]: the two ceremony entry points
//! - [`ProofSession`]: witness runtime and proving backend of one circuit
//! - [`WitnessExecutor`] / [`ProvingBackend`]: the circuit runtime seams,
//!   implemented by [`CircomExecutor`] and [`Groth16Backend`]
//! - [`config`]: artifact locations

mod artifact;
mod backend;
mod circom;
pub mod config;
mod error;
mod groth16;
mod prover;
mod session;
#[cfg(test)]
mod testing;

pub use artifact::{Groth16Proof, ProofArtifact};
pub use backend::{ProvingBackend, WitnessExecutor};
pub use circom::CircomExecutor;
pub use config::{CircuitDefinition, CircuitPaths, ProverConfig};
pub use error::{ConfigError, ErrorKind, ProveError, ProvingError};
pub use groth16::Groth16Backend;
pub use prover::{Prover, Stage};
pub use session::ProofSession;
