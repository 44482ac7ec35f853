//! Seams between the proof session and the circuit runtime.
//!
//! A circuit is a black box behind two traits: something that turns an input
//! record into a witness, and something that turns a witness into a proof.

use async_trait::async_trait;
use serde_json::Value;
use witness::{Witness, WitnessError};

use crate::{artifact::ProofArtifact, error::ProvingError};

/// Executes a compiled circuit program
#[async_trait]
pub trait WitnessExecutor: Send + Sync {
    /// Compute the witness for a JSON input record
    async fn execute(&self, inputs: Value) -> Result<Witness, WitnessError>;
}

/// Produces proofs for one circuit
#[async_trait]
pub trait ProvingBackend: Send + Sync {
    /// Load proving material ahead of the first proof.
    ///
    /// Failures are not cached, the next call tries again.
    async fn preload(&self) -> Result<(), ProvingError>;

    /// Prove a witness
    async fn prove(&self, witness: Witness) -> Result<ProofArtifact, ProvingError>;

    /// Check a proof against its public signals
    async fn verify(&self, artifact: &ProofArtifact) -> Result<bool, ProvingError>;

    /// Compressed verifying key, for handing to a verifier
    async fn verifying_key_bytes(&self) -> Result<Vec<u8>, ProvingError>;
}
