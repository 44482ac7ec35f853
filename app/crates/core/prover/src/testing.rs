//! Test doubles for the backend traits

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

use ark_bn254::Fr;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;
use witness::{Witness, WitnessError};

use crate::{
    artifact::{Groth16Proof, ProofArtifact},
    backend::{ProvingBackend, WitnessExecutor},
    error::ProvingError,
};

/// Rejects the empty warm-up input like a real circuit, and answers every
/// other input with a witness `[1, public, 42]`. The public wire is the
/// signature length of an assertion, the client data length of an
/// attestation, or the `value` of a bare record.
#[derive(Default)]
pub(crate) struct MockExecutor {
    pub inputs: Mutex<Vec<Value>>,
    pub fail: bool,
}

impl MockExecutor {
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            ..Self::default()
        })
    }

    /// Inputs other than the warm-up one
    pub fn requests(&self) -> Vec<Value> {
        self.inputs
            .lock()
            .unwrap()
            .iter()
            .filter(|input| input.as_object().is_some_and(|o| !o.is_empty()))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl WitnessExecutor for MockExecutor {
    async fn execute(&self, inputs: Value) -> Result<Witness, WitnessError> {
        let empty = inputs.as_object().is_some_and(|o| o.is_empty());
        self.inputs.lock().unwrap().push(inputs.clone());
        if empty {
            return Err(WitnessError::Calculation(String::from(
                "Not all inputs have been set. Only 0 out of 2",
            )));
        }
        if self.fail {
            return Err(WitnessError::Calculation(String::from(
                "Assert Failed. Error in template Main_1 line: 12",
            )));
        }
        // let concurrent requests interleave
        tokio::task::yield_now().await;
        Ok(Witness::new(vec![
            Fr::from(1u64),
            Fr::from(public_wire(&inputs)),
            Fr::from(42u64),
        ]))
    }
}

fn public_wire(inputs: &Value) -> u64 {
    let response = &inputs["credential"]["response"];
    response["signature"]["len"]
        .as_u64()
        .or_else(|| response["client_data_json"]["len"].as_u64())
        .or_else(|| inputs["value"].as_u64())
        .unwrap_or_default()
}

#[derive(Default)]
pub(crate) struct MockBackend {
    pub proofs: AtomicUsize,
    pub preloads: AtomicUsize,
    pub preloaded: Notify,
    pub fail_preload: bool,
    pub fail_prove: bool,
}

impl MockBackend {
    pub fn proofs(&self) -> usize {
        self.proofs.load(Ordering::SeqCst)
    }

    pub fn preloads(&self) -> usize {
        self.preloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProvingBackend for MockBackend {
    async fn preload(&self) -> Result<(), ProvingError> {
        self.preloads.fetch_add(1, Ordering::SeqCst);
        self.preloaded.notify_one();
        if self.fail_preload {
            return Err(ProvingError::ProvingKey(String::from("truncated key")));
        }
        Ok(())
    }

    async fn prove(&self, witness: Witness) -> Result<ProofArtifact, ProvingError> {
        self.proofs.fetch_add(1, Ordering::SeqCst);
        if self.fail_prove {
            return Err(ProvingError::Proof(String::from("backend crashed")));
        }
        let public_inputs = witness.public_inputs(1).unwrap_or_default().to_vec();
        Ok(ProofArtifact {
            witness,
            proof: Groth16Proof {
                a: vec![0xaa; 32],
                b: vec![0xbb; 64],
                c: vec![0xcc; 32],
            },
            public_inputs,
        })
    }

    /// Accepts an artifact whose public inputs match its witness
    async fn verify(&self, artifact: &ProofArtifact) -> Result<bool, ProvingError> {
        let expected = artifact.witness.public_inputs(artifact.public_inputs.len());
        Ok(expected == Some(artifact.public_inputs.as_slice()))
    }

    async fn verifying_key_bytes(&self) -> Result<Vec<u8>, ProvingError> {
        Ok(VERIFYING_KEY.to_vec())
    }
}

pub(crate) const VERIFYING_KEY: [u8; 4] = [0x0b, 0xad, 0xf0, 0x0d];
