//! Groth16 proof generation
//!
//! Handles loading proving keys and generating ZK proofs from witness data.
//! The proving key and R1CS are parsed on first use, off the async runtime,
//! and kept for the lifetime of the backend.

use std::{io::Cursor, sync::Arc, time::Instant};

use ark_bn254::{Bn254, Fr};
use ark_circom::{
    CircomCircuit, CircomReduction,
    circom::{R1CS, R1CSFile},
};
use ark_groth16::{Groth16, PreparedVerifyingKey, ProvingKey};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_snark::SNARK;
use ark_std::rand::thread_rng;
use async_trait::async_trait;
use tokio::sync::OnceCell;
use witness::Witness;

use crate::{
    artifact::{Groth16Proof, ProofArtifact},
    backend::ProvingBackend,
    error::ProvingError,
};

type CircomGroth16 = Groth16<Bn254, CircomReduction>;

/// Parsed proving material
struct LoadedCircuit {
    /// Groth16 proving key
    pk: ProvingKey<Bn254>,
    /// Processed verifying key (for fast verification)
    pvk: PreparedVerifyingKey<Bn254>,
    /// Constraint system in ark-circom form
    r1cs: R1CS<Fr>,
    num_wires: usize,
    num_public: usize,
}

impl LoadedCircuit {
    /// Uses unchecked deserialization since the proving key is trusted.
    fn load(pk_bytes: &[u8], r1cs_bytes: &[u8]) -> Result<Self, ProvingError> {
        let pk = ProvingKey::<Bn254>::deserialize_compressed_unchecked(pk_bytes)
            .map_err(|e| ProvingError::ProvingKey(e.to_string()))?;

        let file = R1CSFile::<Fr>::new(Cursor::new(r1cs_bytes))
            .map_err(|e| ProvingError::ConstraintSystem(e.to_string()))?;
        let num_wires = file.header.n_wires as usize;
        let num_public = file
            .header
            .n_pub_out
            .checked_add(file.header.n_pub_in)
            .ok_or_else(|| ProvingError::ConstraintSystem(String::from("too many public signals")))?;
        let num_public = num_public as usize;

        // Check correctness of the embedded verifying key
        if pk.vk.gamma_abc_g1.len().saturating_sub(1) != num_public {
            return Err(ProvingError::ConstraintSystem(String::from(
                "VK public input count doesn't match R1CS",
            )));
        }

        let mut r1cs = R1CS::from(file);
        // witnesses come straight from the calculator, already in wire order
        r1cs.wire_mapping = None;

        let pvk = CircomGroth16::process_vk(&pk.vk)
            .map_err(|e| ProvingError::ProvingKey(format!("failed to process VK: {e}")))?;

        Ok(Self {
            pk,
            pvk,
            r1cs,
            num_wires,
            num_public,
        })
    }

    fn prove(&self, witness: Witness) -> Result<ProofArtifact, ProvingError> {
        if witness.len() < self.num_wires {
            return Err(ProvingError::Witness(format!(
                "witness too short: {} elements, circuit needs {} wires",
                witness.len(),
                self.num_wires
            )));
        }
        if !witness.has_unit_wire() {
            return Err(ProvingError::Witness(String::from(
                "wire 0 must hold the constant one",
            )));
        }
        let public_inputs = witness
            .public_inputs(self.num_public)
            .ok_or_else(|| ProvingError::Witness(String::from("missing public signals")))?
            .to_vec();

        let circuit = CircomCircuit {
            r1cs: self.r1cs.clone(),
            witness: Some(witness.elements().to_vec()),
        };

        let mut rng = thread_rng();
        let proof = CircomGroth16::prove(&self.pk, circuit, &mut rng)
            .map_err(|e| ProvingError::Proof(e.to_string()))?;

        Ok(ProofArtifact {
            proof: Groth16Proof::from_ark(&proof)?,
            public_inputs,
            witness,
        })
    }
}

/// Groth16 prover for one Circom circuit
pub struct Groth16Backend {
    proving_key: Arc<[u8]>,
    r1cs: Arc<[u8]>,
    loaded: OnceCell<Arc<LoadedCircuit>>,
}

impl Groth16Backend {
    /// Create a backend from a compressed proving key and R1CS file contents.
    /// Nothing is parsed until the first preload or proof.
    pub fn new(proving_key: impl Into<Arc<[u8]>>, r1cs: impl Into<Arc<[u8]>>) -> Self {
        Self {
            proving_key: proving_key.into(),
            r1cs: r1cs.into(),
            loaded: OnceCell::new(),
        }
    }

    async fn loaded(&self) -> Result<Arc<LoadedCircuit>, ProvingError> {
        let circuit = self
            .loaded
            .get_or_try_init(|| async {
                let proving_key = Arc::clone(&self.proving_key);
                let r1cs = Arc::clone(&self.r1cs);
                let started = Instant::now();
                let circuit = tokio::task::spawn_blocking(move || {
                    LoadedCircuit::load(&proving_key, &r1cs)
                })
                .await
                .map_err(|e| ProvingError::Task(e.to_string()))??;
                log::info!(
                    "proving key loaded in {:?} ({} wires, {} public signals)",
                    started.elapsed(),
                    circuit.num_wires,
                    circuit.num_public
                );
                Ok::<_, ProvingError>(Arc::new(circuit))
            })
            .await?;
        Ok(Arc::clone(circuit))
    }
}

#[async_trait]
impl ProvingBackend for Groth16Backend {
    async fn preload(&self) -> Result<(), ProvingError> {
        self.loaded().await.map(|_| ())
    }

    async fn prove(&self, witness: Witness) -> Result<ProofArtifact, ProvingError> {
        let circuit = self.loaded().await?;
        tokio::task::spawn_blocking(move || circuit.prove(witness))
            .await
            .map_err(|e| ProvingError::Task(e.to_string()))?
    }

    async fn verifying_key_bytes(&self) -> Result<Vec<u8>, ProvingError> {
        let circuit = self.loaded().await?;
        let mut vk_bytes = Vec::new();
        circuit
            .pk
            .vk
            .serialize_compressed(&mut vk_bytes)
            .map_err(|e| ProvingError::Serialization(format!("failed to serialize VK: {e}")))?;
        Ok(vk_bytes)
    }

    async fn verify(&self, artifact: &ProofArtifact) -> Result<bool, ProvingError> {
        let circuit = self.loaded().await?;
        let proof = artifact.proof.to_ark()?;
        CircomGroth16::verify_with_processed_vk(&circuit.pvk, &artifact.public_inputs, &proof)
            .map_err(|e| ProvingError::Proof(format!("verification failed: {e}")))
    }
}
