//! Proof artifacts returned by the proving backend

use ark_bn254::{Bn254, Fr};
use ark_groth16::Proof;
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use witness::{FIELD_SIZE, Witness, fr_to_le_bytes};

use crate::error::ProvingError;

/// Groth16 proof points, each compressed with arkworks' canonical encoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Groth16Proof {
    /// Proof point A (G1)
    pub a: Vec<u8>,
    /// Proof point B (G2)
    pub b: Vec<u8>,
    /// Proof point C (G1)
    pub c: Vec<u8>,
}

impl Groth16Proof {
    pub(crate) fn from_ark(proof: &Proof<Bn254>) -> Result<Self, ProvingError> {
        let mut a = Vec::new();
        proof
            .a
            .serialize_compressed(&mut a)
            .map_err(|e| ProvingError::Serialization(format!("failed to serialize A: {e}")))?;

        let mut b = Vec::new();
        proof
            .b
            .serialize_compressed(&mut b)
            .map_err(|e| ProvingError::Serialization(format!("failed to serialize B: {e}")))?;

        let mut c = Vec::new();
        proof
            .c
            .serialize_compressed(&mut c)
            .map_err(|e| ProvingError::Serialization(format!("failed to serialize C: {e}")))?;

        Ok(Self { a, b, c })
    }

    /// Rebuild the arkworks proof
    pub fn to_ark(&self) -> Result<Proof<Bn254>, ProvingError> {
        Proof::<Bn254>::deserialize_compressed(self.to_bytes().as_slice())
            .map_err(|e| ProvingError::Serialization(format!("failed to parse proof: {e}")))
    }

    /// Get the full proof as concatenated bytes [A || B || C]
    pub fn to_bytes(&self) -> Vec<u8> {
        let capacity = self
            .a
            .len()
            .saturating_add(self.b.len())
            .saturating_add(self.c.len());
        let mut bytes = Vec::with_capacity(capacity);
        bytes.extend_from_slice(&self.a);
        bytes.extend_from_slice(&self.b);
        bytes.extend_from_slice(&self.c);
        bytes
    }
}

/// Everything a successful proof request produces
#[derive(Clone, Debug)]
pub struct ProofArtifact {
    /// The witness the proof was generated from
    pub witness: Witness,
    /// The proof itself
    pub proof: Groth16Proof,
    /// Public signals, in circuit order
    pub public_inputs: Vec<Fr>,
}

impl ProofArtifact {
    /// Proof bytes [A || B || C]
    pub fn proof_bytes(&self) -> Vec<u8> {
        self.proof.to_bytes()
    }

    /// Public signals as 32-byte Little-Endian words
    pub fn public_inputs_bytes(&self) -> Vec<[u8; FIELD_SIZE]> {
        self.public_inputs.iter().map(fr_to_le_bytes).collect()
    }
}
