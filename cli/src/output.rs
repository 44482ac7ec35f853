//! Reading ceremony files and writing results

use std::{fs, io::Write, path::Path};

use anyhow::Context;
use prover::ProofArtifact;
use serde::{Serialize, de::DeserializeOwned};
use types::CircuitKind;

/// Proof as printed by the CLI
#[derive(Debug, Serialize)]
pub struct ProofOutput {
    /// Hex of `A || B || C`, compressed points
    pub proof: String,
    /// Hex of each public signal, 32 bytes Little-Endian
    pub public_inputs: Vec<String>,
}

impl From<&ProofArtifact> for ProofOutput {
    fn from(artifact: &ProofArtifact) -> Self {
        Self {
            proof: hex::encode(artifact.proof_bytes()),
            public_inputs: artifact
                .public_inputs_bytes()
                .iter()
                .map(hex::encode)
                .collect(),
        }
    }
}

/// Verifying key as printed by the CLI
#[derive(Debug, Serialize)]
pub struct VerifyingKeyOutput {
    /// Circuit the key belongs to
    pub circuit: &'static str,
    /// Hex of the compressed Groth16 verifying key
    pub verifying_key: String,
}

impl VerifyingKeyOutput {
    pub fn new(kind: CircuitKind, key: &[u8]) -> Self {
        Self {
            circuit: kind.as_str(),
            verifying_key: hex::encode(key),
        }
    }
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
}

/// Pretty-print JSON to `out`, or to stdout
pub fn write_json<T: Serialize>(out: Option<&Path>, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match out {
        Some(path) => {
            fs::write(path, json + "\n")
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("wrote {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
