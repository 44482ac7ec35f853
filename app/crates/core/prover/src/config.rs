//! Circuit artifact configuration
//!
//! ```toml
//! [registration]
//! wasm = "circuits/registration.wasm"
//! r1cs = "circuits/registration.r1cs"
//! proving_key = "keys/registration.pk"
//!
//! [authentication]
//! wasm = "circuits/authentication.wasm"
//! r1cs = "circuits/authentication.r1cs"
//! proving_key = "keys/authentication.pk"
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use types::CircuitKind;

use crate::error::ConfigError;

/// Locations of one circuit's compiled artifacts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitPaths {
    /// Witness calculator WASM produced by circom
    pub wasm: PathBuf,
    /// Constraint system (`.r1cs`)
    pub r1cs: PathBuf,
    /// Compressed Groth16 proving key
    pub proving_key: PathBuf,
}

impl CircuitPaths {
    fn resolve(self, base: &Path) -> Self {
        let join = |path: PathBuf| {
            if path.is_relative() {
                base.join(path)
            } else {
                path
            }
        };
        Self {
            wasm: join(self.wasm),
            r1cs: join(self.r1cs),
            proving_key: join(self.proving_key),
        }
    }
}

/// Artifact locations for both ceremony circuits
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProverConfig {
    /// Registration circuit
    pub registration: CircuitPaths,
    /// Authentication circuit
    pub authentication: CircuitPaths,
}

impl ProverConfig {
    /// Read a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self {
            registration: config.registration.resolve(base),
            authentication: config.authentication.resolve(base),
        })
    }

    /// Paths of one circuit
    pub fn circuit(&self, kind: CircuitKind) -> &CircuitPaths {
        match kind {
            CircuitKind::Registration => &self.registration,
            CircuitKind::Authentication => &self.authentication,
        }
    }
}

/// Loaded artifacts of one circuit
#[derive(Clone)]
pub struct CircuitDefinition {
    /// Witness calculator WASM
    pub wasm: Vec<u8>,
    /// R1CS file contents
    pub r1cs: Vec<u8>,
    /// Compressed Groth16 proving key
    pub proving_key: Vec<u8>,
}

impl CircuitDefinition {
    /// Read all three artifacts
    pub fn load(paths: &CircuitPaths) -> Result<Self, ConfigError> {
        let read = |path: &Path| {
            fs::read(path).map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        };
        Ok(Self {
            wasm: read(&paths.wasm)?,
            r1cs: read(&paths.r1cs)?,
            proving_key: read(&paths.proving_key)?,
        })
    }
}

impl std::fmt::Debug for CircuitDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitDefinition")
            .field("wasm", &format_args!("{} bytes", self.wasm.len()))
            .field("r1cs", &format_args!("{} bytes", self.r1cs.len()))
            .field("proving_key", &format_args!("{} bytes", self.proving_key.len()))
            .finish()
    }
}
