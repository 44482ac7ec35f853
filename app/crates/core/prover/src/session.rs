//! Per-circuit proof sessions

use std::{marker::PhantomData, sync::Arc};

use serde_json::{Map, Value};
use tokio::runtime::Handle;
use types::{CircuitInput, CircuitKind};
use witness::{Witness, WitnessError};

use crate::{
    artifact::ProofArtifact,
    backend::{ProvingBackend, WitnessExecutor},
    circom::CircomExecutor,
    config::CircuitDefinition,
    error::ProveError,
    groth16::Groth16Backend,
};

/// Witness runtime and proving backend of one circuit.
///
/// Typed by the input record it accepts, so a registration record cannot be
/// sent to the authentication circuit.
pub struct ProofSession<I> {
    executor: Arc<dyn WitnessExecutor>,
    backend: Arc<dyn ProvingBackend>,
    _input: PhantomData<fn(&I)>,
}

impl<I: CircuitInput> ProofSession<I> {
    /// Create a session and start warming it up in the background.
    ///
    /// Warm-up needs a tokio runtime. Outside of one it is skipped and the
    /// first request pays the loading cost instead.
    pub fn new(executor: Arc<dyn WitnessExecutor>, backend: Arc<dyn ProvingBackend>) -> Self {
        let session = Self {
            executor,
            backend,
            _input: PhantomData,
        };
        session.spawn_warm_up();
        session
    }

    /// Create a session running a Circom circuit with a Groth16 backend
    pub fn from_definition(definition: &CircuitDefinition) -> Result<Self, WitnessError> {
        let executor = CircomExecutor::new(&definition.wasm)?;
        let backend = Groth16Backend::new(
            definition.proving_key.as_slice(),
            definition.r1cs.as_slice(),
        );
        Ok(Self::new(Arc::new(executor), Arc::new(backend)))
    }

    /// Circuit served by this session
    pub fn kind(&self) -> CircuitKind {
        I::KIND
    }

    /// Compute the witness of an input record
    pub async fn execute(&self, input: &I) -> Result<Witness, ProveError> {
        let inputs = serde_json::to_value(input)
            .map_err(|e| WitnessError::InvalidInput(format!("failed to encode input: {e}")))?;
        Ok(self.executor.execute(inputs).await?)
    }

    /// Prove a witness computed by [`Self::execute`]
    pub async fn prove(&self, witness: Witness) -> Result<ProofArtifact, ProveError> {
        Ok(self.backend.prove(witness).await?)
    }

    /// Check an artifact produced by this session's circuit
    pub async fn verify(&self, artifact: &ProofArtifact) -> Result<bool, ProveError> {
        Ok(self.backend.verify(artifact).await?)
    }

    /// Compressed verifying key of this session's circuit
    pub async fn verifying_key_bytes(&self) -> Result<Vec<u8>, ProveError> {
        Ok(self.backend.verifying_key_bytes().await?)
    }

    fn spawn_warm_up(&self) {
        let Ok(handle) = Handle::try_current() else {
            log::debug!("[{}] no async runtime, skipping warm-up", I::KIND);
            return;
        };
        handle.spawn(warm_up(
            I::KIND,
            Arc::clone(&self.executor),
            Arc::clone(&self.backend),
        ));
    }
}

/// Run the circuit once on an empty input so the runtime is compiled and
/// resident. Circuits reject the empty input, in which case the proving
/// material is loaded directly.
async fn warm_up(
    kind: CircuitKind,
    executor: Arc<dyn WitnessExecutor>,
    backend: Arc<dyn ProvingBackend>,
) {
    match executor.execute(Value::Object(Map::new())).await {
        Ok(_) => log::debug!("[{kind}] warm-up execution succeeded"),
        Err(e) => {
            log::debug!("[{kind}] warm-up execution failed ({e}), preloading proving backend");
            match backend.preload().await {
                Ok(()) => log::debug!("[{kind}] proving backend preloaded"),
                Err(e) => log::warn!("[{kind}] failed to preload proving backend: {e}"),
            }
        }
    }
}
