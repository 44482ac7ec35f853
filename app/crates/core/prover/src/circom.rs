//! Witness execution for Circom circuits
//!
//! Wraps the wasmer-backed calculator behind [`WitnessExecutor`] and runs
//! each calculation on the blocking pool.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use witness::{Witness, WitnessCalculator, WitnessError};

use crate::backend::WitnessExecutor;

/// Runs a Circom circuit program in the wasmer runtime
#[derive(Clone)]
pub struct CircomExecutor {
    // a wasmer instance serves one calculation at a time
    calculator: Arc<Mutex<WitnessCalculator>>,
}

impl CircomExecutor {
    /// Compile the circuit WASM
    pub fn new(circuit_wasm: &[u8]) -> Result<Self, WitnessError> {
        let calculator = WitnessCalculator::new(circuit_wasm)?;
        Ok(Self {
            calculator: Arc::new(Mutex::new(calculator)),
        })
    }
}

#[async_trait]
impl WitnessExecutor for CircomExecutor {
    async fn execute(&self, inputs: Value) -> Result<Witness, WitnessError> {
        let calculator = Arc::clone(&self.calculator);
        tokio::task::spawn_blocking(move || {
            let mut calculator = calculator.lock().map_err(|_| {
                WitnessError::Calculation(String::from(
                    "witness calculator poisoned by an earlier panic",
                ))
            })?;
            calculator.calculate(&inputs)
        })
        .await
        .map_err(|e| WitnessError::Calculation(format!("witness task failed: {e}")))?
    }
}
