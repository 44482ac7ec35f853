//! Circom witness calculator
//!
//! Loads a compiled circuit into wasmer and computes full witnesses from
//! JSON input records.

use ark_circom::WitnessCalculator as ArkWitnessCalculator;
use serde_json::Value;
use wasmer::{Module, Store};

use crate::{error::WitnessError, inputs::flatten_inputs, witness::Witness};

/// Witness calculator instance for one compiled circuit
pub struct WitnessCalculator {
    /// Wasmer store for the circuit WASM instance
    store: Store,
    /// Internal ark-circom witness calculator
    calculator: ArkWitnessCalculator,
}

impl WitnessCalculator {
    /// Create a new WitnessCalculator from the compiled circuit WASM bytes
    pub fn new(circuit_wasm: &[u8]) -> Result<Self, WitnessError> {
        let mut store = Store::default();
        let module = Module::new(&store, circuit_wasm)
            .map_err(|e| WitnessError::Module(format!("failed to compile circuit WASM: {e}")))?;

        let calculator = ArkWitnessCalculator::from_module(&mut store, module)
            .map_err(|e| WitnessError::Module(format!("failed to init witness calc: {e}")))?;

        Ok(Self { store, calculator })
    }

    /// Compute the witness for a JSON object of circuit inputs
    pub fn calculate(&mut self, inputs: &Value) -> Result<Witness, WitnessError> {
        let signals = flatten_inputs(inputs)?;

        let values = self
            .calculator
            .calculate_witness(&mut self.store, signals, false)
            .map_err(|e| WitnessError::Calculation(e.to_string()))?;

        Witness::from_bigints(&values)
    }
}
