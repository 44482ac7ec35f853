//! Witness Generation
//!
//! Uses ark-circom to compute witnesses for the passkey circuits.
//! Circuit inputs arrive as the JSON documents produced by serializing the
//! input records; the computed witness is handed to the prover as field
//! elements or as Little-Endian bytes.

mod calculator;
mod error;
mod inputs;
mod witness;

pub use calculator::WitnessCalculator;
pub use error::WitnessError;
pub use inputs::flatten_inputs;
pub use witness::{FIELD_SIZE, Witness, fr_from_le_bytes, fr_to_le_bytes};
