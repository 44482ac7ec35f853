//! Command line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use types::CircuitKind;

/// Generate zero-knowledge proofs of passkey ceremonies
#[derive(Parser, Debug)]
#[command(name = "passkey-prover", version)]
pub struct Cli {
    /// Circuit artifact configuration (TOML)
    #[arg(
        long,
        global = true,
        env = "PASSKEY_PROVER_CONFIG",
        default_value = "prover.toml"
    )]
    pub config: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Prove a registration ceremony
    Register {
        #[command(flatten)]
        ceremony: CeremonyArgs,
        /// Verify the proof before writing it
        #[arg(long)]
        verify: bool,
    },
    /// Prove an authentication ceremony
    Authenticate {
        #[command(flatten)]
        ceremony: CeremonyArgs,
        /// Verify the proof before writing it
        #[arg(long)]
        verify: bool,
    },
    /// Print the circuit input of a ceremony without proving it
    Inspect {
        /// Circuit the ceremony is mapped onto
        #[arg(value_enum)]
        circuit: Circuit,
        #[command(flatten)]
        ceremony: CeremonyArgs,
    },
    /// Export the compressed verifying key of a circuit
    VerifyingKey {
        #[arg(value_enum)]
        circuit: Circuit,
        /// Write the key to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
pub struct CeremonyArgs {
    /// Credential request options, as passed to the browser (JSON file)
    #[arg(long)]
    pub options: PathBuf,
    /// Credential returned by the browser (JSON file)
    #[arg(long)]
    pub credential: PathBuf,
    /// Write the result to this file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Circuit {
    Registration,
    Authentication,
}

impl From<Circuit> for CircuitKind {
    fn from(circuit: Circuit) -> Self {
        match circuit {
            Circuit::Registration => CircuitKind::Registration,
            Circuit::Authentication => CircuitKind::Authentication,
        }
    }
}

/// Log filter for a `-v` count
pub fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
