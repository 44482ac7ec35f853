//! `passkey-prover`: prove passkey ceremonies from the command line

mod args;
mod output;

use std::path::Path;

use anyhow::Context;
use args::{CeremonyArgs, Cli, Command};
use clap::Parser;
use output::{ProofOutput, VerifyingKeyOutput, read_json, write_json};
use prover::{ProofArtifact, Prover, ProverConfig};
use tracing_subscriber::EnvFilter;
use types::{
    AuthenticationCredential, CircuitKind, PublicKeyCredentialCreationOptions,
    PublicKeyCredentialRequestOptions, RegistrationCredential, map_authentication,
    map_registration,
};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(args::log_level(cli.verbose)))
        .with_writer(std::io::stderr)
        .init();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Register { ceremony, verify } => {
            let options: PublicKeyCredentialCreationOptions = read_json(&ceremony.options)?;
            let credential: RegistrationCredential = read_json(&ceremony.credential)?;
            let prover = load_prover(&cli.config)?;
            let artifact = prover.prove_registration(&options, &credential).await?;
            if verify {
                check_proof(&prover, CircuitKind::Registration, &artifact).await?;
            }
            write_json(ceremony.out.as_deref(), &ProofOutput::from(&artifact))
        }
        Command::Authenticate { ceremony, verify } => {
            let options: PublicKeyCredentialRequestOptions = read_json(&ceremony.options)?;
            let credential: AuthenticationCredential = read_json(&ceremony.credential)?;
            let prover = load_prover(&cli.config)?;
            let artifact = prover.prove_authentication(&options, &credential).await?;
            if verify {
                check_proof(&prover, CircuitKind::Authentication, &artifact).await?;
            }
            write_json(ceremony.out.as_deref(), &ProofOutput::from(&artifact))
        }
        Command::Inspect { circuit, ceremony } => {
            let input = inspect(circuit.into(), &ceremony)?;
            write_json(ceremony.out.as_deref(), &input)
        }
        Command::VerifyingKey { circuit, out } => {
            let kind = CircuitKind::from(circuit);
            let prover = load_prover(&cli.config)?;
            let key = prover.verifying_key(kind).await?;
            write_json(out.as_deref(), &VerifyingKeyOutput::new(kind, &key))
        }
    }
}

async fn check_proof(
    prover: &Prover,
    kind: CircuitKind,
    artifact: &ProofArtifact,
) -> anyhow::Result<()> {
    let valid = prover.verify(kind, artifact).await?;
    anyhow::ensure!(valid, "generated {kind} proof does not verify");
    tracing::info!("{kind} proof verified");
    Ok(())
}

fn load_prover(config: &Path) -> anyhow::Result<Prover> {
    let config = ProverConfig::from_file(config)?;
    let prover = Prover::from_config(&config).context("failed to load circuits")?;
    tracing::info!("circuits loaded");
    Ok(prover)
}

/// Circuit input document of a ceremony
fn inspect(kind: CircuitKind, ceremony: &CeremonyArgs) -> anyhow::Result<serde_json::Value> {
    let input = match kind {
        CircuitKind::Registration => {
            let options: PublicKeyCredentialCreationOptions = read_json(&ceremony.options)?;
            let credential: RegistrationCredential = read_json(&ceremony.credential)?;
            serde_json::to_value(map_registration(&options, &credential)?)?
        }
        CircuitKind::Authentication => {
            let options: PublicKeyCredentialRequestOptions = read_json(&ceremony.options)?;
            let credential: AuthenticationCredential = read_json(&ceremony.credential)?;
            serde_json::to_value(map_authentication(&options, &credential)?)?
        }
    };
    Ok(input)
}
