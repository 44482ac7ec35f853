//! Registration and authentication proof requests

use std::time::Instant;

use serde::Serialize;
use types::{
    AuthenticationCredential, AuthenticationInput, CircuitInput, CircuitKind,
    PublicKeyCredentialCreationOptions, PublicKeyCredentialRequestOptions, RegistrationCredential,
    RegistrationInput, check_credential_type, encode_authentication, encode_registration,
};

use crate::{
    artifact::ProofArtifact,
    config::{CircuitDefinition, ProverConfig},
    error::{ConfigError, ErrorKind, ProveError},
    session::ProofSession,
};

/// Progress of one proof request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Request received
    Idle,
    /// Credential type checked
    TypeValidated,
    /// Circuit input record built
    Mapped,
    /// Witness computed
    WitnessComputed,
    /// Proof generated
    Proved,
    /// Artifact returned
    Done,
    /// Request failed
    Failed(ErrorKind),
}

/// Proves passkey ceremonies with one session per circuit
pub struct Prover {
    registration: ProofSession<RegistrationInput>,
    authentication: ProofSession<AuthenticationInput>,
}

impl Prover {
    /// Wrap existing sessions
    pub fn new(
        registration: ProofSession<RegistrationInput>,
        authentication: ProofSession<AuthenticationInput>,
    ) -> Self {
        Self {
            registration,
            authentication,
        }
    }

    /// Load both circuits from their configured artifacts. Call from within
    /// a tokio runtime so the sessions warm up in the background.
    pub fn from_config(config: &ProverConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(session(config)?, session(config)?))
    }

    /// Prove a registration ceremony
    pub async fn prove_registration(
        &self,
        options: &PublicKeyCredentialCreationOptions,
        credential: &RegistrationCredential,
    ) -> Result<ProofArtifact, ProveError> {
        let mut call = Call::start(CircuitKind::Registration, options, credential);
        let result = async {
            check_credential_type(credential)?;
            call.advance(Stage::TypeValidated);
            let input = encode_registration(options, credential)?;
            call.advance(Stage::Mapped);
            call.run(&self.registration, &input).await
        }
        .await;
        call.finish(result)
    }

    /// Prove an authentication ceremony
    pub async fn prove_authentication(
        &self,
        options: &PublicKeyCredentialRequestOptions,
        credential: &AuthenticationCredential,
    ) -> Result<ProofArtifact, ProveError> {
        let mut call = Call::start(CircuitKind::Authentication, options, credential);
        let result = async {
            check_credential_type(credential)?;
            call.advance(Stage::TypeValidated);
            let input = encode_authentication(options, credential)?;
            call.advance(Stage::Mapped);
            call.run(&self.authentication, &input).await
        }
        .await;
        call.finish(result)
    }

    /// Check an artifact against the verifying key of its circuit
    pub async fn verify(
        &self,
        kind: CircuitKind,
        artifact: &ProofArtifact,
    ) -> Result<bool, ProveError> {
        let valid = match kind {
            CircuitKind::Registration => self.registration.verify(artifact).await?,
            CircuitKind::Authentication => self.authentication.verify(artifact).await?,
        };
        log::debug!("[{kind}] proof valid: {valid}");
        Ok(valid)
    }

    /// Compressed verifying key of a circuit
    pub async fn verifying_key(&self, kind: CircuitKind) -> Result<Vec<u8>, ProveError> {
        match kind {
            CircuitKind::Registration => self.registration.verifying_key_bytes().await,
            CircuitKind::Authentication => self.authentication.verifying_key_bytes().await,
        }
    }
}

fn session<I: CircuitInput>(config: &ProverConfig) -> Result<ProofSession<I>, ConfigError> {
    let definition = CircuitDefinition::load(config.circuit(I::KIND))?;
    ProofSession::from_definition(&definition).map_err(|source| ConfigError::Executor {
        kind: I::KIND,
        source,
    })
}

/// Tracks and logs one request
struct Call {
    kind: CircuitKind,
    stage: Stage,
    started: Instant,
}

impl Call {
    fn start<O: Serialize, C: Serialize>(kind: CircuitKind, options: &O, credential: &C) -> Self {
        if log::log_enabled!(log::Level::Debug) {
            // best effort, never affects the request
            if let Ok(json) = serde_json::to_string(options) {
                log::debug!("[{kind}] options: {json}");
            }
            if let Ok(json) = serde_json::to_string(credential) {
                log::debug!("[{kind}] credential: {json}");
            }
        }
        Self {
            kind,
            stage: Stage::Idle,
            started: Instant::now(),
        }
    }

    fn advance(&mut self, next: Stage) {
        log::trace!("[{}] {:?} -> {:?}", self.kind, self.stage, next);
        self.stage = next;
    }

    async fn run<I: CircuitInput>(
        &mut self,
        session: &ProofSession<I>,
        input: &I,
    ) -> Result<ProofArtifact, ProveError> {
        let kind = self.kind;

        log::info!("[{kind}] generating witness");
        let started = Instant::now();
        let witness = session.execute(input).await?;
        log::info!(
            "[{kind}] witness generated in {:?} ({} wires)",
            started.elapsed(),
            witness.len()
        );
        self.advance(Stage::WitnessComputed);

        log::info!("[{kind}] proving");
        let started = Instant::now();
        let artifact = session.prove(witness).await?;
        log::info!("[{kind}] proof generated in {:?}", started.elapsed());
        self.advance(Stage::Proved);

        if log::log_enabled!(log::Level::Debug) {
            log::debug!("[{kind}] proof: {}", hex::encode(artifact.proof_bytes()));
        }
        Ok(artifact)
    }

    fn finish(
        mut self,
        result: Result<ProofArtifact, ProveError>,
    ) -> Result<ProofArtifact, ProveError> {
        match &result {
            Ok(_) => {
                self.advance(Stage::Done);
                log::info!("[{}] done in {:?}", self.kind, self.started.elapsed());
            }
            Err(e) => {
                self.advance(Stage::Failed(e.kind()));
                log::debug!(
                    "[{}] failed after {:?}: {e}",
                    self.kind,
                    self.started.elapsed()
                );
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ark_bn254::Fr;
    use serde_json::json;
    use types::{
        AuthenticatorAssertionResponse, AuthenticatorAttestationResponse, BufferSource, InputError,
        PublicKeyCredential,
    };
    use witness::WitnessError;

    use super::*;
    use crate::{
        error::ProvingError,
        testing::{MockBackend, MockExecutor, VERIFYING_KEY},
    };

    struct Harness {
        prover: Prover,
        registration: (Arc<MockExecutor>, Arc<MockBackend>),
        authentication: (Arc<MockExecutor>, Arc<MockBackend>),
    }

    fn harness(executor: fn() -> Arc<MockExecutor>, backend: fn() -> MockBackend) -> Harness {
        let registration = (executor(), Arc::new(backend()));
        let authentication = (executor(), Arc::new(backend()));
        let prover = Prover::new(
            ProofSession::new(registration.0.clone(), registration.1.clone()),
            ProofSession::new(authentication.0.clone(), authentication.1.clone()),
        );
        Harness {
            prover,
            registration,
            authentication,
        }
    }

    fn working() -> Harness {
        harness(|| Arc::new(MockExecutor::default()), MockBackend::default)
    }

    fn creation_options() -> PublicKeyCredentialCreationOptions {
        PublicKeyCredentialCreationOptions {
            challenge: [0x11u8; 32].into(),
        }
    }

    fn request_options() -> PublicKeyCredentialRequestOptions {
        PublicKeyCredentialRequestOptions {
            challenge: [0x22u8; 32].into(),
        }
    }

    fn registration_credential() -> RegistrationCredential {
        PublicKeyCredential {
            id: String::from("user-1"),
            raw_id: vec![1, 2, 3, 4],
            response: AuthenticatorAttestationResponse {
                client_data_json: b"{\"a\":\"b\"}\n".to_vec(),
                attestation_object: vec![0xa3; 20],
            },
            credential_type: String::from("public-key"),
        }
    }

    fn authentication_credential(signature_len: usize) -> AuthenticationCredential {
        PublicKeyCredential {
            id: String::from("user-1"),
            raw_id: vec![1, 2, 3, 4],
            response: AuthenticatorAssertionResponse {
                authenticator_data: vec![0x49; 37],
                client_data_json: b"{\"type\":\"webauthn.get\"}".to_vec(),
                signature: vec![0x30; signature_len],
                user_handle: Some(b"handle".to_vec()),
            },
            credential_type: String::from("public-key"),
        }
    }

    #[tokio::test]
    async fn test_prove_registration() {
        let h = working();

        let artifact = h
            .prover
            .prove_registration(&creation_options(), &registration_credential())
            .await
            .unwrap();

        assert_eq!(artifact.public_inputs, vec![Fr::from(10u64)]);
        assert_eq!(artifact.proof_bytes().len(), 128);

        let requests = h.registration.0.requests();
        assert_eq!(requests.len(), 1);
        let credential = &requests[0]["credential"];
        assert_eq!(requests[0]["challenge"], json!(vec![0x11u8; 32]));
        assert_eq!(credential["credential_type"], json!("public-key"));
        assert_eq!(credential["id"]["len"], json!(6));
        assert_eq!(credential["raw_id"]["len"], json!(4));
        assert_eq!(credential["response"]["client_data_json"]["len"], json!(10));
        assert_eq!(credential["response"]["attestation_object"]["len"], json!(20));
        assert_eq!(
            credential["response"]["attestation_object"]["storage"]
                .as_array()
                .map(Vec::len),
            Some(2048)
        );

        assert_eq!(h.registration.1.proofs(), 1);
        assert!(h.authentication.0.requests().is_empty());
    }

    #[tokio::test]
    async fn test_prove_authentication() {
        let h = working();

        let artifact = h
            .prover
            .prove_authentication(&request_options(), &authentication_credential(71))
            .await
            .unwrap();

        assert_eq!(artifact.witness.len(), 3);
        assert_eq!(artifact.public_inputs, vec![Fr::from(71u64)]);
        let requests = h.authentication.0.requests();
        let response = &requests[0]["credential"]["response"];
        assert_eq!(response["signature"]["len"], json!(71));
        assert_eq!(response["user_handle"]["len"], json!(6));
        assert_eq!(response["authenticator_data"]["len"], json!(37));
        assert_eq!(h.authentication.1.proofs(), 1);
        assert_eq!(h.registration.1.proofs(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_requests_stay_separate() {
        let h = working();
        let options = request_options();
        let short = authentication_credential(64);
        let long = authentication_credential(71);

        let (first, second) = tokio::join!(
            h.prover.prove_authentication(&options, &short),
            h.prover.prove_authentication(&options, &long)
        );

        let (first, second) = (first.unwrap(), second.unwrap());
        assert_eq!(first.public_inputs, vec![Fr::from(64u64)]);
        assert_eq!(second.public_inputs, vec![Fr::from(71u64)]);
        assert_eq!(h.authentication.0.requests().len(), 2);
        assert_eq!(h.authentication.1.proofs(), 2);
    }

    #[tokio::test]
    async fn test_verify_routes_by_circuit() {
        let h = working();
        let mut artifact = h
            .prover
            .prove_registration(&creation_options(), &registration_credential())
            .await
            .unwrap();

        assert!(
            h.prover
                .verify(CircuitKind::Registration, &artifact)
                .await
                .unwrap()
        );
        artifact.public_inputs = vec![Fr::from(11u64)];
        assert!(
            !h.prover
                .verify(CircuitKind::Authentication, &artifact)
                .await
                .unwrap()
        );
        assert_eq!(
            h.prover
                .verifying_key(CircuitKind::Authentication)
                .await
                .unwrap(),
            VERIFYING_KEY.to_vec()
        );
    }

    #[tokio::test]
    async fn test_oversized_signature_fails_before_execution() {
        let h = working();

        let err = h
            .prover
            .prove_authentication(&request_options(), &authentication_credential(1025))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::OversizedField);
        assert!(matches!(
            err,
            ProveError::Input(InputError::OversizedField {
                field: "signature",
                len: 1025,
                capacity: 1024
            })
        ));
        assert!(h.authentication.0.requests().is_empty());
        assert_eq!(h.authentication.1.proofs(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_type_is_rejected_by_both_entry_points() {
        let h = working();

        let mut registration = registration_credential();
        registration.credential_type = String::from("password");
        let err = h
            .prover
            .prove_registration(&creation_options(), &registration)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProveError::Input(InputError::UnsupportedCredentialType(ref t)) if t == "password"
        ));

        // oversized too, but the type is checked first
        let mut authentication = authentication_credential(4096);
        authentication.credential_type = String::from("password");
        let err = h
            .prover
            .prove_authentication(&request_options(), &authentication)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedCredentialType);

        assert!(h.registration.0.requests().is_empty());
        assert!(h.authentication.0.requests().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_challenge_length() {
        let h = working();
        let options = PublicKeyCredentialCreationOptions {
            challenge: vec![0u8; 16].into(),
        };

        let err = h
            .prover
            .prove_registration(&options, &registration_credential())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChallengeLength);
    }

    #[tokio::test]
    async fn test_challenge_view_past_the_end() {
        let h = working();
        let options = PublicKeyCredentialRequestOptions {
            challenge: BufferSource::View {
                buffer: vec![0u8; 32],
                byte_offset: 16,
                byte_length: 32,
            },
        };

        let err = h
            .prover
            .prove_authentication(&options, &authentication_credential(64))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidBufferView);
        assert!(h.authentication.0.requests().is_empty());
    }

    #[tokio::test]
    async fn test_witness_failure_skips_proving() {
        let h = harness(MockExecutor::failing, MockBackend::default);

        let err = h
            .prover
            .prove_registration(&creation_options(), &registration_credential())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::WitnessGeneration);
        assert!(matches!(
            err,
            ProveError::WitnessGeneration(WitnessError::Calculation(_))
        ));
        assert_eq!(h.registration.1.proofs(), 0);
    }

    #[tokio::test]
    async fn test_backend_failure_is_passed_through() {
        let h = harness(
            || Arc::new(MockExecutor::default()),
            || MockBackend {
                fail_prove: true,
                ..MockBackend::default()
            },
        );

        let err = h
            .prover
            .prove_authentication(&request_options(), &authentication_credential(64))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ProvingBackend);
        assert!(matches!(
            err,
            ProveError::ProvingBackend(ProvingError::Proof(_))
        ));
    }
}
