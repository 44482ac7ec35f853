//! Circuit input records
//!
//! Field names and nesting follow the schemas the registration and
//! authentication circuits are compiled with; serializing a record yields
//! exactly the input document the circuit expects.

use core::fmt;

use serde::Serialize;

use crate::{
    bounded::{
        ATTESTATION_OBJECT_MAX_LEN, AUTHENTICATOR_DATA_MAX_LEN, BoundedVec,
        CLIENT_DATA_JSON_MAX_LEN, Field, ID_MAX_LEN, SIGNATURE_MAX_LEN,
    },
    credential::{
        AuthenticationCredential, BufferSource, PUBLIC_KEY_CREDENTIAL_TYPE, PublicKeyCredential,
        PublicKeyCredentialCreationOptions, PublicKeyCredentialRequestOptions,
        RegistrationCredential,
    },
    error::InputError,
};

/// Width of the relying party challenge.
pub const CHALLENGE_LEN: usize = 32;

/// The two circuits of a passkey ceremony.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CircuitKind {
    /// Credential creation
    Registration,
    /// Credential assertion
    Authentication,
}

impl CircuitKind {
    /// Lowercase name, used in logs and configuration.
    pub const fn as_str(self) -> &'static str {
        match self {
            CircuitKind::Registration => "registration",
            CircuitKind::Authentication => "authentication",
        }
    }
}

impl fmt::Display for CircuitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A complete input record for one circuit.
pub trait CircuitInput: Serialize + Send + Sync + 'static {
    /// Circuit this record is meant for
    const KIND: CircuitKind;
}

/// Input of the registration circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistrationInput {
    /// Relying party challenge
    pub challenge: [u8; CHALLENGE_LEN],
    /// The created credential
    pub credential: RegistrationCredentialInput,
}

/// Credential part of [`RegistrationInput`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RegistrationCredentialInput {
    /// UTF-8 bytes of the textual id
    pub id: BoundedVec<ID_MAX_LEN>,
    /// Raw id
    pub raw_id: BoundedVec<ID_MAX_LEN>,
    /// Attestation response
    pub response: AttestationResponseInput,
    /// Always `"public-key"`
    pub credential_type: &'static str,
}

/// Attestation response part of [`RegistrationInput`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttestationResponseInput {
    /// Client data JSON
    pub client_data_json: BoundedVec<CLIENT_DATA_JSON_MAX_LEN>,
    /// Attestation object
    pub attestation_object: BoundedVec<ATTESTATION_OBJECT_MAX_LEN>,
}

/// Input of the authentication circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthenticationInput {
    /// Relying party challenge
    pub challenge: [u8; CHALLENGE_LEN],
    /// The asserted credential
    pub credential: AuthenticationCredentialInput,
}

/// Credential part of [`AuthenticationInput`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AuthenticationCredentialInput {
    /// UTF-8 bytes of the textual id
    pub id: BoundedVec<ID_MAX_LEN>,
    /// Raw id
    pub raw_id: BoundedVec<ID_MAX_LEN>,
    /// Assertion response
    pub response: AssertionResponseInput,
    /// Always `"public-key"`
    pub credential_type: &'static str,
}

/// Assertion response part of [`AuthenticationInput`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AssertionResponseInput {
    /// Authenticator data
    pub authenticator_data: BoundedVec<AUTHENTICATOR_DATA_MAX_LEN>,
    /// Client data JSON
    pub client_data_json: BoundedVec<CLIENT_DATA_JSON_MAX_LEN>,
    /// Signature
    pub signature: BoundedVec<SIGNATURE_MAX_LEN>,
    /// User handle, empty when the authenticator returned none
    pub user_handle: BoundedVec<ID_MAX_LEN>,
}

impl CircuitInput for RegistrationInput {
    const KIND: CircuitKind = CircuitKind::Registration;
}

impl CircuitInput for AuthenticationInput {
    const KIND: CircuitKind = CircuitKind::Authentication;
}

/// Reject anything but public key credentials before touching any field.
pub fn check_credential_type<R>(
    credential: &PublicKeyCredential<R>,
) -> Result<(), InputError> {
    if credential.credential_type != PUBLIC_KEY_CREDENTIAL_TYPE {
        return Err(InputError::UnsupportedCredentialType(
            credential.credential_type.clone(),
        ));
    }
    Ok(())
}

fn challenge(source: &BufferSource) -> Result<[u8; CHALLENGE_LEN], InputError> {
    let bytes = source.as_bytes()?;
    bytes
        .try_into()
        .map_err(|_| InputError::InvalidChallengeLength {
            expected: CHALLENGE_LEN,
            actual: bytes.len(),
        })
}

fn credential_ids<R>(
    credential: &PublicKeyCredential<R>,
) -> Result<(BoundedVec<ID_MAX_LEN>, BoundedVec<ID_MAX_LEN>), InputError> {
    let id = BoundedVec::encode(Field::Id, Some(credential.id.as_bytes()))?;
    let raw_id = BoundedVec::encode(Field::RawId, Some(&credential.raw_id))?;
    Ok((id, raw_id))
}

/// Build the registration circuit input from a creation ceremony.
pub fn map_registration(
    options: &PublicKeyCredentialCreationOptions,
    credential: &RegistrationCredential,
) -> Result<RegistrationInput, InputError> {
    check_credential_type(credential)?;
    encode_registration(options, credential)
}

/// Encode a creation ceremony whose credential already passed
/// [`check_credential_type`].
pub fn encode_registration(
    options: &PublicKeyCredentialCreationOptions,
    credential: &RegistrationCredential,
) -> Result<RegistrationInput, InputError> {
    let challenge = challenge(&options.challenge)?;
    let (id, raw_id) = credential_ids(credential)?;
    let response = AttestationResponseInput {
        client_data_json: BoundedVec::encode(
            Field::ClientDataJson,
            Some(&credential.response.client_data_json),
        )?,
        attestation_object: BoundedVec::encode(
            Field::AttestationObject,
            Some(&credential.response.attestation_object),
        )?,
    };

    Ok(RegistrationInput {
        challenge,
        credential: RegistrationCredentialInput {
            id,
            raw_id,
            response,
            credential_type: PUBLIC_KEY_CREDENTIAL_TYPE,
        },
    })
}

/// Build the authentication circuit input from an assertion ceremony.
pub fn map_authentication(
    options: &PublicKeyCredentialRequestOptions,
    credential: &AuthenticationCredential,
) -> Result<AuthenticationInput, InputError> {
    check_credential_type(credential)?;
    encode_authentication(options, credential)
}

/// Encode an assertion ceremony whose credential already passed
/// [`check_credential_type`].
pub fn encode_authentication(
    options: &PublicKeyCredentialRequestOptions,
    credential: &AuthenticationCredential,
) -> Result<AuthenticationInput, InputError> {
    let challenge = challenge(&options.challenge)?;
    let (id, raw_id) = credential_ids(credential)?;
    let response = &credential.response;
    let response = AssertionResponseInput {
        authenticator_data: BoundedVec::encode(
            Field::AuthenticatorData,
            Some(&response.authenticator_data),
        )?,
        client_data_json: BoundedVec::encode(
            Field::ClientDataJson,
            Some(&response.client_data_json),
        )?,
        signature: BoundedVec::encode(Field::Signature, Some(&response.signature))?,
        user_handle: BoundedVec::encode(Field::UserHandle, response.user_handle.as_deref())?,
    };

    Ok(AuthenticationInput {
        challenge,
        credential: AuthenticationCredentialInput {
            id,
            raw_id,
            response,
            credential_type: PUBLIC_KEY_CREDENTIAL_TYPE,
        },
    })
}
