//! Credential model and circuit input encoding
//!
//! Turns browser-issued WebAuthn credentials into the fixed-size input
//! records consumed by the registration and authentication circuits.
//!
//! - [`bounded`]: fixed-capacity, zero-padded byte buffers and the capacity
//!   table shared with the circuits
//! - [`credential`]: request options and credentials as produced by the
//!   ceremony, deserializable from the JSON the browser logs
//! - [`input`]: the typed circuit input records and the mapping onto them

pub mod bounded;
pub mod credential;
pub mod error;
pub mod input;

pub use bounded::{
    ATTESTATION_OBJECT_MAX_LEN, AUTHENTICATOR_DATA_MAX_LEN, BoundedVec, CLIENT_DATA_JSON_MAX_LEN,
    Field, ID_MAX_LEN, SIGNATURE_MAX_LEN, to_bounded_vec,
};
pub use credential::{
    AuthenticationCredential, AuthenticatorAssertionResponse, AuthenticatorAttestationResponse,
    BufferSource, PUBLIC_KEY_CREDENTIAL_TYPE, PublicKeyCredential,
    PublicKeyCredentialCreationOptions, PublicKeyCredentialRequestOptions, RegistrationCredential,
};
pub use error::InputError;
pub use input::{
    AuthenticationInput, CHALLENGE_LEN, CircuitInput, CircuitKind, RegistrationInput,
    check_credential_type, encode_authentication, encode_registration, map_authentication,
    map_registration,
};
