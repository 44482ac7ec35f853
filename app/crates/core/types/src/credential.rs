//! Ceremony inputs: request options and public key credentials
//!
//! These mirror the browser's `PublicKeyCredential*` objects. Byte buffers
//! deserialize from standard base64, base64url or plain byte arrays, which
//! covers both the `toJSON()` form and the raw-bytes logging form.

use serde::{Deserialize, Serialize};

use crate::error::InputError;

/// The only credential type the circuits accept.
pub const PUBLIC_KEY_CREDENTIAL_TYPE: &str = "public-key";

/// A byte-bearing value: either a whole buffer or a view into one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BufferSource {
    /// A view of `byte_length` bytes starting at `byte_offset`
    View {
        /// Underlying buffer
        #[serde(with = "buffer")]
        buffer: Vec<u8>,
        /// Start of the view
        #[serde(rename = "byteOffset")]
        byte_offset: usize,
        /// Length of the view
        #[serde(rename = "byteLength")]
        byte_length: usize,
    },
    /// A whole buffer
    Bytes(#[serde(with = "buffer")] Vec<u8>),
}

impl BufferSource {
    /// The bytes this value refers to. Fails for a view reaching past the
    /// end of its buffer.
    pub fn as_bytes(&self) -> Result<&[u8], InputError> {
        match self {
            BufferSource::Bytes(bytes) => Ok(bytes),
            BufferSource::View {
                buffer,
                byte_offset,
                byte_length,
            } => byte_offset
                .checked_add(*byte_length)
                .and_then(|end| buffer.get(*byte_offset..end))
                .ok_or(InputError::InvalidBufferView {
                    offset: *byte_offset,
                    length: *byte_length,
                    buffer_len: buffer.len(),
                }),
        }
    }
}

impl From<Vec<u8>> for BufferSource {
    fn from(bytes: Vec<u8>) -> Self {
        BufferSource::Bytes(bytes)
    }
}

impl From<&[u8]> for BufferSource {
    fn from(bytes: &[u8]) -> Self {
        BufferSource::Bytes(bytes.to_vec())
    }
}

impl<const N: usize> From<[u8; N]> for BufferSource {
    fn from(bytes: [u8; N]) -> Self {
        BufferSource::Bytes(bytes.to_vec())
    }
}

/// Options passed to `navigator.credentials.create`. Only the challenge
/// reaches the circuit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyCredentialCreationOptions {
    /// Relying party challenge
    pub challenge: BufferSource,
}

/// Options passed to `navigator.credentials.get`. Only the challenge reaches
/// the circuit; `allowCredentials` and mediation hints are ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKeyCredentialRequestOptions {
    /// Relying party challenge
    pub challenge: BufferSource,
}

/// A public key credential with a ceremony-specific response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyCredential<R> {
    /// Base64url credential id as reported by the browser
    pub id: String,
    /// Raw credential id
    #[serde(with = "buffer")]
    pub raw_id: Vec<u8>,
    /// Authenticator response
    pub response: R,
    /// Credential type, `"public-key"` for WebAuthn
    #[serde(rename = "type")]
    pub credential_type: String,
}

/// Response of a registration ceremony.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAttestationResponse {
    /// Client data JSON
    #[serde(rename = "clientDataJSON", with = "buffer")]
    pub client_data_json: Vec<u8>,
    /// CBOR attestation object
    #[serde(with = "buffer")]
    pub attestation_object: Vec<u8>,
}

/// Response of an authentication ceremony.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatorAssertionResponse {
    /// Authenticator data
    #[serde(with = "buffer")]
    pub authenticator_data: Vec<u8>,
    /// Client data JSON
    #[serde(rename = "clientDataJSON", with = "buffer")]
    pub client_data_json: Vec<u8>,
    /// Assertion signature
    #[serde(with = "buffer")]
    pub signature: Vec<u8>,
    /// User handle, absent for non-discoverable credentials
    #[serde(default, with = "buffer::option")]
    pub user_handle: Option<Vec<u8>>,
}

/// Credential returned by a registration ceremony.
pub type RegistrationCredential = PublicKeyCredential<AuthenticatorAttestationResponse>;

/// Credential returned by an authentication ceremony.
pub type AuthenticationCredential = PublicKeyCredential<AuthenticatorAssertionResponse>;

/// Serde adapter for byte buffers: base64 out, base64 / base64url / byte
/// array in.
mod buffer {
    use base64::{
        Engine, alphabet,
        engine::{
            DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig, general_purpose::STANDARD,
        },
    };
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const INDIFFERENT_PADDING: GeneralPurposeConfig =
        GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
    /// Standard alphabet, padded or not
    const STANDARD_ANY_PAD: GeneralPurpose =
        GeneralPurpose::new(&alphabet::STANDARD, INDIFFERENT_PADDING);
    /// URL-safe alphabet, padded or not
    const URL_SAFE_ANY_PAD: GeneralPurpose =
        GeneralPurpose::new(&alphabet::URL_SAFE, INDIFFERENT_PADDING);

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Encoded(String),
        Raw(Vec<u8>),
    }

    /// Decode standard base64 or base64url. Each string must stick to one
    /// alphabet.
    fn decode(encoded: &str) -> Result<Vec<u8>, base64::DecodeError> {
        STANDARD_ANY_PAD
            .decode(encoded)
            .or_else(|_| URL_SAFE_ANY_PAD.decode(encoded))
    }

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Encoded(s) => decode(&s).map_err(D::Error::custom),
            Repr::Raw(bytes) => Ok(bytes),
        }
    }

    pub mod option {
        use super::*;

        pub fn serialize<S: Serializer>(
            bytes: &Option<Vec<u8>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match bytes {
                Some(bytes) => super::serialize(bytes, serializer),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Vec<u8>>, D::Error> {
            match Option::<Repr>::deserialize(deserializer)? {
                Some(Repr::Encoded(s)) => decode(&s).map(Some).map_err(D::Error::custom),
                Some(Repr::Raw(bytes)) => Ok(Some(bytes)),
                None => Ok(None),
            }
        }
    }
}
