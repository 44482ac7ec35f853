//! Fixed-capacity byte buffers
//!
//! Circuits only accept statically sized inputs, so every variable-length
//! credential field travels as a zero-padded buffer of the capacity compiled
//! into the circuit, paired with its logical length.

use core::fmt;

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::error::InputError;

/// Capacity of `clientDataJSON`.
pub const CLIENT_DATA_JSON_MAX_LEN: usize = 1024;
/// Capacity of `authenticatorData`.
pub const AUTHENTICATOR_DATA_MAX_LEN: usize = 2048;
/// Capacity of the assertion `signature`.
pub const SIGNATURE_MAX_LEN: usize = 1024;
/// Capacity of credential identifiers (`id`, `rawId`) and of `userHandle`.
pub const ID_MAX_LEN: usize = 1023;
/// Capacity of `attestationObject`.
pub const ATTESTATION_OBJECT_MAX_LEN: usize = 2048;

/// Credential fields that are bounded before entering a circuit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// Textual credential id, UTF-8 encoded
    Id,
    /// Raw credential id
    RawId,
    /// Client data JSON of either ceremony
    ClientDataJson,
    /// Attestation object of a registration
    AttestationObject,
    /// Authenticator data of an assertion
    AuthenticatorData,
    /// Assertion signature
    Signature,
    /// Optional user handle of an assertion
    UserHandle,
}

impl Field {
    /// Every bounded field, in the order the capacity table lists them.
    pub const ALL: [Field; 7] = [
        Field::Id,
        Field::RawId,
        Field::ClientDataJson,
        Field::AttestationObject,
        Field::AuthenticatorData,
        Field::Signature,
        Field::UserHandle,
    ];

    /// Name used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::RawId => "rawId",
            Field::ClientDataJson => "clientDataJson",
            Field::AttestationObject => "attestationObject",
            Field::AuthenticatorData => "authenticatorData",
            Field::Signature => "signature",
            Field::UserHandle => "userHandle",
        }
    }

    /// Capacity the circuits are compiled with.
    pub const fn capacity(self) -> usize {
        match self {
            Field::Id | Field::RawId | Field::UserHandle => ID_MAX_LEN,
            Field::ClientDataJson => CLIENT_DATA_JSON_MAX_LEN,
            Field::AttestationObject => ATTESTATION_OBJECT_MAX_LEN,
            Field::AuthenticatorData => AUTHENTICATOR_DATA_MAX_LEN,
            Field::Signature => SIGNATURE_MAX_LEN,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A byte sequence of at most `MAX_LEN` bytes stored in a `MAX_LEN` array.
///
/// `storage[len..]` is always zero.
#[derive(Clone, PartialEq, Eq)]
pub struct BoundedVec<const MAX_LEN: usize> {
    storage: [u8; MAX_LEN],
    len: usize,
}

impl<const MAX_LEN: usize> BoundedVec<MAX_LEN> {
    /// Encode `bytes` for `field`. An absent value encodes as empty.
    ///
    /// Fails if `bytes` is longer than `MAX_LEN`; nothing is ever truncated.
    pub fn encode(field: Field, bytes: Option<&[u8]>) -> Result<Self, InputError> {
        let bytes = bytes.unwrap_or_default();
        if bytes.len() > MAX_LEN {
            return Err(InputError::OversizedField {
                field: field.name(),
                len: bytes.len(),
                capacity: MAX_LEN,
            });
        }
        let mut storage = [0u8; MAX_LEN];
        storage[..bytes.len()].copy_from_slice(bytes);
        Ok(Self {
            storage,
            len: bytes.len(),
        })
    }

    /// Logical length.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the logical content is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity of the buffer.
    pub const fn capacity(&self) -> usize {
        MAX_LEN
    }

    /// The logical content.
    pub fn as_slice(&self) -> &[u8] {
        &self.storage[..self.len]
    }

    /// The full zero-padded storage.
    pub fn storage(&self) -> &[u8; MAX_LEN] {
        &self.storage
    }
}

impl<const MAX_LEN: usize> Default for BoundedVec<MAX_LEN> {
    fn default() -> Self {
        Self {
            storage: [0u8; MAX_LEN],
            len: 0,
        }
    }
}

impl<const MAX_LEN: usize> fmt::Debug for BoundedVec<MAX_LEN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedVec")
            .field("capacity", &MAX_LEN)
            .field("len", &self.len)
            .field("content", &self.as_slice())
            .finish()
    }
}

// serde only derives arrays up to 32 elements
impl<const MAX_LEN: usize> Serialize for BoundedVec<MAX_LEN> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("BoundedVec", 2)?;
        state.serialize_field("storage", &self.storage[..])?;
        state.serialize_field("len", &self.len)?;
        state.end()
    }
}

/// Encode `input` into a buffer of capacity `MAX_LEN`, naming it `field` in
/// errors.
pub fn to_bounded_vec<const MAX_LEN: usize>(
    field: Field,
    input: Option<&[u8]>,
) -> Result<BoundedVec<MAX_LEN>, InputError> {
    BoundedVec::encode(field, input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pads_with_zeros() {
        let source = [7u8, 8, 9, 10, 11];
        let buf = BoundedVec::<16>::encode(Field::Signature, Some(&source)).unwrap();

        assert_eq!(buf.len(), source.len());
        assert_eq!(buf.as_slice(), &source);
        assert_eq!(&buf.storage()[..5], &source);
        assert!(buf.storage()[5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encode_every_length_up_to_capacity() {
        let source: Vec<u8> = (1..=32).collect();
        for n in 0..=source.len() {
            let buf = BoundedVec::<32>::encode(Field::RawId, Some(&source[..n])).unwrap();
            assert_eq!(buf.len(), n);
            assert_eq!(&buf.storage()[..n], &source[..n]);
            assert!(buf.storage()[n..].iter().all(|b| *b == 0), "len {n}");
        }
    }

    #[test]
    fn test_encode_rejects_oversized_input() {
        let source = vec![0xffu8; 17];
        let err = BoundedVec::<16>::encode(Field::Signature, Some(&source)).unwrap_err();

        assert_eq!(
            err,
            InputError::OversizedField {
                field: "signature",
                len: 17,
                capacity: 16,
            }
        );
    }

    #[test]
    fn test_encode_absent_is_empty() {
        let buf = BoundedVec::<ID_MAX_LEN>::encode(Field::UserHandle, None).unwrap();

        assert!(buf.is_empty());
        assert_eq!(buf.capacity(), ID_MAX_LEN);
        assert!(buf.storage().iter().all(|b| *b == 0));
        assert_eq!(buf, BoundedVec::default());
    }

    #[test]
    fn test_encode_exact_capacity() {
        let source = vec![1u8; SIGNATURE_MAX_LEN];
        let buf: BoundedVec<SIGNATURE_MAX_LEN> =
            to_bounded_vec(Field::Signature, Some(&source)).unwrap();
        assert_eq!(buf.len(), SIGNATURE_MAX_LEN);
    }

    #[test]
    fn test_capacity_table() {
        let table: Vec<(&str, usize)> = Field::ALL
            .iter()
            .map(|f| (f.name(), f.capacity()))
            .collect();
        assert_eq!(
            table,
            vec![
                ("id", 1023),
                ("rawId", 1023),
                ("clientDataJson", 1024),
                ("attestationObject", 2048),
                ("authenticatorData", 2048),
                ("signature", 1024),
                ("userHandle", 1023),
            ]
        );
    }

    #[test]
    fn test_serialize_shape() {
        let buf = BoundedVec::<4>::encode(Field::Id, Some(b"ab")).unwrap();
        let json = serde_json::to_value(&buf).unwrap();
        assert_eq!(json, serde_json::json!({ "storage": [97, 98, 0, 0], "len": 2 }));
    }
}
