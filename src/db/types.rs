//! Key and value encodings for the database
//!
//! # Types
//!
//! - **`SeqKey`**: Big-endian sequence number; sled iterates keys in byte
//!   order, so records read back in the order they were written
//! - **`TreeName`**: Per-user tree names (`files:<user>`, `shares:<user>`)
//!
//! Values are encoded with bincode's serde integration.

use super::error::DbError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Position of a record within a per-user tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SeqKey(pub u64);

impl SeqKey {
    #[must_use]
    pub const fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// # Errors
    ///
    /// Returns `DbError::InvalidKey` if `bytes` is not exactly eight bytes long.
    pub fn from_bytes(tree: &str, bytes: &[u8]) -> Result<Self, DbError> {
        let array: [u8; 8] = bytes.try_into().map_err(|_| DbError::InvalidKey {
            tree: tree.to_string(),
            reason: format!("expected 8 bytes, got {}", bytes.len()),
        })?;
        Ok(Self(u64::from_be_bytes(array)))
    }
}

/// Name of a tree holding one user's data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeName<'a> {
    Files(&'a str),
    Shares(&'a str),
}

impl TreeName<'_> {
    #[must_use]
    pub fn name(self) -> String {
        match self {
            Self::Files(user) => format!("files:{user}"),
            Self::Shares(user) => format!("shares:{user}"),
        }
    }
}

/// Encode a value for storage
///
/// # Errors
///
/// Returns `DbError::EncodeError` if serialization fails.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, DbError> {
    Ok(bincode::serde::encode_to_vec(value, bincode::config::standard())?)
}

/// Decode a stored value
///
/// # Errors
///
/// Returns `DbError::DecodeError` if the bytes do not decode to `T`.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DbError> {
    let (value, _): (T, usize) =
        bincode::serde::decode_from_slice(bytes, bincode::config::standard())?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::record;

    #[test]
    fn test_seq_key_orders_bytewise() {
        let keys: Vec<[u8; 8]> = [0u64, 1, 255, 256, 70_000].iter().map(|n| SeqKey(*n).to_bytes()).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_seq_key_from_bytes() {
        let key = SeqKey(4242);
        assert_eq!(SeqKey::from_bytes("t", &key.to_bytes()).unwrap(), key);
        assert!(matches!(
            SeqKey::from_bytes("t", &[1, 2, 3]),
            Err(DbError::InvalidKey { .. })
        ));
    }

    #[test]
    fn test_tree_names_are_per_user() {
        assert_eq!(TreeName::Files("u1").name(), "files:u1");
        assert_eq!(TreeName::Shares("u1").name(), "shares:u1");
        assert_ne!(TreeName::Files("u1").name(), TreeName::Files("u2").name());
    }

    #[test]
    fn test_record_encoding_preserves_timestamps() {
        let mut original = record("7", "Meeting Recording.mp4", 47_920_000);
        original.deleted_at = Some(original.created_at);
        original.is_deleted = true;

        let decoded: crate::store::FileRecord = decode(&encode(&original).unwrap()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_garbage_fails() {
        let result: Result<crate::store::FileRecord, _> = decode(&[0xff, 0x00]);
        assert!(result.is_err());
    }
}
