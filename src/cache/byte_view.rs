//! Byte View Module
//!
//! Defines the immutable byte payload returned by cache lookups.

// == Byte View ==
/// An immutable view over cached bytes.
///
/// All accessors that expose the payload return a fresh copy, so no caller
/// can mutate cached state through a value it was handed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteView {
    bytes: Vec<u8>,
}

impl ByteView {
    // == Constructors ==
    /// Creates a view by copying the given bytes.
    pub fn copy_from(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// Creates a view that takes ownership of the given bytes without copying.
    ///
    /// Used for payloads the node already owns, such as a peer response body.
    pub fn from_owned(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    // == Length ==
    /// Returns the payload length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // == Accessors ==
    /// Returns a copy of the payload.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }
}

impl std::fmt::Display for ByteView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}

impl From<&str> for ByteView {
    fn from(s: &str) -> Self {
        Self::copy_from(s.as_bytes())
    }
}
