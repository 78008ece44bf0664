use sha2::{Digest, Sha256};
use vellum_types::ObjectId;

/// Hash a byte payload to its content-addressed id.
///
/// Pure and deterministic; any byte sequence (including empty) is valid
/// input.
pub fn digest(data: &[u8]) -> ObjectId {
    let mut hasher = Sha256::new();
    hasher.update(data);
    ObjectId::from_digest(hasher.finalize().into())
}

/// Verify that a payload produces the expected id.
pub fn verify(data: &[u8], expected: &ObjectId) -> bool {
    digest(data) == *expected
}

/// Incremental hasher for the streaming write path.
///
/// Feeding the same bytes through [`StreamHasher::update`] in any chunking
/// produces the identical id as [`digest`] over the concatenated input.
#[derive(Default)]
pub struct StreamHasher {
    inner: Sha256,
}

impl StreamHasher {
    /// Create a fresh hasher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Absorb the next chunk of the payload.
    pub fn update(&mut self, chunk: &[u8]) {
        self.inner.update(chunk);
    }

    /// Consume the hasher and produce the payload's id.
    pub fn finalize(self) -> ObjectId {
        ObjectId::from_digest(self.inner.finalize().into())
    }
}
