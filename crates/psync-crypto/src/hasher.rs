use psync_types::Fingerprint;

/// Domain-separated BLAKE3 content hasher.
///
/// Each hasher carries a domain tag (e.g. `"psync-patch-v1"`) that is
/// prepended to every hash computation, so identical bytes hashed for
/// different purposes never produce the same digest. Bumping the version
/// suffix of a domain invalidates every fingerprint recorded under it.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Hasher for normalized patch content.
    pub const PATCH: Self = Self {
        domain: "psync-patch-v1",
    };

    /// Create a hasher with a custom domain tag.
    pub const fn new(domain: &'static str) -> Self {
        Self { domain }
    }

    /// Hash raw bytes with domain separation.
    pub fn hash(&self, data: &[u8]) -> Fingerprint {
        let mut hasher = self.streaming();
        hasher.update(data);
        hasher.finalize()
    }

    /// Start an incremental hash with this hasher's domain.
    pub fn streaming(&self) -> StreamingHasher {
        let mut inner = blake3::Hasher::new();
        inner.update(self.domain.as_bytes());
        inner.update(b":");
        StreamingHasher { inner }
    }

    /// Verify that data produces the expected fingerprint.
    pub fn verify(&self, data: &[u8], expected: &Fingerprint) -> bool {
        self.hash(data) == *expected
    }

    /// The domain tag used by this hasher.
    pub fn domain(&self) -> &str {
        self.domain
    }
}

/// Incremental form of [`ContentHasher`].
pub struct StreamingHasher {
    inner: blake3::Hasher,
}

impl StreamingHasher {
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        self.inner.update(data);
        self
    }

    pub fn finalize(&self) -> Fingerprint {
        Fingerprint::from_hash(*self.inner.finalize().as_bytes())
    }
}
