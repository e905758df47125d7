use std::collections::BTreeMap;

/// Immutable typed byte payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    mime_type: String,
    bytes: Vec<u8>,
}

impl Blob {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Concatenate `chunks` in order into one blob typed `mime_type`.
    pub fn from_chunks(chunks: &[Blob], mime_type: &str) -> Self {
        let len = chunks.iter().map(Blob::len).sum();
        let mut bytes = Vec::with_capacity(len);
        for chunk in chunks {
            bytes.extend_from_slice(&chunk.bytes);
        }
        Self::new(mime_type, bytes)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Issues `blob:` URLs for in-memory blobs and tracks which are still live.
#[derive(Debug)]
pub struct ObjectUrlRegistry {
    scope: &'static str,
    next: u64,
    live: BTreeMap<String, Blob>,
}

impl ObjectUrlRegistry {
    pub fn new(scope: &'static str) -> Self {
        Self {
            scope,
            next: 0,
            live: BTreeMap::new(),
        }
    }

    pub fn create(&mut self, blob: Blob) -> String {
        self.next += 1;
        let url = format!("blob:avatar-sync/{}/{}", self.scope, self.next);
        self.live.insert(url.clone(), blob);
        url
    }

    /// Returns `false` when the URL was unknown or already revoked.
    pub fn revoke(&mut self, url: &str) -> bool {
        let revoked = self.live.remove(url).is_some();
        if revoked {
            tracing::debug!(url, "revoked object url");
        }
        revoked
    }

    pub fn resolve(&self, url: &str) -> Option<&Blob> {
        self.live.get(url)
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/media/blob.rs"]
mod tests;
