use std::collections::BTreeMap;

use crate::model::ids::ImageKey;

/// Content store for images extracted from a source document.
///
/// Keys are deterministic per document (see [`ImageKey::for_block`]), so
/// reloading the same file produces the same keys. Duplicate byte content is
/// stored as-is; deduplication is not a correctness requirement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageStore {
    images: BTreeMap<ImageKey, Vec<u8>>,
}

impl ImageStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store image bytes under `key`, returning the key for referencing.
    pub fn insert(&mut self, key: ImageKey, bytes: Vec<u8>) -> ImageKey {
        self.images.insert(key.clone(), bytes);
        key
    }

    #[must_use]
    pub fn get(&self, key: &ImageKey) -> Option<&[u8]> {
        self.images.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ImageKey> {
        self.images.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_get_round_trip() {
        let mut store = ImageStore::new();
        let key = store.insert(ImageKey::for_block(1, 1, "png"), vec![1, 2, 3]);
        assert_eq!(store.get(&key), Some(&[1u8, 2, 3][..]));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn missing_key_is_none() {
        let store = ImageStore::new();
        assert_eq!(store.get(&ImageKey::new("nope.png")), None);
    }
}
