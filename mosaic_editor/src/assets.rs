// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Source key to image handle lookup.

use alloc::string::String;

use hashbrown::HashMap;

/// Maps source keys to preloaded image handles.
///
/// A miss is not an error: the object stays tracked spatially but cannot be drawn.
#[derive(Clone, Debug)]
pub struct AssetRegistry<H> {
    images: HashMap<String, H>,
}

impl<H> Default for AssetRegistry<H> {
    fn default() -> Self {
        Self {
            images: HashMap::new(),
        }
    }
}

impl<H> AssetRegistry<H> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `image` under `key`, returning the handle it replaces.
    pub fn insert(&mut self, key: impl Into<String>, image: H) -> Option<H> {
        self.images.insert(key.into(), image)
    }

    /// Forget the image under `key`.
    pub fn remove(&mut self, key: &str) -> Option<H> {
        self.images.remove(key)
    }

    /// Look up the image for `key`, logging a warning on a miss.
    pub fn lookup(&self, key: &str) -> Option<&H> {
        let image = self.images.get(key);
        if image.is_none() {
            tracing::warn!(source_key = key, "texture not found");
        }
        image
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        self.images.contains_key(key)
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl<H, K: Into<String>> FromIterator<(K, H)> for AssetRegistry<H> {
    fn from_iter<T: IntoIterator<Item = (K, H)>>(iter: T) -> Self {
        Self {
            images: iter.into_iter().map(|(k, h)| (k.into(), h)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_hits_and_misses() {
        let mut assets: AssetRegistry<u32> = [("grass", 1), ("stone", 2)].into_iter().collect();
        assert_eq!(assets.lookup("stone"), Some(&2));
        assert_eq!(assets.lookup("water"), None);
        assert_eq!(assets.insert("stone", 3), Some(2));
        assert_eq!(assets.remove("grass"), Some(1));
        assert!(!assets.contains("grass"));
        assert_eq!(assets.len(), 1);
    }
}
