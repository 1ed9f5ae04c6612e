//! Region-name interning.
//!
//! Every profiled region is identified by a [`RegionId`] token handed out by
//! a [`NameTable`]. Token comparison is a `u32` compare, so the hot
//! begin/end path never touches string contents. The table is owned by the
//! session that created it; there is no process-global string registry.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A reference-counted, immutable string.
///
/// `.clone()` is a pointer copy plus a refcount bump, which matters when
/// the same region names are handed out once per snapshot per frame.
/// Implements `PartialEq<&str>` so `assert_eq!(region.name, "update")`
/// reads naturally in tests.
#[derive(Debug, Clone, Eq)]
pub struct SharedStr(Arc<str>);

impl SharedStr {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for SharedStr {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // Same allocation means equal without looking at the bytes.
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl PartialEq<str> for SharedStr {
    #[inline]
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for SharedStr {
    #[inline]
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl std::hash::Hash for SharedStr {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        (*self.0).hash(state);
    }
}

impl std::ops::Deref for SharedStr {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SharedStr {
    #[inline]
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for SharedStr {
    #[inline]
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SharedStr {
    #[inline]
    fn from(s: &str) -> Self {
        SharedStr(Arc::from(s))
    }
}

impl From<String> for SharedStr {
    #[inline]
    fn from(s: String) -> Self {
        SharedStr(Arc::from(s.as_str()))
    }
}

impl std::fmt::Display for SharedStr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Hand-rolled serde impls to avoid pulling in serde's `rc` feature.

impl Serialize for SharedStr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SharedStr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(SharedStr::from(s))
    }
}

/// Interned region-name token.
///
/// Comparison and hashing go by token, not by string contents. Tokens are
/// only meaningful within the [`NameTable`] (and thus the session) that
/// produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionId(u32);

impl RegionId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Owned interning registry mapping region names to [`RegionId`] tokens.
///
/// Interning the same string twice yields the same token; lookups back to
/// the display name are index reads.
#[derive(Debug, Default)]
pub struct NameTable {
    names: Vec<SharedStr>,
    lookup: HashMap<SharedStr, RegionId>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Token for `name`, interning it on first sight.
    pub fn intern(&mut self, name: &str) -> RegionId {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = RegionId(self.names.len() as u32);
        let shared = SharedStr::from(name);
        self.names.push(shared.clone());
        self.lookup.insert(shared, id);
        id
    }

    /// Display name for a token from this table.
    pub fn resolve(&self, id: RegionId) -> Option<&str> {
        self.names.get(id.index()).map(SharedStr::as_str)
    }

    pub(crate) fn resolve_shared(&self, id: RegionId) -> Option<&SharedStr> {
        self.names.get(id.index())
    }

    /// Number of distinct names interned so far.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
