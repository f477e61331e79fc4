//! Coarse-grained thread-safe wrapper around one [`CowByteString`].
//!
//! Available with the `std` and `atomic` features together: atomic
//! reference counting makes handles movable across threads, and the
//! mutex serialises mutation of this one shared handle. Each operation
//! locks, runs the core operation, and unlocks; no invariants are added
//! to the core.

use std::sync::Mutex;
use std::sync::PoisonError;

use crate::AllocError;
use crate::CowByteString;

pub struct LockedString {
    inner: Mutex<CowByteString>,
}

impl LockedString {
    pub fn new() -> Self {
        LockedString { inner: Mutex::new(CowByteString::new()) }
    }

    pub fn from_slice(s: &[u8]) -> Result<Self, AllocError> {
        Ok(LockedString { inner: Mutex::new(CowByteString::from_slice(s)?) })
    }

    // the data is a plain byte buffer, a panic mid-operation cannot
    // leave it violating its own invariants, so poisoning is ignored
    fn lock(&self) -> std::sync::MutexGuard<'_, CowByteString> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    pub fn assign(&self, v: &[u8]) -> Result<(), AllocError> {
        self.lock().assign(v)
    }

    pub fn append(&self, v: &[u8]) -> Result<(), AllocError> {
        self.lock().append(v)
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    /// A snapshot of the current content as an independent handle,
    /// sharing storage copy-on-write instead of copying bytes.
    pub fn snapshot(&self) -> CowByteString {
        self.lock().clone()
    }
}

impl Default for LockedString {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn test_locked_append_and_snapshot() {
    let s = LockedString::from_slice(b"the quick brown fox jumped over the").unwrap();
    let before = s.snapshot();
    s.append(b" lazy dog").unwrap();
    assert_eq!(before, b"the quick brown fox jumped over the");
    assert_eq!(s.snapshot(), b"the quick brown fox jumped over the lazy dog");
}
