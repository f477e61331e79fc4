use core::borrow::Borrow;
use core::cmp::min;
use core::hash::Hash;
use core::hash::Hasher;
use core::ops::Deref;
use core::str;
use core::str::Utf8Error;

use alloc::fmt;
use alloc::string::String;

use crate::split::split_str;
use crate::split::SplitStr;
use crate::AllocError;
use crate::CowByteString;

/// The UTF-8 counterpart of [`CowByteString`].
///
/// A thin wrapper that upholds "content is valid UTF-8" on top of the
/// byte engine; storage, sharing and copy-on-write behave exactly as
/// they do for the inner type. Positional operations snap byte
/// positions outward to character boundaries instead of failing.
#[derive(Clone, Default)]
pub struct CowString {
    inner: CowByteString,
}

// largest pos <= the requested one that is a char boundary
fn floor_boundary(s: &str, pos: usize) -> usize {
    let mut pos = min(pos, s.len());
    while !s.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

// smallest pos >= the requested one that is a char boundary
fn ceil_boundary(s: &str, pos: usize) -> usize {
    let mut pos = min(pos, s.len());
    while !s.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

impl CowString {
    /// Creates a new empty CowString.
    /// This will not allocate.
    pub const fn new() -> Self {
        CowString { inner: CowByteString::new() }
    }

    /// Creates a CowString from a str slice.
    pub fn from_slice(s: &str) -> Result<Self, AllocError> {
        Ok(CowString { inner: CowByteString::from_slice(s.as_bytes())? })
    }

    /// Wraps UTF-8 byte content, returning an error if it is invalid.
    pub fn from_utf8(bytes: CowByteString) -> Result<Self, Utf8Error> {
        str::from_utf8(&bytes)?;
        Ok(CowString { inner: bytes })
    }

    /// Wraps byte content, replacing invalid sequences with U+FFFD.
    pub fn from_utf8_lossy(bytes: &[u8]) -> Result<Self, AllocError> {
        match str::from_utf8(bytes) {
            Ok(s) => Self::from_slice(s),
            Err(..) => Self::from_slice(&String::from_utf8_lossy(bytes)),
        }
    }

    /// Wraps byte content without checking it.
    ///
    /// SAFETY: the content must be valid UTF-8.
    pub unsafe fn from_utf8_unchecked(bytes: CowByteString) -> Self {
        CowString { inner: bytes }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        unsafe { str::from_utf8_unchecked(self.inner.as_slice()) }
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_slice()
    }

    /// The content plus the trailing 0 terminator.
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        self.inner.as_bytes_with_nul()
    }

    /// convert into the underlying byte string
    pub fn into_bytes(self) -> CowByteString {
        self.inner
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.capacity()
    }

    #[inline]
    pub fn available(&self) -> usize {
        self.inner.available()
    }

    #[inline]
    pub fn is_heap(&self) -> bool {
        self.inner.is_heap()
    }

    pub fn owner_count(&self) -> usize {
        self.inner.owner_count()
    }

    /// Return the current storage mode (for testing/debugging).
    pub fn mode(&self) -> &'static str {
        self.inner.mode()
    }

    /// Ensure there is capacity for at least `need` bytes of content.
    pub fn reserve(&mut self, need: usize) -> Result<(), AllocError> {
        self.inner.reserve(need)
    }

    /// Resets to empty content, keeping uniquely owned capacity.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Replaces the entire content with `v`.
    pub fn assign(&mut self, v: &str) -> Result<(), AllocError> {
        self.inner.assign(v.as_bytes())
    }

    /// Appends `v` at the end.
    pub fn append(&mut self, v: &str) -> Result<(), AllocError> {
        self.inner.append(v.as_bytes())
    }

    /// Appends a single character.
    pub fn push(&mut self, c: char) -> Result<(), AllocError> {
        let mut buf = [0u8; 4];
        self.inner.append(c.encode_utf8(&mut buf).as_bytes())
    }

    /// Inserts `v` at byte position `pos`, clamped to the end and
    /// snapped down to a character boundary.
    pub fn insert(&mut self, pos: usize, v: &str) -> Result<(), AllocError> {
        let pos = floor_boundary(self.as_str(), pos);
        self.inner.insert(pos, v.as_bytes())
    }

    /// Removes `n` bytes at `pos`. The range is snapped outward to
    /// character boundaries, so every character it touches is removed
    /// whole; a `pos` past the end is a no-op.
    pub fn erase(&mut self, pos: usize, n: usize) -> Result<(), AllocError> {
        let s = self.as_str();
        if pos > s.len() {
            return Ok(());
        }
        let start = floor_boundary(s, pos);
        let end = ceil_boundary(s, min(pos.saturating_add(n), s.len()));
        self.inner.erase(start, end - start)
    }

    /// Byte offset of the first occurrence of `needle` at or after
    /// `from`; an empty needle matches at `from` while in bounds.
    pub fn find(&self, needle: &str, from: usize) -> Option<usize> {
        self.inner.find(needle.as_bytes(), from)
    }

    #[inline]
    pub fn starts_with(&self, pfx: &str) -> bool {
        self.inner.starts_with(pfx.as_bytes())
    }

    #[inline]
    pub fn ends_with(&self, sfx: &str) -> bool {
        self.inner.ends_with(sfx.as_bytes())
    }

    /// Removes leading ASCII whitespace and control characters
    /// (bytes <= 0x20).
    pub fn trim_start(&mut self) -> Result<(), AllocError> {
        self.inner.trim_start()
    }

    /// Removes trailing ASCII whitespace and control characters.
    pub fn trim_end(&mut self) -> Result<(), AllocError> {
        self.inner.trim_end()
    }

    /// Removes ASCII whitespace from both ends.
    pub fn trim(&mut self) -> Result<(), AllocError> {
        self.inner.trim()
    }

    /// Replaces the first occurrence of `from` with `to`; returns
    /// whether a replacement happened.
    pub fn replace_first(&mut self, from: &str, to: &str) -> Result<bool, AllocError> {
        self.inner.replace_first(from.as_bytes(), to.as_bytes())
    }

    /// Replaces every occurrence of `from` with `to`; returns the
    /// number of replacements. An empty `from` is a no-op.
    pub fn replace_all(&mut self, from: &str, to: &str) -> Result<usize, AllocError> {
        self.inner.replace_all(from.as_bytes(), to.as_bytes())
    }

    /// Lazily splits the content around `sep`, yielding `&str` tokens;
    /// the empty-token policy matches [`split()`](crate::split()).
    pub fn split<'a>(&'a self, sep: &'a str, keep_empty: bool) -> SplitStr<'a> {
        split_str(self.as_str(), sep, keep_empty)
    }
}

impl Deref for CowString {
    type Target = str;
    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

/// Renders and appends formatted text; allocation failure surfaces as
/// `fmt::Error`.
impl fmt::Write for CowString {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append(s).map_err(|_| fmt::Error)
    }
}

impl fmt::Display for CowString {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl fmt::Debug for CowString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for CowString {
    fn eq(&self, other: &CowString) -> bool {
        self.as_str() == other.as_str()
    }
}
impl Eq for CowString {}

impl PartialEq<&str> for CowString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialEq<CowString> for &str {
    fn eq(&self, other: &CowString) -> bool {
        *self == other.as_str()
    }
}

impl Borrow<str> for CowString {
    #[inline]
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for CowString {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<[u8]> for CowString {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl Hash for CowString {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for CowString {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CowString {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

#[test]
fn test_boundary_snapping() {
    let mut s = CowString::from_slice("a\u{e9}b").unwrap(); // e9 is 2 bytes
    s.insert(2, "x").unwrap(); // inside the e9, snaps down to 1
    assert_eq!(s, "ax\u{e9}b");
    let mut s = CowString::from_slice("a\u{e9}b").unwrap();
    s.erase(2, 1).unwrap(); // touches the tail of e9, removes it whole
    assert_eq!(s, "ab");
}
