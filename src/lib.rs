//! cowstring, a string type with small-string optimisation and
//! copy-on-write sharing.
//!
//! This crate provides two owned types: [`CowByteString`] stores
//! arbitrary sequences of bytes, while [`CowString`] stores valid
//! UTF-8. Both are built for code that cares about allocator traffic:
//! short content never allocates, long content is shared between
//! handles instead of copied, and every operation that could allocate
//! reports failure instead of aborting.
//!
//! A string can be in one of three modes, which the "mode" method
//! reports as a string for tests and debugging:
//!
//! * Inline ("inline"): up to [`INLINE_CAP`] bytes of content are
//!   stored entirely within the value. Inline strings are never shared;
//!   cloning one copies its bytes.
//! * Unique heap ("heap (unique)"): the content lives in a separately
//!   allocated block with a single owner. Mutation happens in place.
//! * Shared heap ("heap (shared)"): several handles point at the same
//!   block. Cloning bumps the block's owner count instead of copying;
//!   the first mutation through any handle forks the block first, so
//!   no handle ever observes another handle's edits.
//!
//! A heap block is one allocation holding its capacity and owner count
//! immediately before the payload bytes. The byte after the content is
//! always kept as a 0 terminator, in both modes, so the content can be
//! handed to null-terminated-string consumers without copying.
//!
//! Reference counting is non-atomic by default and handles are
//! confined to one thread; the `atomic` feature switches the owner
//! count to an atomic with acquire/release ordering, making handles
//! `Send + Sync`. Note that this makes sharing and independent
//! mutation of distinct handles safe across threads, not concurrent
//! mutation of one handle; for that, the `std` + `atomic` features
//! provide the mutex-wrapped `LockedString`.

#![no_std]

extern crate alloc;
#[cfg(all(feature = "std", feature = "atomic"))]
extern crate std;

mod bytestring;
mod heap;
#[cfg(all(feature = "std", feature = "atomic"))]
mod locked;
#[cfg(feature = "serde")]
mod serde_impls;
mod split;
mod string;
mod transcode;

pub use bytestring::CowByteString;
pub use bytestring::INLINE_CAP;
pub use heap::AllocError;
#[cfg(all(feature = "std", feature = "atomic"))]
pub use locked::LockedString;
pub use split::split;
pub use split::Split;
pub use split::SplitStr;
pub use string::CowString;
pub use transcode::utf16_to_utf8;
pub use transcode::utf8_to_utf16;
pub use transcode::Endian;
pub use transcode::TranscodeError;
