use core::alloc::Layout;
use core::mem::size_of;
use core::ptr;
use core::ptr::NonNull;

use alloc::alloc;

use thiserror::Error;

/// The backing allocator could not satisfy a growth or fork request.
/// The string that requested the allocation is left in its previous
/// valid state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("string allocation failure")]
pub struct AllocError;

// reference count values
// starts at 1 for a freshly allocated block
// the block is freed when the count returns to 0

#[cfg(not(feature = "atomic"))]
mod count {
    use core::cell::Cell;

    pub(super) struct RefCount(Cell<usize>);

    impl RefCount {
        pub(super) fn one() -> Self {
            RefCount(Cell::new(1))
        }

        pub(super) fn get(&self) -> usize {
            self.0.get()
        }

        pub(super) fn incr(&self) -> usize {
            let n = self.0.get() + 1;
            self.0.set(n);
            n
        }

        // returns the new count
        pub(super) fn decr(&self) -> usize {
            let n = self.0.get() - 1;
            self.0.set(n);
            n
        }
    }

    #[inline]
    pub(super) fn acquire_fence() {}
}

#[cfg(feature = "atomic")]
mod count {
    use core::sync::atomic::fence;
    use core::sync::atomic::AtomicUsize;
    use core::sync::atomic::Ordering;

    pub(super) struct RefCount(AtomicUsize);

    impl RefCount {
        pub(super) fn one() -> Self {
            RefCount(AtomicUsize::new(1))
        }

        // acquire, so a count of 1 proves all other owners are fully gone
        pub(super) fn get(&self) -> usize {
            self.0.load(Ordering::Acquire)
        }

        // relaxed: taking a new reference needs atomicity only
        pub(super) fn incr(&self) -> usize {
            let old = self.0.fetch_add(1, Ordering::Relaxed);
            if old > usize::MAX / 2 {
                self.0.fetch_sub(1, Ordering::Relaxed);
                panic!("reference count too high, a handle has leaked");
            }
            old + 1
        }

        // release, paired with the acquire fence before the block is freed
        pub(super) fn decr(&self) -> usize {
            self.0.fetch_sub(1, Ordering::Release) - 1
        }
    }

    #[inline]
    pub(super) fn acquire_fence() {
        fence(Ordering::Acquire);
    }
}

use count::acquire_fence;
use count::RefCount;

// Heap block header, stored in the same allocation immediately before the
// payload bytes. cap excludes the terminator slot, the payload is always
// cap + 1 bytes long.
#[repr(C)]
struct Header {
    cap: usize,
    rc: RefCount,
}

const HDR: usize = size_of::<Header>();

#[inline]
fn block_layout(cap: usize) -> Result<Layout, AllocError> {
    let payload = cap.checked_add(1).ok_or(AllocError)?;
    let bytes = Layout::array::<u8>(payload).map_err(|_| AllocError)?;
    let (layout, offset) = Layout::new::<Header>().extend(bytes).map_err(|_| AllocError)?;
    debug_assert_eq!(offset, HDR);
    Ok(layout)
}

// layout of a block that is already live, same result as block_layout
// SAFETY: cap must be the stored capacity of a live block
#[inline]
unsafe fn live_layout(cap: usize) -> Layout {
    unsafe { Layout::from_size_align_unchecked(HDR + cap + 1, core::mem::align_of::<Header>()) }
}

#[inline]
unsafe fn header<'a>(payload: NonNull<u8>) -> &'a Header {
    unsafe { &*(payload.as_ptr().sub(HDR) as *const Header) }
}

/// Allocate a block with room for `cap` bytes plus the terminator, with an
/// owner count of 1. Returns a pointer to the (uninitialised) payload.
pub(crate) fn alloc_block(cap: usize) -> Result<NonNull<u8>, AllocError> {
    let layout = block_layout(cap)?;
    unsafe {
        let raw = alloc::alloc(layout);
        if raw.is_null() {
            return Err(AllocError);
        }
        ptr::write(raw as *mut Header, Header { cap, rc: RefCount::one() });
        Ok(NonNull::new_unchecked(raw.add(HDR)))
    }
}

/// Reallocate a block in place to hold at least `newcap` bytes plus the
/// terminator, preserving the payload. On failure the old block is intact.
///
/// SAFETY: callers must hold the only reference to the block.
pub(crate) unsafe fn grow_block(
    payload: NonNull<u8>,
    newcap: usize,
) -> Result<NonNull<u8>, AllocError> {
    unsafe {
        debug_assert_eq!(header(payload).rc.get(), 1);
        let oldcap = header(payload).cap;
        let oldlayout = live_layout(oldcap);
        let newlayout = block_layout(newcap)?;
        let raw = alloc::realloc(payload.as_ptr().sub(HDR), oldlayout, newlayout.size());
        if raw.is_null() {
            return Err(AllocError);
        }
        (*(raw as *mut Header)).cap = newcap;
        Ok(NonNull::new_unchecked(raw.add(HDR)))
    }
}

/// SAFETY: payload must point at a live block.
#[inline]
pub(crate) unsafe fn capacity(payload: NonNull<u8>) -> usize {
    unsafe { header(payload).cap }
}

/// SAFETY: payload must point at a live block.
#[inline]
pub(crate) unsafe fn owner_count(payload: NonNull<u8>) -> usize {
    unsafe { header(payload).rc.get() }
}

/// Take an additional reference to the block.
///
/// SAFETY: payload must point at a live block.
#[inline]
pub(crate) unsafe fn retain(payload: NonNull<u8>) {
    unsafe {
        header(payload).rc.incr();
    }
}

/// Drop one reference, freeing the block when the last owner lets go.
///
/// SAFETY: payload must point at a live block, which must not be used
/// through this reference afterwards.
pub(crate) unsafe fn release(payload: NonNull<u8>) {
    unsafe {
        if header(payload).rc.decr() > 0 {
            return; // there are still other owners
        }
        acquire_fence();
        let cap = header(payload).cap;
        alloc::dealloc(payload.as_ptr().sub(HDR), live_layout(cap));
    }
}

#[test]
fn test_block_roundtrip() {
    let p = alloc_block(40).unwrap();
    unsafe {
        assert_eq!(capacity(p), 40);
        assert_eq!(owner_count(p), 1);
        retain(p);
        assert_eq!(owner_count(p), 2);
        release(p);
        assert_eq!(owner_count(p), 1);
        release(p);
    }
}

#[test]
fn test_grow_preserves_payload() {
    let p = alloc_block(8).unwrap();
    unsafe {
        ptr::copy_nonoverlapping(b"12345678\0".as_ptr(), p.as_ptr(), 9);
        let p = grow_block(p, 100).unwrap();
        assert_eq!(capacity(p), 100);
        assert_eq!(core::slice::from_raw_parts(p.as_ptr(), 9), b"12345678\0");
        release(p);
    }
}
