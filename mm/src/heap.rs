//! Heap allocator over the region-growth primitive.
//!
//! One contiguous region, grown through the break address, served from a
//! singly linked first-fit free list. Blocks are never split, adjacent
//! free blocks are never coalesced, and released memory never returns to
//! the kernel; fragmentation is therefore unbounded under pathological
//! size-mixing workloads. That is the deliberate trade-off this allocator
//! carries, not an oversight.

use core::ptr::{self, NonNull};

use husk_rt::rtlog_error;
use husk_rt::syscall::grow_break;
use spin::Mutex;

use husk_lib::align_up_usize;

const ALIGNMENT: usize = 16;
const HEADER_SIZE: usize = core::mem::size_of::<usize>();

/// Free-list node. `size` counts the whole block, header included, and
/// is always a multiple of the alignment. The `next` link occupies the
/// first bytes of the reclaimed user region, so the header proper that
/// survives while a block is allocated is just the size word.
#[repr(C)]
struct FreeBlock {
    size: usize,
    next: *mut FreeBlock,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub allocation_count: u64,
    pub release_count: u64,
    pub growth_count: u64,
    pub grown_bytes: u64,
    pub free_blocks: u32,
}

struct Heap {
    free_head: *mut FreeBlock,
    region_start: usize,
    region_end: usize,
    stats: HeapStats,
}

// SAFETY: all access happens through the static mutex below.
unsafe impl Send for Heap {}

static HEAP: Mutex<Heap> = Mutex::new(Heap {
    free_head: ptr::null_mut(),
    region_start: 0,
    region_end: 0,
    stats: HeapStats {
        allocation_count: 0,
        release_count: 0,
        growth_count: 0,
        grown_bytes: 0,
        free_blocks: 0,
    },
});

impl Heap {
    /// First-fit scan; unlinks and returns the first block whose recorded
    /// size covers `rounded`.
    unsafe fn take_first_fit(&mut self, rounded: usize) -> *mut FreeBlock {
        let mut link: *mut *mut FreeBlock = &mut self.free_head;
        while !(*link).is_null() {
            let block = *link;
            if (*block).size >= rounded {
                *link = (*block).next;
                (*block).next = ptr::null_mut();
                self.stats.free_blocks -= 1;
                return block;
            }
            link = &mut (*block).next;
        }
        ptr::null_mut()
    }

    /// Grow the break by exactly `rounded` bytes and stamp the new region
    /// as a block. Returns null when the kernel denies the extension.
    unsafe fn grow(&mut self, rounded: usize) -> *mut FreeBlock {
        let base = match grow_break(rounded) {
            Ok(base) => base,
            Err(_) => return ptr::null_mut(),
        };

        let block = base as *mut FreeBlock;
        (*block).size = rounded;
        (*block).next = ptr::null_mut();

        let start = base as usize;
        if self.region_start == 0 || start < self.region_start {
            self.region_start = start;
        }
        if start + rounded > self.region_end {
            self.region_end = start + rounded;
        }
        self.stats.growth_count += 1;
        self.stats.grown_bytes += rounded as u64;
        block
    }

    /// A released pointer must carry a header this allocator wrote:
    /// inside the grown region, aligned size, at least one block wide.
    unsafe fn header_is_plausible(&self, block: *mut FreeBlock) -> bool {
        let addr = block as usize;
        if addr < self.region_start || addr >= self.region_end {
            return false;
        }
        let size = (*block).size;
        size >= ALIGNMENT && size % ALIGNMENT == 0 && addr + size <= self.region_end
    }
}

/// Round a requested byte count to the block size that serves it.
#[inline]
fn rounded_block_size(size: usize) -> usize {
    align_up_usize(size + HEADER_SIZE, ALIGNMENT)
}

/// Allocate at least `size` usable bytes.
///
/// First fit from the free list; otherwise the region grows by exactly
/// the rounded request. `None` means the kernel denied the growth.
pub fn allocate(size: usize) -> Option<NonNull<u8>> {
    let rounded = rounded_block_size(size);
    let mut heap = HEAP.lock();

    unsafe {
        let mut block = heap.take_first_fit(rounded);
        if block.is_null() {
            block = heap.grow(rounded);
            if block.is_null() {
                return None;
            }
        }
        heap.stats.allocation_count += 1;
        NonNull::new((block as *mut u8).add(HEADER_SIZE))
    }
}

/// Allocate and zero `size` bytes.
pub fn allocate_zeroed(size: usize) -> Option<NonNull<u8>> {
    let region = allocate(size)?;
    unsafe {
        ptr::write_bytes(region.as_ptr(), 0, size);
    }
    Some(region)
}

/// Return a previously allocated region to the free pool.
///
/// The block is prepended to the free list as-is: no coalescing with
/// neighbours, no poisoning. Releasing a pointer this allocator never
/// handed out is reported and otherwise ignored.
///
/// # Safety
/// `region` must come from [`allocate`] and must not have been released
/// already.
pub unsafe fn release(region: NonNull<u8>) {
    let block = region.as_ptr().sub(HEADER_SIZE) as *mut FreeBlock;
    let mut heap = HEAP.lock();

    if !heap.header_is_plausible(block) {
        rtlog_error!("heap: release of foreign or corrupt region {:p}", region);
        return;
    }

    (*block).next = heap.free_head;
    heap.free_head = block;
    heap.stats.release_count += 1;
    heap.stats.free_blocks += 1;
}

/// Resize a region, moving it if the current block cannot hold `size`.
///
/// Shrinking is in place (the block is never split); growing copies the
/// old usable bytes into a fresh allocation and releases the old region.
///
/// # Safety
/// Same contract as [`release`] for `region`.
pub unsafe fn reallocate(region: NonNull<u8>, size: usize) -> Option<NonNull<u8>> {
    let block = (region.as_ptr() as *mut u8).sub(HEADER_SIZE) as *mut FreeBlock;
    let usable = {
        let heap = HEAP.lock();
        if !heap.header_is_plausible(block) {
            rtlog_error!("heap: reallocate of foreign or corrupt region {:p}", region);
            return None;
        }
        (*block).size - HEADER_SIZE
    };

    if usable >= size {
        return Some(region);
    }

    let fresh = allocate(size)?;
    ptr::copy_nonoverlapping(region.as_ptr(), fresh.as_ptr(), usable);
    release(region);
    Some(fresh)
}

/// Snapshot of the allocator counters.
pub fn stats() -> HeapStats {
    HEAP.lock().stats
}
