//! Steady-state `invoke` must not touch the heap.
//!
//! Kept in its own test binary so the counting allocator sees only this
//! test's thread.

mod common;

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use ie_session::{InferenceSession, PostProcess, SessionConfig};

struct CountingAlloc;

thread_local! {
    static COUNTING: Cell<bool> = const { Cell::new(false) };
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn record() {
    let counting = COUNTING.try_with(Cell::get).unwrap_or(false);
    if counting {
        let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
    }
}

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        record();
        System.alloc(layout)
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        record();
        System.alloc_zeroed(layout)
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        record();
        System.realloc(ptr, layout, new_size)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn allocations_during(f: impl FnOnce()) -> usize {
    ALLOCATIONS.with(|n| n.set(0));
    COUNTING.with(|c| c.set(true));
    f();
    COUNTING.with(|c| c.set(false));
    ALLOCATIONS.with(Cell::get)
}

#[test]
fn test_invoke_does_not_allocate() {
    for post_process in [PostProcess::Softmax, PostProcess::RawLogits] {
        let config = SessionConfig::default().with_post_process(post_process);
        let mut session = InferenceSession::from_bytes(&common::classifier_4x3(), config).unwrap();
        let inputs: Vec<[f32; 4]> = (0..64)
            .map(|i| {
                let x = i as f32 * 0.25;
                [x, 1.0 - x, x.sin(), -x]
            })
            .collect();
        let mut out = [0.0f32; 3];
        let mut classes = [0usize; 64];

        let count = allocations_during(|| {
            for (input, class) in inputs.iter().zip(classes.iter_mut()) {
                *class = session.invoke(input, &mut out).unwrap();
            }
        });
        assert_eq!(count, 0, "{:?} invoke allocated", post_process);
        assert!(classes.iter().all(|&c| c < 3));
    }
}

#[test]
fn test_counter_sees_allocations() {
    let count = allocations_during(|| {
        let v: Vec<u64> = std::hint::black_box(vec![1, 2, 3]);
        drop(v);
    });
    assert!(count >= 1);
}
