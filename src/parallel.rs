//! Parallel loops over index ranges.
//!
//! [`IndexPartition`] splits `0 .. size` into contiguous partitions and processes them on the
//! rayon thread pool. It is the loop construct used by element-wise assembly and by anything
//! that registers or looks up many registry entries at once.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use std::cell::RefCell;
use std::ops::Range;
use thread_local::ThreadLocal;

/// A partition of the index range `0 .. size` into contiguous chunks.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct IndexPartition {
    size: usize,
    num_partitions: usize,
}

impl IndexPartition {
    /// Partitions `0 .. size` into one chunk per thread of the current rayon pool.
    pub fn new(size: usize) -> Self {
        Self::with_partitions(size, rayon::current_num_threads())
    }

    pub fn with_partitions(size: usize, num_partitions: usize) -> Self {
        // Never more partitions than indices, but always at least one
        let num_partitions = num_partitions.clamp(1, size.max(1));
        Self { size, num_partitions }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn num_partitions(&self) -> usize {
        self.num_partitions
    }

    /// The index range covered by partition `index`.
    ///
    /// The first `size % num_partitions` partitions hold one index more than the rest.
    pub fn partition_range(&self, index: usize) -> Range<usize> {
        assert!(index < self.num_partitions, "Partition index out of bounds");
        let base = self.size / self.num_partitions;
        let remainder = self.size % self.num_partitions;
        let begin = index * base + index.min(remainder);
        let end = begin + base + usize::from(index < remainder);
        begin..end
    }

    /// Calls `f(i)` for every index `i` in `0 .. size`, in parallel.
    pub fn for_each<F>(&self, f: F)
    where
        F: Fn(usize) + Sync + Send,
    {
        (0..self.num_partitions)
            .into_par_iter()
            .for_each(|p| self.partition_range(p).for_each(&f));
    }

    /// Like [`for_each`](Self::for_each), but hands `f` a mutable per-thread storage.
    ///
    /// The storage of a thread is created with `init` the first time the thread processes a
    /// partition and is reused for all later partitions on that thread. The storages are
    /// returned once the loop has finished.
    ///
    /// `f` must not start nested parallel loops, since a nested loop may run another partition
    /// on the same thread while its storage is borrowed.
    pub fn for_each_with_tls<S, I, F>(&self, init: I, f: F) -> Vec<S>
    where
        S: Send,
        I: Fn() -> S + Sync + Send,
        F: Fn(usize, &mut S) + Sync + Send,
    {
        let storage = ThreadLocal::new();
        (0..self.num_partitions).into_par_iter().for_each(|p| {
            let mut tls = storage.get_or(|| RefCell::new(init())).borrow_mut();
            for i in self.partition_range(p) {
                f(i, &mut *tls);
            }
        });
        storage
            .into_iter()
            .map(RefCell::into_inner)
            .collect()
    }

    /// Maps every index to a value and combines the values with `reduce`.
    ///
    /// `identity` must be a neutral element of `reduce`, and `reduce` must be associative.
    pub fn map_reduce<T, M, Id, R>(&self, map: M, identity: Id, reduce: R) -> T
    where
        T: Send,
        M: Fn(usize) -> T + Sync + Send,
        Id: Fn() -> T + Sync + Send,
        R: Fn(T, T) -> T + Sync + Send,
    {
        (0..self.num_partitions)
            .into_par_iter()
            .map(|p| self.partition_range(p).map(&map).fold(identity(), &reduce))
            .reduce(&identity, &reduce)
    }
}
