//! Fixed pool of worker threads shared by both pipeline stages.
//!
//! Workers are started once. Each call runs inside the pool and returns only
//! after every item has been processed, so consecutive calls are separated by
//! a full barrier.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};

pub struct WorkerPool {
    pool: ThreadPool,
}

impl WorkerPool {
    /// `threads == 0` picks one worker per available core.
    pub fn new(threads: usize) -> Result<Self, ThreadPoolBuildError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("raster-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    #[inline]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Run `f` once per item with exclusive access to it.
    pub fn for_each_mut<T, F>(&self, items: &mut [T], f: F)
    where
        T: Send,
        F: Fn(&mut T) + Send + Sync,
    {
        self.pool.install(|| items.par_iter_mut().for_each(f));
    }

    /// Run `f` for every index in `0..count`, never splitting work into
    /// pieces smaller than `chunk` indices.
    pub fn for_each_index<F>(&self, count: usize, chunk: usize, f: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        self.pool.install(|| {
            (0..count)
                .into_par_iter()
                .with_min_len(chunk.max(1))
                .for_each(f)
        });
    }
}
