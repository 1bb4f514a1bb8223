use core_affinity::CoreId;
use fprep_core::{FprepError, Result};

/// A fixed set of workers, spawned afresh for every phase.
///
/// Each call forks exactly `workers` named threads, hands worker `i` the
/// index `i` (and, for mutable phases, partition `i`), and blocks until all
/// of them have finished. There is no queue and nothing outlives the call.
#[derive(Debug, Clone)]
pub struct WorkerSet {
    workers: usize,
    cores: Vec<CoreId>,
}

impl WorkerSet {
    pub fn new(workers: usize, pin: bool) -> Result<Self> {
        if workers == 0 {
            return Err(FprepError::NoWorkers);
        }
        let cores = if pin {
            let cores = core_affinity::get_core_ids().unwrap_or_default();
            if cores.is_empty() {
                tracing::warn!("Core pinning requested but no core ids are available");
            }
            cores
        } else {
            Vec::new()
        };
        Ok(Self { workers, cores })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    fn core_for(&self, idx: usize) -> Option<CoreId> {
        if self.cores.is_empty() {
            None
        } else {
            Some(self.cores[idx % self.cores.len()])
        }
    }

    /// Runs `work(i)` on worker `i` for every worker and returns the results
    /// in worker order.
    pub fn fork_join<T, F>(&self, phase: &str, work: F) -> Result<Vec<T>>
    where
        T: Send,
        F: Fn(usize) -> T + Sync,
    {
        tracing::debug!("Phase {}: forking {} workers", phase, self.workers);
        let work = &work;
        std::thread::scope(|scope| -> Result<Vec<T>> {
            let mut handles = Vec::with_capacity(self.workers);
            for idx in 0..self.workers {
                let core = self.core_for(idx);
                let handle = std::thread::Builder::new()
                    .name(format!("fprep-{}-{}", phase, idx))
                    .spawn_scoped(scope, move || {
                        if let Some(core) = core {
                            core_affinity::set_for_current(core);
                        }
                        work(idx)
                    })?;
                handles.push(handle);
            }
            Ok(join_all(handles))
        })
    }

    /// Runs `work(i, &mut parts[i])` on worker `i`.
    ///
    /// Every part is borrowed mutably by exactly one worker, so no locking is
    /// needed on the parts themselves.
    pub fn fork_join_mut<P, T, F>(&self, phase: &str, parts: &mut [P], work: F) -> Result<Vec<T>>
    where
        P: Send,
        T: Send,
        F: Fn(usize, &mut P) -> T + Sync,
    {
        debug_assert_eq!(parts.len(), self.workers, "one part per worker");
        tracing::debug!("Phase {}: forking {} workers (mutable)", phase, parts.len());
        let work = &work;
        std::thread::scope(|scope| -> Result<Vec<T>> {
            let mut handles = Vec::with_capacity(parts.len());
            for (idx, part) in parts.iter_mut().enumerate() {
                let core = self.core_for(idx);
                let handle = std::thread::Builder::new()
                    .name(format!("fprep-{}-{}", phase, idx))
                    .spawn_scoped(scope, move || {
                        if let Some(core) = core {
                            core_affinity::set_for_current(core);
                        }
                        work(idx, part)
                    })?;
                handles.push(handle);
            }
            Ok(join_all(handles))
        })
    }
}

/// Joins in spawn order; a worker panic is re-raised on the caller.
fn join_all<T>(handles: Vec<std::thread::ScopedJoinHandle<'_, T>>) -> Vec<T> {
    handles
        .into_iter()
        .map(|handle| handle.join().unwrap_or_else(|payload| std::panic::resume_unwind(payload)))
        .collect()
}
