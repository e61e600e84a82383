//! Parallel processing configuration
//!
//! Storm tracks are read, filtered and formatted on Rayon's global thread
//! pool. This module sizes that pool from the `--threads` option.

use crate::errors::{Result, TrackTextError};
use rayon::ThreadPoolBuilder;
use tracing::debug;

/// Configuration for parallel processing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Set up the global Rayon thread pool with the specified configuration.
    ///
    /// The global pool can only be built once per process; a second call
    /// returns [`TrackTextError::ThreadPoolError`].
    pub fn setup_global_pool(&self) -> Result<()> {
        if let Some(num_threads) = self.num_threads {
            ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    TrackTextError::ThreadPoolError(format!(
                        "Failed to initialize thread pool with {} threads: {}",
                        num_threads, e
                    ))
                })?;
            debug!("Configured parallel processing with {} threads", num_threads);
        } else {
            debug!(
                "Using default thread pool ({} threads on {} cores)",
                rayon::current_num_threads(),
                num_cpus::get()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_config() {
        let default_config = ParallelConfig::default();
        assert!(default_config.num_threads.is_none());

        assert_eq!(ParallelConfig::new(Some(2)).num_threads, Some(2));
    }

    #[test]
    fn test_default_pool_setup_is_noop() {
        assert!(ParallelConfig::default().setup_global_pool().is_ok());
    }
}
