// file: src/watcher/readiness.rs
// description: waits until a freshly created file stops growing before it is read
// reference: https://docs.rs/tokio/latest/tokio/time/fn.sleep.html

use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady,
}

/// Polls a file's size until two consecutive observations agree.
#[derive(Debug, Clone)]
pub struct ReadinessDetector {
    attempts: u32,
    interval: Duration,
}

impl ReadinessDetector {
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    pub async fn wait_until_ready(&self, path: &Path) -> Readiness {
        let mut attempt = 0;
        self.poll_until_stable(|| {
            attempt += 1;
            let path = path.to_path_buf();
            let current = attempt;
            async move {
                match fs::metadata(&path).await {
                    Ok(metadata) => Some(metadata.len()),
                    Err(e) => {
                        debug!("Waiting for {} (attempt {}): {}", path.display(), current, e);
                        None
                    }
                }
            }
        })
        .await
    }

    /// Core loop over a size measurement; `None` means the file is not there (yet).
    ///
    /// Ready once a non-zero size equals the previous observation, followed by
    /// one settle interval. Missing observations consume an attempt without
    /// resetting the previous size.
    pub async fn poll_until_stable<F, Fut>(&self, mut measure: F) -> Readiness
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Option<u64>>,
    {
        let mut last_size = 0u64;

        for _ in 0..self.attempts {
            if let Some(size) = measure().await {
                if size > 0 && size == last_size {
                    tokio::time::sleep(self.interval).await;
                    return Readiness::Ready;
                }
                last_size = size;
            }
            tokio::time::sleep(self.interval).await;
        }

        Readiness::NotReady
    }
}

impl Default for ReadinessDetector {
    fn default() -> Self {
        Self::new(10, Duration::from_millis(500))
    }
}
