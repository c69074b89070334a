// file: src/watcher/watch.rs
// description: directory watch loop, startup reconciliation and worker dispatch
// reference: https://docs.rs/notify

use crate::config::WatchConfig;
use crate::error::{PipelineError, Result};
use crate::models::display_name;
use crate::parser::MarkdownRenderer;
use crate::pipeline::{Archiver, PipelineStats, Publisher, StatsTracker};
use crate::publishing::PublishingApi;
use crate::watcher::readiness::{Readiness, ReadinessDetector};
use crate::watcher::scanner::FileScanner;
use crate::watcher::tracker::{Admission, SubmissionTracker};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Semaphore, mpsc};
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Startup,
    Created,
    Modified,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Startup => "startup",
            Trigger::Created => "created",
            Trigger::Modified => "modified",
        };
        f.write_str(name)
    }
}

type EventSender = mpsc::Sender<notify::Result<Event>>;

/// Runs one admitted path through readiness and publishing.
struct Worker<A, R> {
    publisher: Publisher<A, R>,
    readiness: ReadinessDetector,
    permits: Semaphore,
    stats: Arc<StatsTracker>,
    stopping: AtomicBool,
}

impl<A, R> Worker<A, R>
where
    A: PublishingApi,
    R: MarkdownRenderer + 'static,
{
    async fn handle(self: Arc<Self>, admission: Admission, trigger: Trigger) {
        let path = admission.path().to_path_buf();
        let name = display_name(&path);
        debug!("Handling {} ({})", name, trigger);

        let Ok(_permit) = self.permits.acquire().await else {
            return;
        };

        if self.stopping.load(Ordering::SeqCst) {
            info!("Shutting down, leaving {} for the next start", name);
            admission.fail();
            return;
        }

        if self.readiness.wait_until_ready(&path).await == Readiness::NotReady {
            warn!("Timed out waiting for {} to finish writing", name);
            self.stats.inc_readiness_timeouts();
            admission.fail();
            return;
        }

        match self.publisher.publish(&path).await {
            Ok(_) => admission.complete(),
            Err(_) => admission.fail(),
        }
    }
}

pub struct WatchLoop<A, R> {
    config: WatchConfig,
    scanner: FileScanner,
    tracker: Arc<SubmissionTracker>,
    worker: Arc<Worker<A, R>>,
    stats: Arc<StatsTracker>,
}

impl<A, R> WatchLoop<A, R>
where
    A: PublishingApi,
    R: MarkdownRenderer + 'static,
{
    pub fn new(config: WatchConfig, api: Arc<A>, renderer: R) -> Self {
        let stats = Arc::new(StatsTracker::new());
        let publisher = Publisher::new(
            api,
            renderer,
            Archiver::new(config.archive_dir.clone()),
            Arc::clone(&stats),
        );
        let worker = Worker {
            publisher,
            readiness: ReadinessDetector::new(
                config.readiness_attempts,
                config.readiness_interval(),
            ),
            permits: Semaphore::new(config.max_concurrent.max(1)),
            stats: Arc::clone(&stats),
            stopping: AtomicBool::new(false),
        };

        Self {
            scanner: FileScanner::new(config.watch_dir.clone()),
            config,
            tracker: Arc::new(SubmissionTracker::new()),
            worker: Arc::new(worker),
            stats,
        }
    }

    pub fn tracker(&self) -> &Arc<SubmissionTracker> {
        &self.tracker
    }

    /// Publishes the files already in the watch folder and returns once they are done.
    pub async fn run_once(&self) -> Result<PipelineStats> {
        let mut tasks = JoinSet::new();
        self.reconcile(&mut tasks)?;
        self.drain(tasks).await;
        Ok(self.stats.get_stats())
    }

    /// Watches until `shutdown` resolves, then stops notifications and waits
    /// for every attempt already underway.
    pub async fn run<F>(&self, shutdown: F) -> Result<PipelineStats>
    where
        F: Future<Output = ()>,
    {
        self.worker.stopping.store(false, Ordering::SeqCst);
        let (tx, mut rx) = mpsc::channel(self.config.event_buffer.max(1));
        let watcher = self.start_watcher(tx).await?;
        info!("Watching {}", self.config.watch_dir.display());

        let mut tasks = JoinSet::new();
        if let Err(e) = self.reconcile(&mut tasks) {
            error!("Failed to process existing files: {}", e);
        }

        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                event = rx.recv() => match event {
                    Some(Ok(event)) => self.handle_event(event, &mut tasks),
                    Some(Err(e)) => warn!("Watch error: {}", e),
                    None => {
                        warn!("Notification channel closed");
                        break;
                    }
                },
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => log_join(joined),
            }
        }

        drop(watcher);
        drop(rx);
        // admitted paths still waiting for a permit are left for the next start
        self.worker.stopping.store(true, Ordering::SeqCst);
        self.drain(tasks).await;
        Ok(self.stats.get_stats())
    }

    async fn start_watcher(&self, tx: EventSender) -> Result<Box<dyn Watcher + Send>> {
        let watch_dir = self.config.watch_dir.clone();
        let poll_interval = self.config.poll_interval();

        // built off the runtime threads: the handler blocks on a full channel
        tokio::task::spawn_blocking(move || -> Result<Box<dyn Watcher + Send>> {
            let handler = move |res: notify::Result<Event>| {
                let _ = tx.blocking_send(res);
            };

            let mut watcher: Box<dyn Watcher + Send> = match poll_interval {
                Some(interval) => {
                    debug!("Using polling watcher every {:?}", interval);
                    Box::new(PollWatcher::new(
                        handler,
                        notify::Config::default().with_poll_interval(interval),
                    )?)
                }
                None => Box::new(RecommendedWatcher::new(handler, notify::Config::default())?),
            };

            watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
            Ok(watcher)
        })
        .await
        .map_err(|e| PipelineError::Config(format!("Watcher setup task failed: {}", e)))?
    }

    fn reconcile(&self, tasks: &mut JoinSet<()>) -> Result<()> {
        for path in self.scanner.scan()? {
            self.dispatch(tasks, path, Trigger::Startup);
        }
        Ok(())
    }

    fn handle_event(&self, event: Event, tasks: &mut JoinSet<()>) {
        let trigger = match event.kind {
            EventKind::Create(_) => Trigger::Created,
            EventKind::Modify(ModifyKind::Name(RenameMode::From)) => return,
            EventKind::Modify(_) => Trigger::Modified,
            _ => return,
        };

        // a rename reports [from, to]; only the new name can be a document
        let paths = match event.kind {
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
                event.paths.into_iter().last().into_iter().collect()
            }
            _ => event.paths,
        };

        for path in paths {
            if !self.accepts(&path) {
                continue;
            }
            self.dispatch(tasks, path, trigger);
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        if path.starts_with(&self.config.archive_dir) || !self.scanner.is_candidate(path) {
            return false;
        }
        if self.tracker.is_completed(path) {
            debug!("Ignoring event for published file: {}", display_name(path));
            return false;
        }
        true
    }

    fn dispatch(&self, tasks: &mut JoinSet<()>, path: PathBuf, trigger: Trigger) {
        let Some(admission) = self.tracker.admit(&path) else {
            debug!("Already in progress or published: {}", display_name(&path));
            return;
        };

        let worker = Arc::clone(&self.worker);
        tasks.spawn(worker.handle(admission, trigger));
    }

    async fn drain(&self, mut tasks: JoinSet<()>) {
        if !tasks.is_empty() {
            info!("Waiting for {} in-flight attempts", self.tracker.in_flight_count());
        }
        while let Some(joined) = tasks.join_next().await {
            log_join(joined);
        }
    }
}

fn log_join(joined: std::result::Result<(), JoinError>) {
    if let Err(e) = joined {
        error!("Publishing task ended abnormally: {}", e);
    }
}
