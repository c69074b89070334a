// file: src/watcher/mod.rs
// description: filesystem watching, readiness polling and duplicate suppression
// reference: internal module structure

pub mod readiness;
pub mod scanner;
pub mod tracker;
pub mod watch;

pub use readiness::{Readiness, ReadinessDetector};
pub use scanner::FileScanner;
pub use tracker::{Admission, SubmissionTracker};
pub use watch::{Trigger, WatchLoop};
