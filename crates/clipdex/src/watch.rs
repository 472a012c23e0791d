//! Incremental corpus ingest via polling.
//!
//! The corpus grows when the scraper drops new files into the tree. A
//! [`CorpusMonitor`] rescans on an interval, diffs against the hashes it
//! already knows, and streams newly added or changed documents over a
//! channel. Deletions are not watched; `scan --prune` reconciles those.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::corpus::{rel_key, Corpus};
use crate::document::Document;
use crate::error::{Error, Result};

/// What a rescan discovered about a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanEventKind {
    /// The path was not cataloged before.
    Added,
    /// The path was cataloged with different content.
    Changed,
}

impl std::fmt::Display for ScanEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Changed => write!(f, "changed"),
        }
    }
}

/// A document discovered by a monitor.
#[derive(Debug, Clone)]
pub struct ScanEvent {
    /// How the document was discovered.
    pub kind: ScanEventKind,
    /// The parsed document.
    pub document: Document,
}

/// Status snapshot of a corpus monitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorStatus {
    /// Whether the monitor is currently running.
    pub is_running: bool,
    /// Number of rescans since startup.
    pub scan_count: u64,
    /// Number of events emitted since startup.
    pub event_count: u64,
    /// Human-readable status message.
    pub message: String,
}

impl MonitorStatus {
    /// Status for a stopped monitor.
    #[must_use]
    pub fn stopped() -> Self {
        Self {
            is_running: false,
            scan_count: 0,
            event_count: 0,
            message: "Monitor stopped".to_string(),
        }
    }

    /// Status for a running monitor.
    #[must_use]
    pub fn running(scan_count: u64, event_count: u64) -> Self {
        Self {
            is_running: true,
            scan_count,
            event_count,
            message: "Monitor running".to_string(),
        }
    }
}

/// A source of corpus change events.
///
/// Implementors rescan (or otherwise observe) the corpus and send
/// [`ScanEvent`]s through the provided channel until stopped or until the
/// receiver goes away.
#[async_trait]
pub trait CorpusMonitor: Send + Sync {
    /// The name of this monitor (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Check if the monitor is currently running.
    fn is_running(&self) -> bool;

    /// Get the current status of the monitor.
    fn status(&self) -> MonitorStatus;

    /// Run the monitor, sending events through `tx`.
    ///
    /// Returns cleanly when the receiver is dropped or [`stop`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the monitor is already running.
    ///
    /// [`stop`]: CorpusMonitor::stop
    async fn run(&mut self, tx: mpsc::Sender<ScanEvent>) -> Result<()>;

    /// Ask the monitor to stop after its current cycle.
    fn stop(&mut self);
}

/// Diff a rescan against the known path-to-hash map.
///
/// Paths in `known` but absent from `current` are ignored; deletions are
/// reconciled by `scan --prune`, not by the watcher.
#[must_use]
pub fn diff_scan(
    known: &HashMap<String, String>,
    current: &[(String, String)],
) -> Vec<(String, ScanEventKind)> {
    let mut events = Vec::new();
    for (path, hash) in current {
        match known.get(path) {
            None => events.push((path.clone(), ScanEventKind::Added)),
            Some(old_hash) if old_hash != hash => {
                events.push((path.clone(), ScanEventKind::Changed));
            }
            Some(_) => {}
        }
    }
    events
}

/// A monitor that rescans the corpus on a fixed interval.
#[derive(Debug)]
pub struct PollingMonitor {
    corpus: Corpus,
    interval: Duration,
    known: HashMap<String, String>,
    running: Arc<AtomicBool>,
    scan_count: Arc<AtomicU64>,
    event_count: Arc<AtomicU64>,
}

impl PollingMonitor {
    /// Create a polling monitor.
    ///
    /// `known` seeds the path-to-hash map, typically from the catalog, so
    /// already-ingested documents are not re-emitted on the first scan.
    #[must_use]
    pub fn new(corpus: Corpus, interval: Duration, known: HashMap<String, String>) -> Self {
        Self {
            corpus,
            interval,
            known,
            running: Arc::new(AtomicBool::new(false)),
            scan_count: Arc::new(AtomicU64::new(0)),
            event_count: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Hash every document in the corpus, skipping unreadable files.
    fn snapshot(&self) -> Result<Vec<(String, String)>> {
        let mut current = Vec::new();
        for rel in self.corpus.scan()? {
            match self.corpus.hash(&rel) {
                Ok(hash) => current.push((rel_key(&rel), hash)),
                Err(e) => warn!("Skipping unreadable document {}: {e}", rel.display()),
            }
        }
        Ok(current)
    }
}

#[async_trait]
impl CorpusMonitor for PollingMonitor {
    fn name(&self) -> &'static str {
        "polling"
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn status(&self) -> MonitorStatus {
        if self.is_running() {
            MonitorStatus::running(
                self.scan_count.load(Ordering::SeqCst),
                self.event_count.load(Ordering::SeqCst),
            )
        } else {
            MonitorStatus::stopped()
        }
    }

    async fn run(&mut self, tx: mpsc::Sender<ScanEvent>) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::monitor_start(self.name(), "already running"));
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if !self.running.load(Ordering::SeqCst) {
                break;
            }

            let current = match self.snapshot() {
                Ok(current) => current,
                Err(e) => {
                    // The corpus root may appear later; keep polling.
                    warn!("Rescan failed: {e}");
                    continue;
                }
            };
            self.scan_count.fetch_add(1, Ordering::SeqCst);

            for (path, kind) in diff_scan(&self.known, &current) {
                match self.corpus.load(Path::new(&path)) {
                    Ok(document) => {
                        debug!("{kind}: {path}");
                        if tx.send(ScanEvent { kind, document }).await.is_err() {
                            // Receiver gone; shut down cleanly.
                            self.running.store(false, Ordering::SeqCst);
                            return Ok(());
                        }
                        self.event_count.fetch_add(1, Ordering::SeqCst);
                    }
                    Err(e) => warn!("Skipping unparseable document {path}: {e}"),
                }
            }

            self.known = current.into_iter().collect();
        }

        Ok(())
    }

    fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_root(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clipdex_watch_{label}_{}", std::process::id()))
    }

    fn write_doc(root: &Path, rel: &str, title: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().expect("rel path has a parent"))
            .expect("create fixture dirs");
        std::fs::write(
            path,
            format!("```yaml\ntitle: {title}\nsource: https://example.dev/{title}\n```\n\nBody.\n"),
        )
        .expect("write fixture");
    }

    fn pair(path: &str, hash: &str) -> (String, String) {
        (path.to_string(), hash.to_string())
    }

    #[test]
    fn test_diff_scan_added() {
        let known = HashMap::new();
        let current = vec![pair("2024/a.md", "h1")];
        let events = diff_scan(&known, &current);
        assert_eq!(events, vec![("2024/a.md".to_string(), ScanEventKind::Added)]);
    }

    #[test]
    fn test_diff_scan_changed() {
        let known: HashMap<String, String> =
            std::iter::once(pair("2024/a.md", "h1")).collect();
        let current = vec![pair("2024/a.md", "h2")];
        let events = diff_scan(&known, &current);
        assert_eq!(
            events,
            vec![("2024/a.md".to_string(), ScanEventKind::Changed)]
        );
    }

    #[test]
    fn test_diff_scan_unchanged() {
        let known: HashMap<String, String> =
            std::iter::once(pair("2024/a.md", "h1")).collect();
        let current = vec![pair("2024/a.md", "h1")];
        assert!(diff_scan(&known, &current).is_empty());
    }

    #[test]
    fn test_diff_scan_ignores_deletions() {
        let known: HashMap<String, String> =
            std::iter::once(pair("2024/gone.md", "h1")).collect();
        let current = vec![];
        assert!(diff_scan(&known, &current).is_empty());
    }

    #[test]
    fn test_monitor_status_constructors() {
        let stopped = MonitorStatus::stopped();
        assert!(!stopped.is_running);
        assert_eq!(stopped.scan_count, 0);

        let running = MonitorStatus::running(3, 7);
        assert!(running.is_running);
        assert_eq!(running.scan_count, 3);
        assert_eq!(running.event_count, 7);
    }

    #[test]
    fn test_scan_event_kind_display() {
        assert_eq!(ScanEventKind::Added.to_string(), "added");
        assert_eq!(ScanEventKind::Changed.to_string(), "changed");
    }

    #[test]
    fn test_monitor_initial_state() {
        let monitor = PollingMonitor::new(
            Corpus::new("/nonexistent"),
            Duration::from_millis(10),
            HashMap::new(),
        );
        assert_eq!(monitor.name(), "polling");
        assert!(!monitor.is_running());
        assert_eq!(monitor.status(), MonitorStatus::stopped());
    }

    #[tokio::test]
    async fn test_polling_monitor_emits_added_and_changed() {
        let root = scratch_root("emit");
        let _ = std::fs::remove_dir_all(&root);
        write_doc(&root, "2024/2024-05-21_backend_first.md", "First");

        let mut monitor = PollingMonitor::new(
            Corpus::new(&root),
            Duration::from_millis(10),
            HashMap::new(),
        );
        let (tx, mut rx) = mpsc::channel(16);
        let handle = tokio::spawn(async move { monitor.run(tx).await });

        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for added event")
            .expect("channel closed early");
        assert_eq!(event.kind, ScanEventKind::Added);
        assert_eq!(event.document.frontmatter.title, "First");

        write_doc(&root, "2024/2024-05-21_backend_first.md", "First revised");
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for changed event")
            .expect("channel closed early");
        assert_eq!(event.kind, ScanEventKind::Changed);
        assert_eq!(event.document.frontmatter.title, "First revised");

        // Dropping the receiver shuts the monitor down cleanly.
        drop(rx);
        write_doc(&root, "2024/2024-05-22_backend_second.md", "Second");
        let result = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("monitor did not shut down")
            .expect("monitor task panicked");
        assert!(result.is_ok());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[tokio::test]
    async fn test_seeded_hashes_suppress_initial_events() {
        let root = scratch_root("seeded");
        let _ = std::fs::remove_dir_all(&root);
        write_doc(&root, "2024/2024-05-21_backend_first.md", "First");

        let corpus = Corpus::new(&root);
        let hash = corpus
            .hash(Path::new("2024/2024-05-21_backend_first.md"))
            .unwrap();
        let known: HashMap<String, String> =
            std::iter::once(pair("2024/2024-05-21_backend_first.md", &hash)).collect();

        let mut monitor = PollingMonitor::new(corpus, Duration::from_millis(10), known);
        let (tx, mut rx) = mpsc::channel(16);
        let handle = tokio::spawn(async move { monitor.run(tx).await });

        // Nothing new: the seeded document must not be re-emitted.
        let outcome = tokio::time::timeout(Duration::from_millis(200), rx.recv()).await;
        assert!(outcome.is_err(), "unexpected event for a seeded document");

        write_doc(&root, "2024/2024-05-22_backend_second.md", "Second");
        let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for added event")
            .expect("channel closed early");
        assert_eq!(event.kind, ScanEventKind::Added);

        drop(rx);
        write_doc(&root, "2024/2024-05-23_backend_third.md", "Third");
        let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_stop_before_run() {
        let mut monitor = PollingMonitor::new(
            Corpus::new("/nonexistent"),
            Duration::from_millis(10),
            HashMap::new(),
        );
        monitor.stop();
        assert!(!monitor.is_running());
    }
}
