//! Snapshot history
//!
//! Snapshots are byte-exact copies stored as
//! `<parent>/<marker>/<filename>/<YYYYmmdd.HHMMSS>.<filename>`, so sorting by
//! file name orders them by time.
//!
//! History never commits on its own after construction. The session owner
//! calls [`SnapshotHistory::commit`] immediately before every operation that
//! may mutate the file, which guarantees at least one snapshot per distinct
//! state observed before a mutation.

use chrono::{Local, NaiveDateTime};
use mender_core::fs::{atomic_write, read_bytes};
use mender_core::{Error, IoContext, Result, unified_diff};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default marker directory created next to the tracked file.
pub const HISTORY_DIR: &str = ".time_machine";

/// Snapshot identifiers: local time at second resolution.
pub const SNAPSHOT_ID_FORMAT: &str = "%Y%m%d.%H%M%S";

const DIFF_CONTEXT: usize = 3;

/// One stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Snapshot {
    /// Time-derived identifier, e.g. `20261019.142501`.
    pub id: String,
    pub path: PathBuf,
}

impl Snapshot {
    pub fn read(&self) -> Result<Vec<u8>> {
        read_bytes(&self.path)
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotHistory {
    file_path: PathBuf,
    file_name: String,
    snapshots_dir: PathBuf,
}

impl SnapshotHistory {
    /// Track `file_path` with the default marker directory.
    pub fn new(file_path: &Path) -> Result<Self> {
        Self::with_marker(file_path, HISTORY_DIR)
    }

    /// Track `file_path`, storing snapshots under `<parent>/<marker>/<filename>/`.
    /// Fails if the path is missing or not a regular file; otherwise performs
    /// the initial commit.
    pub fn with_marker(file_path: &Path, marker: &str) -> Result<Self> {
        if !file_path.exists() {
            return Err(Error::not_found(format!("Path {} does not exist", file_path.display())));
        }
        if !file_path.is_file() {
            return Err(Error::invalid(format!("Path {} is not a file", file_path.display())));
        }

        let file_path = file_path.canonicalize().with_path(file_path)?;
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::invalid(format!("Path {} has no file name", file_path.display())))?;
        let parent = file_path.parent().unwrap_or_else(|| Path::new("/"));
        let snapshots_dir = parent.join(marker).join(&file_name);
        std::fs::create_dir_all(&snapshots_dir).with_path(&snapshots_dir)?;

        let history = SnapshotHistory {
            file_path,
            file_name,
            snapshots_dir,
        };
        history.try_commit()?;
        Ok(history)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn snapshots_dir(&self) -> &Path {
        &self.snapshots_dir
    }

    /// All snapshots, oldest first.
    pub fn snapshots(&self) -> Vec<Snapshot> {
        match self.try_snapshots() {
            Ok(snapshots) => snapshots,
            Err(e) => {
                tracing::error!("Cannot list snapshots: {}", e);
                Vec::new()
            }
        }
    }

    fn try_snapshots(&self) -> Result<Vec<Snapshot>> {
        let suffix = format!(".{}", self.file_name);
        let mut snapshots = Vec::new();

        for entry in std::fs::read_dir(&self.snapshots_dir).with_path(&self.snapshots_dir)? {
            let path = entry.with_path(&self.snapshots_dir)?.path();
            if !path.is_file() {
                continue;
            }
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
            let id = name.as_deref().and_then(|n| n.strip_suffix(suffix.as_str()));
            if let Some(id) = id.filter(|id| parse_id(id).is_some()) {
                snapshots.push(Snapshot {
                    id: id.to_string(),
                    path,
                });
            }
        }

        snapshots.sort();
        Ok(snapshots)
    }

    pub fn last_snapshot(&self) -> Option<Snapshot> {
        self.snapshots().pop()
    }

    /// True iff the current bytes equal the newest snapshot's bytes.
    pub fn is_committed(&self) -> bool {
        let Some(last) = self.last_snapshot() else {
            return false;
        };
        match (read_bytes(&self.file_path), last.read()) {
            (Ok(current), Ok(stored)) => current == stored,
            _ => false,
        }
    }

    /// Snapshot the file if it differs from the newest snapshot. Failures are
    /// logged rather than returned; see [`Self::try_commit`].
    pub fn commit(&self) -> Option<Snapshot> {
        match self.try_commit() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Snapshot commit failed for {}: {}", self.file_path.display(), e);
                None
            }
        }
    }

    /// Snapshot the file if it differs from the newest snapshot. Returns the
    /// new snapshot, or `None` when the content was already committed.
    pub fn try_commit(&self) -> Result<Option<Snapshot>> {
        let current = read_bytes(&self.file_path)?;
        let newest = self.try_snapshots()?.pop();
        if let Some(last) = &newest {
            if last.read()? == current {
                return Ok(None);
            }
        }

        let snapshot = self.new_snapshot(newest.as_ref())?;
        atomic_write(&snapshot.path, &current)?;
        tracing::info!("Committed snapshot {} of {}", snapshot.id, self.file_name);
        Ok(Some(snapshot))
    }

    /// A snapshot slot whose id sorts after `newest`. Identifiers have
    /// second resolution, so a same-second collision waits for the next
    /// second. If the clock is behind `newest` (clock step, DST fall-back),
    /// the id continues one second after `newest` instead.
    fn new_snapshot(&self, newest: Option<&Snapshot>) -> Result<Snapshot> {
        loop {
            let id = Local::now().format(SNAPSHOT_ID_FORMAT).to_string();
            let Some(last) = newest else {
                return Ok(self.slot(id));
            };

            if id > last.id {
                return Ok(self.slot(id));
            }
            if id == last.id {
                tracing::debug!("Snapshot {} already exists, waiting", id);
                std::thread::sleep(Duration::from_secs(1));
                continue;
            }

            let next = parse_id(&last.id)
                .and_then(|t| t.checked_add_signed(chrono::Duration::seconds(1)))
                .ok_or_else(|| Error::invalid(format!("Cannot order after snapshot {}", last.id)))?
                .format(SNAPSHOT_ID_FORMAT)
                .to_string();
            tracing::warn!(
                "Clock is behind newest snapshot {} (now {}), using {}",
                last.id,
                id,
                next
            );
            return Ok(self.slot(next));
        }
    }

    fn slot(&self, id: String) -> Snapshot {
        let path = self.snapshots_dir.join(format!("{id}.{}", self.file_name));
        Snapshot { id, path }
    }

    /// Unified diff from the newest snapshot to the current content. Empty
    /// when nothing changed or there is no snapshot yet.
    pub fn diff(&self) -> String {
        let current = match read_bytes(&self.file_path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                tracing::error!("Cannot read {}: {}", self.file_path.display(), e);
                return String::new();
            }
        };
        let previous = match self.last_snapshot().map(|s| s.read()) {
            Some(Ok(bytes)) => String::from_utf8_lossy(&bytes).into_owned(),
            Some(Err(e)) => {
                tracing::error!("Cannot read latest snapshot: {}", e);
                return String::new();
            }
            None => current.clone(),
        };
        diff_text(&previous, &current)
    }

    /// Unified diff from snapshot `id` to the current content.
    pub fn diff_from(&self, id: &str) -> Result<String> {
        let snapshot = self.find(id)?;
        let previous = String::from_utf8_lossy(&snapshot.read()?).into_owned();
        let current = String::from_utf8_lossy(&read_bytes(&self.file_path)?).into_owned();
        Ok(diff_text(&previous, &current))
    }

    fn find(&self, id: &str) -> Result<Snapshot> {
        self.snapshots()
            .into_iter()
            .find(|s| s.id == id)
            .ok_or_else(|| Error::not_found(format!("Snapshot not found: {id}")))
    }

    /// Replace the file with the content of snapshot `id`. The current
    /// content is committed first so the restore itself can be undone.
    pub fn restore(&self, id: &str) -> Result<Snapshot> {
        let snapshot = self.find(id)?;
        self.try_commit()?;
        let bytes = snapshot.read()?;
        atomic_write(&self.file_path, &bytes)?;
        tracing::info!("Restored {} from snapshot {}", self.file_name, snapshot.id);
        Ok(snapshot)
    }
}

fn parse_id(id: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(id, SNAPSHOT_ID_FORMAT).ok()
}

fn diff_text(previous: &str, current: &str) -> String {
    let old: Vec<&str> = previous.lines().collect();
    let new: Vec<&str> = current.lines().collect();
    unified_diff(&old, &new, DIFF_CONTEXT, "Old", "New")
}
