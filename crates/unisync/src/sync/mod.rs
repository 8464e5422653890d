//! Cross-portal sync routines.
//!
//! Each connector is a one-shot, one-directional diff-and-copy: records in
//! the source collection whose id is missing from the target are converted
//! and appended in source order. Existing target records are never touched,
//! so running a connector twice with no new source records writes nothing.

pub mod assignments;
pub mod submissions;

use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::config::SyncConfig;
use crate::error::Result;
use crate::model::Record;
use crate::portal::{FacultyStore, StudentStore};

pub use assignments::{pending_assignments, sync_assignments};
pub use submissions::{pending_submissions, sync_submissions};

/// Knobs for a sync run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Add one notification per synced record to the receiving portal.
    pub notify: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self { notify: true }
    }
}

impl From<&SyncConfig> for SyncOptions {
    fn from(config: &SyncConfig) -> Self {
        Self {
            notify: config.notify,
        }
    }
}

/// Outcome of one connector run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Ids copied into the target collection, in the order they were added.
    pub synced_ids: Vec<String>,
    /// Notifications written for the copied records.
    pub notifications: usize,
}

impl SyncReport {
    /// Number of records copied.
    #[must_use]
    pub fn synced(&self) -> usize {
        self.synced_ids.len()
    }

    /// Whether the run changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.synced_ids.is_empty()
    }
}

/// Outcome of [`auto_sync`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoSyncReport {
    /// Faculty to student assignments.
    pub assignments: SyncReport,
    /// Student to faculty submissions.
    pub submissions: SyncReport,
}

/// Source records whose id does not appear in `target`, in source order.
fn missing_by_id<'a, S: Record, T: Record>(source: &'a [S], target: &[T]) -> Vec<&'a S> {
    let known: HashSet<&str> = target.iter().map(|r| r.id()).collect();
    source.iter().filter(|r| !known.contains(r.id())).collect()
}

/// Run both connectors.
///
/// # Errors
///
/// Returns the first storage error encountered. Assignments are synced
/// before submissions.
pub fn auto_sync(
    faculty: &FacultyStore,
    student: &StudentStore,
    options: SyncOptions,
) -> Result<AutoSyncReport> {
    let report = AutoSyncReport {
        assignments: sync_assignments(faculty, student, options)?,
        submissions: sync_submissions(student, faculty, options)?,
    };
    info!(
        "Auto-sync complete: {} assignments, {} submissions",
        report.assignments.synced(),
        report.submissions.synced()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::kv::JsonStore;
    use crate::model::EnrolledCourse;

    fn course(id: &str) -> EnrolledCourse {
        EnrolledCourse {
            id: id.to_string(),
            code: "X".to_string(),
            name: "X".to_string(),
            instructor: "X".to_string(),
            credits: 1,
        }
    }

    #[test]
    fn test_missing_by_id_keeps_source_order() {
        let source = vec![course("3"), course("1"), course("2")];
        let target = vec![course("1")];
        let ids: Vec<_> = missing_by_id(&source, &target)
            .into_iter()
            .map(|c| c.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "2"]);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        assert!(SyncOptions::from(&config.sync).notify);
        config.sync.notify = false;
        assert!(!SyncOptions::from(&config.sync).notify);
    }

    #[test]
    fn test_auto_sync_on_empty_store() {
        let store = JsonStore::in_memory();
        let report = auto_sync(
            &FacultyStore::new(store.clone()),
            &StudentStore::new(store.clone()),
            SyncOptions::default(),
        )
        .unwrap();
        assert!(report.assignments.is_empty());
        assert!(report.submissions.is_empty());
        assert!(store.keys().unwrap().is_empty());
    }
}
