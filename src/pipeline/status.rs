//! Load status
//!
//! The externally visible state of one load attempt, and the guard that keeps
//! a finished load from writing into a view that is gone.

use std::cell::Cell;
use std::rc::Rc;

use super::error::{LoadResult, TransitionError};
use crate::table::ChartPoint;

/// What the view shows
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Loaded(Vec<ChartPoint>),
    Failed(String),
}

impl LoadStatus {
    /// Settled status for a pipeline outcome
    pub fn from_result(result: LoadResult<Vec<ChartPoint>>) -> Self {
        match result {
            Ok(points) => LoadStatus::Loaded(points),
            Err(e) => LoadStatus::Failed(e.to_string()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadStatus::Loading)
    }

    pub fn is_settled(&self) -> bool {
        !self.is_loading()
    }

    pub fn data(&self) -> Option<&[ChartPoint]> {
        match self {
            LoadStatus::Loaded(points) => Some(points),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Forward-only state machine for one load attempt.
///
/// `Init -> Loading -> Loaded | Failed`. Before [`LoadTracker::begin`] the
/// tracker reports `Loading`, which is what a freshly mounted view shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadTracker {
    started: bool,
    status: Option<LoadStatus>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Init -> Loading. Fails if a load was already started.
    pub fn begin(&mut self) -> Result<(), TransitionError> {
        if self.started {
            return Err(TransitionError::AlreadyStarted);
        }
        self.started = true;
        self.status = Some(LoadStatus::Loading);
        Ok(())
    }

    /// Loading -> Loaded | Failed
    pub fn settle(&mut self, status: LoadStatus) -> Result<(), TransitionError> {
        match &self.status {
            None => Err(TransitionError::NotStarted),
            Some(current) if current.is_settled() => Err(TransitionError::AlreadySettled),
            Some(_) if status.is_loading() => Err(TransitionError::NotTerminal),
            Some(_) => {
                self.status = Some(status);
                Ok(())
            }
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn status(&self) -> &LoadStatus {
        static LOADING: LoadStatus = LoadStatus::Loading;
        self.status.as_ref().unwrap_or(&LOADING)
    }
}

/// Liveness flag for a mounted view.
///
/// Clones share the flag; once any clone calls [`MountGuard::release`] every
/// clone reports unmounted.
#[derive(Debug, Clone)]
pub struct MountGuard {
    mounted: Rc<Cell<bool>>,
}

impl MountGuard {
    pub fn new() -> Self {
        Self {
            mounted: Rc::new(Cell::new(true)),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn release(&self) {
        self.mounted.set(false);
    }

    /// Run `f` only while still mounted. Returns whether it ran.
    pub fn if_mounted(&self, f: impl FnOnce()) -> bool {
        if self.is_mounted() {
            f();
            true
        } else {
            tracing::debug!("View unmounted, dropping late update");
            false
        }
    }
}

impl Default for MountGuard {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::LoadError;

    #[test]
    fn test_initial_status_is_loading() {
        let tracker = LoadTracker::new();
        assert!(!tracker.is_started());
        assert_eq!(tracker.status(), &LoadStatus::Loading);
    }

    #[test]
    fn test_begin_once() {
        let mut tracker = LoadTracker::new();
        tracker.begin().unwrap();
        assert_eq!(tracker.begin(), Err(TransitionError::AlreadyStarted));
    }

    #[test]
    fn test_settle_requires_begin() {
        let mut tracker = LoadTracker::new();
        assert_eq!(
            tracker.settle(LoadStatus::Failed("x".into())),
            Err(TransitionError::NotStarted)
        );
    }

    #[test]
    fn test_settle_rejects_loading() {
        let mut tracker = LoadTracker::new();
        tracker.begin().unwrap();

        assert_eq!(
            tracker.settle(LoadStatus::Loading),
            Err(TransitionError::NotTerminal)
        );
        assert!(tracker.status().is_loading());

        tracker.settle(LoadStatus::Failed("x".into())).unwrap();
        assert_eq!(tracker.status().error(), Some("x"));
    }

    #[test]
    fn test_settled_is_terminal() {
        let mut tracker = LoadTracker::new();
        tracker.begin().unwrap();
        tracker
            .settle(LoadStatus::Loaded(vec![ChartPoint::new().with("x", 1.0)]))
            .unwrap();

        assert_eq!(
            tracker.settle(LoadStatus::Failed("late".into())),
            Err(TransitionError::AlreadySettled)
        );
        assert!(tracker.status().data().is_some());
        assert!(tracker.status().error().is_none());
    }

    #[test]
    fn test_status_from_result() {
        let failed = LoadStatus::from_result(Err(LoadError::Lookup("t".into())));
        assert_eq!(failed.error(), Some("Table not found: t"));
        assert!(failed.data().is_none());

        let loaded = LoadStatus::from_result(Ok(Vec::new()));
        assert_eq!(loaded.data(), Some(&[][..]));
        assert!(!loaded.is_loading());
    }

    #[test]
    fn test_mount_guard_shared_release() {
        let guard = MountGuard::new();
        let clone = guard.clone();
        let mut hits = 0;

        assert!(clone.if_mounted(|| hits += 1));
        guard.release();
        assert!(!clone.if_mounted(|| hits += 1));
        assert_eq!(hits, 1);
    }
}
