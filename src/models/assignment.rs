//! Driver assignment bookkeeping
//!
//! Creating or updating a point assigns a list of drivers to it. Assignment
//! is best-effort per driver: one failing driver is recorded in the report
//! and the others are still assigned.

use std::collections::HashSet;

use crate::models::route::Route;
use crate::utils::errors::AppError;

/// A driver that could not be assigned to a point
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentFailure {
    pub driver_id: i32,
    pub reason: String,
}

/// Per-driver outcome of a batch assignment
#[derive(Debug, Clone, Default)]
pub struct AssignmentReport {
    pub assigned: Vec<Route>,
    pub failed: Vec<AssignmentFailure>,
}

impl AssignmentReport {
    pub fn record_success(&mut self, route: Route) {
        self.assigned.push(route);
    }

    pub fn record_failure(&mut self, driver_id: i32, reason: impl Into<String>) {
        self.failed.push(AssignmentFailure {
            driver_id,
            reason: reason.into(),
        });
    }

    /// Records a failed driver. Store errors are reported generically, the
    /// cause stays in the server log.
    pub fn record_error(&mut self, driver_id: i32, error: &AppError) {
        let reason = match error {
            AppError::NotFound(msg) | AppError::BadRequest(msg) => msg.clone(),
            _ => "could not assign route".to_string(),
        };
        self.record_failure(driver_id, reason);
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Drops repeated driver ids, keeping the first occurrence of each
pub fn dedupe_driver_ids(driver_ids: &[i32]) -> Vec<i32> {
    let mut seen = HashSet::with_capacity(driver_ids.len());
    driver_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Changes needed to move a point from one driver set to another
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DriverSetDiff {
    /// Drivers whose routes to the point are deleted
    pub removed: Vec<i32>,
    /// Drivers that get a new route to the point, in request order
    pub added: Vec<i32>,
}

impl DriverSetDiff {
    pub fn between(current: &[i32], requested: &[i32]) -> Self {
        let requested = dedupe_driver_ids(requested);
        let current_set: HashSet<i32> = current.iter().copied().collect();
        let requested_set: HashSet<i32> = requested.iter().copied().collect();

        let mut removed: Vec<i32> = current_set.difference(&requested_set).copied().collect();
        removed.sort_unstable();

        let added = requested
            .into_iter()
            .filter(|id| !current_set.contains(id))
            .collect();

        Self { removed, added }
    }

    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        assert_eq!(dedupe_driver_ids(&[3, 1, 3, 2, 1]), vec![3, 1, 2]);
        assert!(dedupe_driver_ids(&[]).is_empty());
    }

    #[test]
    fn test_diff_disjoint_sets() {
        let diff = DriverSetDiff::between(&[1, 2], &[3]);
        assert_eq!(diff.removed, vec![1, 2]);
        assert_eq!(diff.added, vec![3]);
    }

    #[test]
    fn test_diff_keeps_retained_drivers() {
        let diff = DriverSetDiff::between(&[1, 2, 5], &[5, 4, 1, 4]);
        assert_eq!(diff.removed, vec![2]);
        assert_eq!(diff.added, vec![4]);
    }

    #[test]
    fn test_diff_unchanged_set_is_empty() {
        assert!(DriverSetDiff::between(&[2, 1], &[1, 2]).is_empty());
        assert!(DriverSetDiff::between(&[], &[]).is_empty());
    }

    #[test]
    fn test_report_tracks_failures() {
        let mut report = AssignmentReport::default();
        assert!(report.is_complete());

        report.record_error(9, &AppError::NotFound("Driver with id '9' not found".to_string()));
        report.record_error(4, &AppError::Database(sqlx::Error::PoolTimedOut));
        assert!(!report.is_complete());
        assert_eq!(report.failed[0].driver_id, 9);
        assert_eq!(report.failed[0].reason, "Driver with id '9' not found");
        assert_eq!(report.failed[1].reason, "could not assign route");
    }
}
