//! Route model
//!
//! A route assigns one driver to one collection point. It carries the
//! driver's visiting position (`order_number`), the slot derived from that
//! position and a lifecycle status with the timestamps that depend on it.
//!
//! The scheduling and status rules live here as plain functions so that the
//! Postgres and in-memory repositories apply exactly the same arithmetic.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use thiserror::Error;

/// Hour of the first slot of the day
pub const FIRST_SLOT_HOUR: i64 = 8;

/// Minutes between two consecutive slots of the same driver
pub const SLOT_MINUTES: i64 = 10;

/// Lifecycle status of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteStatus {
    Pending,
    InProgress,
    Completed,
    Problem,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown route status '{0}'")]
pub struct UnknownRouteStatus(pub String);

impl RouteStatus {
    pub const ALL: [RouteStatus; 5] = [
        RouteStatus::Pending,
        RouteStatus::InProgress,
        RouteStatus::Completed,
        RouteStatus::Problem,
        RouteStatus::Skipped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteStatus::Pending => "pending",
            RouteStatus::InProgress => "in_progress",
            RouteStatus::Completed => "completed",
            RouteStatus::Problem => "problem",
            RouteStatus::Skipped => "skipped",
        }
    }

    /// Whether entering this status means the driver reached the point.
    /// The first such transition stamps `visited_at`.
    pub fn is_visit(&self) -> bool {
        matches!(
            self,
            RouteStatus::InProgress | RouteStatus::Completed | RouteStatus::Problem
        )
    }

    /// Whether entering this status stamps `completed_at`
    pub fn is_completion(&self) -> bool {
        *self == RouteStatus::Completed
    }
}

impl fmt::Display for RouteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteStatus {
    type Err = UnknownRouteStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RouteStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownRouteStatus(s.to_string()))
    }
}

/// Point fields embedded in a driver's route listing
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePoint {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub id: i32,
    pub driver_id: i32,
    pub point_id: i32,
    pub order_number: i32,
    pub scheduled_at: NaiveDateTime,
    pub status: RouteStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub visited_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    pub point: Option<RoutePoint>,
}

impl Route {
    /// Applies a status transition at instant `now`.
    ///
    /// `completed_at` is overwritten on every transition into `completed` and
    /// never cleared; `visited_at` is only ever set once.
    pub fn apply_status(&mut self, status: RouteStatus, now: DateTime<Utc>) {
        self.status = status;
        if status.is_completion() {
            self.completed_at = Some(now);
        }
        if status.is_visit() && self.visited_at.is_none() {
            self.visited_at = Some(now);
        }
    }
}

/// Next visiting position for a driver whose highest position is `current_max`
pub fn next_order_number(current_max: Option<i32>) -> i32 {
    current_max.unwrap_or(0).max(0) + 1
}

/// Slot of the `order_number`-th stop on `day`: 08:00, then every ten minutes
pub fn scheduled_at(order_number: i32, day: NaiveDate) -> NaiveDateTime {
    let offset = SLOT_MINUTES * (i64::from(order_number) - 1);
    day.and_time(NaiveTime::MIN) + Duration::hours(FIRST_SLOT_HOUR) + Duration::minutes(offset)
}

/// Day that new assignments are scheduled on
pub fn schedule_day() -> NaiveDate {
    Local::now().date_naive()
}
