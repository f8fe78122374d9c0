//! Domain models
//!
//! Drivers, collection points and the routes linking them, plus the rules for
//! scheduling new routes and transitioning their status.

pub mod assignment;
pub mod collection_point;
pub mod driver;
pub mod route;

pub use assignment::{AssignmentFailure, AssignmentReport, DriverSetDiff};
pub use collection_point::{CollectionPoint, PointDraft, PointWrite};
pub use driver::Driver;
pub use route::{Route, RoutePoint, RouteStatus};
