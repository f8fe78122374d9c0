//! Controllers
//!
//! Validate requests, call the repositories and shape the responses.

pub mod driver_controller;
pub mod point_controller;
pub mod route_controller;

pub use driver_controller::DriverController;
pub use point_controller::PointController;
pub use route_controller::RouteController;
