//! # OpenSilicon Core
//!
//! Layout data model shared by the OpenSilicon extraction tools: technology
//! layer stack with RC characterization, nets with their pins, and the route
//! segments produced by the router.

pub mod geometry;
pub mod net;
pub mod database;
pub mod layer;
pub mod route;

pub use database::{DatabaseError, LayoutDatabase};
pub use net::{Net, Pin, TerminalKind};
pub use layer::{CutLayer, Layer, LayerId, LayerStack};
pub use geometry::Point;
pub use route::{RoutePoint, RouteSegment};
