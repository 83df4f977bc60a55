use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::LayerId;

/// One end of a route segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoutePoint {
    pub x: i32,
    pub y: i32,
    pub layer: LayerId,
}

impl RoutePoint {
    pub fn new(x: i32, y: i32, layer: LayerId) -> Self {
        Self { x, y, layer }
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<(i32, i32, LayerId)> for RoutePoint {
    fn from((x, y, layer): (i32, i32, LayerId)) -> Self {
        Self::new(x, y, layer)
    }
}

/// A single wire or via leg of a routed net, as produced by the router.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSegment {
    pub start: RoutePoint,
    pub end: RoutePoint,
}

impl RouteSegment {
    pub fn new(start: impl Into<RoutePoint>, end: impl Into<RoutePoint>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Rectilinear length in database units; layers are ignored.
    pub fn length_dbu(&self) -> i64 {
        self.start.point().manhattan_distance(&self.end.point())
    }

    pub fn is_same_layer(&self) -> bool {
        self.start.layer == self.end.layer
    }

    pub fn lower_layer(&self) -> LayerId {
        self.start.layer.min(self.end.layer)
    }

    pub fn reversed(&self) -> Self {
        Self {
            start: self.end,
            end: self.start,
        }
    }
}

impl std::fmt::Display for RouteSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}) -> ({}, {}, {})",
            self.start.x, self.start.y, self.start.layer, self.end.x, self.end.y, self.end.layer
        )
    }
}
