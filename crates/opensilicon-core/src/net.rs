use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::LayerId;

/// What a pin connects to outside the routed net.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerminalKind {
    /// A boundary port of the top-level design.
    Port { name: String },
    /// A pin on a placed cell instance.
    Instance { instance: String, pin: String },
}

impl TerminalKind {
    pub fn port(name: &str) -> Self {
        TerminalKind::Port {
            name: name.to_string(),
        }
    }

    pub fn instance(instance: &str, pin: &str) -> Self {
        TerminalKind::Instance {
            instance: instance.to_string(),
            pin: pin.to_string(),
        }
    }
}

impl std::fmt::Display for TerminalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TerminalKind::Port { name } => write!(f, "{}", name),
            TerminalKind::Instance { instance, pin } => write!(f, "{}/{}", instance, pin),
        }
    }
}

/// A connection point of a net, with its exact position and the routing grid
/// position the router snapped it to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pin {
    pub terminal: TerminalKind,
    pub position: Point,
    pub on_grid_position: Point,
    /// Highest layer the pin shape reaches; the stub is drawn on this layer.
    pub top_layer: LayerId,
}

impl Pin {
    /// A pin that already sits on the routing grid.
    pub fn new(terminal: TerminalKind, position: Point, top_layer: LayerId) -> Self {
        Self {
            terminal,
            position,
            on_grid_position: position,
            top_layer,
        }
    }

    pub fn with_on_grid_position(mut self, on_grid: Point) -> Self {
        self.on_grid_position = on_grid;
        self
    }

    /// Length of the pin-to-grid stub in database units.
    pub fn stub_length(&self) -> i64 {
        self.position.manhattan_distance(&self.on_grid_position)
    }
}

/// A routed signal net and its pins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    pub name: String,
    pub pins: Vec<Pin>,
}

impl Net {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            pins: Vec::new(),
        }
    }

    pub fn with_pin(mut self, pin: Pin) -> Self {
        self.pins.push(pin);
        self
    }

    pub fn pin_count(&self) -> usize {
        self.pins.len()
    }
}
