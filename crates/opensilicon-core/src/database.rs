use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::layer::LayerStack;
use crate::net::Net;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Net '{0}' is already defined")]
    DuplicateNet(String),

    #[error("Invalid database unit scale: {0} dbu per micron")]
    InvalidDbuScale(f64),
}

/// The layout database: technology layer stack plus the nets to be extracted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDatabase {
    /// Database identifier.
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Design name.
    pub name: String,
    /// Technology layers.
    pub layer_stack: LayerStack,
    /// Nets in insertion order.
    #[serde(default)]
    nets: Vec<Net>,
    /// Database units per micron.
    pub dbu_per_um: f64,
}

impl LayoutDatabase {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            layer_stack: LayerStack::new(),
            nets: Vec::new(),
            dbu_per_um: 1000.0,
        }
    }

    // ── Net management ───────────────────────────────────────────────

    pub fn add_net(&mut self, net: Net) -> Result<(), DatabaseError> {
        if self.find_net(&net.name).is_some() {
            return Err(DatabaseError::DuplicateNet(net.name));
        }
        log::trace!("net {} added with {} pins", net.name, net.pin_count());
        self.nets.push(net);
        Ok(())
    }

    pub fn find_net(&self, name: &str) -> Option<&Net> {
        self.nets.iter().find(|n| n.name == name)
    }

    pub fn nets(&self) -> &[Net] {
        &self.nets
    }

    pub fn net_names(&self) -> Vec<&str> {
        self.nets.iter().map(|n| n.name.as_str()).collect()
    }

    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    // ── Units ────────────────────────────────────────────────────────

    /// Convert a distance in database units to meters.
    pub fn dbu_to_meters(&self, dbu: i64) -> Result<f64, DatabaseError> {
        if !(self.dbu_per_um > 0.0) {
            return Err(DatabaseError::InvalidDbuScale(self.dbu_per_um));
        }
        Ok(dbu as f64 / self.dbu_per_um * 1.0e-6)
    }

    // ── Serialization ────────────────────────────────────────────────

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
