use std::collections::HashSet;
use std::path::Path;

use opensilicon_core::RouteSegment;
use serde::{Deserialize, Serialize};

use crate::error::{parse_json, read_file, write_file, IoError, Result};

/// The routed segments of one net.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetRoute {
    pub net: String,
    #[serde(default)]
    pub segments: Vec<RouteSegment>,
}

/// Router output for a design.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteFile {
    pub nets: Vec<NetRoute>,
}

impl RouteFile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = read_file(path)?;
        let routes: Self = parse_json(path, &text)?;
        routes.check_unique()?;
        log::debug!("loaded routes for {} nets from {}", routes.nets.len(), path.display());
        Ok(routes)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        write_file(path, &json)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let routes: Self = serde_json::from_str(json).map_err(IoError::Parse)?;
        routes.check_unique()?;
        Ok(routes)
    }

    pub fn add(&mut self, net: &str, segments: Vec<RouteSegment>) {
        self.nets.push(NetRoute {
            net: net.to_string(),
            segments,
        });
    }

    pub fn segments(&self, net: &str) -> Option<&[RouteSegment]> {
        self.nets
            .iter()
            .find(|r| r.net == net)
            .map(|r| r.segments.as_slice())
    }

    /// Segments of `net`; a net without a route is an error.
    pub fn require(&self, net: &str) -> Result<&[RouteSegment]> {
        self.segments(net)
            .ok_or_else(|| IoError::MissingRoute(net.to_string()))
    }

    fn check_unique(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for route in &self.nets {
            if !seen.insert(route.net.as_str()) {
                return Err(IoError::DuplicateRoute(route.net.clone()));
            }
        }
        Ok(())
    }
}
