use opensilicon_core::Net;
use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, Severity};
use crate::tech::RcValues;

/// Summary of one net's build, returned once the network has been reduced
/// and released.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildReport {
    pub net: String,
    pub pins: usize,
    pub segments: usize,
    /// Distinct locations in the registry when reduction was requested.
    pub nodes: usize,
    /// Synthetic node ids issued during the build.
    pub internal_nodes: u32,
    pub resistors: usize,
    /// Sum of all inserted resistor values (ohm).
    pub total_resistance: f64,
    /// Sum of all capacitance added to the network (F).
    pub total_capacitance: f64,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildReport {
    pub fn new(net: &Net, segments: usize) -> Self {
        Self {
            net: net.name.clone(),
            pins: net.pin_count(),
            segments,
            ..Default::default()
        }
    }

    pub(crate) fn record_edge(&mut self, rc: RcValues) {
        self.resistors += 1;
        self.total_resistance += rc.resistance;
        self.total_capacitance += rc.capacitance;
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }
}
