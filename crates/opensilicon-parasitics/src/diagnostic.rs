use opensilicon_core::RouteSegment;
use serde::{Deserialize, Serialize};

/// Severity level of a build diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Info,
}

/// Kind of inconsistency found in a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// Nonzero length across two layers: neither a wire nor a via.
    NonWireNonVia,
    /// Both endpoints are the same location on the same layer.
    DegenerateSegment,
}

/// A problem found while building one net, attributed to that net.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub net: String,
    /// Position of the offending segment in the route.
    pub segment_index: usize,
    pub segment: RouteSegment,
    pub message: String,
}

impl Diagnostic {
    pub fn non_wire_non_via(net: &str, segment_index: usize, segment: RouteSegment) -> Self {
        Self {
            kind: DiagnosticKind::NonWireNonVia,
            severity: Severity::Warning,
            net: net.to_string(),
            segment_index,
            segment,
            message: format!("non wire or via route found on net {}: {}", net, segment),
        }
    }

    pub fn degenerate(net: &str, segment_index: usize, segment: RouteSegment) -> Self {
        Self {
            kind: DiagnosticKind::DegenerateSegment,
            severity: Severity::Info,
            net: net.to_string(),
            segment_index,
            segment,
            message: format!("zero-length route segment on net {}: {}", net, segment),
        }
    }
}
