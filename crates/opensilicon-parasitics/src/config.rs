use serde::{Deserialize, Serialize};

use crate::analysis::ReductionKind;

/// What to do with a route segment that has nonzero length but changes layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyPolicy {
    /// Insert the edge with zero resistance and zero capacitance.
    ZeroValued,
    /// Resolve both endpoints but insert no edge.
    Skip,
    /// Fail the net's build.
    Abort,
}

/// Settings for [`crate::NetParasiticBuilder`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    pub reduction: ReductionKind,
    pub anomaly_policy: AnomalyPolicy,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            reduction: ReductionKind::PiElmore,
            anomaly_policy: AnomalyPolicy::ZeroValued,
        }
    }
}
