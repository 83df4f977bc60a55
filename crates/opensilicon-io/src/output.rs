use std::io::Write;

use opensilicon_parasitics::memory::ReducedNet;
use opensilicon_parasitics::BuildReport;
use serde::{Deserialize, Serialize};

use crate::error::{IoError, Result};

/// Result of extracting one net, as written to the result document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetOutcome {
    pub net: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<BuildReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduced: Option<ReducedNet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl NetOutcome {
    pub fn built(report: BuildReport, reduced: Option<ReducedNet>) -> Self {
        Self {
            net: report.net.clone(),
            report: Some(report),
            reduced,
            error: None,
        }
    }

    pub fn failed(net: &str, error: impl std::fmt::Display) -> Self {
        Self {
            net: net.to_string(),
            report: None,
            reduced: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.error.is_some()
    }
}

/// Write the outcomes as a pretty-printed JSON array.
pub fn write_outcomes<W: Write>(mut writer: W, outcomes: &[NetOutcome]) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, outcomes)?;
    writeln!(writer).map_err(|source| IoError::Io {
        path: "<output>".into(),
        source,
    })
}
