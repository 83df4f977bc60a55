use serde::{Deserialize, Serialize};

/// Which extreme of the corner the parasitics are computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinMax {
    /// Best case (hold).
    Min,
    /// Worst case (setup).
    #[default]
    Max,
}

impl std::fmt::Display for MinMax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MinMax::Min => f.write_str("min"),
            MinMax::Max => f.write_str("max"),
        }
    }
}

/// A timing corner (process/voltage/temperature variant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub name: String,
    #[serde(default)]
    pub index: usize,
}

impl Corner {
    pub fn new(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingConditions {
    pub name: String,
    pub process: f64,
    pub voltage: f64,
    pub temperature: f64,
}

/// Equivalent model the raw RC network is reduced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReductionKind {
    #[default]
    PiElmore,
    PiPoleResidue,
}

/// Corner, extreme and operating conditions for one extraction run. Selected
/// once by the caller and handed unchanged to every engine call of a build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisContext {
    pub corner: Corner,
    pub extreme: MinMax,
    #[serde(default)]
    pub operating_conditions: Option<OperatingConditions>,
}

impl AnalysisContext {
    pub fn new(corner: Corner, extreme: MinMax) -> Self {
        Self {
            corner,
            extreme,
            operating_conditions: None,
        }
    }

    pub fn with_operating_conditions(mut self, conditions: OperatingConditions) -> Self {
        self.operating_conditions = Some(conditions);
        self
    }
}
