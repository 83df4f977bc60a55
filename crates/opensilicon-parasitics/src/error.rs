//! Error types for parasitic network construction.

use std::fmt;

use opensilicon_core::LayerId;
use thiserror::Error;

/// An engine call that can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineOp {
    NetIdentity,
    ResolveTerminal,
    OpenNetwork,
    EnsureNode,
    IncrementCapacitance,
    AddResistor,
    Reduce,
    Release,
    Discard,
}

impl fmt::Display for EngineOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineOp::NetIdentity => "net lookup",
            EngineOp::ResolveTerminal => "terminal lookup",
            EngineOp::OpenNetwork => "open network",
            EngineOp::EnsureNode => "ensure node",
            EngineOp::IncrementCapacitance => "increment capacitance",
            EngineOp::AddResistor => "add resistor",
            EngineOp::Reduce => "reduce network",
            EngineOp::Release => "release network",
            EngineOp::Discard => "discard network",
        };
        f.write_str(name)
    }
}

/// Failure reported by the electrical-modeling engine.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{operation} failed: {message}")]
pub struct EngineError {
    pub operation: EngineOp,
    pub message: String,
}

impl EngineError {
    pub fn new(operation: EngineOp, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Failure looking up technology data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TechError {
    #[error("no RC characterization for routing layer {0}")]
    UnknownLayer(LayerId),

    #[error("no cut layer above routing layer {0}")]
    UnknownCutLayer(LayerId),

    #[error("invalid database unit scale: {0}")]
    InvalidDbuScale(String),
}

#[derive(Error, Debug)]
pub enum ParasiticsError {
    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("technology error: {0}")]
    Technology(#[from] TechError),

    #[error("route segment {index} on net {net} is neither a wire nor a via")]
    AnomalousSegment { net: String, index: usize },
}

pub type Result<T> = std::result::Result<T, ParasiticsError>;
