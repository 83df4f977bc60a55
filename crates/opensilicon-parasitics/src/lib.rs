//! # OpenSilicon Parasitics
//!
//! Turns a routed net into a raw RC parasitic network inside an external
//! electrical-modeling engine, then asks that engine to reduce it to a delay
//! model for the active timing corner.
//!
//! Every pin gets a stub from its exact location to the grid point the router
//! snapped it to; every route segment becomes a wire or via edge. Nodes are
//! identified by `(x, y, layer)` through a per-build [`LocationKeyRegistry`].
//! The engine is reached only through the [`ParasiticEngine`] trait;
//! [`memory::InMemoryEngine`] is an in-process implementation of it.

pub mod analysis;
pub mod builder;
pub mod config;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod memory;
pub mod reduce;
pub mod registry;
pub mod report;
pub mod segment;
mod session;
pub mod stub;
pub mod tech;

pub use analysis::{AnalysisContext, Corner, MinMax, OperatingConditions, ReductionKind};
pub use builder::NetParasiticBuilder;
pub use config::{AnomalyPolicy, BuilderConfig};
pub use diagnostic::{Diagnostic, DiagnosticKind, Severity};
pub use engine::ParasiticEngine;
pub use error::{EngineError, EngineOp, ParasiticsError, Result, TechError};
pub use reduce::ReductionInvoker;
pub use registry::{LocationKey, LocationKeyRegistry};
pub use report::BuildReport;
pub use segment::{SegmentClassifier, SegmentKind};
pub use stub::PinStubBuilder;
pub use tech::{wire_rc, LayerRc, RcTechnology, RcValues};
