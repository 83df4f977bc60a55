//! The port through which networks are built in an external electrical
//! modeling engine.

use std::fmt::Debug;

use opensilicon_core::Net;

use crate::analysis::{AnalysisContext, ReductionKind};
use crate::error::EngineError;

/// Capability interface of the engine that owns parasitic networks.
///
/// The builder only ever asks the engine to create nodes, add elements,
/// reduce and release. Handles are opaque to the builder; `Node` must be
/// cheap to copy because the location registry hands the same node out many
/// times.
pub trait ParasiticEngine {
    /// The engine's identity for a net.
    type NetId: Clone + Debug;
    /// An external connection point (port or instance pin).
    type Terminal: Debug;
    /// An open raw network.
    type Network: Debug;
    type Node: Copy + Debug;

    fn net_identity(&self, net: &Net) -> Result<Self::NetId, EngineError>;

    fn port_terminal(&self, name: &str) -> Result<Self::Terminal, EngineError>;

    fn instance_terminal(&self, instance: &str, pin: &str) -> Result<Self::Terminal, EngineError>;

    fn open_network(
        &mut self,
        net: &Self::NetId,
        context: &AnalysisContext,
    ) -> Result<Self::Network, EngineError>;

    fn ensure_terminal_node(
        &mut self,
        network: &Self::Network,
        terminal: &Self::Terminal,
    ) -> Result<Self::Node, EngineError>;

    /// Node identified by a per-build synthetic id on `net`.
    fn ensure_internal_node(
        &mut self,
        network: &Self::Network,
        net: &Self::NetId,
        id: u32,
    ) -> Result<Self::Node, EngineError>;

    /// Add `farads` to the node's capacitance to ground.
    fn increment_capacitance(
        &mut self,
        node: Self::Node,
        farads: f64,
        context: &AnalysisContext,
    ) -> Result<(), EngineError>;

    fn add_resistor(
        &mut self,
        a: Self::Node,
        b: Self::Node,
        ohms: f64,
        context: &AnalysisContext,
    ) -> Result<(), EngineError>;

    /// Reduce the raw network to `kind` for the context's corner and extreme.
    fn reduce_to(
        &mut self,
        network: &Self::Network,
        net: &Self::NetId,
        kind: ReductionKind,
        context: &AnalysisContext,
    ) -> Result<(), EngineError>;

    fn release_network(
        &mut self,
        net: &Self::NetId,
        context: &AnalysisContext,
    ) -> Result<(), EngineError>;

    /// Drop a network whose build failed before reduction.
    fn discard_network(
        &mut self,
        net: &Self::NetId,
        context: &AnalysisContext,
    ) -> Result<(), EngineError> {
        self.release_network(net, context)
    }
}
