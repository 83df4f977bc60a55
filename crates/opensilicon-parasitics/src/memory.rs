//! An in-process [`ParasiticEngine`] that keeps raw networks as plain data.
//!
//! Reduction here only records a lumped summary of the network (total R and
//! C, element counts) for the requested corner; it is not a delay model.
//! Every call is journaled, and any operation can be made to fail, so the
//! engine doubles as a harness for the builder's error paths.

use std::collections::{HashMap, HashSet};
use std::fmt;

use opensilicon_core::Net;
use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisContext, MinMax, ReductionKind};
use crate::engine::ParasiticEngine;
use crate::error::{EngineError, EngineOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    network: NetworkId,
    index: usize,
}

/// How a node is named inside its network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeName {
    Terminal(String),
    Internal { net: String, id: u32 },
}

impl NodeName {
    pub fn terminal(name: &str) -> Self {
        NodeName::Terminal(name.to_string())
    }

    pub fn internal(net: &str, id: u32) -> Self {
        NodeName::Internal {
            net: net.to_string(),
            id,
        }
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeName::Terminal(name) => f.write_str(name),
            NodeName::Internal { net, id } => write!(f, "{}:{}", net, id),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RcNode {
    pub name: NodeName,
    /// Capacitance to ground (F).
    pub capacitance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resistor {
    /// Index into [`RcNetwork::nodes`].
    pub a: usize,
    pub b: usize,
    pub ohms: f64,
}

/// A raw parasitic network.
#[derive(Debug, Clone, Serialize)]
pub struct RcNetwork {
    pub net: String,
    pub extreme: MinMax,
    nodes: Vec<RcNode>,
    resistors: Vec<Resistor>,
    #[serde(skip)]
    index: HashMap<NodeName, usize>,
}

impl RcNetwork {
    fn new(net: &str, extreme: MinMax) -> Self {
        Self {
            net: net.to_string(),
            extreme,
            nodes: Vec::new(),
            resistors: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn ensure(&mut self, name: NodeName) -> usize {
        if let Some(&idx) = self.index.get(&name) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(RcNode {
            name: name.clone(),
            capacitance: 0.0,
        });
        self.index.insert(name, idx);
        idx
    }

    pub fn nodes(&self) -> &[RcNode] {
        &self.nodes
    }

    pub fn resistors(&self) -> &[Resistor] {
        &self.resistors
    }

    pub fn node(&self, name: &NodeName) -> Option<&RcNode> {
        self.nodes.iter().find(|n| &n.name == name)
    }

    /// Resistors touching the named node.
    pub fn resistors_at(&self, name: &NodeName) -> Vec<&Resistor> {
        match self.nodes.iter().position(|n| &n.name == name) {
            Some(idx) => self
                .resistors
                .iter()
                .filter(|r| r.a == idx || r.b == idx)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn total_capacitance(&self) -> f64 {
        self.nodes.iter().map(|n| n.capacitance).sum()
    }

    pub fn total_resistance(&self) -> f64 {
        self.resistors.iter().map(|r| r.ohms).sum()
    }
}

/// Lumped summary stored when a network is reduced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedNet {
    pub net: String,
    pub kind: ReductionKind,
    pub corner: String,
    pub extreme: MinMax,
    pub node_count: usize,
    pub resistor_count: usize,
    pub total_resistance: f64,
    pub total_capacitance: f64,
}

/// A journaled engine call.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    OpenNetwork(String),
    EnsureTerminalNode(String),
    EnsureInternalNode(u32),
    IncrementCapacitance { node: String, farads: f64 },
    AddResistor { a: String, b: String, ohms: f64 },
    Reduce(String),
    Release(String),
    Discard(String),
}

#[derive(Debug, Default)]
pub struct InMemoryEngine {
    slots: Vec<Option<RcNetwork>>,
    open: HashMap<String, NetworkId>,
    reduced: HashMap<String, ReducedNet>,
    released: HashMap<String, RcNetwork>,
    keep_released: bool,
    fail_on: HashSet<EngineOp>,
    journal: Vec<EngineCall>,
}

impl InMemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep a copy of every released network for inspection.
    pub fn keeping_released(mut self) -> Self {
        self.keep_released = true;
        self
    }

    /// Make every call of `op` fail.
    pub fn fail_on(mut self, op: EngineOp) -> Self {
        self.fail_on.insert(op);
        self
    }

    pub fn clear_failures(&mut self) {
        self.fail_on.clear();
    }

    /// The open network of `net`, or its released copy.
    pub fn network(&self, net: &str) -> Option<&RcNetwork> {
        self.open
            .get(net)
            .and_then(|id| self.slots[id.0].as_ref())
            .or_else(|| self.released.get(net))
    }

    pub fn reduced(&self, net: &str) -> Option<&ReducedNet> {
        self.reduced.get(net)
    }

    pub fn open_network_count(&self) -> usize {
        self.open.len()
    }

    pub fn journal(&self) -> &[EngineCall] {
        &self.journal
    }

    fn check(&self, op: EngineOp) -> Result<(), EngineError> {
        if self.fail_on.contains(&op) {
            return Err(EngineError::new(op, "injected failure"));
        }
        Ok(())
    }

    fn slot_mut(&mut self, id: NetworkId, op: EngineOp) -> Result<&mut RcNetwork, EngineError> {
        self.slots
            .get_mut(id.0)
            .and_then(|slot| slot.as_mut())
            .ok_or_else(|| EngineError::new(op, "network is not open"))
    }

    fn node_name(&self, node: NodeRef) -> String {
        self.slots
            .get(node.network.0)
            .and_then(|slot| slot.as_ref())
            .and_then(|n| n.nodes.get(node.index))
            .map(|n| n.name.to_string())
            .unwrap_or_else(|| format!("<stale {}>", node.index))
    }

    fn close(&mut self, net: &str, op: EngineOp) -> Result<RcNetwork, EngineError> {
        let id = self
            .open
            .remove(net)
            .ok_or_else(|| EngineError::new(op, format!("no open network for net {}", net)))?;
        self.slots[id.0]
            .take()
            .ok_or_else(|| EngineError::new(op, "network is not open"))
    }
}

impl ParasiticEngine for InMemoryEngine {
    type NetId = String;
    type Terminal = String;
    type Network = NetworkId;
    type Node = NodeRef;

    fn net_identity(&self, net: &Net) -> Result<String, EngineError> {
        self.check(EngineOp::NetIdentity)?;
        Ok(net.name.clone())
    }

    fn port_terminal(&self, name: &str) -> Result<String, EngineError> {
        self.check(EngineOp::ResolveTerminal)?;
        Ok(name.to_string())
    }

    fn instance_terminal(&self, instance: &str, pin: &str) -> Result<String, EngineError> {
        self.check(EngineOp::ResolveTerminal)?;
        Ok(format!("{}/{}", instance, pin))
    }

    fn open_network(
        &mut self,
        net: &String,
        context: &AnalysisContext,
    ) -> Result<NetworkId, EngineError> {
        self.check(EngineOp::OpenNetwork)?;
        if self.open.contains_key(net) {
            return Err(EngineError::new(
                EngineOp::OpenNetwork,
                format!("net {} already has an open network", net),
            ));
        }
        let id = NetworkId(self.slots.len());
        self.slots.push(Some(RcNetwork::new(net, context.extreme)));
        self.open.insert(net.clone(), id);
        self.journal.push(EngineCall::OpenNetwork(net.clone()));
        Ok(id)
    }

    fn ensure_terminal_node(
        &mut self,
        network: &NetworkId,
        terminal: &String,
    ) -> Result<NodeRef, EngineError> {
        self.check(EngineOp::EnsureNode)?;
        let index = self
            .slot_mut(*network, EngineOp::EnsureNode)?
            .ensure(NodeName::Terminal(terminal.clone()));
        self.journal
            .push(EngineCall::EnsureTerminalNode(terminal.clone()));
        Ok(NodeRef {
            network: *network,
            index,
        })
    }

    fn ensure_internal_node(
        &mut self,
        network: &NetworkId,
        net: &String,
        id: u32,
    ) -> Result<NodeRef, EngineError> {
        self.check(EngineOp::EnsureNode)?;
        let index = self
            .slot_mut(*network, EngineOp::EnsureNode)?
            .ensure(NodeName::internal(net, id));
        self.journal.push(EngineCall::EnsureInternalNode(id));
        Ok(NodeRef {
            network: *network,
            index,
        })
    }

    fn increment_capacitance(
        &mut self,
        node: NodeRef,
        farads: f64,
        _context: &AnalysisContext,
    ) -> Result<(), EngineError> {
        self.check(EngineOp::IncrementCapacitance)?;
        let network = self.slot_mut(node.network, EngineOp::IncrementCapacitance)?;
        let rc_node = network.nodes.get_mut(node.index).ok_or_else(|| {
            EngineError::new(EngineOp::IncrementCapacitance, "unknown node")
        })?;
        rc_node.capacitance += farads;
        let name = rc_node.name.to_string();
        self.journal
            .push(EngineCall::IncrementCapacitance { node: name, farads });
        Ok(())
    }

    fn add_resistor(
        &mut self,
        a: NodeRef,
        b: NodeRef,
        ohms: f64,
        _context: &AnalysisContext,
    ) -> Result<(), EngineError> {
        self.check(EngineOp::AddResistor)?;
        if a.network != b.network {
            return Err(EngineError::new(
                EngineOp::AddResistor,
                "nodes belong to different networks",
            ));
        }
        let network = self.slot_mut(a.network, EngineOp::AddResistor)?;
        if a.index >= network.nodes.len() || b.index >= network.nodes.len() {
            return Err(EngineError::new(EngineOp::AddResistor, "unknown node"));
        }
        network.resistors.push(Resistor {
            a: a.index,
            b: b.index,
            ohms,
        });
        let call = EngineCall::AddResistor {
            a: self.node_name(a),
            b: self.node_name(b),
            ohms,
        };
        self.journal.push(call);
        Ok(())
    }

    fn reduce_to(
        &mut self,
        network: &NetworkId,
        net: &String,
        kind: ReductionKind,
        context: &AnalysisContext,
    ) -> Result<(), EngineError> {
        self.check(EngineOp::Reduce)?;
        let raw = self.slot_mut(*network, EngineOp::Reduce)?;
        let summary = ReducedNet {
            net: net.clone(),
            kind,
            corner: context.corner.name.clone(),
            extreme: context.extreme,
            node_count: raw.nodes.len(),
            resistor_count: raw.resistors.len(),
            total_resistance: raw.total_resistance(),
            total_capacitance: raw.total_capacitance(),
        };
        self.reduced.insert(net.clone(), summary);
        self.journal.push(EngineCall::Reduce(net.clone()));
        Ok(())
    }

    fn release_network(
        &mut self,
        net: &String,
        _context: &AnalysisContext,
    ) -> Result<(), EngineError> {
        self.check(EngineOp::Release)?;
        let raw = self.close(net, EngineOp::Release)?;
        if self.keep_released {
            self.released.insert(net.clone(), raw);
        }
        self.journal.push(EngineCall::Release(net.clone()));
        Ok(())
    }

    fn discard_network(
        &mut self,
        net: &String,
        _context: &AnalysisContext,
    ) -> Result<(), EngineError> {
        self.check(EngineOp::Discard)?;
        self.close(net, EngineOp::Discard)?;
        self.journal.push(EngineCall::Discard(net.clone()));
        Ok(())
    }
}
