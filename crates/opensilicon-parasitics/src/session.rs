use crate::analysis::AnalysisContext;
use crate::engine::ParasiticEngine;
use crate::error::EngineError;
use crate::registry::{LocationKey, LocationKeyRegistry};
use crate::report::BuildReport;
use crate::tech::RcValues;

/// Mutable state of one net's build. Created after the network is opened and
/// torn down before it is reduced.
pub(crate) struct BuildSession<'a, E: ParasiticEngine> {
    pub engine: &'a mut E,
    pub network: E::Network,
    pub net_id: E::NetId,
    pub net_name: &'a str,
    pub context: &'a AnalysisContext,
    pub registry: LocationKeyRegistry<E::Node>,
    pub report: BuildReport,
}

impl<'a, E: ParasiticEngine> BuildSession<'a, E> {
    pub fn ensure_node(&mut self, key: LocationKey) -> Result<E::Node, EngineError> {
        let engine = &mut *self.engine;
        let network = &self.network;
        let net_id = &self.net_id;
        self.registry
            .ensure_node(key, |id| engine.ensure_internal_node(network, net_id, id))
    }

    pub fn ensure_grid_node(&mut self, key: LocationKey) -> Result<E::Node, EngineError> {
        let engine = &mut *self.engine;
        let network = &self.network;
        let net_id = &self.net_id;
        self.registry
            .ensure_grid_node(key, |id| engine.ensure_internal_node(network, net_id, id))
    }

    /// Insert an edge: half the capacitance on each end and the resistor
    /// between them. Stubs, wires and vias all go through here.
    pub fn connect(&mut self, a: E::Node, b: E::Node, rc: RcValues) -> Result<(), EngineError> {
        let half = rc.capacitance / 2.0;
        self.engine.increment_capacitance(a, half, self.context)?;
        self.engine.add_resistor(a, b, rc.resistance, self.context)?;
        self.engine.increment_capacitance(b, half, self.context)?;
        log::debug!(
            "{:?} -> {:?} r={:.4e} c={:.4e}",
            a,
            b,
            rc.resistance,
            rc.capacitance
        );
        self.report.record_edge(rc);
        Ok(())
    }
}
