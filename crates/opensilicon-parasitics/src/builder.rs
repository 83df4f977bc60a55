use opensilicon_core::{Net, RouteSegment};

use crate::analysis::AnalysisContext;
use crate::config::BuilderConfig;
use crate::engine::ParasiticEngine;
use crate::error::{ParasiticsError, Result};
use crate::reduce::{discard_after_failure, ReductionInvoker};
use crate::registry::LocationKeyRegistry;
use crate::report::BuildReport;
use crate::segment::SegmentClassifier;
use crate::session::BuildSession;
use crate::stub::PinStubBuilder;
use crate::tech::RcTechnology;

/// Builds, reduces and releases the parasitic network of one net at a time.
///
/// The builder owns no per-net state: each [`build`](Self::build) starts from
/// a fresh location registry and drops it when the network is handed to the
/// reduction step. Holding the engine by `&mut` keeps a builder to one build
/// at a time; parallel extraction needs one engine per thread.
pub struct NetParasiticBuilder<'a, E, T: ?Sized> {
    engine: &'a mut E,
    tech: &'a T,
    context: AnalysisContext,
    config: BuilderConfig,
}

impl<'a, E, T> NetParasiticBuilder<'a, E, T>
where
    E: ParasiticEngine,
    T: RcTechnology + ?Sized,
{
    pub fn new(engine: &'a mut E, tech: &'a T, context: AnalysisContext) -> Self {
        Self {
            engine,
            tech,
            context,
            config: BuilderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: BuilderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn context(&self) -> &AnalysisContext {
        &self.context
    }

    pub fn config(&self) -> &BuilderConfig {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &*self.engine
    }

    /// Build the network for `net` from its routed segments, then reduce and
    /// release it.
    ///
    /// On any failure after the network has been opened, the raw network is
    /// discarded and neither reduction nor release is requested.
    pub fn build(&mut self, net: &Net, segments: &[RouteSegment]) -> Result<BuildReport> {
        self.check_preconditions(net)?;

        let stubs = PinStubBuilder::new(self.tech);
        let classifier = SegmentClassifier::new(self.tech, self.config.anomaly_policy);
        let invoker = ReductionInvoker::new(self.config.reduction);
        let context = &self.context;

        let net_id = self.engine.net_identity(net)?;
        let network = self.engine.open_network(&net_id, context)?;

        let mut session = BuildSession {
            engine: &mut *self.engine,
            network,
            net_id,
            net_name: &net.name,
            context,
            registry: LocationKeyRegistry::new(),
            report: BuildReport::new(net, segments.len()),
        };

        let populated = stubs
            .attach_all(&mut session, &net.pins)
            .and_then(|()| classifier.attach_all(&mut session, segments));
        if let Err(err) = populated {
            log::error!("parasitics unavailable for net {}: {}", net.name, err);
            discard_after_failure(session.engine, &session.net_id, context);
            return Err(err);
        }

        let BuildSession {
            engine,
            network,
            net_id,
            registry,
            mut report,
            ..
        } = session;
        report.nodes = registry.len();
        report.internal_nodes = registry.ids_issued();

        if let Err(err) = invoker.invoke(engine, network, &net_id, context) {
            log::error!("parasitics unavailable for net {}: {}", net.name, err);
            return Err(err.into());
        }

        log::info!(
            "net {}: {} nodes, {} resistors, {:.4e} F",
            report.net,
            report.nodes,
            report.resistors,
            report.total_capacitance
        );
        Ok(report)
    }

    /// Build several nets in sequence. Each net's outcome is reported on its
    /// own; a failed net does not stop the rest.
    pub fn build_all<'n, I>(&mut self, jobs: I) -> Vec<(String, Result<BuildReport>)>
    where
        I: IntoIterator<Item = (&'n Net, &'n [RouteSegment])>,
    {
        jobs.into_iter()
            .map(|(net, segments)| (net.name.clone(), self.build(net, segments)))
            .collect()
    }

    fn check_preconditions(&self, net: &Net) -> Result<()> {
        if net.name.is_empty() {
            return Err(ParasiticsError::Precondition("net has no name".into()));
        }
        if net.pins.is_empty() {
            return Err(ParasiticsError::Precondition(format!(
                "net {} has no pins",
                net.name
            )));
        }
        if self.context.corner.name.is_empty() {
            return Err(ParasiticsError::Precondition(
                "no timing corner selected".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Corner, MinMax};
    use crate::config::AnomalyPolicy;
    use crate::error::EngineOp;
    use crate::memory::{EngineCall, InMemoryEngine, NodeName};
    use crate::tech::tests::test_tech;
    use opensilicon_core::{Pin, Point, TerminalKind};

    fn context() -> AnalysisContext {
        AnalysisContext::new(Corner::new("tt", 0), MinMax::Max)
    }

    fn two_pin_net(name: &str) -> (Net, Vec<RouteSegment>) {
        let net = Net::new(name)
            .with_pin(Pin::new(TerminalKind::port("in"), Point::new(0, 0), 1))
            .with_pin(Pin::new(TerminalKind::instance("u1", "A"), Point::new(100, 0), 1));
        let segments = vec![RouteSegment::new((0, 0, 1), (100, 0, 1))];
        (net, segments)
    }

    #[test]
    fn test_build_reports_counts() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new();
        let (net, segments) = two_pin_net("n1");
        let report = NetParasiticBuilder::new(&mut engine, &tech, context())
            .build(&net, &segments)
            .unwrap();

        assert_eq!(report.pins, 2);
        assert_eq!(report.segments, 1);
        // Two grid locations; the on-grid pins hand their keys to grid nodes.
        assert_eq!(report.nodes, 2);
        assert_eq!(report.internal_nodes, 2);
        // Two stubs and one wire.
        assert_eq!(report.resistors, 3);
        assert!(report.diagnostics.is_empty());
        assert_eq!(engine.open_network_count(), 0);
    }

    #[test]
    fn test_reduce_and_release_once_in_order() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new();
        let (net, segments) = two_pin_net("n1");
        NetParasiticBuilder::new(&mut engine, &tech, context())
            .build(&net, &segments)
            .unwrap();

        let journal = engine.journal();
        let reduce: Vec<usize> = journal
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, EngineCall::Reduce(_)))
            .map(|(i, _)| i)
            .collect();
        let release: Vec<usize> = journal
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, EngineCall::Release(_)))
            .map(|(i, _)| i)
            .collect();
        assert_eq!(reduce.len(), 1);
        assert_eq!(release.len(), 1);
        assert_eq!(release[0], journal.len() - 1);
        assert_eq!(reduce[0] + 1, release[0]);
        assert_eq!(journal[0], EngineCall::OpenNetwork("n1".to_string()));
    }

    #[test]
    fn test_no_state_leaks_between_builds() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new().keeping_released();
        let (first, first_segments) = two_pin_net("n1");
        let (second, second_segments) = two_pin_net("n2");
        let mut builder = NetParasiticBuilder::new(&mut engine, &tech, context());
        let a = builder.build(&first, &first_segments).unwrap();
        let b = builder.build(&second, &second_segments).unwrap();
        assert_eq!(a.internal_nodes, b.internal_nodes);
        assert_eq!(a.nodes, b.nodes);

        // The second net numbers its internal nodes from zero again.
        let n2 = engine.network("n2").unwrap();
        assert!(n2.node(&NodeName::internal("n2", 0)).is_some());
        assert!(n2.node(&NodeName::internal("n2", 2)).is_none());
    }

    #[test]
    fn test_rebuilding_same_net() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new();
        let (net, segments) = two_pin_net("n1");
        let mut builder = NetParasiticBuilder::new(&mut engine, &tech, context());
        builder.build(&net, &segments).unwrap();
        builder.build(&net, &segments).unwrap();
        assert_eq!(engine.open_network_count(), 0);
    }

    #[test]
    fn test_wire_capacitance_split_evenly() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new().keeping_released();
        let (net, segments) = two_pin_net("n1");
        NetParasiticBuilder::new(&mut engine, &tech, context())
            .build(&net, &segments)
            .unwrap();

        let wire_cap = 2.0e-10 * 1.0e-7;
        let increments: Vec<f64> = engine
            .journal()
            .iter()
            .filter_map(|c| match c {
                EngineCall::IncrementCapacitance { farads, .. } => Some(*farads),
                _ => None,
            })
            .collect();
        // Stub, stub, wire: two increments each, wire last.
        assert_eq!(increments.len(), 6);
        assert!((increments[4] - wire_cap / 2.0).abs() < 1e-30);
        assert!((increments[5] - wire_cap / 2.0).abs() < 1e-30);

        let network = engine.network("n1").unwrap();
        assert!((network.total_capacitance() - wire_cap).abs() < 1e-30);
    }

    #[test]
    fn test_preconditions() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new();
        let mut builder = NetParasiticBuilder::new(&mut engine, &tech, context());

        let err = builder.build(&Net::new("empty"), &[]).unwrap_err();
        assert!(matches!(err, ParasiticsError::Precondition(_)));
        let (mut unnamed, segments) = two_pin_net("n1");
        unnamed.name.clear();
        assert!(matches!(
            builder.build(&unnamed, &segments),
            Err(ParasiticsError::Precondition(_))
        ));

        let (net, segments) = two_pin_net("n1");
        let mut builder = NetParasiticBuilder::new(
            &mut engine,
            &tech,
            AnalysisContext::new(Corner::new("", 0), MinMax::Max),
        );
        assert!(matches!(
            builder.build(&net, &segments),
            Err(ParasiticsError::Precondition(_))
        ));
        assert!(engine.journal().is_empty());
    }

    #[test]
    fn test_engine_failure_discards_without_reduction() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new().fail_on(EngineOp::AddResistor);
        let (net, segments) = two_pin_net("n1");
        let err = NetParasiticBuilder::new(&mut engine, &tech, context())
            .build(&net, &segments)
            .unwrap_err();

        assert!(matches!(
            err,
            ParasiticsError::Engine(ref e) if e.operation == EngineOp::AddResistor
        ));
        let journal = engine.journal();
        assert!(!journal.iter().any(|c| matches!(c, EngineCall::Reduce(_))));
        assert!(!journal.iter().any(|c| matches!(c, EngineCall::Release(_))));
        assert_eq!(journal.last(), Some(&EngineCall::Discard("n1".to_string())));
        assert_eq!(engine.open_network_count(), 0);
        assert!(engine.reduced("n1").is_none());
    }

    #[test]
    fn test_failed_open_touches_nothing() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new().fail_on(EngineOp::OpenNetwork);
        let (net, segments) = two_pin_net("n1");
        let err = NetParasiticBuilder::new(&mut engine, &tech, context())
            .build(&net, &segments)
            .unwrap_err();
        assert!(matches!(err, ParasiticsError::Engine(_)));
        assert!(engine.journal().is_empty());
    }

    #[test]
    fn test_unknown_layer_is_fatal() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new();
        let (net, _) = two_pin_net("n1");
        let segments = vec![RouteSegment::new((0, 0, 7), (100, 0, 7))];
        let err = NetParasiticBuilder::new(&mut engine, &tech, context())
            .build(&net, &segments)
            .unwrap_err();
        assert!(matches!(err, ParasiticsError::Technology(_)));
        assert_eq!(engine.open_network_count(), 0);
    }

    #[test]
    fn test_anomaly_abort_policy() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new();
        let (net, _) = two_pin_net("n1");
        let segments = vec![RouteSegment::new((0, 0, 1), (100, 0, 2))];
        let config = BuilderConfig {
            anomaly_policy: AnomalyPolicy::Abort,
            ..Default::default()
        };
        let err = NetParasiticBuilder::new(&mut engine, &tech, context())
            .with_config(config)
            .build(&net, &segments)
            .unwrap_err();
        assert!(matches!(
            err,
            ParasiticsError::AnomalousSegment { ref net, index: 0 } if net == "n1"
        ));
        assert_eq!(engine.open_network_count(), 0);
    }

    #[test]
    fn test_anomaly_skip_policy() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new();
        let (net, _) = two_pin_net("n1");
        let segments = vec![RouteSegment::new((0, 0, 1), (100, 0, 2))];
        let config = BuilderConfig {
            anomaly_policy: AnomalyPolicy::Skip,
            ..Default::default()
        };
        let report = NetParasiticBuilder::new(&mut engine, &tech, context())
            .with_config(config)
            .build(&net, &segments)
            .unwrap();
        // Only the two stubs become edges; the skipped segment's far end is
        // still registered.
        assert_eq!(report.resistors, 2);
        assert_eq!(report.nodes, 3);
        assert!(report.has_warnings());
    }

    #[test]
    fn test_degenerate_segment_adds_no_edge() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new();
        let (net, mut segments) = two_pin_net("n1");
        segments.push(RouteSegment::new((100, 0, 1), (100, 0, 1)));
        let report = NetParasiticBuilder::new(&mut engine, &tech, context())
            .build(&net, &segments)
            .unwrap();
        assert_eq!(report.resistors, 3);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_build_all_continues_past_failures() {
        let tech = test_tech();
        let mut engine = InMemoryEngine::new();
        let (good, good_segments) = two_pin_net("good");
        let (bad, _) = two_pin_net("bad");
        let bad_segments = vec![RouteSegment::new((0, 0, 9), (0, 50, 9))];
        let outcomes = NetParasiticBuilder::new(&mut engine, &tech, context()).build_all([
            (&bad, bad_segments.as_slice()),
            (&good, good_segments.as_slice()),
        ]);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].0, "bad");
        assert!(outcomes[0].1.is_err());
        assert_eq!(outcomes[1].0, "good");
        assert!(outcomes[1].1.is_ok());
        assert!(engine.reduced("good").is_some());
        assert!(engine.reduced("bad").is_none());
    }

    #[test]
    fn test_route_endpoint_reuses_grid_node() {
        // A route starting at a pin's grid point connects to the stub's grid
        // node rather than creating a new one.
        let tech = test_tech();
        let mut engine = InMemoryEngine::new().keeping_released();
        let net = Net::new("n1")
            .with_pin(
                Pin::new(TerminalKind::port("a"), Point::new(0, 3), 1)
                    .with_on_grid_position(Point::new(0, 0)),
            )
            .with_pin(Pin::new(TerminalKind::port("b"), Point::new(50, 0), 1));
        let segments = vec![RouteSegment::new((0, 0, 1), (50, 0, 1))];
        let report = NetParasiticBuilder::new(&mut engine, &tech, context())
            .build(&net, &segments)
            .unwrap();
        // Keys: a exact, a grid, b grid.
        assert_eq!(report.nodes, 3);
        assert_eq!(report.internal_nodes, 2);
        let network = engine.network("n1").unwrap();
        assert_eq!(network.nodes().len(), 4);
        assert_eq!(
            network.resistors_at(&NodeName::internal("n1", 0)).len(),
            2
        );
    }
}
