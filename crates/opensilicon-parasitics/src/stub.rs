use opensilicon_core::{Pin, TerminalKind};

use crate::engine::ParasiticEngine;
use crate::error::{Result, TechError};
use crate::registry::LocationKey;
use crate::session::BuildSession;
use crate::tech::{wire_rc, RcTechnology, RcValues};

/// Connects every pin's terminal to the routing grid point it was snapped to.
pub struct PinStubBuilder<'t, T: ?Sized> {
    tech: &'t T,
}

impl<'t, T: RcTechnology + ?Sized> PinStubBuilder<'t, T> {
    pub fn new(tech: &'t T) -> Self {
        Self { tech }
    }

    /// RC of the stub from the pin's exact position to its grid position, on
    /// the pin's top layer. An on-grid pin yields zero values.
    pub fn stub_rc(&self, pin: &Pin) -> std::result::Result<RcValues, TechError> {
        wire_rc(self.tech, pin.top_layer, pin.stub_length())
    }

    pub(crate) fn attach_all<E: ParasiticEngine>(
        &self,
        session: &mut BuildSession<'_, E>,
        pins: &[Pin],
    ) -> Result<()> {
        for pin in pins {
            self.attach(session, pin)?;
        }
        Ok(())
    }

    pub(crate) fn attach<E: ParasiticEngine>(
        &self,
        session: &mut BuildSession<'_, E>,
        pin: &Pin,
    ) -> Result<()> {
        let terminal = match &pin.terminal {
            TerminalKind::Port { name } => session.engine.port_terminal(name)?,
            TerminalKind::Instance { instance, pin } => {
                session.engine.instance_terminal(instance, pin)?
            }
        };
        let pin_node = session
            .engine
            .ensure_terminal_node(&session.network, &terminal)?;

        let exact = LocationKey::at(pin.position, pin.top_layer);
        if !session.registry.bind_terminal(exact, pin_node) {
            log::debug!(
                "net {}: pin {} at {} shares its location with an earlier node",
                session.net_name,
                pin.terminal,
                exact
            );
        }

        let grid = LocationKey::at(pin.on_grid_position, pin.top_layer);
        let grid_node = session.ensure_grid_node(grid)?;

        let rc = self.stub_rc(pin)?;
        session.connect(pin_node, grid_node, rc)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{AnalysisContext, Corner, MinMax};
    use crate::memory::{InMemoryEngine, NodeName};
    use crate::registry::LocationKeyRegistry;
    use crate::report::BuildReport;
    use crate::tech::tests::test_tech;
    use opensilicon_core::{Net, Point};

    fn context() -> AnalysisContext {
        AnalysisContext::new(Corner::new("tt", 0), MinMax::Max)
    }

    fn run(engine: &mut InMemoryEngine, net: &Net) -> BuildReport {
        let tech = test_tech();
        let context = context();
        let net_id = engine.net_identity(net).unwrap();
        let network = engine.open_network(&net_id, &context).unwrap();
        let mut session = BuildSession {
            engine,
            network,
            net_id,
            net_name: &net.name,
            context: &context,
            registry: LocationKeyRegistry::new(),
            report: BuildReport::new(net, 0),
        };
        PinStubBuilder::new(&tech)
            .attach_all(&mut session, &net.pins)
            .unwrap();
        session.report.nodes = session.registry.len();
        session.report
    }

    #[test]
    fn test_off_grid_stub() {
        let net = Net::new("n").with_pin(
            Pin::new(TerminalKind::instance("u1", "A"), Point::new(5, 5), 2)
                .with_on_grid_position(Point::new(0, 5)),
        );
        let mut engine = InMemoryEngine::new();
        let report = run(&mut engine, &net);

        let network = engine.network("n").unwrap();
        let pin_node = network.node(&NodeName::terminal("u1/A")).unwrap();
        let grid_node = network.node(&NodeName::internal("n", 0)).unwrap();
        // 5 dbu on met2: 5e-9 m
        let cap = 1.6e-10 * 5.0e-9;
        assert!((pin_node.capacitance - cap / 2.0).abs() < 1e-30);
        assert!((grid_node.capacitance - cap / 2.0).abs() < 1e-30);
        assert_eq!(network.resistors().len(), 1);
        assert!((network.resistors()[0].ohms - 8.0e4 * 5.0e-9).abs() < 1e-15);
        assert_eq!(report.nodes, 2);
    }

    #[test]
    fn test_on_grid_stub_is_zero_valued() {
        let net = Net::new("n").with_pin(Pin::new(TerminalKind::port("a"), Point::new(0, 0), 1));
        let mut engine = InMemoryEngine::new();
        let report = run(&mut engine, &net);

        let network = engine.network("n").unwrap();
        // Terminal and grid node are distinct; the stub is a 0 ohm edge.
        assert_eq!(network.nodes().len(), 2);
        assert_eq!(network.resistors().len(), 1);
        assert_eq!(network.resistors()[0].ohms, 0.0);
        assert_eq!(network.total_capacitance(), 0.0);
        assert_eq!(report.resistors, 1);
        // The exact key now resolves to the grid node.
        assert_eq!(report.nodes, 1);
    }

    #[test]
    fn test_shared_grid_point() {
        let net = Net::new("n")
            .with_pin(
                Pin::new(TerminalKind::instance("u1", "A"), Point::new(-4, 0), 1)
                    .with_on_grid_position(Point::new(0, 0)),
            )
            .with_pin(
                Pin::new(TerminalKind::instance("u2", "B"), Point::new(0, 6), 1)
                    .with_on_grid_position(Point::new(0, 0)),
            );
        let mut engine = InMemoryEngine::new();
        run(&mut engine, &net);

        let network = engine.network("n").unwrap();
        // Two terminals plus one shared grid node.
        assert_eq!(network.nodes().len(), 3);
        let grid = network.node(&NodeName::internal("n", 0)).unwrap();
        let expected = (2.0e-10 * 4.0e-9 + 2.0e-10 * 6.0e-9) / 2.0;
        assert!((grid.capacitance - expected).abs() < 1e-30);
        assert!(network.node(&NodeName::internal("n", 1)).is_none());
    }

    #[test]
    fn test_unknown_pin_layer_fails() {
        let tech = test_tech();
        let pin = Pin::new(TerminalKind::port("a"), Point::new(0, 0), 9);
        assert_eq!(
            PinStubBuilder::new(&tech).stub_rc(&pin),
            Err(TechError::UnknownLayer(9))
        );
    }
}
