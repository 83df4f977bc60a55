use crate::analysis::{AnalysisContext, ReductionKind};
use crate::engine::ParasiticEngine;
use crate::error::EngineError;

/// Final step of a build: reduce the raw network, then release it.
#[derive(Debug, Clone, Copy)]
pub struct ReductionInvoker {
    kind: ReductionKind,
}

impl ReductionInvoker {
    pub fn new(kind: ReductionKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ReductionKind {
        self.kind
    }

    /// Consumes the network handle. If reduction fails the raw network is
    /// discarded rather than released, and the error is returned.
    pub fn invoke<E: ParasiticEngine>(
        &self,
        engine: &mut E,
        network: E::Network,
        net: &E::NetId,
        context: &AnalysisContext,
    ) -> Result<(), EngineError> {
        log::trace!(
            "reducing {:?} to {:?} at corner {} ({})",
            net,
            self.kind,
            context.corner.name,
            context.extreme
        );
        if let Err(err) = engine.reduce_to(&network, net, self.kind, context) {
            discard_after_failure(engine, net, context);
            return Err(err);
        }
        engine.release_network(net, context)
    }
}

/// Drop a network whose build cannot complete. A failure here is logged and
/// otherwise ignored so the original error reaches the caller.
pub(crate) fn discard_after_failure<E: ParasiticEngine>(
    engine: &mut E,
    net: &E::NetId,
    context: &AnalysisContext,
) {
    if let Err(err) = engine.discard_network(net, context) {
        log::error!("could not discard raw network of {:?}: {}", net, err);
    }
}
