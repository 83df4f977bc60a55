use opensilicon_core::{LayerId, RouteSegment};

use crate::config::AnomalyPolicy;
use crate::diagnostic::Diagnostic;
use crate::engine::ParasiticEngine;
use crate::error::{ParasiticsError, Result, TechError};
use crate::session::BuildSession;
use crate::tech::{wire_rc, RcTechnology, RcValues};

/// What a route segment is electrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Zero length across two layers.
    Via { lower_layer: LayerId },
    /// Nonzero length on one layer.
    Wire { layer: LayerId, length_dbu: i64 },
    /// Zero length on one layer: both ends are the same node.
    Degenerate { layer: LayerId },
    /// Nonzero length across two layers; not something the router should emit.
    Anomalous { length_dbu: i64 },
}

impl SegmentKind {
    pub fn classify(segment: &RouteSegment) -> Self {
        let length_dbu = segment.length_dbu();
        match (length_dbu == 0, segment.is_same_layer()) {
            (true, false) => SegmentKind::Via {
                lower_layer: segment.lower_layer(),
            },
            (true, true) => SegmentKind::Degenerate {
                layer: segment.start.layer,
            },
            (false, true) => SegmentKind::Wire {
                layer: segment.start.layer,
                length_dbu,
            },
            (false, false) => SegmentKind::Anomalous { length_dbu },
        }
    }
}

/// Turns route segments into network edges.
pub struct SegmentClassifier<'t, T: ?Sized> {
    tech: &'t T,
    policy: AnomalyPolicy,
}

impl<'t, T: RcTechnology + ?Sized> SegmentClassifier<'t, T> {
    pub fn new(tech: &'t T, policy: AnomalyPolicy) -> Self {
        Self { tech, policy }
    }

    /// Edge values for a segment of the given kind, or `None` when no edge is
    /// inserted for it.
    pub fn electrical(&self, kind: SegmentKind) -> std::result::Result<Option<RcValues>, TechError> {
        match kind {
            SegmentKind::Via { lower_layer } => {
                let resistance = self.tech.cut_layer_resistance(lower_layer)?;
                Ok(Some(RcValues::new(resistance, 0.0)))
            }
            SegmentKind::Wire { layer, length_dbu } => {
                wire_rc(self.tech, layer, length_dbu).map(Some)
            }
            SegmentKind::Degenerate { .. } => Ok(None),
            SegmentKind::Anomalous { .. } => match self.policy {
                AnomalyPolicy::ZeroValued => Ok(Some(RcValues::ZERO)),
                AnomalyPolicy::Skip | AnomalyPolicy::Abort => Ok(None),
            },
        }
    }

    pub(crate) fn attach_all<E: ParasiticEngine>(
        &self,
        session: &mut BuildSession<'_, E>,
        segments: &[RouteSegment],
    ) -> Result<()> {
        for (index, segment) in segments.iter().enumerate() {
            self.attach(session, index, segment)?;
        }
        Ok(())
    }

    pub(crate) fn attach<E: ParasiticEngine>(
        &self,
        session: &mut BuildSession<'_, E>,
        index: usize,
        segment: &RouteSegment,
    ) -> Result<()> {
        let start = session.ensure_node(segment.start.into())?;
        let end = session.ensure_node(segment.end.into())?;

        let kind = SegmentKind::classify(segment);
        match kind {
            SegmentKind::Anomalous { .. } => {
                log::warn!("non wire or via route found on net {}", session.net_name);
                session
                    .report
                    .diagnostics
                    .push(Diagnostic::non_wire_non_via(session.net_name, index, *segment));
                if self.policy == AnomalyPolicy::Abort {
                    return Err(ParasiticsError::AnomalousSegment {
                        net: session.net_name.to_string(),
                        index,
                    });
                }
            }
            SegmentKind::Degenerate { .. } => {
                log::debug!("net {}: zero-length segment {}", session.net_name, segment);
                session
                    .report
                    .diagnostics
                    .push(Diagnostic::degenerate(session.net_name, index, *segment));
            }
            SegmentKind::Via { .. } | SegmentKind::Wire { .. } => {}
        }

        if let Some(rc) = self.electrical(kind)? {
            session.connect(start, end, rc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tech::tests::test_tech;

    #[test]
    fn test_classify() {
        assert_eq!(
            SegmentKind::classify(&RouteSegment::new((0, 0, 1), (100, 0, 1))),
            SegmentKind::Wire {
                layer: 1,
                length_dbu: 100
            }
        );
        assert_eq!(
            SegmentKind::classify(&RouteSegment::new((0, 5, 2), (0, 5, 1))),
            SegmentKind::Via { lower_layer: 1 }
        );
        assert_eq!(
            SegmentKind::classify(&RouteSegment::new((0, 0, 1), (10, 0, 2))),
            SegmentKind::Anomalous { length_dbu: 10 }
        );
        assert_eq!(
            SegmentKind::classify(&RouteSegment::new((3, 3, 2), (3, 3, 2))),
            SegmentKind::Degenerate { layer: 2 }
        );
    }

    #[test]
    fn test_via_is_direction_independent() {
        let tech = test_tech();
        let classifier = SegmentClassifier::new(&tech, AnomalyPolicy::ZeroValued);
        let down = RouteSegment::new((0, 0, 3), (0, 0, 2));
        let up = down.reversed();
        let rc_down = classifier.electrical(SegmentKind::classify(&down)).unwrap();
        let rc_up = classifier.electrical(SegmentKind::classify(&up)).unwrap();
        assert_eq!(rc_down, rc_up);
        assert_eq!(rc_down, Some(RcValues::new(3.5, 0.0)));
    }

    #[test]
    fn test_wire_values() {
        let tech = test_tech();
        let classifier = SegmentClassifier::new(&tech, AnomalyPolicy::ZeroValued);
        let rc = classifier
            .electrical(SegmentKind::Wire {
                layer: 3,
                length_dbu: 2000,
            })
            .unwrap()
            .unwrap();
        // 2000 dbu = 2 um
        assert!((rc.resistance - 5.0e4 * 2.0e-6).abs() < 1e-12);
        assert!((rc.capacitance - 1.2e-10 * 2.0e-6).abs() < 1e-24);
    }

    #[test]
    fn test_anomaly_policies() {
        let tech = test_tech();
        let kind = SegmentKind::Anomalous { length_dbu: 10 };
        let zero = SegmentClassifier::new(&tech, AnomalyPolicy::ZeroValued);
        assert_eq!(zero.electrical(kind).unwrap(), Some(RcValues::ZERO));
        let skip = SegmentClassifier::new(&tech, AnomalyPolicy::Skip);
        assert_eq!(skip.electrical(kind).unwrap(), None);
    }

    #[test]
    fn test_missing_cut_layer() {
        let tech = test_tech();
        let classifier = SegmentClassifier::new(&tech, AnomalyPolicy::ZeroValued);
        assert_eq!(
            classifier.electrical(SegmentKind::Via { lower_layer: 3 }),
            Err(TechError::UnknownCutLayer(3))
        );
    }
}
