//! Technology data consumed while computing segment RC values.

use opensilicon_core::{LayerId, LayoutDatabase};
use serde::{Deserialize, Serialize};

use crate::error::TechError;

/// Unit resistance and capacitance of a routing layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerRc {
    /// ohm/m
    pub r_per_meter: f64,
    /// F/m
    pub c_per_meter: f64,
}

/// Per-layer characterization, cut resistances and unit conversion.
pub trait RcTechnology {
    fn layer_rc(&self, layer: LayerId) -> Result<LayerRc, TechError>;

    /// Resistance of one cut between `lower_layer` and the layer above it.
    fn cut_layer_resistance(&self, lower_layer: LayerId) -> Result<f64, TechError>;

    fn dbu_to_meters(&self, dbu: i64) -> Result<f64, TechError>;
}

impl RcTechnology for LayoutDatabase {
    fn layer_rc(&self, layer: LayerId) -> Result<LayerRc, TechError> {
        self.layer_stack
            .get_layer(layer)
            .map(|l| LayerRc {
                r_per_meter: l.r_per_meter,
                c_per_meter: l.c_per_meter,
            })
            .ok_or(TechError::UnknownLayer(layer))
    }

    fn cut_layer_resistance(&self, lower_layer: LayerId) -> Result<f64, TechError> {
        self.layer_stack
            .cut_above(lower_layer)
            .map(|c| c.resistance)
            .ok_or(TechError::UnknownCutLayer(lower_layer))
    }

    fn dbu_to_meters(&self, dbu: i64) -> Result<f64, TechError> {
        LayoutDatabase::dbu_to_meters(self, dbu).map_err(|e| TechError::InvalidDbuScale(e.to_string()))
    }
}

/// Resistance and capacitance of one edge of the network.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RcValues {
    /// ohm
    pub resistance: f64,
    /// F
    pub capacitance: f64,
}

impl RcValues {
    pub const ZERO: RcValues = RcValues {
        resistance: 0.0,
        capacitance: 0.0,
    };

    pub fn new(resistance: f64, capacitance: f64) -> Self {
        Self {
            resistance,
            capacitance,
        }
    }
}

/// RC of a straight wire of `length_dbu` on `layer`. Shared by pin stubs and
/// routed wires.
pub fn wire_rc<T>(tech: &T, layer: LayerId, length_dbu: i64) -> Result<RcValues, TechError>
where
    T: RcTechnology + ?Sized,
{
    let unit = tech.layer_rc(layer)?;
    let length = tech.dbu_to_meters(length_dbu)?;
    Ok(RcValues::new(
        unit.r_per_meter * length,
        unit.c_per_meter * length,
    ))
}
