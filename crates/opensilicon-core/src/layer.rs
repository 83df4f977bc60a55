use serde::{Deserialize, Serialize};

/// A routing layer identifier (1 is the lowest metal).
pub type LayerId = u32;

/// A routing layer in the technology stack with its unit RC characterization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    /// Wire resistance per meter of length (ohm/m).
    pub r_per_meter: f64,
    /// Wire capacitance per meter of length (F/m).
    pub c_per_meter: f64,
    #[serde(default)]
    pub description: String,
}

impl Layer {
    pub fn new(id: LayerId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            r_per_meter: 0.0,
            c_per_meter: 0.0,
            description: String::new(),
        }
    }

    pub fn with_rc(mut self, r_per_meter: f64, c_per_meter: f64) -> Self {
        self.r_per_meter = r_per_meter;
        self.c_per_meter = c_per_meter;
        self
    }
}

/// A cut (via) layer sitting directly above routing layer `below`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutLayer {
    pub name: String,
    pub below: LayerId,
    /// Resistance of a single cut (ohm).
    pub resistance: f64,
}

impl CutLayer {
    pub fn new(name: &str, below: LayerId, resistance: f64) -> Self {
        Self {
            name: name.to_string(),
            below,
            resistance,
        }
    }
}

/// The routing and cut layers of a technology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerStack {
    layers: Vec<Layer>,
    #[serde(default)]
    cuts: Vec<CutLayer>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            cuts: Vec::new(),
        }
    }

    pub fn add_layer(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    pub fn add_cut_layer(&mut self, cut: CutLayer) {
        self.cuts.push(cut);
    }

    pub fn get_layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// The cut layer whose lower routing layer is `below`.
    pub fn cut_above(&self, below: LayerId) -> Option<&CutLayer> {
        self.cuts.iter().find(|c| c.below == below)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

impl Default for LayerStack {
    fn default() -> Self {
        Self::new()
    }
}
