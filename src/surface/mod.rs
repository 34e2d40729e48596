//! The injected map rendering surface capability used to materialize tracks
//!
//! Implementations differ: a GPU renderer binding in a front end, or the
//! in-memory [`MemorySurface`] used headless and in tests, which records
//! every layer/source mutation for inspection.
use crate::gps::Bounds;
use crate::Error;
use geojson::FeatureCollection;
use serde_json::{Map, Value};

mod memory;
pub use memory::MemorySurface;

/// Layer id of the persistent map chrome anchor; track layers are inserted
/// beneath it so fixed chrome always renders on top
pub const ANCHOR_LAYER: &str = "ibex_anchor";

/// Rendering primitive a layer draws with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    Line,
    Symbol,
}

/// Declarative description of one rendering layer, in the shape of the
/// map style spec: `layout` and `paint` hold style-expression JSON
#[derive(Clone, Debug)]
pub struct LayerSpec {
    pub id: String,
    pub kind: LayerKind,
    pub source: String,
    pub before: Option<String>,
    pub layout: Map<String, Value>,
    pub paint: Map<String, Value>,
}

impl LayerSpec {
    pub fn new(id: &str, kind: LayerKind, source: &str) -> Self {
        LayerSpec {
            id: id.to_string(),
            kind,
            source: source.to_string(),
            before: None,
            layout: Map::new(),
            paint: Map::new(),
        }
    }

    /// Insert this layer beneath the given existing layer
    pub fn before(mut self, layer_id: &str) -> Self {
        self.before = Some(layer_id.to_string());
        self
    }

    /// Set the layout properties from a JSON object value
    pub fn layout(mut self, properties: Value) -> Self {
        if let Value::Object(map) = properties {
            self.layout = map;
        }
        self
    }

    /// Set the paint properties from a JSON object value
    pub fn paint(mut self, properties: Value) -> Self {
        if let Value::Object(map) = properties {
            self.paint = map;
        }
        self
    }
}

/// Options for a camera fit request
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitBoundsOptions {
    /// Padding around the fitted region in pixels
    pub padding: u32,
    /// Animated transition duration in milliseconds
    pub duration_ms: u64,
    /// Transition is considered essential and not skipped by reduced motion
    pub essential: bool,
}

impl Default for FitBoundsOptions {
    fn default() -> Self {
        FitBoundsOptions {
            padding: 60,
            duration_ms: 1000,
            essential: true,
        }
    }
}

/// Operation set a map rendering surface exposes to the track subsystem.
///
/// The layer/source namespace is shared mutable state: every track owns an
/// exclusive namespace of identifiers derived from its id, so interleaved
/// operations on different tracks never collide.
pub trait MapSurface {
    /// Register a GeoJSON source under the given id, failing on duplicates
    fn add_source(&mut self, id: &str, data: FeatureCollection) -> Result<(), Error>;

    /// Add a layer, honoring its `before` insertion ordering when possible
    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), Error>;

    /// Remove a layer, failing when it does not exist
    fn remove_layer(&mut self, id: &str) -> Result<(), Error>;

    /// Remove a source, failing when it does not exist or is still in use
    fn remove_source(&mut self, id: &str) -> Result<(), Error>;

    fn has_layer(&self, id: &str) -> bool;

    fn has_source(&self, id: &str) -> bool;

    /// Repaint a single paint property of an existing layer
    fn set_paint_property(&mut self, layer_id: &str, name: &str, value: Value)
        -> Result<(), Error>;

    /// Move the camera to fit the given region
    fn fit_bounds(&mut self, bounds: Bounds, options: FitBoundsOptions) -> Result<(), Error>;
}
