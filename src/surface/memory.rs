//! In-memory map surface that records layer/source mutations
use super::{FitBoundsOptions, LayerSpec, MapSurface};
use crate::gps::Bounds;
use crate::Error;
use geojson::FeatureCollection;
use serde_json::Value;
use std::collections::BTreeMap;

/// A [`MapSurface`] backed by plain collections. Used headless by the CLI
/// and by tests to assert on the exact set of materialized layers/sources.
#[derive(Debug, Default)]
pub struct MemorySurface {
    sources: BTreeMap<String, FeatureCollection>,
    layers: Vec<LayerSpec>,
    fits: Vec<(Bounds, FitBoundsOptions)>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface pre-populated with the persistent anchor layer so
    /// before-anchor insertion ordering can be exercised
    pub fn with_anchor(anchor_id: &str) -> Self {
        let mut surface = Self::new();
        surface.layers.push(LayerSpec::new(
            anchor_id,
            super::LayerKind::Symbol,
            anchor_id,
        ));
        surface
    }

    /// Layer ids in rendering order
    pub fn layer_ids(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.id.as_str()).collect()
    }

    pub fn source_ids(&self) -> Vec<&str> {
        self.sources.keys().map(|k| k.as_str()).collect()
    }

    pub fn layer(&self, id: &str) -> Option<&LayerSpec> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn source(&self, id: &str) -> Option<&FeatureCollection> {
        self.sources.get(id)
    }

    /// Every camera fit request issued so far, oldest first
    pub fn fit_requests(&self) -> &[(Bounds, FitBoundsOptions)] {
        &self.fits
    }
}

impl MapSurface for MemorySurface {
    fn add_source(&mut self, id: &str, data: FeatureCollection) -> Result<(), Error> {
        if self.sources.contains_key(id) {
            return Err(Error::Other(format!("source '{}' already exists", id)));
        }
        self.sources.insert(id.to_string(), data);
        Ok(())
    }

    fn add_layer(&mut self, layer: LayerSpec) -> Result<(), Error> {
        if self.has_layer(&layer.id) {
            return Err(Error::Other(format!("layer '{}' already exists", layer.id)));
        }
        if !self.sources.contains_key(&layer.source) {
            return Err(Error::Other(format!(
                "layer '{}' references missing source '{}'",
                layer.id, layer.source
            )));
        }
        match layer
            .before
            .as_ref()
            .and_then(|anchor| self.layers.iter().position(|l| &l.id == anchor))
        {
            Some(index) => self.layers.insert(index, layer),
            None => self.layers.push(layer),
        }
        Ok(())
    }

    fn remove_layer(&mut self, id: &str) -> Result<(), Error> {
        match self.layers.iter().position(|l| l.id == id) {
            Some(index) => {
                self.layers.remove(index);
                Ok(())
            }
            None => Err(Error::Other(format!("layer '{}' does not exist", id))),
        }
    }

    fn remove_source(&mut self, id: &str) -> Result<(), Error> {
        if let Some(layer) = self.layers.iter().find(|l| l.source == id) {
            return Err(Error::Other(format!(
                "source '{}' is still used by layer '{}'",
                id, layer.id
            )));
        }
        match self.sources.remove(id) {
            Some(_) => Ok(()),
            None => Err(Error::Other(format!("source '{}' does not exist", id))),
        }
    }

    fn has_layer(&self, id: &str) -> bool {
        self.layers.iter().any(|l| l.id == id)
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.contains_key(id)
    }

    fn set_paint_property(
        &mut self,
        layer_id: &str,
        name: &str,
        value: Value,
    ) -> Result<(), Error> {
        match self.layers.iter_mut().find(|l| l.id == layer_id) {
            Some(layer) => {
                layer.paint.insert(name.to_string(), value);
                Ok(())
            }
            None => Err(Error::Other(format!("layer '{}' does not exist", layer_id))),
        }
    }

    fn fit_bounds(&mut self, bounds: Bounds, options: FitBoundsOptions) -> Result<(), Error> {
        self.fits.push((bounds, options));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::LayerKind;

    fn empty_collection() -> FeatureCollection {
        FeatureCollection {
            bbox: None,
            features: Vec::new(),
            foreign_members: None,
        }
    }

    #[test]
    fn duplicate_source_is_rejected() {
        let mut surface = MemorySurface::new();
        surface.add_source("a", empty_collection()).unwrap();
        assert!(surface.add_source("a", empty_collection()).is_err());
    }

    #[test]
    fn layer_inserts_before_anchor() {
        let mut surface = MemorySurface::with_anchor("anchor");
        surface.add_source("src", empty_collection()).unwrap();
        surface
            .add_layer(LayerSpec::new("below", LayerKind::Line, "src").before("anchor"))
            .unwrap();
        surface
            .add_layer(LayerSpec::new("on-top", LayerKind::Line, "src"))
            .unwrap();
        assert_eq!(surface.layer_ids(), vec!["below", "anchor", "on-top"]);
    }

    #[test]
    fn source_removal_requires_layers_gone() {
        let mut surface = MemorySurface::new();
        surface.add_source("src", empty_collection()).unwrap();
        surface
            .add_layer(LayerSpec::new("line", LayerKind::Line, "src"))
            .unwrap();
        assert!(surface.remove_source("src").is_err());
        surface.remove_layer("line").unwrap();
        surface.remove_source("src").unwrap();
        assert!(!surface.has_source("src"));
    }
}
