//! Forward geocoding: resolve free text searches into map coordinates
use crate::config::ServiceConfig;
use crate::gps::{Bounds, LonLat};
use crate::Error;

mod maptiler;
pub use maptiler::MapTiler;

/// One place matched by a forward search
#[derive(Clone, Debug, PartialEq)]
pub struct GeocodedPlace {
    /// Short name of the matched feature
    pub text: String,
    /// Full hierarchical place name
    pub place_name: String,
    pub center: LonLat,
    pub bbox: Option<Bounds>,
}

/// trait that defines how to turn a text query into candidate places
pub trait GeocodingService {
    fn forward(&self, query: &str) -> Result<Vec<GeocodedPlace>, Error>;
}

pub fn new_geocoding_handler(config: &ServiceConfig) -> Result<Box<dyn GeocodingService>, Error> {
    match config.handler() {
        "maptiler" => Ok(Box::new(MapTiler::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no geocoding handler exists for: {}",
            config.handler()
        ))),
    }
}
