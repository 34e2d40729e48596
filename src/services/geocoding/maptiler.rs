//! Forward geocoding backed by the MapTiler cloud API
use super::{GeocodedPlace, GeocodingService};
use crate::config::ServiceConfig;
use crate::gps::Bounds;
use crate::{set_string_param_from_config, Error};
use log::warn;
use reqwest::blocking::Client;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct GeocodingFeature {
    #[serde(default)]
    text: String,
    #[serde(default)]
    place_name: String,
    center: [f64; 2],
    #[serde(default)]
    bbox: Option<[f64; 4]>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    features: Vec<GeocodingFeature>,
}

/// Defines connection parameters for the MapTiler geocoding API
#[derive(Clone, Debug)]
pub struct MapTiler {
    base_url: String,
    api_key: String,
}

impl MapTiler {
    pub fn new(base_url: String, api_key: String) -> Self {
        MapTiler { base_url, api_key }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let mut base = Self::default();
        for key in config.parameters() {
            match key.as_ref() {
                "base_url" | "api_key" => {}
                _ => warn!(
                    "unknown configuration parameter for MapTiler: {}={:?}",
                    key,
                    config.get_parameter(key)
                ),
            }
        }
        set_string_param_from_config!(base, base_url, config);
        set_string_param_from_config!(base, api_key, config);
        Ok(base)
    }

    fn request_url(&self, query: &str) -> String {
        format!("{}/geocoding/{}.json", self.base_url, query)
    }
}

impl Default for MapTiler {
    fn default() -> Self {
        MapTiler {
            base_url: "https://api.maptiler.com".to_string(),
            api_key: String::new(),
        }
    }
}

impl GeocodingService for MapTiler {
    fn forward(&self, query: &str) -> Result<Vec<GeocodedPlace>, Error> {
        let client = Client::new();
        let resp = client
            .get(self.request_url(query))
            .query(&[("key", &self.api_key)])
            .send()?;
        if !resp.status().is_success() {
            let code = resp.status();
            return Err(Error::RequestError(
                code,
                "geocoding request failed".to_string(),
            ));
        }

        let response: GeocodingResponse = resp.json()?;
        Ok(response
            .features
            .into_iter()
            .map(|feature| GeocodedPlace {
                text: feature.text,
                place_name: feature.place_name,
                center: feature.center,
                bbox: feature.bbox.map(|b| {
                    let mut bounds = Bounds::from_coordinate([b[0], b[1]]);
                    bounds.extend([b[2], b[3]]);
                    bounds
                }),
            })
            .collect())
    }
}
