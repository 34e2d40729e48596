//! Request candidate routes from a hosted instance of the cyclers routing API
use super::{ApiRoute, Point, RouteSettings, RoutingRequest, RoutingResponse, RoutingService};
use crate::config::ServiceConfig;
use crate::{set_string_param_from_config, Error};
use chrono::Utc;
use log::{debug, warn};
use reqwest::blocking::Client;

/// Defines connection parameters for the cyclers routing API
#[derive(Clone, Debug)]
pub struct Cyclers {
    base_url: String,
    api_key: String,
    client_name: String,
}

impl Cyclers {
    pub fn new(base_url: String, api_key: String) -> Self {
        Cyclers {
            base_url,
            api_key,
            client_name: "WEB".to_string(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, Error> {
        let mut base = Self::default();
        for key in config.parameters() {
            match key.as_ref() {
                "base_url" | "api_key" | "client_name" => {}
                _ => warn!(
                    "unknown configuration parameter for Cyclers: {}={:?}",
                    key,
                    config.get_parameter(key)
                ),
            }
        }
        set_string_param_from_config!(base, base_url, config);
        set_string_param_from_config!(base, api_key, config);
        set_string_param_from_config!(base, client_name, config);
        Ok(base)
    }

    fn request_url(&self) -> String {
        format!("{}/routing?key={}", self.base_url, self.api_key)
    }
}

impl Default for Cyclers {
    fn default() -> Self {
        Cyclers {
            base_url: "https://uc1.umotional.net/urbancyclers-api/v7".to_string(),
            api_key: "ZK7hRQamGXpAeQDfRiCveVyBjdtGp7JU".to_string(),
            client_name: "WEB".to_string(),
        }
    }
}

impl RoutingService for Cyclers {
    fn compute_routes(
        &self,
        origin: Point,
        destination: Point,
        waypoints: &[Point],
        settings: &RouteSettings,
    ) -> Result<Vec<ApiRoute>, Error> {
        let request = RoutingRequest {
            client: self.client_name.clone(),
            origin: origin.into(),
            destination: destination.into(),
            waypoints: waypoints.iter().map(|p| (*p).into()).collect(),
            settings: settings.clone(),
            departure_date_time: Utc::now().to_rfc3339(),
            key: self.api_key.clone(),
            uid: None,
        };

        let client = Client::new();
        let resp = client
            .post(self.request_url())
            .json(&request)
            .send()?;
        if !resp.status().is_success() {
            let code = resp.status();
            return Err(Error::RequestError(
                code,
                "cyclers routing request failed".to_string(),
            ));
        }

        let response: RoutingResponse = resp.json()?;
        debug!(
            "routing API returned {} candidate route(s), status: {}",
            response.routes.len(),
            response.status
        );
        Ok(response.routes)
    }
}
