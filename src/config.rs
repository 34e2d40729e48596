//! Store application configuration that gets read from disk
use crate::services::{
    new_geocoding_handler, new_routing_handler, GeocodingService, RoutingService,
};
use crate::Error;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_yaml::Value;
use simplelog::LevelFilter;
use std::collections::HashMap;
use std::io::prelude::*;
use std::str::FromStr;

/// Defines the allowed keys under the services map
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceType {
    Geocoding,
    Routing,
}

/// Type alias for clarity
pub type ServiceParameters = HashMap<String, Value>;

/// Configuration options for a single service of any type
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    handler: String,
    #[serde(default)]
    configuration: ServiceParameters,
}

impl ServiceConfig {
    pub fn new(handler: String) -> Self {
        ServiceConfig {
            handler,
            configuration: HashMap::new(),
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn parameters(&self) -> impl Iterator<Item = &String> + '_ {
        self.configuration.keys()
    }

    pub fn get_parameter(&self, key: &str) -> Option<&Value> {
        self.configuration.get(key)
    }

    pub fn get_parameter_as_string(&self, key: &str) -> Option<Result<String, Error>> {
        self.configuration.get(key).map(|value| {
            value
                .as_str()
                .ok_or_else(|| {
                    Error::InvalidConfigurationValue(format!(
                        "invalid value for {}.{}, expected a string: {:?}",
                        &self.handler, key, value
                    ))
                })
                .map(|v| v.to_string())
        })
    }

    pub fn get_parameter_as_i64(&self, key: &str) -> Option<Result<i64, Error>> {
        self.configuration.get(key).map(|value| {
            value.as_i64().ok_or_else(|| {
                Error::InvalidConfigurationValue(format!(
                    "invalid value for {}.{}, expected an integer: {:?}",
                    &self.handler, key, value
                ))
            })
        })
    }

    pub fn get_parameter_as_f64(&self, key: &str) -> Option<Result<f64, Error>> {
        self.configuration.get(key).map(|value| {
            value.as_f64().ok_or_else(|| {
                Error::InvalidConfigurationValue(format!(
                    "invalid value for {}.{}, expected a floating point value: {:?}",
                    &self.handler, key, value
                ))
            })
        })
    }
}

/// Set a string parameter on the service instance from a ServiceConfig instance
#[macro_export]
macro_rules! set_string_param_from_config {
    ($b:expr, $k:ident, $c:expr) => {
        if let Some(val) = $c.get_parameter_as_string(stringify!($k)) {
            $b.$k = val?
        }
    };
}

#[macro_export]
macro_rules! set_int_param_from_config {
    ($b:expr, $k:ident, $c:expr, $o:ident) => {
        if let Some(val) = $c.get_parameter_as_i64(stringify!($k)) {
            $b.$k = val? as $o
        }
    };
}

#[macro_export]
macro_rules! set_float_param_from_config {
    ($b:expr, $k:ident, $c:expr, $o:ident) => {
        if let Some(val) = $c.get_parameter_as_f64(stringify!($k)) {
            $b.$k = val? as $o
        }
    };
}

/// Configuration struct that we can create from the config file used
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(
        deserialize_with = "deserialize_level_filter",
        serialize_with = "serialize_level_filter",
        default = "default_level_filter"
    )]
    log_level: LevelFilter,
    #[serde(default = "default_profile_name")]
    default_profile: String,
    #[serde(default)]
    services: HashMap<ServiceType, ServiceConfig>,
}

impl Config {
    pub fn load<T: Read>(source: &mut T) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(source)
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    /// Name of the routing profile used when none is requested
    pub fn default_profile(&self) -> &str {
        &self.default_profile
    }

    pub fn get_routing_handler(&self) -> Result<Box<dyn RoutingService>, Error> {
        match self.services.get(&ServiceType::Routing) {
            Some(cfg) => new_routing_handler(cfg),
            // the hosted cyclers API is always available as a default
            None => new_routing_handler(&ServiceConfig::new("cyclers".to_string())),
        }
    }

    pub fn get_geocoding_handler(&self) -> Result<Box<dyn GeocodingService>, Error> {
        match self.services.get(&ServiceType::Geocoding) {
            Some(cfg) => new_geocoding_handler(cfg),
            None => new_geocoding_handler(&ServiceConfig::new("maptiler".to_string())),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: default_level_filter(),
            default_profile: default_profile_name(),
            services: HashMap::new(),
        }
    }
}

fn deserialize_level_filter<'de, D>(deserializer: D) -> Result<LevelFilter, D::Error>
where
    D: Deserializer<'de>,
{
    let buf = String::deserialize(deserializer)?;
    LevelFilter::from_str(&buf)
        .map_err(|_| serde::de::Error::custom(format!("invalid level value: {}", buf)))
}

fn serialize_level_filter<S>(level: &LevelFilter, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&level.to_string())
}

fn default_level_filter() -> LevelFilter {
    LevelFilter::Info
}

fn default_profile_name() -> String {
    "Gravel Adventure".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_services_map() {
        let raw = "
log_level: debug
default_profile: Urban Commuter
services:
  routing:
    handler: cyclers
    configuration:
      base_url: http://localhost:9000
      api_key: secret
";
        let config = Config::load(&mut raw.as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Debug);
        assert_eq!(config.default_profile(), "Urban Commuter");
        let service = config.services.get(&ServiceType::Routing).unwrap();
        assert_eq!(service.handler(), "cyclers");
        assert_eq!(
            service.get_parameter_as_string("base_url").unwrap().unwrap(),
            "http://localhost:9000"
        );
        assert!(service.get_parameter_as_i64("base_url").unwrap().is_err());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = Config::load(&mut "{}".as_bytes()).unwrap();
        assert_eq!(config.log_level(), LevelFilter::Info);
        assert_eq!(config.default_profile(), "Gravel Adventure");
        assert!(config.get_routing_handler().is_ok());
        assert!(config.get_geocoding_handler().is_ok());
    }
}
