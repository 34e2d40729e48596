//! Compute candidate cycling routes between waypoints using a routing API
use crate::config::ServiceConfig;
use crate::route::{RouteSection, RouteStats};
use crate::Error;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

mod cyclers;
pub use cyclers::Cyclers;

/// A latitude/longitude pair in the routing API's ordering
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BikeType {
    CityBike,
    RoadBike,
    MountainBike,
    HybridBike,
    FoldingBike,
    ElectricBike,
    CargoBike,
    FixieBike,
    GravelBike,
    RecumbentBike,
    ElectricCityBike,
    ElectricRoadBike,
    ElectricFoldingBike,
    ElectricCargoBike,
    ElectricFixieBike,
    ElectricHybridBike,
    ElectricGravelBike,
    ElectricRecumbentBike,
    Scooter,
    BigWheelScooter,
    ElectricScooter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AvoidancePreference {
    AvoidIfPossible,
    StrictlyAvoid,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficPreference {
    Ignore,
    AvoidIfReasonable,
    AvoidIfPossible,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurfacePreference {
    Ignore,
    PreferNonPaved,
    AvoidBadSmoothnessOnly,
    PreferSmooth,
    AvoidNonSmooth,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClimbPreference {
    Ignore,
    AvoidIfReasonable,
    AvoidIfPossible,
}

/// Full routing preference set sent with every request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSettings {
    pub bike_type: BikeType,
    pub average_speed: f64,
    pub allowed_transport_modes: Vec<String>,
    pub stairs: AvoidancePreference,
    pub pavements: AvoidancePreference,
    pub oneways: AvoidancePreference,
    pub traffic: TrafficPreference,
    pub surface: SurfacePreference,
    pub climbs: ClimbPreference,
    pub bike_sharing_providers_ids: Vec<String>,
    pub add_route_geo_json: bool,
    pub optimize_waypoint_order: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_length_meters: Option<f64>,
}

impl Default for RouteSettings {
    fn default() -> Self {
        RouteSettings {
            bike_type: BikeType::GravelBike,
            average_speed: 20.0,
            allowed_transport_modes: vec!["BIKE".to_string()],
            stairs: AvoidancePreference::AvoidIfPossible,
            pavements: AvoidancePreference::AvoidIfPossible,
            oneways: AvoidancePreference::AvoidIfPossible,
            traffic: TrafficPreference::AvoidIfReasonable,
            surface: SurfacePreference::PreferNonPaved,
            climbs: ClimbPreference::Ignore,
            bike_sharing_providers_ids: Vec::new(),
            add_route_geo_json: true,
            optimize_waypoint_order: true,
            desired_length_meters: None,
        }
    }
}

/// A point wrapped in the API's location envelope
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationPoint {
    pub location_type: String,
    pub point: Point,
}

impl From<Point> for LocationPoint {
    fn from(point: Point) -> Self {
        LocationPoint {
            location_type: "POINT".to_string(),
            point,
        }
    }
}

/// Wire shape of one routing request
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutingRequest {
    pub client: String,
    pub origin: LocationPoint,
    pub destination: LocationPoint,
    pub waypoints: Vec<LocationPoint>,
    pub settings: RouteSettings,
    pub departure_date_time: String,
    pub key: String,
    pub uid: Option<String>,
}

/// One candidate route as returned by the API
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRoute {
    #[serde(default)]
    pub geo_json: Option<FeatureCollection>,
    #[serde(default)]
    pub sections: Option<Vec<RouteSection>>,
    #[serde(default)]
    pub stats: Option<RouteStats>,
    #[serde(default)]
    pub labels: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RoutingResponse {
    #[serde(default)]
    pub routes: Vec<ApiRoute>,
    #[serde(default)]
    pub status: String,
}

/// trait that defines how to obtain candidate routes for a waypoint sequence
pub trait RoutingService {
    /// Request candidate routes from origin to destination through the
    /// given via points
    fn compute_routes(
        &self,
        origin: Point,
        destination: Point,
        waypoints: &[Point],
        settings: &RouteSettings,
    ) -> Result<Vec<ApiRoute>, Error>;
}

pub fn new_routing_handler(config: &ServiceConfig) -> Result<Box<dyn RoutingService>, Error> {
    match config.handler() {
        "cyclers" => Ok(Box::new(Cyclers::from_config(config)?)),
        _ => Err(Error::UnknownServiceHandler(format!(
            "no routing handler exists for: {}",
            config.handler()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_serialize_in_api_shape() {
        let value = serde_json::to_value(RouteSettings::default()).unwrap();
        assert_eq!(value["bikeType"], "GRAVEL_BIKE");
        assert_eq!(value["surface"], "PREFER_NON_PAVED");
        assert_eq!(value["traffic"], "AVOID_IF_REASONABLE");
        assert_eq!(value["allowedTransportModes"][0], "BIKE");
        assert_eq!(value["optimizeWaypointOrder"], true);
        assert!(value.get("desiredLengthMeters").is_none());
    }

    #[test]
    fn request_envelope_matches_the_wire_format() {
        let request = RoutingRequest {
            client: "WEB".to_string(),
            origin: Point { lat: 50.0, lon: 14.4 }.into(),
            destination: Point { lat: 50.1, lon: 14.5 }.into(),
            waypoints: vec![],
            settings: RouteSettings::default(),
            departure_date_time: "2024-05-01T08:00:00Z".to_string(),
            key: "k".to_string(),
            uid: None,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["origin"]["locationType"], "POINT");
        assert_eq!(value["origin"]["point"]["lat"], 50.0);
        assert_eq!(value["departureDateTime"], "2024-05-01T08:00:00Z");
        assert_eq!(value["uid"], serde_json::Value::Null);
    }

    #[test]
    fn unknown_handler_is_rejected() {
        let config = ServiceConfig::new("teleport".to_string());
        assert!(matches!(
            new_routing_handler(&config),
            Err(Error::UnknownServiceHandler(_))
        ));
    }
}
