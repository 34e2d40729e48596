//! Shared fixtures for the end to end scenarios
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
use ibex_route_planner::services::routing::{
    ApiRoute, Point, RouteSettings, RoutingService,
};
use ibex_route_planner::{Error, KeyValueStore, MemoryStore, Waypoint};
use std::cell::RefCell;
use std::rc::Rc;

/// A key-value store handle that can be shared between a manager and the
/// assertions of a test, standing in for browser local storage
#[derive(Clone, Default)]
pub struct SharedStore(Rc<RefCell<MemoryStore>>);

impl SharedStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        self.0.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        self.0.borrow_mut().set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), Error> {
        self.0.borrow_mut().remove(key)
    }
}

/// Routing double that always returns the same scripted candidates
pub struct ScriptedRouting(pub Vec<ApiRoute>);

impl RoutingService for ScriptedRouting {
    fn compute_routes(
        &self,
        _origin: Point,
        _destination: Point,
        _waypoints: &[Point],
        _settings: &RouteSettings,
    ) -> Result<Vec<ApiRoute>, Error> {
        Ok(self.0.clone())
    }
}

pub fn waypoint(id: &str, lng: f64, lat: f64) -> Waypoint {
    Waypoint {
        id: id.to_string(),
        lng,
        lat,
    }
}

fn section_feature(coords: &[[f64; 2]], surface: &str, stress: u8, slope: f64) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoValue::LineString(
            coords.iter().map(|c| vec![c[0], c[1]]).collect(),
        ))),
        id: None,
        properties: serde_json::from_value(serde_json::json!({
            "distance": 1200.0,
            "stress": stress,
            "surfaceSmoothness": surface,
            "slope": slope,
        }))
        .unwrap(),
        foreign_members: None,
    }
}

/// A small two-section candidate with aggregate statistics
pub fn scripted_candidate() -> ApiRoute {
    let raw_stats = serde_json::json!({
        "distanceMeters": 2400.0,
        "durationSeconds": 480.0,
        "elevationGainMeters": 42.0,
        "elevationDropMeters": 17.0,
    });
    ApiRoute {
        geo_json: Some(FeatureCollection {
            bbox: None,
            features: vec![
                section_feature(&[[14.40, 50.08], [14.41, 50.09]], "PAVED_GOOD", 2, 1.0),
                section_feature(&[[14.41, 50.09], [14.42, 50.10]], "UNPAVED_BAD", 1, 8.0),
            ],
            foreign_members: None,
        }),
        sections: None,
        stats: Some(serde_json::from_value(raw_stats).unwrap()),
        labels: vec!["Scenic".to_string()],
    }
}
