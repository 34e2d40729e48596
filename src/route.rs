//! Route value objects produced from the routing service response
use crate::gps::LonLat;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

/// Ordinal classification of a segment's rideability
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurfaceQuality {
    PavedExcellent,
    PavedGood,
    PavedIntermediate,
    PavedBad,
    UnpavedIntermediate,
    UnpavedBad,
    UnpavedHorrible,
    UnpavedImpassable,
    #[serde(other)]
    Unknown,
}

impl SurfaceQuality {
    /// Wire name of the category, also used in data-driven style expressions
    pub fn as_str(&self) -> &'static str {
        match self {
            SurfaceQuality::PavedExcellent => "PAVED_EXCELLENT",
            SurfaceQuality::PavedGood => "PAVED_GOOD",
            SurfaceQuality::PavedIntermediate => "PAVED_INTERMEDIATE",
            SurfaceQuality::PavedBad => "PAVED_BAD",
            SurfaceQuality::UnpavedIntermediate => "UNPAVED_INTERMEDIATE",
            SurfaceQuality::UnpavedBad => "UNPAVED_BAD",
            SurfaceQuality::UnpavedHorrible => "UNPAVED_HORRIBLE",
            SurfaceQuality::UnpavedImpassable => "UNPAVED_IMPASSABLE",
            SurfaceQuality::Unknown => "UNKNOWN",
        }
    }

    pub fn is_unpaved(&self) -> bool {
        matches!(
            self,
            SurfaceQuality::UnpavedIntermediate
                | SurfaceQuality::UnpavedBad
                | SurfaceQuality::UnpavedHorrible
                | SurfaceQuality::UnpavedImpassable
        )
    }
}

impl Default for SurfaceQuality {
    fn default() -> Self {
        SurfaceQuality::Unknown
    }
}

/// Kind of cycling infrastructure a segment runs on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Infrastructure {
    Cycleway,
    BikeLane,
    Footway,
    Offroad,
    #[serde(other)]
    Road,
}

impl Default for Infrastructure {
    fn default() -> Self {
        Infrastructure::Road
    }
}

/// One routed segment with the per-segment metadata the API attaches to it.
/// Immutable once received.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSection {
    /// Segment length in meters
    #[serde(default)]
    pub distance: f64,
    #[serde(default)]
    pub infrastructure: Infrastructure,
    /// Traffic stress level, 1 = no cars, 5 = high traffic
    #[serde(default)]
    pub stress: u8,
    #[serde(default)]
    pub surface_smoothness: SurfaceQuality,
    /// Slope in percent, negative when descending
    #[serde(default)]
    pub slope: f64,
    #[serde(default)]
    pub coordinates: Vec<LonLat>,
}

/// Aggregate figures for a whole route
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    #[serde(default)]
    pub distance_meters: f64,
    #[serde(default)]
    pub duration_seconds: f64,
    #[serde(default)]
    pub elevation_gain_meters: f64,
    #[serde(default)]
    pub elevation_drop_meters: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bike_convenience: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_score: Option<f64>,
}

/// One candidate route produced per routing API call. Immutable.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub geojson: FeatureCollection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sections: Option<Vec<RouteSection>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<RouteStats>,
    #[serde(default)]
    pub labels: Vec<String>,
    pub route_index: usize,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_quality_parses_wire_names() {
        let quality: SurfaceQuality = serde_json::from_str("\"UNPAVED_HORRIBLE\"").unwrap();
        assert_eq!(quality, SurfaceQuality::UnpavedHorrible);
        assert!(quality.is_unpaved());
    }

    #[test]
    fn unrecognized_surface_falls_back_to_unknown() {
        let quality: SurfaceQuality = serde_json::from_str("\"LAVA_FIELD\"").unwrap();
        assert_eq!(quality, SurfaceQuality::Unknown);
        assert!(!quality.is_unpaved());
    }

    #[test]
    fn section_deserializes_from_api_shape() {
        let section: RouteSection = serde_json::from_str(
            r#"{
                "distance": 120.5,
                "infrastructure": "CYCLEWAY",
                "stress": 1,
                "surfaceSmoothness": "PAVED_GOOD",
                "slope": -3.2,
                "coordinates": [[14.42, 50.08], [14.43, 50.09]]
            }"#,
        )
        .unwrap();
        assert_eq!(section.infrastructure, Infrastructure::Cycleway);
        assert_eq!(section.surface_smoothness, SurfaceQuality::PavedGood);
        assert_eq!(section.coordinates.len(), 2);
    }
}
