//! Pure geometry processing for track rendering: section extraction from
//! route GeoJSON, contiguous surface grouping, midpoint symbol placement
//! and periodic distance marker interpolation
use super::style;
use crate::gps::{haversine_distance, interpolate_point, LonLat};
use crate::route::{RouteSection, SurfaceQuality};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
use serde_json::{json, Map, Value};

/// Distance between successive route distance markers in meters
pub const DISTANCE_MARKER_INTERVAL_METERS: f64 = 5000.0;

/// Contiguous run of sections sharing one surface quality category
#[derive(Clone, Debug, PartialEq)]
pub struct GroupedSegment {
    pub surface: SurfaceQuality,
    pub distance: f64,
    pub coordinates: Vec<LonLat>,
}

fn positions_from(coords: &[LonLat]) -> Vec<Vec<f64>> {
    coords.iter().map(|c| vec![c[0], c[1]]).collect()
}

fn coord_from(position: &[f64]) -> Option<LonLat> {
    if position.len() >= 2 {
        Some([position[0], position[1]])
    } else {
        None
    }
}

/// Rebuild per-segment sections from a route FeatureCollection whose
/// features carry the API's segment properties on LineString geometries
pub fn sections_from_features(collection: &FeatureCollection) -> Vec<RouteSection> {
    let mut sections = Vec::new();
    for feature in &collection.features {
        let coordinates = match &feature.geometry {
            Some(Geometry {
                value: GeoValue::LineString(positions),
                ..
            }) => positions.iter().filter_map(|p| coord_from(p)).collect(),
            _ => continue,
        };
        let properties = feature
            .properties
            .clone()
            .map(Value::Object)
            .unwrap_or_else(|| json!({}));
        let mut section: RouteSection =
            serde_json::from_value(properties).unwrap_or_default();
        section.coordinates = coordinates;
        sections.push(section);
    }
    sections
}

/// Flatten every coordinate of the collection's LineString and
/// MultiLineString geometries in encounter order
pub fn all_coordinates(collection: &FeatureCollection) -> Vec<LonLat> {
    let mut coords = Vec::new();
    for feature in &collection.features {
        match &feature.geometry {
            Some(Geometry {
                value: GeoValue::LineString(positions),
                ..
            }) => coords.extend(positions.iter().filter_map(|p| coord_from(p))),
            Some(Geometry {
                value: GeoValue::MultiLineString(lines),
                ..
            }) => {
                for positions in lines {
                    coords.extend(positions.iter().filter_map(|p| coord_from(p)));
                }
            }
            _ => {}
        }
    }
    coords
}

/// Merge adjacent sections into one segment per contiguous surface quality
/// run. Two neighbors merge iff their category is identical; distances
/// accumulate and coordinates concatenate.
pub fn group_by_surface(sections: &[RouteSection]) -> Vec<GroupedSegment> {
    let mut groups: Vec<GroupedSegment> = Vec::new();
    for section in sections {
        match groups.last_mut() {
            Some(group) if group.surface == section.surface_smoothness => {
                group.distance += section.distance;
                group.coordinates.extend_from_slice(&section.coordinates);
            }
            _ => groups.push(GroupedSegment {
                surface: section.surface_smoothness,
                distance: section.distance,
                coordinates: section.coordinates.clone(),
            }),
        }
    }
    groups
}

/// Grouped line geometry as a FeatureCollection ready for a line source
pub fn grouped_feature_collection(sections: &[RouteSection]) -> FeatureCollection {
    let features = group_by_surface(sections)
        .into_iter()
        .map(|group| {
            let mut properties = Map::new();
            properties.insert(
                "surfaceSmoothness".to_string(),
                json!(group.surface.as_str()),
            );
            properties.insert("distance".to_string(), json!(group.distance));
            Feature {
                bbox: None,
                geometry: Some(Geometry::new(GeoValue::LineString(positions_from(
                    &group.coordinates,
                )))),
                id: None,
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();
    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// Coordinate at the middle of a polyline, None when empty
pub fn midpoint(coordinates: &[LonLat]) -> Option<LonLat> {
    coordinates.get(coordinates.len() / 2).copied()
}

fn point_feature(coordinate: LonLat, properties: Map<String, Value>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(GeoValue::Point(vec![
            coordinate[0],
            coordinate[1],
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Warning symbols at segment midpoints, one per section whose stress or
/// slope crosses a rule threshold
pub fn symbol_features(sections: &[RouteSection]) -> Vec<Feature> {
    let mut features = Vec::new();
    for section in sections {
        let spec = match style::symbol_for(section.stress, section.slope) {
            Some(spec) => spec,
            None => continue,
        };
        let coordinate = match midpoint(&section.coordinates) {
            Some(coordinate) => coordinate,
            None => continue,
        };
        let mut properties = Map::new();
        properties.insert("symbol".to_string(), json!(spec.icon));
        properties.insert("color".to_string(), json!(spec.color));
        properties.insert("rotation".to_string(), json!(spec.rotation));
        properties.insert("priority".to_string(), json!(spec.sort_key));
        features.push(point_feature(coordinate, properties));
    }
    features
}

/// Periodic distance markers along the route, one every interval multiple.
/// Walks segment by segment accumulating great-circle distance and linearly
/// interpolates the marker coordinate inside the segment where the
/// cumulative distance crosses each multiple.
pub fn distance_marker_features(sections: &[RouteSection]) -> Vec<Feature> {
    let mut markers = Vec::new();
    let mut total_distance = 0.0;
    let mut next_marker_distance = DISTANCE_MARKER_INTERVAL_METERS;

    for section in sections {
        let coords = &section.coordinates;
        for pair in coords.windows(2) {
            let start = pair[0];
            let end = pair[1];
            let segment_distance = haversine_distance(start, end);

            while total_distance + segment_distance >= next_marker_distance {
                let distance_to_marker = next_marker_distance - total_distance;
                let fraction = distance_to_marker / segment_distance;
                let coordinate = interpolate_point(start, end, fraction);

                let mut properties = Map::new();
                properties.insert(
                    "label".to_string(),
                    json!(format!(
                        "{}",
                        (next_marker_distance / 1000.0).round() as u64
                    )),
                );
                markers.push(point_feature(coordinate, properties));

                next_marker_distance += DISTANCE_MARKER_INTERVAL_METERS;
            }
            total_distance += segment_distance;
        }
    }
    markers
}
