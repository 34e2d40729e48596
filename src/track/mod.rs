//! The track entity: one route as data plus its on-map materialization
//!
//! Every track owns an exclusive namespace of layer/source identifiers
//! derived from its id, so interleaved rendering operations on different
//! tracks never collide on the shared surface.
use crate::gps::Bounds;
use crate::route::Route;
use crate::surface::{LayerKind, LayerSpec, MapSurface, ANCHOR_LAYER};
use crate::waypoints::Waypoint;
use crate::Error;
use geojson::FeatureCollection;
use gpx::{Gpx, GpxVersion, Metadata, TrackSegment};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub mod geometry;
mod manager;
pub mod style;

pub use manager::TrackManager;

/// How the main line layer is colored
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StyleMode {
    /// A single solid color per track
    #[default]
    TrackColor,
    /// Data-driven coloring by each segment's surface quality category
    SurfaceQuality,
}

/// Context menu entries offered for a track
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextAction {
    Save,
    ShowHide,
    HideOthers,
    ExportGpx,
    Delete,
}

impl ContextAction {
    /// Destructive actions require explicit confirmation before executing
    pub fn is_destructive(&self) -> bool {
        matches!(self, ContextAction::Delete)
    }
}

const TEMPORARY_ACTIONS: [ContextAction; 3] = [
    ContextAction::Save,
    ContextAction::ExportGpx,
    ContextAction::Delete,
];

const PERMANENT_ACTIONS: [ContextAction; 4] = [
    ContextAction::ShowHide,
    ContextAction::HideOthers,
    ContextAction::ExportGpx,
    ContextAction::Delete,
];

/// Serializable track record, the unit of persistence
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackData {
    pub id: String,
    pub name: String,
    pub waypoints: Vec<Waypoint>,
    pub route: Route,
    pub created_at: String,
    pub is_permanent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub is_visible: bool,
}

/// A finished GPX document ready to hand to a download or the filesystem
#[derive(Clone, Debug)]
pub struct GpxExport {
    pub filename: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
}

impl GpxExport {
    /// Write the document into the given directory, returning the full path
    pub fn save_to(&self, directory: &Path) -> Result<PathBuf, Error> {
        let path = directory.join(&self.filename);
        std::fs::write(&path, &self.data)?;
        Ok(path)
    }
}

/// One named, colored, persistable route with its rendering state
#[derive(Debug)]
pub struct Track {
    data: TrackData,
    source_id: String,
    outline_layer_id: String,
    solid_layer_id: String,
    symbol_layer_id: String,
    directions_layer_id: String,
    distance_markers_layer_id: String,
    distance_markers_label_layer_id: String,
}

impl Track {
    pub fn new(mut data: TrackData) -> Self {
        if data.color.is_none() {
            data.color = Some(style::color_for_id(&data.id).to_string());
        }
        let source_id = format!("track-{}", data.id);
        Track {
            outline_layer_id: format!("{}-outline", source_id),
            solid_layer_id: format!("{}-solid", source_id),
            symbol_layer_id: format!("{}-symbols", source_id),
            directions_layer_id: format!("{}-directions", source_id),
            distance_markers_layer_id: format!("{}-distance-markers", source_id),
            distance_markers_label_layer_id: format!("{}-distance-markers-label", source_id),
            source_id,
            data,
        }
    }

    pub fn id(&self) -> &str {
        &self.data.id
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn color(&self) -> &str {
        self.data
            .color
            .as_deref()
            .unwrap_or_else(|| style::color_for_id(&self.data.id))
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.data.waypoints
    }

    pub fn route(&self) -> &Route {
        &self.data.route
    }

    pub fn created_at(&self) -> &str {
        &self.data.created_at
    }

    pub fn is_permanent(&self) -> bool {
        self.data.is_permanent
    }

    pub fn is_visible(&self) -> bool {
        self.data.is_visible
    }

    /// Snapshot of the underlying record
    pub fn data(&self) -> &TrackData {
        &self.data
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Context menu entries for this track, by permanence
    pub fn context_actions(&self) -> &'static [ContextAction] {
        if self.data.is_permanent {
            &PERMANENT_ACTIONS
        } else {
            &TEMPORARY_ACTIONS
        }
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.data.name = name.to_string();
    }

    pub(crate) fn set_color(&mut self, color: &str) {
        self.data.color = Some(color.to_string());
    }

    pub(crate) fn make_permanent(&mut self) {
        self.data.is_permanent = true;
    }

    fn layer_ids_in_removal_order(&self) -> [&str; 6] {
        // labels sit on top of their marker layer, remove top down
        [
            &self.distance_markers_label_layer_id,
            &self.distance_markers_layer_id,
            &self.symbol_layer_id,
            &self.directions_layer_id,
            &self.solid_layer_id,
            &self.outline_layer_id,
        ]
    }

    fn source_ids(&self) -> [&str; 3] {
        [
            &self.distance_markers_layer_id,
            &self.symbol_layer_id,
            &self.source_id,
        ]
    }

    fn line_color(&self, style_mode: StyleMode) -> Value {
        match style_mode {
            StyleMode::TrackColor => json!(self.color()),
            StyleMode::SurfaceQuality => style::surface_color_expression(),
        }
    }

    /// Materialize this track's layers onto the surface. Idempotent: any
    /// existing layers for this id are removed first. Sets the visibility
    /// flag; rendering failures are logged and never propagate.
    pub fn add_to_map(&mut self, surface: &mut dyn MapSurface, style_mode: StyleMode) {
        let sections = geometry::sections_from_features(&self.data.route.geojson);
        if sections.iter().all(|s| s.coordinates.is_empty()) {
            warn!(
                "track '{}' has no route geometry, nothing to render",
                self.data.id
            );
            return;
        }

        self.remove_from_map(surface);

        let grouped = geometry::grouped_feature_collection(&sections);
        let symbols = FeatureCollection {
            bbox: None,
            features: geometry::symbol_features(&sections),
            foreign_members: None,
        };
        let markers = FeatureCollection {
            bbox: None,
            features: geometry::distance_marker_features(&sections),
            foreign_members: None,
        };

        log_surface_error(surface.add_source(&self.source_id, grouped));
        log_surface_error(surface.add_source(&self.symbol_layer_id, symbols));
        log_surface_error(surface.add_source(&self.distance_markers_layer_id, markers));

        log_surface_error(
            surface.add_layer(
                LayerSpec::new(&self.outline_layer_id, LayerKind::Line, &self.source_id)
                    .before(ANCHOR_LAYER)
                    .layout(json!({ "line-join": "round", "line-cap": "round" }))
                    .paint(json!({
                        "line-color": "white",
                        "line-width": style::outline_width_expression(),
                        "line-opacity": 1,
                    })),
            ),
        );

        log_surface_error(
            surface.add_layer(
                LayerSpec::new(&self.solid_layer_id, LayerKind::Line, &self.source_id)
                    .before(ANCHOR_LAYER)
                    .layout(json!({ "line-join": "round", "line-cap": "round" }))
                    .paint(json!({
                        "line-color": self.line_color(style_mode),
                        "line-width": style::line_width_expression(),
                        "line-opacity": 1,
                    })),
            ),
        );

        log_surface_error(
            surface.add_layer(
                LayerSpec::new(
                    &self.symbol_layer_id,
                    LayerKind::Symbol,
                    &self.symbol_layer_id,
                )
                .before(ANCHOR_LAYER)
                .layout(json!({
                    "icon-image": ["get", "symbol"],
                    "icon-size": 1.5,
                    "icon-allow-overlap": false,
                    "symbol-avoid-edges": true,
                    "icon-rotate": ["get", "rotation"],
                    "symbol-sort-key": ["get", "priority"],
                }))
                .paint(json!({
                    "icon-color": ["get", "color"],
                    "icon-halo-color": "#fff",
                    "icon-halo-width": 4,
                })),
            ),
        );

        // direction chevrons ride along the grouped line geometry
        log_surface_error(
            surface.add_layer(
                LayerSpec::new(&self.directions_layer_id, LayerKind::Symbol, &self.source_id)
                    .layout(json!({
                        "symbol-placement": "line",
                        "icon-image": "chevron",
                        "icon-size": 2,
                        "icon-rotate": 90,
                        "icon-rotation-alignment": "map",
                        "icon-allow-overlap": false,
                        "icon-ignore-placement": true,
                    }))
                    .paint(json!({
                        "icon-color": self.color(),
                        "icon-halo-color": "#fff",
                        "icon-halo-width": 4,
                    })),
            ),
        );

        log_surface_error(
            surface.add_layer(
                LayerSpec::new(
                    &self.distance_markers_layer_id,
                    LayerKind::Symbol,
                    &self.distance_markers_layer_id,
                )
                .before(ANCHOR_LAYER)
                .layout(json!({
                    "icon-image": "circle",
                    "icon-size": 20,
                    "icon-allow-overlap": false,
                    "symbol-avoid-edges": true,
                    "symbol-sort-key": 0,
                }))
                .paint(json!({
                    "icon-color": self.color(),
                    "icon-halo-color": "#fff",
                    "icon-halo-width": 4,
                })),
            ),
        );

        log_surface_error(
            surface.add_layer(
                LayerSpec::new(
                    &self.distance_markers_label_layer_id,
                    LayerKind::Symbol,
                    &self.distance_markers_layer_id,
                )
                .before(ANCHOR_LAYER)
                .layout(json!({
                    "icon-image": "circle",
                    "symbol-sort-key": 0,
                    "icon-size": 1.3,
                    "text-field": ["get", "label"],
                    "text-font": ["Open Sans Bold", "Arial Unicode MS Bold"],
                    "text-size": 12,
                    "text-allow-overlap": false,
                }))
                .paint(json!({
                    "text-color": "#FFF",
                    "icon-color": self.color(),
                    "icon-halo-color": "#fff",
                    "icon-halo-width": 5,
                })),
            ),
        );

        self.data.is_visible = true;
    }

    /// Remove every layer and source owned by this track, layers before
    /// sources. Idempotent, safe to call when nothing is present.
    pub fn remove_from_map(&mut self, surface: &mut dyn MapSurface) {
        for layer_id in self.layer_ids_in_removal_order() {
            if surface.has_layer(layer_id) {
                log_surface_error(surface.remove_layer(layer_id));
            }
        }
        for source_id in self.source_ids() {
            if surface.has_source(source_id) {
                log_surface_error(surface.remove_source(source_id));
            }
        }
        self.data.is_visible = false;
    }

    /// Repaint only the main line color without a full remove/re-add
    pub fn update_map_color(&mut self, surface: &mut dyn MapSurface, style_mode: StyleMode) {
        if !self.data.is_visible || !surface.has_layer(&self.solid_layer_id) {
            return;
        }
        log_surface_error(surface.set_paint_property(
            &self.solid_layer_id,
            "line-color",
            self.line_color(style_mode),
        ));
    }

    /// Smallest coordinate aligned region covering the route, for camera
    /// fitting. None when the route has no coordinates.
    pub fn bounds(&self) -> Option<Bounds> {
        let coordinates = geometry::all_coordinates(&self.data.route.geojson);
        Bounds::from_coordinates(&coordinates)
    }

    /// Serialize the route as a single-track single-segment GPX document
    pub fn export_gpx(&self) -> Result<GpxExport, Error> {
        let coordinates = geometry::all_coordinates(&self.data.route.geojson);
        if coordinates.is_empty() {
            return Err(Error::EmptyRoute(self.data.id.clone()));
        }

        let distance = match self.data.route.stats {
            Some(stats) => format!("{:.1}km", stats.distance_meters / 1000.0),
            None => "N/A".to_string(),
        };

        let mut segment = TrackSegment::new();
        segment.points = coordinates
            .iter()
            .map(|c| gpx::Waypoint::new(geo_types::Point::new(c[0], c[1])))
            .collect();

        let mut track = gpx::Track::new();
        track.name = Some(self.data.name.clone());
        track.segments.push(segment);

        let gpx = Gpx {
            version: GpxVersion::Gpx11,
            creator: Some("Ibex Route Planner".to_string()),
            metadata: Some(Metadata {
                name: Some(self.data.name.clone()),
                description: Some(format!("Distance: {}", distance)),
                ..Default::default()
            }),
            tracks: vec![track],
            ..Default::default()
        };

        let mut data = Vec::new();
        gpx::write(&gpx, &mut data)?;

        let filename = format!(
            "{}.gpx",
            self.data
                .name
                .split_whitespace()
                .collect::<Vec<_>>()
                .join("-")
        );
        Ok(GpxExport {
            filename,
            mime_type: "application/gpx+xml",
            data,
        })
    }

    /// Export straight to a file in the given directory
    pub fn export_gpx_to(&self, directory: &Path) -> Result<PathBuf, Error> {
        self.export_gpx()?.save_to(directory)
    }
}

/// A rendering failure must not corrupt track state, log and move on
fn log_surface_error(result: Result<(), Error>) {
    if let Err(e) = result {
        error!("map surface operation failed: {}", e);
    }
}
