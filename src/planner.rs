//! Route computation orchestrator: turns waypoints plus settings into
//! candidate routes and materializes them as temporary tracks
//!
//! Computation is synchronous and serialized behind a processing flag, so a
//! second submission is rejected while one is in flight and a superseded
//! result can never be applied out of order.
use crate::route::Route;
use crate::services::routing::{Point, RouteSettings, RoutingService};
use crate::surface::MapSurface;
use crate::track::{style, StyleMode, TrackData, TrackManager};
use crate::waypoints::Waypoint;
use crate::Error;
use chrono::Utc;
use log::info;

pub struct RoutePlanner {
    routing: Box<dyn RoutingService>,
    processing: bool,
}

impl RoutePlanner {
    pub fn new(routing: Box<dyn RoutingService>) -> Self {
        RoutePlanner {
            routing,
            processing: false,
        }
    }

    /// Whether a route computation is currently in flight. Callers gate
    /// duplicate submissions on this.
    pub fn is_processing(&self) -> bool {
        self.processing
    }

    /// Compute candidate routes for the waypoint sequence. The first and
    /// last waypoints become origin and destination, the rest via points.
    /// The processing flag is always cleared, on success or failure.
    pub fn compute_routes(
        &mut self,
        waypoints: &[Waypoint],
        settings: &RouteSettings,
    ) -> Result<Vec<Route>, Error> {
        if self.processing {
            return Err(Error::RequestInFlight);
        }
        if waypoints.len() < 2 {
            return Err(Error::InsufficientWaypoints(waypoints.len()));
        }

        let origin = point_for(&waypoints[0]);
        let destination = point_for(&waypoints[waypoints.len() - 1]);
        let vias: Vec<Point> = waypoints[1..waypoints.len() - 1]
            .iter()
            .map(point_for)
            .collect();

        self.processing = true;
        let result = self
            .routing
            .compute_routes(origin, destination, &vias, settings);
        self.processing = false;

        let api_routes = result?;
        let stamp = Utc::now().timestamp_millis();
        let routes: Vec<Route> = api_routes
            .into_iter()
            .enumerate()
            .filter_map(|(index, api_route)| {
                let geojson = api_route.geo_json?;
                let name = if api_route.labels.is_empty() {
                    format!("Route {}", index + 1)
                } else {
                    api_route.labels.join(", ")
                };
                Some(Route {
                    id: format!("route-{}-{}", stamp, index),
                    geojson,
                    sections: api_route.sections,
                    stats: api_route.stats,
                    labels: api_route.labels,
                    route_index: index,
                    name,
                    color: Some(style::color_for_route_index(index).to_string()),
                })
            })
            .collect();
        info!("computed {} candidate route(s)", routes.len());
        Ok(routes)
    }

    /// Register each route as a temporary track and show it immediately.
    /// Returns the new track ids in route order.
    pub fn materialize_temporary_tracks(
        &self,
        routes: &[Route],
        waypoints: &[Waypoint],
        manager: &mut TrackManager,
        surface: &mut dyn MapSurface,
        style_mode: StyleMode,
    ) -> Vec<String> {
        let stamp = Utc::now().timestamp_millis();
        let mut ids = Vec::with_capacity(routes.len());
        for (index, route) in routes.iter().enumerate() {
            let id = format!("temp-{}-{}", stamp, index);
            manager.add_track(TrackData {
                id: id.clone(),
                name: route.name.clone(),
                waypoints: waypoints.to_vec(),
                route: route.clone(),
                created_at: Utc::now().to_rfc3339(),
                is_permanent: false,
                color: route.color.clone(),
                is_visible: false,
            });
            manager.toggle_track_visibility(&id, surface, style_mode);
            ids.push(id);
        }
        ids
    }
}

fn point_for(waypoint: &Waypoint) -> Point {
    Point {
        lat: waypoint.lat,
        lon: waypoint.lng,
    }
}
