//! End to end lifecycle scenarios: compute, promote, delete
mod common;

use common::{scripted_candidate, waypoint, ScriptedRouting, SharedStore};
use ibex_route_planner::services::routing::RouteSettings;
use ibex_route_planner::surface::ANCHOR_LAYER;
use ibex_route_planner::{
    MapSurface, MemorySurface, RoutePlanner, StyleMode, TrackManager, TrackRepository,
};

fn manager_over(store: SharedStore) -> TrackManager {
    TrackManager::new(TrackRepository::new(Box::new(store)))
}

#[test]
fn computing_a_route_yields_a_visible_temporary_track() {
    let store = SharedStore::new();
    let mut manager = manager_over(store);
    let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
    let mut planner = RoutePlanner::new(Box::new(ScriptedRouting(vec![scripted_candidate()])));

    let waypoints = [
        waypoint("start", 14.40, 50.08),
        waypoint("end", 14.42, 50.10),
    ];
    let routes = planner
        .compute_routes(&waypoints, &RouteSettings::default())
        .unwrap();
    let ids = planner.materialize_temporary_tracks(
        &routes,
        &waypoints,
        &mut manager,
        &mut surface,
        StyleMode::TrackColor,
    );

    assert!(!ids.is_empty());
    assert_eq!(manager.temporary_tracks().len(), ids.len());
    for id in &ids {
        let track = manager.get_track(id).unwrap();
        assert!(track.is_visible());
        assert!(!track.is_permanent());
        let stats = track.route().stats.expect("candidate carries statistics");
        assert!(stats.distance_meters > 0.0);
        assert!(surface.has_layer(&format!("track-{}-solid", id)));
    }
}

#[test]
fn saving_a_temporary_track_persists_it_under_a_new_identity() {
    let store = SharedStore::new();
    let mut manager = manager_over(store.clone());
    let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
    let mut planner = RoutePlanner::new(Box::new(ScriptedRouting(vec![scripted_candidate()])));

    let waypoints = [
        waypoint("start", 14.40, 50.08),
        waypoint("end", 14.42, 50.10),
    ];
    let routes = planner
        .compute_routes(&waypoints, &RouteSettings::default())
        .unwrap();
    let ids = planner.materialize_temporary_tracks(
        &routes,
        &waypoints,
        &mut manager,
        &mut surface,
        StyleMode::TrackColor,
    );
    let temporary_id = ids[0].clone();

    let new_id = manager
        .save_temporary_track_as_permanent(
            &temporary_id,
            "Morning Loop",
            &mut surface,
            StyleMode::TrackColor,
        )
        .expect("temporary track can be promoted");

    assert_ne!(new_id, temporary_id);
    assert!(manager.get_track(&temporary_id).is_none());
    let promoted = manager.get_track(&new_id).unwrap();
    assert!(promoted.is_permanent());
    assert!(promoted.is_visible());
    assert_eq!(promoted.name(), "Morning Loop");
    assert_eq!(promoted.waypoints().len(), 2);

    // durable storage now includes it: a fresh manager over the same store
    // sees the promoted track, invisible until shown again
    let mut restored = manager_over(store);
    restored.load_from_storage();
    assert_eq!(restored.permanent_tracks().len(), 1);
    let loaded = restored.get_track(&new_id).unwrap();
    assert_eq!(loaded.name(), "Morning Loop");
    assert!(!loaded.is_visible());
}

#[test]
fn deleting_a_permanent_track_removes_it_from_storage() {
    let store = SharedStore::new();
    let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);

    let new_id = {
        let mut manager = manager_over(store.clone());
        let mut planner =
            RoutePlanner::new(Box::new(ScriptedRouting(vec![scripted_candidate()])));
        let waypoints = [
            waypoint("start", 14.40, 50.08),
            waypoint("end", 14.42, 50.10),
        ];
        let routes = planner
            .compute_routes(&waypoints, &RouteSettings::default())
            .unwrap();
        let ids = planner.materialize_temporary_tracks(
            &routes,
            &waypoints,
            &mut manager,
            &mut surface,
            StyleMode::TrackColor,
        );
        manager
            .save_temporary_track_as_permanent(
                &ids[0],
                "Morning Loop",
                &mut surface,
                StyleMode::TrackColor,
            )
            .unwrap()
    };

    let mut manager = manager_over(store.clone());
    manager.load_from_storage();
    assert!(manager.delete_track(&new_id, &mut surface));
    assert!(manager.get_track(&new_id).is_none());

    // the deletion reached durable storage
    let mut reloaded = manager_over(store);
    reloaded.load_from_storage();
    assert!(reloaded.permanent_tracks().is_empty());
}
