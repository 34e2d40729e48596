//! Single authority over the set of live tracks
//!
//! Every creation, mutation and deletion flows through the manager so the
//! in-memory registry and durable storage never diverge. The permanent set
//! is re-persisted automatically after every mutation that affects it.
use super::{StyleMode, Track, TrackData};
use crate::storage::TrackRepository;
use crate::surface::{FitBoundsOptions, MapSurface};
use chrono::Utc;
use log::{error, info, warn};

type TrackObserver = Box<dyn Fn(&[TrackData])>;

pub struct TrackManager {
    tracks: Vec<Track>,
    repository: TrackRepository,
    observer: Option<TrackObserver>,
    last_hovered_feature: Option<String>,
}

impl TrackManager {
    pub fn new(repository: TrackRepository) -> Self {
        TrackManager {
            tracks: Vec::new(),
            repository,
            observer: None,
            last_hovered_feature: None,
        }
    }

    /// Register the single change observer, replacing any previous one.
    /// Invoked with a snapshot of every track record after each mutation.
    pub fn set_observer(&mut self, observer: TrackObserver) {
        self.observer = Some(observer);
    }

    /// Construct and register a track. The caller supplies a collision-free
    /// id; no uniqueness check happens here.
    pub fn add_track(&mut self, data: TrackData) -> &Track {
        let index = self.tracks.len();
        self.tracks.push(Track::new(data));
        self.notify_change();
        &self.tracks[index]
    }

    /// Remove a track's rendering and registry entry. Returns whether a
    /// track was found; safe to call with an unknown id.
    pub fn delete_track(&mut self, id: &str, surface: &mut dyn MapSurface) -> bool {
        let index = match self.tracks.iter().position(|t| t.id() == id) {
            Some(index) => index,
            None => {
                warn!("track '{}' not found for deletion", id);
                return false;
            }
        };
        let mut track = self.tracks.remove(index);
        track.remove_from_map(surface);
        if track.is_permanent() {
            self.persist_permanent();
        }
        self.notify_change();
        info!("deleted track '{}'", id);
        true
    }

    pub fn get_track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id() == id)
    }

    /// Tracks in registration order
    pub fn all_tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn permanent_tracks(&self) -> Vec<&Track> {
        self.tracks.iter().filter(|t| t.is_permanent()).collect()
    }

    pub fn temporary_tracks(&self) -> Vec<&Track> {
        self.tracks.iter().filter(|t| !t.is_permanent()).collect()
    }

    pub fn visible_tracks(&self) -> Vec<&Track> {
        self.tracks.iter().filter(|t| t.is_visible()).collect()
    }

    /// Delete every non-permanent track
    pub fn clear_temporary_tracks(&mut self, surface: &mut dyn MapSurface) {
        let mut removed = Vec::new();
        let mut index = 0;
        while index < self.tracks.len() {
            if self.tracks[index].is_permanent() {
                index += 1;
            } else {
                removed.push(self.tracks.remove(index));
            }
        }
        for mut track in removed {
            track.remove_from_map(surface);
        }
        self.notify_change();
    }

    /// Delete every track and purge the stored permanent set
    pub fn clear_all_tracks(&mut self, surface: &mut dyn MapSurface) {
        for track in &mut self.tracks {
            track.remove_from_map(surface);
        }
        self.tracks.clear();
        if let Err(e) = self.repository.clear() {
            error!("failed to purge stored tracks: {}", e);
        }
        self.notify_change();
    }

    /// Flip a track's visibility by materializing or removing its layers.
    /// Returns the new visibility state, false for an unknown id.
    pub fn toggle_track_visibility(
        &mut self,
        id: &str,
        surface: &mut dyn MapSurface,
        style_mode: StyleMode,
    ) -> bool {
        let visible = match self.tracks.iter_mut().find(|t| t.id() == id) {
            Some(track) => {
                if track.is_visible() {
                    track.remove_from_map(surface);
                } else {
                    track.add_to_map(surface, style_mode);
                }
                track.is_visible()
            }
            None => return false,
        };
        self.notify_change();
        visible
    }

    /// Recolor a track and repaint its line when visible. Returns whether
    /// the track was found.
    pub fn update_track_color(
        &mut self,
        id: &str,
        color: &str,
        surface: &mut dyn MapSurface,
        style_mode: StyleMode,
    ) -> bool {
        let permanent = match self.tracks.iter_mut().find(|t| t.id() == id) {
            Some(track) => {
                track.set_color(color);
                track.update_map_color(surface, style_mode);
                track.is_permanent()
            }
            None => return false,
        };
        if permanent {
            self.persist_permanent();
        }
        self.notify_change();
        true
    }

    /// Rename a track. Returns whether the track was found.
    pub fn rename_track(&mut self, id: &str, name: &str) -> bool {
        let permanent = match self.tracks.iter_mut().find(|t| t.id() == id) {
            Some(track) => {
                track.set_name(name);
                track.is_permanent()
            }
            None => return false,
        };
        if permanent {
            self.persist_permanent();
        }
        self.notify_change();
        true
    }

    /// Remove the rendering of every visible track except the given one
    pub fn hide_all_other_tracks(&mut self, except_id: &str, surface: &mut dyn MapSurface) {
        for track in &mut self.tracks {
            if track.id() != except_id && track.is_visible() {
                track.remove_from_map(surface);
            }
        }
        self.notify_change();
    }

    /// Fit the camera to a track's bounds with padding and an animated
    /// transition; no-op when the track or its bounds are unavailable
    pub fn zoom_to_track(&mut self, id: &str, surface: &mut dyn MapSurface) {
        let bounds = match self.get_track(id).and_then(|t| t.bounds()) {
            Some(bounds) => bounds,
            None => return,
        };
        if let Err(e) = surface.fit_bounds(bounds, FitBoundsOptions::default()) {
            error!("camera fit for track '{}' failed: {}", id, e);
        }
    }

    /// Promote a temporary track: a new permanent track with a fresh id
    /// carries over the original's waypoints, route and color, is shown
    /// immediately, and the original is deleted. Track identity is not
    /// preserved. Returns the new id, or None for an unknown or already
    /// permanent track.
    pub fn save_temporary_track_as_permanent(
        &mut self,
        id: &str,
        name: &str,
        surface: &mut dyn MapSurface,
        style_mode: StyleMode,
    ) -> Option<String> {
        let original = self.tracks.iter().find(|t| t.id() == id)?;
        if original.is_permanent() {
            return None;
        }

        let mut data = original.data().clone();
        data.id = format!("perm-{}", Utc::now().timestamp_millis());
        data.name = name.to_string();
        data.is_permanent = true;
        let new_id = data.id.clone();

        self.delete_track(id, surface);
        let mut track = Track::new(data);
        track.add_to_map(surface, style_mode);
        self.tracks.push(track);

        self.persist_permanent();
        self.notify_change();
        info!("saved temporary track '{}' as permanent '{}'", id, new_id);
        Some(new_id)
    }

    /// Remove and re-add every visible track, e.g. after a style mode flip
    pub fn refresh_visible_tracks(&mut self, surface: &mut dyn MapSurface, style_mode: StyleMode) {
        for track in &mut self.tracks {
            if track.is_visible() {
                track.remove_from_map(surface);
                track.add_to_map(surface, style_mode);
            }
        }
    }

    /// Record the most recently hovered track name, overwritten per event
    pub fn notify_feature_hovered(&mut self, feature_name: &str) {
        self.last_hovered_feature = Some(feature_name.to_string());
    }

    pub fn last_hovered_feature(&self) -> Option<&str> {
        self.last_hovered_feature.as_deref()
    }

    /// Register every stored track record, forced invisible regardless of
    /// its stored visibility. Corrupt storage is logged and treated as no
    /// saved data.
    pub fn load_from_storage(&mut self) {
        let records = match self.repository.load() {
            Ok(records) => records,
            Err(e) => {
                error!("failed to load stored tracks: {}", e);
                return;
            }
        };
        for mut data in records {
            data.is_visible = false;
            self.add_track(data);
        }
    }

    /// Re-serialize the permanent set; a storage failure is fatal to the
    /// operation, not to the process
    fn persist_permanent(&mut self) {
        let records: Vec<TrackData> = self
            .tracks
            .iter()
            .filter(|t| t.is_permanent())
            .map(|t| t.data().clone())
            .collect();
        if let Err(e) = self.repository.save(&records) {
            error!("failed to persist permanent tracks: {}", e);
        }
    }

    fn notify_change(&self) {
        if let Some(observer) = &self.observer {
            let snapshot: Vec<TrackData> = self.tracks.iter().map(|t| t.data().clone()).collect();
            observer(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{Route, RouteStats};
    use crate::storage::{KeyValueStore, MemoryStore, TrackRepository, PERMANENT_TRACKS_KEY};
    use crate::surface::{MemorySurface, ANCHOR_LAYER};
    use geojson::{Feature, FeatureCollection, Geometry, Value as GeoValue};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn sample_route(id: &str) -> Route {
        let feature = Feature {
            bbox: None,
            geometry: Some(Geometry::new(GeoValue::LineString(vec![
                vec![14.40, 50.08],
                vec![14.41, 50.09],
                vec![14.42, 50.10],
            ]))),
            id: None,
            properties: serde_json::from_value(serde_json::json!({
                "distance": 2300.0,
                "stress": 2,
                "surfaceSmoothness": "PAVED_GOOD",
                "slope": 1.0,
            }))
            .unwrap(),
            foreign_members: None,
        };
        Route {
            id: format!("route-{}", id),
            geojson: FeatureCollection {
                bbox: None,
                features: vec![feature],
                foreign_members: None,
            },
            sections: None,
            stats: Some(RouteStats {
                distance_meters: 2300.0,
                ..Default::default()
            }),
            labels: vec![],
            route_index: 0,
            name: "Route 1".to_string(),
            color: None,
        }
    }

    fn sample_data(id: &str, permanent: bool) -> TrackData {
        TrackData {
            id: id.to_string(),
            name: format!("Track {}", id),
            waypoints: vec![],
            route: sample_route(id),
            created_at: "2024-05-01T08:00:00Z".to_string(),
            is_permanent: permanent,
            color: None,
            is_visible: false,
        }
    }

    fn manager() -> TrackManager {
        TrackManager::new(TrackRepository::new(Box::new(MemoryStore::new())))
    }

    #[test]
    fn toggle_is_write_through() {
        let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
        let mut manager = manager();
        manager.add_track(sample_data("t1", false));

        let shown = manager.toggle_track_visibility("t1", &mut surface, StyleMode::TrackColor);
        assert!(shown);
        assert!(manager.get_track("t1").unwrap().is_visible());
        assert!(surface.has_layer("track-t1-solid"));
        assert!(surface.has_source("track-t1"));

        let shown = manager.toggle_track_visibility("t1", &mut surface, StyleMode::TrackColor);
        assert!(!shown);
        assert!(!manager.get_track("t1").unwrap().is_visible());
        assert_eq!(surface.layer_ids(), vec![ANCHOR_LAYER]);
        assert!(surface.source_ids().is_empty());

        // unknown ids report hidden
        assert!(!manager.toggle_track_visibility("nope", &mut surface, StyleMode::TrackColor));
    }

    #[test]
    fn promotion_creates_a_new_identity() {
        let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
        let mut manager = manager();
        manager.add_track(sample_data("temp-1", false));

        let new_id = manager
            .save_temporary_track_as_permanent(
                "temp-1",
                "Morning Loop",
                &mut surface,
                StyleMode::TrackColor,
            )
            .unwrap();

        assert_ne!(new_id, "temp-1");
        assert!(manager.get_track("temp-1").is_none());
        let promoted = manager.get_track(&new_id).unwrap();
        assert!(promoted.is_permanent());
        assert!(promoted.is_visible());
        assert_eq!(promoted.name(), "Morning Loop");
        assert_eq!(promoted.route().id, "route-temp-1");

        // promoting a permanent track is refused
        assert!(manager
            .save_temporary_track_as_permanent(
                &new_id,
                "Again",
                &mut surface,
                StyleMode::TrackColor
            )
            .is_none());
    }

    #[test]
    fn persistence_round_trips_and_forces_invisibility() {
        let store = Rc::new(RefCell::new(MemoryStore::new()));

        struct SharedStore(Rc<RefCell<MemoryStore>>);
        impl KeyValueStore for SharedStore {
            fn get(&self, key: &str) -> Result<Option<String>, crate::Error> {
                self.0.borrow().get(key)
            }
            fn set(&mut self, key: &str, value: &str) -> Result<(), crate::Error> {
                self.0.borrow_mut().set(key, value)
            }
            fn remove(&mut self, key: &str) -> Result<(), crate::Error> {
                self.0.borrow_mut().remove(key)
            }
        }

        let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
        let mut manager =
            TrackManager::new(TrackRepository::new(Box::new(SharedStore(Rc::clone(&store)))));
        manager.add_track(sample_data("temp-1", false));
        let new_id = manager
            .save_temporary_track_as_permanent(
                "temp-1",
                "Morning Loop",
                &mut surface,
                StyleMode::TrackColor,
            )
            .unwrap();
        manager.update_track_color(&new_id, "#123456", &mut surface, StyleMode::TrackColor);

        // a fresh manager over the same store sees the same records
        let mut restored =
            TrackManager::new(TrackRepository::new(Box::new(SharedStore(Rc::clone(&store)))));
        restored.load_from_storage();

        assert_eq!(restored.all_tracks().len(), 1);
        let track = &restored.all_tracks()[0];
        assert_eq!(track.name(), "Morning Loop");
        assert_eq!(track.color(), "#123456");
        assert!(track.is_permanent());
        // stored visibility was true, loading forces it off
        assert!(!track.is_visible());
    }

    #[test]
    fn deleting_a_permanent_track_updates_storage() {
        let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
        let mut manager = manager();
        manager.add_track(sample_data("perm-1", true));
        manager.rename_track("perm-1", "Keeper");

        assert!(manager.delete_track("perm-1", &mut surface));
        assert!(manager.get_track("perm-1").is_none());
        let raw = manager
            .repository
            .load()
            .expect("storage remains readable");
        assert!(raw.is_empty());

        assert!(!manager.delete_track("perm-1", &mut surface));
    }

    #[test]
    fn clear_temporary_spares_permanent_tracks() {
        let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
        let mut manager = manager();
        manager.add_track(sample_data("temp-1", false));
        manager.add_track(sample_data("perm-1", true));
        manager.add_track(sample_data("temp-2", false));
        manager.toggle_track_visibility("temp-1", &mut surface, StyleMode::TrackColor);

        manager.clear_temporary_tracks(&mut surface);

        assert_eq!(manager.all_tracks().len(), 1);
        assert_eq!(manager.all_tracks()[0].id(), "perm-1");
        assert_eq!(surface.layer_ids(), vec![ANCHOR_LAYER]);
    }

    #[test]
    fn clear_all_purges_registry_and_storage() {
        let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
        let mut manager = manager();
        manager.add_track(sample_data("perm-1", true));
        manager.rename_track("perm-1", "Saved");
        manager.add_track(sample_data("temp-1", false));

        manager.clear_all_tracks(&mut surface);

        assert!(manager.all_tracks().is_empty());
        assert!(manager.repository.load().unwrap().is_empty());
    }

    #[test]
    fn hide_all_others_leaves_one_visible() {
        let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
        let mut manager = manager();
        for id in ["a", "b", "c"] {
            manager.add_track(sample_data(id, false));
            manager.toggle_track_visibility(id, &mut surface, StyleMode::TrackColor);
        }

        manager.hide_all_other_tracks("b", &mut surface);

        assert!(!manager.get_track("a").unwrap().is_visible());
        assert!(manager.get_track("b").unwrap().is_visible());
        assert!(!manager.get_track("c").unwrap().is_visible());
        assert!(surface.has_layer("track-b-solid"));
        assert!(!surface.has_layer("track-a-solid"));
    }

    #[test]
    fn zoom_requests_a_padded_animated_fit() {
        let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
        let mut manager = manager();
        manager.add_track(sample_data("t1", false));

        manager.zoom_to_track("t1", &mut surface);
        manager.zoom_to_track("missing", &mut surface);

        let fits = surface.fit_requests();
        assert_eq!(fits.len(), 1);
        let (bounds, options) = &fits[0];
        assert_eq!(bounds.min_lon(), 14.40);
        assert_eq!(options.padding, 60);
        assert_eq!(options.duration_ms, 1000);
        assert!(options.essential);
    }

    #[test]
    fn hover_diagnostic_keeps_only_the_latest() {
        let mut manager = manager();
        assert_eq!(manager.last_hovered_feature(), None);
        manager.notify_feature_hovered("Track a");
        manager.notify_feature_hovered("Track b");
        assert_eq!(manager.last_hovered_feature(), Some("Track b"));
    }

    #[test]
    fn observer_receives_snapshots() {
        let seen = Rc::new(RefCell::new(0usize));
        let sink = Rc::clone(&seen);
        let mut surface = MemorySurface::with_anchor(ANCHOR_LAYER);
        let mut manager = manager();
        manager.set_observer(Box::new(move |_| {
            *sink.borrow_mut() += 1;
        }));
        manager.add_track(sample_data("t1", false));
        manager.toggle_track_visibility("t1", &mut surface, StyleMode::TrackColor);
        manager.delete_track("t1", &mut surface);
        assert_eq!(*seen.borrow(), 3);
    }

    #[test]
    fn corrupt_storage_loads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(PERMANENT_TRACKS_KEY, "[{broken").unwrap();
        let mut manager = TrackManager::new(TrackRepository::new(Box::new(store)));
        manager.load_from_storage();
        assert!(manager.all_tracks().is_empty());
    }
}
