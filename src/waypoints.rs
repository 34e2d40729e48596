//! Ordered waypoint list a user builds up as routing input
//!
//! The first and last waypoints are route origin and destination, anything
//! between is a via point. Peer of the track subsystem: no persistence and
//! no layer rendering, it only feeds route computation.
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A user placed point used as routing input
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub lng: f64,
    pub lat: f64,
}

type WaypointObserver = Box<dyn Fn(&[Waypoint])>;

/// Owns the ordered waypoint sequence and notifies an observer on change
#[derive(Default)]
pub struct WaypointManager {
    waypoints: Vec<Waypoint>,
    next_seq: u64,
    observer: Option<WaypointObserver>,
}

impl WaypointManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the single change observer, replacing any previous one
    pub fn set_observer(&mut self, observer: WaypointObserver) {
        self.observer = Some(observer);
    }

    /// Append a waypoint, returning its generated id
    pub fn add_waypoint(&mut self, lng: f64, lat: f64) -> String {
        let id = format!(
            "marker-{}-{}",
            Utc::now().timestamp_millis(),
            self.next_seq
        );
        self.next_seq += 1;
        self.waypoints.push(Waypoint {
            id: id.clone(),
            lng,
            lat,
        });
        self.notify_change();
        id
    }

    /// Remove a waypoint by id, false when it is not present
    pub fn remove_waypoint(&mut self, id: &str) -> bool {
        let before = self.waypoints.len();
        self.waypoints.retain(|wp| wp.id != id);
        let removed = self.waypoints.len() != before;
        if removed {
            self.notify_change();
        }
        removed
    }

    /// Apply a drag-end position update, false when the id is not present
    pub fn update_position(&mut self, id: &str, lng: f64, lat: f64) -> bool {
        match self.waypoints.iter_mut().find(|wp| wp.id == id) {
            Some(waypoint) => {
                waypoint.lng = lng;
                waypoint.lat = lat;
                self.notify_change();
                true
            }
            None => false,
        }
    }

    pub fn clear_all(&mut self) {
        self.waypoints.clear();
        self.notify_change();
    }

    /// Replace the whole sequence with the given positions
    pub fn set_all(&mut self, positions: &[(f64, f64)]) {
        self.waypoints.clear();
        for (lng, lat) in positions {
            let id = format!(
                "marker-{}-{}",
                Utc::now().timestamp_millis(),
                self.next_seq
            );
            self.next_seq += 1;
            self.waypoints.push(Waypoint {
                id,
                lng: *lng,
                lat: *lat,
            });
        }
        self.notify_change();
    }

    /// Waypoints in placement order
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn count(&self) -> usize {
        self.waypoints.len()
    }

    fn notify_change(&self) {
        if let Some(observer) = &self.observer {
            observer(&self.waypoints);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn waypoints_keep_placement_order() {
        let mut manager = WaypointManager::new();
        let a = manager.add_waypoint(14.0, 50.0);
        let b = manager.add_waypoint(15.0, 51.0);
        let c = manager.add_waypoint(16.0, 52.0);
        assert_eq!(manager.count(), 3);
        assert_ne!(a, b);
        assert_ne!(b, c);
        let order: Vec<&str> = manager.waypoints().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(order, vec![a.as_str(), b.as_str(), c.as_str()]);
    }

    #[test]
    fn removal_keeps_remaining_order() {
        let mut manager = WaypointManager::new();
        let a = manager.add_waypoint(14.0, 50.0);
        let b = manager.add_waypoint(15.0, 51.0);
        let c = manager.add_waypoint(16.0, 52.0);
        assert!(manager.remove_waypoint(&b));
        assert!(!manager.remove_waypoint(&b));
        let order: Vec<&str> = manager.waypoints().iter().map(|w| w.id.as_str()).collect();
        assert_eq!(order, vec![a.as_str(), c.as_str()]);
    }

    #[test]
    fn drag_end_updates_position() {
        let mut manager = WaypointManager::new();
        let id = manager.add_waypoint(14.0, 50.0);
        assert!(manager.update_position(&id, 14.5, 50.5));
        assert_eq!(manager.waypoints()[0].lng, 14.5);
        assert_eq!(manager.waypoints()[0].lat, 50.5);
        assert!(!manager.update_position("missing", 0.0, 0.0));
    }

    #[test]
    fn set_all_replaces_wholesale() {
        let mut manager = WaypointManager::new();
        manager.add_waypoint(1.0, 1.0);
        manager.set_all(&[(2.0, 2.0), (3.0, 3.0)]);
        assert_eq!(manager.count(), 2);
        assert_eq!(manager.waypoints()[0].lng, 2.0);
    }

    #[test]
    fn observer_sees_every_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut manager = WaypointManager::new();
        manager.set_observer(Box::new(move |waypoints| {
            sink.borrow_mut().push(waypoints.len());
        }));
        let id = manager.add_waypoint(1.0, 1.0);
        manager.add_waypoint(2.0, 2.0);
        manager.remove_waypoint(&id);
        manager.clear_all();
        assert_eq!(*seen.borrow(), vec![1, 2, 1, 0]);
    }
}
