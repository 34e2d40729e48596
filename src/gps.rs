//! Module with GPS specific structures and geometry helpers

/// A `[longitude, latitude]` coordinate pair in degrees, matching the
/// ordering used by GeoJSON geometries
pub type LonLat = [f64; 2];

/// Mean earth radius in meters
const EARTH_RADIUS_METERS: f64 = 6371e3;

/// A coordinate aligned bounding region spanning a set of locations
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl Bounds {
    /// Create a degenerate region containing only the given coordinate
    pub fn from_coordinate(coord: LonLat) -> Self {
        Bounds {
            min_lon: coord[0],
            min_lat: coord[1],
            max_lon: coord[0],
            max_lat: coord[1],
        }
    }

    /// Compute the smallest region covering every coordinate, None if empty
    pub fn from_coordinates(coords: &[LonLat]) -> Option<Self> {
        let mut iter = coords.iter();
        let first = iter.next()?;
        let mut bounds = Bounds::from_coordinate(*first);
        for coord in iter {
            bounds.extend(*coord);
        }
        Some(bounds)
    }

    /// Grow the region to include the given coordinate
    pub fn extend(&mut self, coord: LonLat) {
        if coord[0] < self.min_lon {
            self.min_lon = coord[0];
        }
        if coord[0] > self.max_lon {
            self.max_lon = coord[0];
        }
        if coord[1] < self.min_lat {
            self.min_lat = coord[1];
        }
        if coord[1] > self.max_lat {
            self.max_lat = coord[1];
        }
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Check whether the coordinate lies inside the region
    pub fn contains(&self, coord: LonLat) -> bool {
        coord[0] >= self.min_lon
            && coord[0] <= self.max_lon
            && coord[1] >= self.min_lat
            && coord[1] <= self.max_lat
    }
}

/// Great-circle distance between two coordinates in meters
pub fn haversine_distance(from: LonLat, to: LonLat) -> f64 {
    let d_lat = (to[1] - from[1]).to_radians();
    let d_lon = (to[0] - from[0]).to_radians();
    let lat1 = from[1].to_radians();
    let lat2 = to[1].to_radians();

    let a = (d_lat / 2.0).sin() * (d_lat / 2.0).sin()
        + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin() * (d_lon / 2.0).sin();
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Linear interpolation between two coordinates, fraction in [0, 1]
pub fn interpolate_point(from: LonLat, to: LonLat, fraction: f64) -> LonLat {
    [
        from[0] + (to[0] - from[0]) * fraction,
        from[1] + (to[1] - from[1]) * fraction,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_equator_degree() {
        // one degree of longitude at the equator is roughly 111.19 km
        let dist = haversine_distance([0.0, 0.0], [1.0, 0.0]);
        assert!((dist - 111_195.0).abs() < 100.0, "got {}", dist);
    }

    #[test]
    fn haversine_zero_for_same_point() {
        assert_eq!(haversine_distance([12.5, 48.1], [12.5, 48.1]), 0.0);
    }

    #[test]
    fn interpolation_endpoints_and_midpoint() {
        let a = [10.0, 50.0];
        let b = [11.0, 51.0];
        assert_eq!(interpolate_point(a, b, 0.0), a);
        assert_eq!(interpolate_point(a, b, 1.0), b);
        assert_eq!(interpolate_point(a, b, 0.5), [10.5, 50.5]);
    }

    #[test]
    fn bounds_cover_all_coordinates() {
        let coords = [[14.4, 50.0], [14.6, 49.9], [14.5, 50.2]];
        let bounds = Bounds::from_coordinates(&coords).unwrap();
        assert_eq!(bounds.min_lon(), 14.4);
        assert_eq!(bounds.max_lon(), 14.6);
        assert_eq!(bounds.min_lat(), 49.9);
        assert_eq!(bounds.max_lat(), 50.2);
        for coord in coords {
            assert!(bounds.contains(coord));
        }
    }

    #[test]
    fn bounds_of_empty_slice_is_none() {
        assert!(Bounds::from_coordinates(&[]).is_none());
    }
}
