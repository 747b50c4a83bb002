//! Module with GPS specific structures and great-circle geometry helpers
use serde::{Deserialize, Serialize};

/// Mean earth radius in meters
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Stores a single geospatial point
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// latitude coordinate in degrees
    latitude: f64,
    /// longitude coordinate in degrees
    longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Location {
            latitude,
            longitude,
        }
    }

    /// Return latitude in degrees
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Return longitude in degrees
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Parse a "lat,lon" pair, returns None if the string isn't a valid coordinate
pub fn parse_coordinates(src: &str) -> Option<Location> {
    let mut parts = src.split(',');
    let lat: f64 = parts.next()?.trim().parse().ok()?;
    let lon: f64 = parts.next()?.trim().parse().ok()?;
    if parts.next().is_some() || !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon)
    {
        return None;
    }
    Some(Location::new(lat, lon))
}

/// Great-circle distance between two locations in meters
pub fn haversine_distance(a: &Location, b: &Location) -> f64 {
    EARTH_RADIUS_M * angular_distance(a, b)
}

/// Central angle between two locations in radians
fn angular_distance(a: &Location, b: &Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

/// Initial bearing from a to b in radians, measured clockwise from north
pub fn initial_bearing(a: &Location, b: &Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x)
}

/// Distance in meters from a point to the great-circle segment between a and b.
///
/// The point is projected onto the great circle through a and b using the cross-track and
/// along-track distances. Projections falling outside the segment are clamped to the closest
/// endpoint, and a zero length segment degrades to the distance between `point` and `a`.
pub fn point_to_segment_distance(point: &Location, a: &Location, b: &Location) -> f64 {
    let d12 = angular_distance(a, b);
    let d13 = angular_distance(a, point);
    if d12 < f64::EPSILON || d13 < f64::EPSILON {
        return EARTH_RADIUS_M * d13;
    }

    let theta = initial_bearing(a, point) - initial_bearing(a, b);
    if theta.cos() < 0.0 {
        // point lies behind the segment start
        return EARTH_RADIUS_M * d13;
    }

    let cross_track = (d13.sin() * theta.sin()).clamp(-1.0, 1.0).asin();
    let along_track = (d13.cos() / cross_track.cos()).clamp(-1.0, 1.0).acos();
    if along_track > d12 {
        return haversine_distance(point, b);
    }

    EARTH_RADIUS_M * cross_track.abs()
}

/// Return the index of the route vertex closest to `position`, only considering `route[start..]`.
///
/// Ties resolve to the earliest index so progress along a route doesn't jump ahead.
pub fn nearest_route_index(route: &[Location], position: &Location, start: usize) -> Option<usize> {
    route
        .iter()
        .enumerate()
        .skip(start)
        .map(|(i, loc)| (i, haversine_distance(loc, position)))
        .fold(None, |best: Option<(usize, f64)>, (i, dist)| match best {
            Some((_, best_dist)) if best_dist <= dist => best,
            _ => Some((i, dist)),
        })
        .map(|(i, _)| i)
}

/// Total length of a polyline in meters
pub fn route_length(route: &[Location]) -> f64 {
    route
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zurich() -> Location {
        Location::new(47.3769, 8.5472)
    }

    fn bern() -> Location {
        Location::new(46.9480, 7.4474)
    }

    #[test]
    fn haversine_is_zero_for_identical_points() {
        assert_eq!(haversine_distance(&zurich(), &zurich()), 0.0);
    }

    #[test]
    fn haversine_is_symmetric() {
        let there = haversine_distance(&zurich(), &bern());
        let back = haversine_distance(&bern(), &zurich());
        assert!((there - back).abs() < 1e-6);
        // roughly 95 km as the crow flies
        assert!(there > 90_000.0 && there < 100_000.0, "got {}", there);
    }

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let d = haversine_distance(&Location::new(0.0, 0.0), &Location::new(0.0, 1.0));
        assert!((d - 111_195.0).abs() < 50.0, "got {}", d);
    }

    #[test]
    fn bearing_points_east_along_the_equator() {
        let b = initial_bearing(&Location::new(0.0, 0.0), &Location::new(0.0, 1.0));
        assert!((b.to_degrees() - 90.0).abs() < 1e-9);
    }

    #[test]
    fn segment_distance_is_zero_on_the_segment() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(0.0, 0.02);
        let on = Location::new(0.0, 0.01);
        assert!(point_to_segment_distance(&on, &a, &b) < 0.01);
        assert!(point_to_segment_distance(&a, &a, &b) < 0.01);
        assert!(point_to_segment_distance(&b, &a, &b) < 0.01);
    }

    #[test]
    fn segment_distance_is_perpendicular_inside_the_segment() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(0.0, 0.02);
        let p = Location::new(0.001, 0.01);
        let expected = haversine_distance(&p, &Location::new(0.0, 0.01));
        let actual = point_to_segment_distance(&p, &a, &b);
        assert!((actual - expected).abs() < 0.5, "{} != {}", actual, expected);
    }

    #[test]
    fn segment_distance_clamps_to_endpoints() {
        let a = Location::new(47.0, 8.0);
        let b = Location::new(47.0, 8.01);
        let before = Location::new(47.0, 7.99);
        let after = Location::new(47.001, 8.02);
        let d_before = point_to_segment_distance(&before, &a, &b);
        let d_after = point_to_segment_distance(&after, &a, &b);
        assert!((d_before - haversine_distance(&before, &a)).abs() < 1e-6);
        assert!((d_after - haversine_distance(&after, &b)).abs() < 1e-6);
    }

    #[test]
    fn zero_length_segment_degrades_to_point_distance() {
        let a = bern();
        let p = zurich();
        let d = point_to_segment_distance(&p, &a, &a);
        assert!((d - haversine_distance(&p, &a)).abs() < 1e-6);
    }

    #[test]
    fn nearest_index_is_monotonic_along_the_route() {
        let route: Vec<Location> = (0..50)
            .map(|i| Location::new(47.0, 8.0 + i as f64 * 0.0005))
            .collect();
        let mut last = 0;
        for step in 0..200 {
            // drive along the route slightly north of the line
            let position = Location::new(47.00005, 8.0 + step as f64 * 0.000125);
            let idx = nearest_route_index(&route, &position, 0).unwrap();
            assert!(idx >= last, "index went from {} to {}", last, idx);
            last = idx;
        }
        assert_eq!(last, 49);
    }

    #[test]
    fn nearest_index_respects_start_offset() {
        let route = vec![zurich(), bern(), zurich()];
        assert_eq!(nearest_route_index(&route, &zurich(), 0), Some(0));
        assert_eq!(nearest_route_index(&route, &zurich(), 1), Some(2));
        assert_eq!(nearest_route_index(&route, &zurich(), 3), None);
        assert_eq!(nearest_route_index(&[], &zurich(), 0), None);
    }

    #[test]
    fn route_length_sums_legs() {
        let route = vec![zurich(), bern(), zurich()];
        let leg = haversine_distance(&zurich(), &bern());
        assert!((route_length(&route) - 2.0 * leg).abs() < 1e-6);
        assert_eq!(route_length(&route[..1]), 0.0);
    }

    #[test]
    fn coordinates_parse_from_pairs() {
        assert_eq!(parse_coordinates("47.3769, 8.5472"), Some(zurich()));
        assert_eq!(parse_coordinates("Bahnhofstrasse 1, Zürich"), None);
        assert_eq!(parse_coordinates("95.0,8.0"), None);
        assert_eq!(parse_coordinates("47.0,8.0,1.0"), None);
    }
}
