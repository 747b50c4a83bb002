//! Track progress along a planned route and flag deviations from it
use crate::gps::{
    haversine_distance, nearest_route_index, point_to_segment_distance, route_length, Location,
};

/// Default distance from the route, in meters, before a position counts as off route
pub const DEFAULT_OFF_ROUTE_THRESHOLD_M: f64 = 50.0;
/// Default distance to the final route point, in meters, that counts as arriving
pub const DEFAULT_ARRIVAL_RADIUS_M: f64 = 30.0;

/// Result of matching a single position against the planned route
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NavigationUpdate {
    /// Index of the closest route point at or after the previous progress
    pub nearest_index: usize,
    /// Distance to the closest segment adjacent to `nearest_index`
    pub deviation_m: f64,
    pub off_route: bool,
    /// The position moved off the route with this update
    pub left_route: bool,
    /// The position came back onto the route with this update
    pub rejoined: bool,
    /// Length of the route still ahead, measured from `nearest_index`
    pub remaining_distance_m: f64,
    pub arrived: bool,
}

/// Matches a stream of positions against a pre-fetched route polyline
#[derive(Clone, Debug)]
pub struct RouteTracker {
    route: Vec<Location>,
    progress: usize,
    off_route: bool,
    off_route_threshold_m: f64,
    arrival_radius_m: f64,
}

impl RouteTracker {
    pub fn new(route: Vec<Location>, off_route_threshold_m: f64, arrival_radius_m: f64) -> Self {
        RouteTracker {
            route,
            progress: 0,
            off_route: false,
            off_route_threshold_m,
            arrival_radius_m,
        }
    }

    /// Return the portion of the route that hasn't been passed yet
    pub fn remaining_route(&self) -> &[Location] {
        if self.route.is_empty() {
            &self.route
        } else {
            &self.route[self.progress..]
        }
    }

    /// Index of the route point the last update matched
    pub fn progress(&self) -> usize {
        self.progress
    }

    pub fn is_off_route(&self) -> bool {
        self.off_route
    }

    /// Match a new position against the route, returns None if the route is empty
    pub fn update(&mut self, position: &Location) -> Option<NavigationUpdate> {
        let nearest = nearest_route_index(&self.route, position, self.progress)?;
        self.progress = nearest;

        let deviation_m = self.deviation(position, nearest);
        let off_route = deviation_m > self.off_route_threshold_m;
        let left_route = off_route && !self.off_route;
        let rejoined = !off_route && self.off_route;
        self.off_route = off_route;

        let last = self.route.len() - 1;
        let arrived = nearest == last
            && haversine_distance(position, &self.route[last]) <= self.arrival_radius_m;

        Some(NavigationUpdate {
            nearest_index: nearest,
            deviation_m,
            off_route,
            left_route,
            rejoined,
            remaining_distance_m: route_length(self.remaining_route()),
            arrived,
        })
    }

    /// Shortest distance from the position to the segments touching route[index]
    fn deviation(&self, position: &Location, index: usize) -> f64 {
        let vertex = &self.route[index];
        let before = index
            .checked_sub(1)
            .map(|i| point_to_segment_distance(position, &self.route[i], vertex));
        let after = self
            .route
            .get(index + 1)
            .map(|next| point_to_segment_distance(position, vertex, next));

        match (before, after) {
            (Some(b), Some(a)) => b.min(a),
            (Some(d), None) | (None, Some(d)) => d,
            (None, None) => haversine_distance(position, vertex),
        }
    }
}
