//! Tour records, the summary metrics computed for them and the recorder used during a ride
use crate::gps::{route_length, Location};
use crate::location::Position;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A single (latitude, longitude, timestamp) sample of a recorded tour
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    pub lat: f64,
    pub lng: f64,
    /// milliseconds since the unix epoch
    pub timestamp: i64,
}

impl RoutePoint {
    pub fn location(&self) -> Location {
        Location::new(self.lat, self.lng)
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

impl From<&Position> for RoutePoint {
    fn from(position: &Position) -> Self {
        RoutePoint {
            lat: position.location.latitude(),
            lng: position.location.longitude(),
            timestamp: position.timestamp.timestamp_millis(),
        }
    }
}

/// A completed recording with summary metrics, stored as one row of the backend's tours table
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// distance in kilometers
    #[serde(default, deserialize_with = "null_as_default")]
    pub distance: f64,
    /// duration in seconds
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: f64,
    /// average speed in km/h
    #[serde(default, alias = "avg_speed", deserialize_with = "null_as_default")]
    pub average_speed: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub route_points: Vec<RoutePoint>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub year: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub month: u32,
}

/// Backend rows carry every column, unset ones arrive as null
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Tour {
    /// Build a tour from its recorded points, computing distance, duration and average speed
    pub fn from_route_points(route_points: Vec<RoutePoint>, created_at: DateTime<Utc>) -> Self {
        let trace: Vec<Location> = route_points.iter().map(RoutePoint::location).collect();
        let distance = route_length(&trace) / 1000.0;
        let duration = match (route_points.first(), route_points.last()) {
            (Some(first), Some(last)) => (last.timestamp - first.timestamp).max(0) as f64 / 1000.0,
            _ => 0.0,
        };
        let average_speed = if duration > 0.0 {
            distance / (duration / 3600.0)
        } else {
            0.0
        };

        Tour {
            id: None,
            created_at: Some(created_at),
            distance,
            duration,
            average_speed,
            route_points,
            year: created_at.year(),
            month: created_at.month(),
        }
    }

    /// Year the tour was created, falling back to created_at for rows without the column set
    pub fn year(&self) -> Option<i32> {
        if self.year > 0 {
            Some(self.year)
        } else {
            self.created_at.map(|t| t.year())
        }
    }

    /// Month (1-12) the tour was created, falling back to created_at for rows without it
    pub fn month(&self) -> Option<u32> {
        if (1..=12).contains(&self.month) {
            Some(self.month)
        } else {
            self.created_at.map(|t| t.month())
        }
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        match self.route_points.first() {
            Some(point) => point.time(),
            None => self.created_at,
        }
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        match self.route_points.last() {
            Some(point) => point.time(),
            None => {
                let duration = Duration::milliseconds((self.duration.max(0.0) * 1000.0) as i64);
                self.created_at.and_then(|t| t.checked_add_signed(duration))
            }
        }
    }

    /// Return the recorded trace as a list of locations
    pub fn trace(&self) -> Vec<Location> {
        self.route_points.iter().map(RoutePoint::location).collect()
    }
}

/// Format a duration in seconds as hours and minutes, e.g. "1h 5m" or "42m"
pub fn format_duration(seconds: f64) -> String {
    let total_minutes = (seconds.max(0.0) / 60.0).floor() as u64;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Accumulates fixes while a recording session is running
#[derive(Debug, Default)]
pub struct TourRecorder {
    points: Vec<RoutePoint>,
}

impl TourRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, position: &Position) {
        self.points.push(RoutePoint::from(position));
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Stop recording and return the finished tour, None if no fixes were recorded
    pub fn finish(self, now: DateTime<Utc>) -> Option<Tour> {
        if self.points.is_empty() {
            None
        } else {
            Some(Tour::from_route_points(self.points, now))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::haversine_distance;

    fn point(lat: f64, lng: f64, seconds: i64) -> RoutePoint {
        RoutePoint {
            lat,
            lng,
            timestamp: 1_700_000_000_000 + seconds * 1000,
        }
    }

    #[test]
    fn summary_metrics_are_computed_from_points() {
        let points = vec![point(47.0, 8.0, 0), point(47.0, 8.1, 600), point(47.1, 8.1, 1200)];
        let expected_km = (haversine_distance(&Location::new(47.0, 8.0), &Location::new(47.0, 8.1))
            + haversine_distance(&Location::new(47.0, 8.1), &Location::new(47.1, 8.1)))
            / 1000.0;
        let created = Utc.with_ymd_and_hms(2025, 6, 14, 18, 30, 0).unwrap();
        let tour = Tour::from_route_points(points, created);

        assert!((tour.distance - expected_km).abs() < 1e-9);
        assert_eq!(tour.duration, 1200.0);
        assert!((tour.average_speed - expected_km * 3.0).abs() < 1e-9);
        assert_eq!((tour.year, tour.month), (2025, 6));
        assert_eq!(tour.id, None);
    }

    #[test]
    fn single_point_tour_has_zero_speed() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let tour = Tour::from_route_points(vec![point(47.0, 8.0, 0)], created);
        assert_eq!(tour.distance, 0.0);
        assert_eq!(tour.duration, 0.0);
        assert_eq!(tour.average_speed, 0.0);
    }

    #[test]
    fn recorder_only_returns_tours_with_points() {
        let now = Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap();
        assert!(TourRecorder::new().finish(now).is_none());

        let mut recorder = TourRecorder::new();
        recorder.record(&Position::new(Location::new(47.0, 8.0), now));
        recorder.record(&Position::new(Location::new(47.0, 8.01), now + Duration::seconds(60)));
        assert_eq!(recorder.len(), 2);
        let tour = recorder.finish(now).unwrap();
        assert_eq!(tour.route_points.len(), 2);
        assert_eq!(tour.duration, 60.0);
    }

    #[test]
    fn rows_deserialize_with_backend_columns() {
        let row = r#"{
            "id": "0d6c5f3e-3b52-4d38-9a2e-6f4ad0f9b1a1",
            "created_at": "2025-07-04T10:15:00.123456+00:00",
            "distance": 42.5,
            "duration": 3600,
            "avg_speed": 42.5,
            "route_points": [{"lat": 47.0, "lng": 8.0, "timestamp": 1720088100000}]
        }"#;
        let tour: Tour = serde_json::from_str(row).unwrap();
        assert_eq!(tour.average_speed, 42.5);
        assert_eq!(tour.year(), Some(2025));
        assert_eq!(tour.month(), Some(7));
        assert_eq!(tour.route_points[0].lng, 8.0);
    }

    #[test]
    fn inserts_omit_backend_assigned_columns() {
        let created = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let mut tour = Tour::from_route_points(vec![point(47.0, 8.0, 0)], created);
        tour.created_at = None;
        let json = serde_json::to_value(&tour).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
        assert!(json.get("average_speed").is_some());
    }

    #[test]
    fn start_and_end_fall_back_to_created_at() {
        let created = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        let tour = Tour {
            id: None,
            created_at: Some(created),
            distance: 10.0,
            duration: 5400.0,
            average_speed: 6.7,
            route_points: Vec::new(),
            year: 0,
            month: 0,
        };
        assert_eq!(tour.start_time(), Some(created));
        assert_eq!(tour.end_time(), Some(created + Duration::minutes(90)));
        assert_eq!(tour.month(), Some(5));
    }

    #[test]
    fn null_columns_fall_back_to_created_at() {
        let rows = r#"[{
            "id": "5",
            "created_at": "2024-11-02T07:45:00+00:00",
            "distance": null,
            "duration": null,
            "avg_speed": null,
            "route_points": null,
            "year": null,
            "month": null
        }]"#;
        let tours: Vec<Tour> = serde_json::from_str(rows).unwrap();
        assert_eq!(tours[0].year(), Some(2024));
        assert_eq!(tours[0].month(), Some(11));
        assert_eq!(tours[0].distance, 0.0);
        assert!(tours[0].route_points.is_empty());
    }

    #[test]
    fn absurd_durations_have_no_end_time() {
        let created = Utc.with_ymd_and_hms(2025, 5, 1, 8, 0, 0).unwrap();
        let tour = Tour {
            id: None,
            created_at: Some(created),
            distance: 0.0,
            duration: 1e300,
            average_speed: 0.0,
            route_points: Vec::new(),
            year: 2025,
            month: 5,
        };
        assert_eq!(tour.end_time(), None);
    }

    #[test]
    fn durations_format_as_hours_and_minutes() {
        assert_eq!(format_duration(59.0), "0m");
        assert_eq!(format_duration(42.0 * 60.0), "42m");
        assert_eq!(format_duration(3900.0), "1h 5m");
    }
}
