//! Aggregate statistics over a set of tours
use crate::tour::Tour;

/// Summary values over a set of tours, rounded to two decimals
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TourStatistics {
    pub total_distance_km: f64,
    pub total_hours: f64,
    pub tour_count: usize,
    pub mean_average_speed: f64,
    pub max_average_speed: f64,
    pub mean_distance_km: f64,
}

impl TourStatistics {
    pub fn from_tours(tours: &[&Tour]) -> Self {
        let tour_count = tours.len();
        let total_distance: f64 = tours.iter().map(|t| t.distance).sum();
        let total_seconds: f64 = tours.iter().map(|t| t.duration).sum();
        let max_speed = tours.iter().map(|t| t.average_speed).fold(0.0, f64::max);
        let (mean_speed, mean_distance) = if tour_count > 0 {
            let speeds: f64 = tours.iter().map(|t| t.average_speed).sum();
            (speeds / tour_count as f64, total_distance / tour_count as f64)
        } else {
            (0.0, 0.0)
        };

        TourStatistics {
            total_distance_km: round2(total_distance),
            total_hours: round2(total_seconds / 3600.0),
            tour_count,
            mean_average_speed: round2(mean_speed),
            max_average_speed: round2(max_speed),
            mean_distance_km: round2(mean_distance),
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn filter_by_year(tours: &[Tour], year: i32) -> Vec<&Tour> {
    tours.iter().filter(|t| t.year() == Some(year)).collect()
}

/// Return the tours created in the given month (1-12) of a year
pub fn filter_by_month(tours: &[Tour], year: i32, month: u32) -> Vec<&Tour> {
    tours
        .iter()
        .filter(|t| t.year() == Some(year) && t.month() == Some(month))
        .collect()
}

/// Total distance in km per month of the given year, January first
pub fn monthly_distance(tours: &[Tour], year: i32) -> [f64; 12] {
    let mut months = [0.0; 12];
    for tour in filter_by_year(tours, year) {
        if let Some(month) = tour.month() {
            months[(month - 1) as usize] += tour.distance;
        }
    }
    for value in months.iter_mut() {
        *value = round2(*value);
    }
    months
}

/// Distinct years with tours, newest first, always including the current year
pub fn available_years(tours: &[Tour], current_year: i32) -> Vec<i32> {
    let mut years: Vec<i32> = tours.iter().filter_map(Tour::year).collect();
    years.push(current_year);
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tour(year: i32, month: u32, distance: f64, duration: f64, speed: f64) -> Tour {
        Tour {
            id: None,
            created_at: None,
            distance,
            duration,
            average_speed: speed,
            route_points: Vec::new(),
            year,
            month,
        }
    }

    fn sample() -> Vec<Tour> {
        vec![
            tour(2024, 5, 120.0, 7200.0, 60.0),
            tour(2024, 5, 30.5, 1800.0, 61.0),
            tour(2024, 8, 200.25, 10800.0, 66.75),
            tour(2023, 9, 80.0, 3600.0, 80.0),
        ]
    }

    #[test]
    fn statistics_for_a_year() {
        let tours = sample();
        let stats = TourStatistics::from_tours(&filter_by_year(&tours, 2024));
        assert_eq!(stats.tour_count, 3);
        assert_eq!(stats.total_distance_km, 350.75);
        assert_eq!(stats.total_hours, 5.5);
        assert_eq!(stats.max_average_speed, 66.75);
        assert_eq!(stats.mean_average_speed, 62.58);
        assert_eq!(stats.mean_distance_km, 116.92);
    }

    #[test]
    fn statistics_for_no_tours_are_zero() {
        assert_eq!(TourStatistics::from_tours(&[]), TourStatistics::default());
    }

    #[test]
    fn month_filter_and_aggregation() {
        let tours = sample();
        assert_eq!(filter_by_month(&tours, 2024, 5).len(), 2);
        assert!(filter_by_month(&tours, 2024, 6).is_empty());

        let months = monthly_distance(&tours, 2024);
        assert_eq!(months[4], 150.5);
        assert_eq!(months[7], 200.25);
        assert_eq!(months.iter().sum::<f64>(), 350.75);
    }

    #[test]
    fn years_include_current_and_are_sorted() {
        assert_eq!(available_years(&sample(), 2026), vec![2026, 2024, 2023]);
        assert_eq!(available_years(&sample(), 2024), vec![2024, 2023]);
        assert_eq!(available_years(&[], 2026), vec![2026]);
    }
}
