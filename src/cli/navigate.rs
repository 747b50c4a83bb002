//! Define the navigate subcommand
use super::record::save_tour;
use super::{open_fix_source, resolve_place};
use crate::config::{Config, NavigationConfig};
use crate::gps::Location;
use crate::location::{LocationWatch, Position};
use crate::navigation::RouteTracker;
use crate::services::RoutingService;
use crate::tour::TourRecorder;
use crate::Error;
use chrono::Utc;
use log::{error, info, warn};
use std::path::PathBuf;
use structopt::clap::AppSettings;
use structopt::StructOpt;

/// Follow a route to a destination, the ride is recorded and saved as a tour
#[derive(Debug, StructOpt)]
#[structopt(setting = AppSettings::AllowLeadingHyphen)]
pub struct NavigateOpts {
    /// Destination as an address or "lat,lon"
    #[structopt(name = "TO", allow_hyphen_values = true)]
    to: String,
    /// Start of the route, defaults to the first GPS fix
    #[structopt(short, long, allow_hyphen_values = true)]
    from: Option<String>,
    /// File of "lat,lon[,timestamp_ms[,accuracy]]" lines, reads stdin if not provided or "-"
    #[structopt(short, long, parse(from_os_str))]
    input: Option<PathBuf>,
}

pub fn navigate_command(
    config: Config,
    opts: NavigateOpts,
) -> Result<(), Box<dyn std::error::Error>> {
    let geocoder = config.get_geocoding_handler()?;
    let router = config.get_routing_handler()?;
    let destination = match resolve_place(geocoder.as_ref(), &opts.to) {
        Some(location) => location,
        None => {
            return Err(Box::new(Error::Other(format!(
                "Could not resolve destination '{}'",
                opts.to
            ))))
        }
    };

    let watch = LocationWatch::start(open_fix_source(opts.input.as_deref())?);
    let first = watch.recv();
    let start = match opts.from.as_deref() {
        Some(place) => resolve_place(geocoder.as_ref(), place),
        None => first.map(|p| p.location),
    }
    .unwrap_or_else(|| {
        warn!("No start position available, using the default position");
        config.default_position()
    });

    // without a route the ride is still recorded
    let tracker = route_tracker(router.as_ref(), &start, &destination, config.navigation());
    let mut recorder = TourRecorder::new();
    follow_route(first.into_iter().chain(watch), tracker, &mut recorder);

    match recorder.finish(Utc::now()) {
        Some(tour) => save_tour(&config, &tour),
        None => {
            warn!("No fixes were recorded, nothing to save");
            Ok(())
        }
    }
}

/// Request the route and wrap it in a tracker, None if there is nothing to follow
fn route_tracker(
    router: &dyn RoutingService,
    start: &Location,
    destination: &Location,
    nav: &NavigationConfig,
) -> Option<RouteTracker> {
    match router.route(start, destination) {
        Ok(Some(route)) if route.coordinates.len() >= 2 => {
            info!("Navigating {:.1} km", route.distance_m / 1000.0);
            Some(RouteTracker::new(
                route.coordinates,
                nav.off_route_threshold_m,
                nav.arrival_radius_m,
            ))
        }
        Ok(Some(route)) => {
            error!("{}", Error::InsufficientRoutePoints(route.coordinates.len()));
            None
        }
        Ok(None) => {
            error!("No route found to {:?}", destination);
            None
        }
        Err(e) => {
            error!("Error fetching route: {}", e);
            None
        }
    }
}

/// Record positions until arrival or the end of the stream, returns true on arrival
fn follow_route<I>(
    positions: I,
    mut tracker: Option<RouteTracker>,
    recorder: &mut TourRecorder,
) -> bool
where
    I: IntoIterator<Item = Position>,
{
    for position in positions {
        recorder.record(&position);
        if let Some(tracker) = tracker.as_mut() {
            if report_progress(tracker, &position.location) {
                return true;
            }
        }
    }
    false
}

/// Log deviation changes and the remaining distance, returns true on arrival
fn report_progress(tracker: &mut RouteTracker, position: &Location) -> bool {
    let update = match tracker.update(position) {
        Some(update) => update,
        None => return false,
    };
    if update.left_route {
        warn!("Off route by {:.0} m", update.deviation_m);
    } else if update.rejoined {
        info!("Back on route");
    }
    info!(
        "Remaining distance: {:.2} km",
        update.remaining_distance_m / 1000.0
    );
    if update.arrived {
        info!("Arrived at destination");
    }
    update.arrived
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::Route;
    use reqwest::StatusCode;

    enum StubRouter {
        Found(Vec<Location>),
        NotFound,
        Failing,
    }

    impl RoutingService for StubRouter {
        fn route(&self, _: &Location, _: &Location) -> Result<Option<Route>, Error> {
            match self {
                StubRouter::Found(coordinates) => Ok(Some(Route {
                    coordinates: coordinates.clone(),
                    distance_m: 150.0,
                    duration_s: 20.0,
                })),
                StubRouter::NotFound => Ok(None),
                StubRouter::Failing => Err(Error::RequestError(
                    StatusCode::BAD_GATEWAY,
                    "router down".to_string(),
                )),
            }
        }
    }

    fn route() -> Vec<Location> {
        (0..5)
            .map(|i| Location::new(47.0, 8.0 + i as f64 * 0.0005))
            .collect()
    }

    fn ride(longitudes: &[f64]) -> Vec<Position> {
        let start = Utc::now();
        longitudes
            .iter()
            .enumerate()
            .map(|(i, lon)| {
                let time = start + chrono::Duration::seconds(i as i64 * 5);
                Position::new(Location::new(47.0, *lon), time)
            })
            .collect()
    }

    fn tracker(router: &StubRouter) -> Option<RouteTracker> {
        let (start, end) = (Location::new(47.0, 8.0), Location::new(47.0, 8.002));
        route_tracker(router, &start, &end, &NavigationConfig::default())
    }

    #[test]
    fn arrival_stops_reading_positions() {
        let tracker = tracker(&StubRouter::Found(route()));
        assert!(tracker.is_some());

        let mut positions = ride(&[8.0, 8.0008, 8.0015, 8.002, 8.003, 8.004]).into_iter();
        let mut recorder = TourRecorder::new();
        assert!(follow_route(positions.by_ref(), tracker, &mut recorder));
        assert_eq!(recorder.len(), 4);
        assert_eq!(positions.count(), 2);
    }

    #[test]
    fn rides_without_a_route_are_recorded_to_the_end() {
        for router in [StubRouter::NotFound, StubRouter::Failing] {
            let tracker = tracker(&router);
            assert!(tracker.is_none());

            let mut recorder = TourRecorder::new();
            assert!(!follow_route(ride(&[8.0, 8.001, 8.002]), tracker, &mut recorder));
            assert_eq!(recorder.len(), 3);
        }
    }

    #[test]
    fn single_point_routes_are_not_followed() {
        let router = StubRouter::Found(vec![Location::new(47.0, 8.002)]);
        assert!(tracker(&router).is_none());
    }
}
