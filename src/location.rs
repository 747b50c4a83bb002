//! Device position sources and a background watch that streams fixes to the caller
use crate::gps::{parse_coordinates, Location};
use crate::Error;
use chrono::{DateTime, TimeZone, Utc};
use log::{debug, error, trace};
use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A single fix reported by the device
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub location: Location,
    pub timestamp: DateTime<Utc>,
    /// horizontal accuracy in meters if the device reports one
    pub accuracy: Option<f64>,
}

impl Position {
    pub fn new(location: Location, timestamp: DateTime<Utc>) -> Self {
        Position {
            location,
            timestamp,
            accuracy: None,
        }
    }
}

/// trait that defines a source of device positions
pub trait PositionSource {
    /// Block until the next fix is available, Ok(None) signals the source is exhausted
    fn next_position(&mut self) -> Result<Option<Position>, Error>;
}

impl<S: PositionSource + ?Sized> PositionSource for Box<S> {
    fn next_position(&mut self) -> Result<Option<Position>, Error> {
        (**self).next_position()
    }
}

/// Reads fixes from a line oriented stream in `lat,lon[,timestamp_ms[,accuracy]]` format
pub struct FixReader<R: BufRead> {
    reader: R,
    line_number: usize,
}

impl<R: BufRead> FixReader<R> {
    pub fn new(reader: R) -> Self {
        FixReader {
            reader,
            line_number: 0,
        }
    }
}

impl<R: BufRead> PositionSource for FixReader<R> {
    fn next_position(&mut self) -> Result<Option<Position>, Error> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return parse_fix(trimmed).map(Some).ok_or_else(|| {
                Error::InvalidPosition(format!("line {}: '{}'", self.line_number, trimmed))
            });
        }
    }
}

fn parse_fix(line: &str) -> Option<Position> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() < 2 || fields.len() > 4 {
        return None;
    }
    let location = parse_coordinates(&fields[..2].join(","))?;
    let timestamp = match fields.get(2) {
        Some(ms) => Utc.timestamp_millis_opt(ms.parse().ok()?).single()?,
        None => Utc::now(),
    };
    let accuracy = match fields.get(3) {
        Some(acc) => Some(acc.parse().ok()?),
        None => None,
    };
    Some(Position {
        location,
        timestamp,
        accuracy,
    })
}

/// Return the first fix from the source, falling back to a known position if there isn't one
pub fn current_position<S: PositionSource + ?Sized>(
    source: &mut S,
    fallback: Location,
) -> Location {
    match source.next_position() {
        Ok(Some(position)) => position.location,
        Ok(None) => {
            debug!("No position available, using fallback {:?}", fallback);
            fallback
        }
        Err(e) => {
            error!("Error getting current position: {}", e);
            fallback
        }
    }
}

/// A running subscription to position updates, fixes are read on a background thread
pub struct LocationWatch {
    receiver: Receiver<Position>,
    stopped: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl LocationWatch {
    /// Start reading fixes from the source until it is exhausted or the watch is stopped
    pub fn start<S: PositionSource + Send + 'static>(mut source: S) -> Self {
        let (sender, receiver) = mpsc::channel();
        let stopped = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stopped);
        let handle = thread::spawn(move || {
            while !flag.load(Ordering::Relaxed) {
                match source.next_position() {
                    Ok(Some(position)) => {
                        trace!("Received position: {:?}", position);
                        if sender.send(position).is_err() {
                            break; // receiver is gone
                        }
                    }
                    Ok(None) => break,
                    Err(e) => error!("Watch position error: {}", e),
                }
            }
            debug!("Position watch finished");
        });

        LocationWatch {
            receiver,
            stopped,
            handle: Some(handle),
        }
    }

    /// Block until the next fix arrives, returns None once the source is exhausted
    pub fn recv(&self) -> Option<Position> {
        self.receiver.recv().ok()
    }

    /// Stop the watch without waiting for the reader thread.
    ///
    /// A reader blocked on its source exits once the next read returns.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stopped.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() && handle.join().is_err() {
                error!("Position watch thread panicked");
            }
        }
    }
}

impl Iterator for LocationWatch {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

impl Drop for LocationWatch {
    fn drop(&mut self) {
        self.shutdown();
    }
}
