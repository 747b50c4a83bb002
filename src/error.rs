//! Defines the general error type for the crate and various conversions into it
use std::convert;
use std::fmt;

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    InsufficientRoutePoints(usize),
    InvalidConfigurationValue(String),
    InvalidPosition(String),
    Io(std::io::Error),
    Json(serde_json::Error),
    Other(String),
    Reqwest(reqwest::Error),
    RequestError(reqwest::StatusCode, String),
    Rusqlite(rusqlite::Error),
    TourDoesNotExistError(String),
    UnknownServiceHandler(String),
    Yaml(serde_yaml::Error),
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl convert::From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl convert::From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::Reqwest(err)
    }
}

impl convert::From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Error {
        Error::Rusqlite(err)
    }
}

impl convert::From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Error {
        Error::Yaml(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InsufficientRoutePoints(count) => write!(
                f,
                "Route has {} point(s), at least 2 are required",
                count
            ),
            Error::InvalidConfigurationValue(msg) => write!(f, "{}", msg),
            Error::InvalidPosition(msg) => write!(f, "Invalid position: {}", msg),
            Error::Io(e) => write!(f, "{}", e),
            Error::Json(e) => write!(f, "{}", e),
            Error::Other(msg) => write!(f, "{}", msg),
            Error::Reqwest(e) => write!(f, "{}", e),
            Error::RequestError(code, msg) => {
                write!(f, "Request failed with code: {} - {}", code, msg)
            }
            Error::Rusqlite(e) => write!(f, "{}", e),
            Error::TourDoesNotExistError(id) => {
                write!(f, "Tour with ID='{}' does not exist", id)
            }
            Error::UnknownServiceHandler(msg) => write!(f, "{}", msg),
            Error::Yaml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_include_status_and_message() {
        let err = Error::RequestError(
            reqwest::StatusCode::UNAUTHORIZED,
            "Invalid API key".to_string(),
        );
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("Invalid API key"));
    }

    #[test]
    fn io_errors_convert() {
        let err: Error = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(_)));
    }
}
