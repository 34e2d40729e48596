//! Defines the general error type for the crate and various conversions into it
use std::convert;
use std::fmt;

/// General error type for the crate
#[derive(Debug)]
pub enum Error {
    EmptyRoute(String),
    Gpx(gpx::errors::GpxError),
    InsufficientWaypoints(usize),
    InvalidConfigurationValue(String),
    Io(std::io::Error),
    RequestError(reqwest::StatusCode, String),
    RequestInFlight,
    Reqwest(reqwest::Error),
    Rusqlite(rusqlite::Error),
    SerdeJson(serde_json::Error),
    TrackNotFound(String),
    UnknownServiceHandler(String),
    Other(String),
}

impl convert::From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Error {
        Error::Rusqlite(err)
    }
}

impl convert::From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error::Io(err)
    }
}

impl convert::From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::SerdeJson(err)
    }
}

impl convert::From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::Reqwest(err)
    }
}

impl convert::From<gpx::errors::GpxError> for Error {
    fn from(err: gpx::errors::GpxError) -> Error {
        Error::Gpx(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyRoute(id) => {
                write!(f, "Route for track '{}' contains no coordinates", id)
            }
            Error::Gpx(e) => write!(f, "{}", e),
            Error::InsufficientWaypoints(count) => write!(
                f,
                "At least 2 waypoints are required to compute a route, got {}",
                count
            ),
            Error::InvalidConfigurationValue(msg) => write!(f, "{}", msg),
            Error::Io(e) => write!(f, "{}", e),
            Error::RequestError(code, msg) => {
                write!(f, "Request failed with code: {} - {}", code, msg)
            }
            Error::RequestInFlight => {
                write!(f, "A route computation is already in flight")
            }
            Error::Reqwest(e) => write!(f, "{}", e),
            Error::Rusqlite(e) => write!(f, "{}", e),
            Error::SerdeJson(e) => write!(f, "{}", e),
            Error::TrackNotFound(id) => write!(f, "Track with id='{}' does not exist", id),
            Error::UnknownServiceHandler(msg) => write!(f, "{}", msg),
            Error::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}
