//! Sgp30 indoor air quality sensor session
//!
//! This sequences the mandatory SGP30 measurement protocol (initialise once, trigger a
//! measurement, read the result) behind two simple accessors, [`Session::tvoc`] and
//! [`Session::eco2`], which may be called from any context without knowledge of the sensor.
//!
//! ```no_run
//! use linux_embedded_hal::{Delay, I2cdev};
//! use sensor_sgp30::{Session, Sgp30Driver};
//!
//! let i2c = I2cdev::new("/dev/i2c-1").unwrap();
//! let session = Session::new(Sgp30Driver::new(i2c, Delay));
//!
//! match session.tvoc() {
//!     Ok(v) => println!("TVOC: {} ppb", v),
//!     Err(e) => println!("TVOC unavailable: {}", e),
//! }
//! ```
//!
//! Copyright 2019 Ryan Kurte

use core::fmt::{self, Debug};

#[macro_use] extern crate log;

pub mod base;
pub use base::Driver;

pub mod device;

pub mod session;
pub use session::{Options, Reading, Session, SessionState, SENTINEL};

pub mod driver;
pub use driver::{Sgp30Driver, Sgp30Error};

/// Session error object
/// This is generic over the underlying driver error, which is retained as the cause
#[derive(Debug)]
pub enum Error<DriverErr> {
    /// Initialisation has not yet succeeded
    NotReady(DriverErr),
    /// The measurement trigger did not complete (sensor busy, bus error, device absent)
    MeasurementFailed(DriverErr),
}

/// Error kind, reported alongside sentinel readings
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ErrorKind {
    /// Initialisation has not yet succeeded
    SensorNotReady,
    /// The measurement trigger did not complete
    MeasurementFailed,
}

impl <DriverErr> Error<DriverErr> {
    /// Fetch the kind of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotReady(_) => ErrorKind::SensorNotReady,
            Error::MeasurementFailed(_) => ErrorKind::MeasurementFailed,
        }
    }

    /// Fetch the underlying driver error
    pub fn cause(&self) -> &DriverErr {
        match self {
            Error::NotReady(e) | Error::MeasurementFailed(e) => e,
        }
    }
}

impl <DriverErr: Debug> fmt::Display for Error<DriverErr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotReady(e) => write!(f, "sensor not ready: {:?}", e),
            Error::MeasurementFailed(e) => write!(f, "measurement failed: {:?}", e),
        }
    }
}

impl <DriverErr: Debug> std::error::Error for Error<DriverErr> {}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::SensorNotReady => write!(f, "sensor not ready"),
            ErrorKind::MeasurementFailed => write!(f, "measurement failed"),
        }
    }
}
