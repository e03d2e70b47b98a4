//! Sensor session, sequencing initialisation and measure-then-read over a driver
//!
//! Copyright 2019 Ryan Kurte

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::base::Driver;
use crate::{Error, ErrorKind};

/// Value returned by the sentinel accessors when a reading is unavailable.
/// This is also a valid sensor reading, check [`Reading::fault`] to tell them apart
pub const SENTINEL: u16 = 0;

/// Session initialisation state
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SessionState {
    /// Initialisation has not yet succeeded
    Uninitialized,
    /// Device initialised, measurements may be triggered
    Ready,
}

/// Session options
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Options {
    /// Reuse the sample from a successful trigger for this long, allowing paired
    /// TVOC / eCO2 reads to share one measurement cycle.
    /// `None` triggers a fresh measurement on every call
    pub freshness: Option<Duration>,
}

/// Reading with failure indicator, as returned by the sentinel accessors
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Reading {
    /// Measured value, or [`SENTINEL`] on failure
    pub value: u16,
    /// Failure kind, `None` if `value` is a real reading
    pub fault: Option<ErrorKind>,
}

impl Reading {
    /// Check whether this holds a real reading rather than the sentinel
    pub fn is_valid(&self) -> bool {
        self.fault.is_none()
    }
}

impl <E> From<Result<u16, Error<E>>> for Reading {
    fn from(r: Result<u16, Error<E>>) -> Self {
        match r {
            Ok(value) => Reading{ value, fault: None },
            Err(e) => Reading{ value: SENTINEL, fault: Some(e.kind()) },
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
enum Metric {
    Tvoc,
    Eco2,
}

/// Both values from one measurement cycle
struct Sample {
    at: Instant,
    tvoc: u16,
    eco2: u16,
}

impl Sample {
    fn get(&self, metric: Metric) -> u16 {
        match metric {
            Metric::Tvoc => self.tvoc,
            Metric::Eco2 => self.eco2,
        }
    }
}

/// State guarded by the session lock
struct Inner<D> {
    driver: D,
    state: SessionState,
    latched: Option<Sample>,
}

impl <D: Driver> Inner<D> {
    fn ensure_initialized(&mut self) -> Result<(), Error<D::Error>> {
        if self.state == SessionState::Ready {
            return Ok(());
        }

        trace!("Initialising sensor");

        match self.driver.initialize() {
            Ok(()) => {
                debug!("Sensor initialised");
                self.state = SessionState::Ready;
                Ok(())
            },
            Err(e) => {
                warn!("Sensor initialisation failed: {:?}", e);
                Err(Error::NotReady(e))
            },
        }
    }

    fn trigger(&mut self) -> Result<(), Error<D::Error>> {
        trace!("Triggering measurement");

        self.driver.trigger_measurement().map_err(|e| {
            warn!("Measurement trigger failed: {:?}", e);
            Error::MeasurementFailed(e)
        })
    }

    fn read(&mut self, metric: Metric) -> u16 {
        let v = match metric {
            Metric::Tvoc => self.driver.read_tvoc(),
            Metric::Eco2 => self.driver.read_eco2(),
        };

        trace!("Read {:?}: {}", metric, v);

        v
    }
}

/// Sensor session object
///
/// This owns the driver, the initialisation state and the lock serialising access to the device.
/// Each accessor call holds the lock across the full initialise / trigger / read sequence,
/// so a session may be shared between threads (via `Arc`) whenever the driver is `Send`.
pub struct Session<D> {
    inner: Mutex<Inner<D>>,
    opts: Options,
}

impl <D> Session<D> where
    D: Driver,
{
    /// Create a new session over the provided driver.
    /// The driver is not touched until the first call requiring initialisation
    pub fn new(driver: D) -> Self {
        Self::with_options(driver, Options::default())
    }

    /// Create a new session with the provided options
    pub fn with_options(driver: D, opts: Options) -> Self {
        let inner = Inner{ driver, state: SessionState::Uninitialized, latched: None };
        Session{ inner: Mutex::new(inner), opts }
    }

    /// Initialise the underlying device if this has not already succeeded
    pub fn ensure_initialized(&self) -> Result<(), Error<D::Error>> {
        self.lock().ensure_initialized()
    }

    /// Fetch the current session state
    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    /// Check whether initialisation has succeeded
    pub fn is_ready(&self) -> bool {
        self.state() == SessionState::Ready
    }

    /// Measure total volatile organic compounds (ppb)
    pub fn tvoc(&self) -> Result<u16, Error<D::Error>> {
        self.measure(Metric::Tvoc)
    }

    /// Measure equivalent CO2 (ppm)
    pub fn eco2(&self) -> Result<u16, Error<D::Error>> {
        self.measure(Metric::Eco2)
    }

    /// Measure TVOC, returning [`SENTINEL`] and a fault kind on failure
    pub fn tvoc_or_sentinel(&self) -> Reading {
        self.tvoc().into()
    }

    /// Measure eCO2, returning [`SENTINEL`] and a fault kind on failure
    pub fn eco2_or_sentinel(&self) -> Reading {
        self.eco2().into()
    }

    /// Run a closure against the driver while holding the session lock.
    /// Used for driver specific operations (ie. humidity compensation) that must not
    /// interleave with a measurement
    pub fn with_driver<R, F>(&self, f: F) -> R where
        F: FnOnce(&mut D) -> R,
    {
        f(&mut self.lock().driver)
    }

    /// Consume the session, returning the underlying driver
    pub fn into_inner(self) -> D {
        self.inner.into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .driver
    }

    // Driver calls never leave the inner state half-updated, so a poisoned lock is recovered
    fn lock(&self) -> MutexGuard<'_, Inner<D>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn measure(&self, metric: Metric) -> Result<u16, Error<D::Error>> {
        let mut inner = self.lock();

        inner.ensure_initialized()?;

        let window = match self.opts.freshness {
            Some(w) => w,
            None => {
                inner.trigger()?;
                return Ok(inner.read(metric));
            },
        };

        if let Some(s) = &inner.latched {
            if s.at.elapsed() < window {
                trace!("Reusing sample from {:?} ago", s.at.elapsed());
                return Ok(s.get(metric));
            }
        }

        inner.latched = None;

        let at = Instant::now();
        inner.trigger()?;

        let tvoc = inner.read(Metric::Tvoc);
        let eco2 = inner.read(Metric::Eco2);
        let sample = Sample{ at, tvoc, eco2 };

        let v = sample.get(metric);
        inner.latched = Some(sample);

        Ok(v)
    }
}
