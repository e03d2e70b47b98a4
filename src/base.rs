//! Base driver capability consumed by the sensor session
//!
//! Copyright 2019 Ryan Kurte

use core::fmt::Debug;

/// Driver API for an IAQ gas sensor
///
/// This is the native interface the [`Session`](crate::Session) sequences, implementations
/// are expected to already speak to the physical part (see [`Sgp30Driver`](crate::Sgp30Driver)).
/// Every call is blocking and must return in bounded time.
pub trait Driver {
    /// Error returned by the underlying device
    type Error: Debug;

    /// Initialise the device, this may reset or probe the hardware
    fn initialize(&mut self) -> Result<(), Self::Error>;

    /// Trigger a single measurement cycle
    fn trigger_measurement(&mut self) -> Result<(), Self::Error>;

    /// Read the TVOC value (ppb) produced by the last measurement cycle
    fn read_tvoc(&mut self) -> u16;

    /// Read the eCO2 value (ppm) produced by the last measurement cycle
    fn read_eco2(&mut self) -> u16;
}

/// Forward the driver API through mutable references, allowing sessions over borrowed drivers
impl <D> Driver for &mut D where
    D: Driver + ?Sized,
{
    type Error = D::Error;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        (**self).initialize()
    }

    fn trigger_measurement(&mut self) -> Result<(), Self::Error> {
        (**self).trigger_measurement()
    }

    fn read_tvoc(&mut self) -> u16 {
        (**self).read_tvoc()
    }

    fn read_eco2(&mut self) -> u16 {
        (**self).read_eco2()
    }
}
