//! Sgp30 driver capability, built over the `sgp30` device crate
//!
//! Copyright 2019 Ryan Kurte

use core::fmt::Debug;

use embedded_hal::blocking::delay::{DelayMs, DelayUs};
use embedded_hal::blocking::i2c;

use sgp30::{Humidity, ProductType, RawSignals, Sgp30};

use crate::base::Driver;
use crate::device::*;

/// Absolute humidity limit in g/m^3
const MAX_HUMIDITY: f32 = MAX_ABSOLUTE_HUMIDITY as f32 / 1000.0;

/// Smallest step of the 8.8 fixed-point humidity encoding, in g/m^3
const HUMIDITY_RESOLUTION: f32 = 1.0 / 256.0;

/// Sgp30 driver error object
#[derive(Debug)]
pub enum Sgp30Error<E> {
    /// Error from the underlying device or bus
    Bus(sgp30::Error<E>),
    /// Feature set reports a product other than the SGP30
    UnsupportedProduct,
    /// Absolute humidity outside the compensation range
    HumidityOutOfRange,
}

impl <E> From<sgp30::Error<E>> for Sgp30Error<E> {
    fn from(e: sgp30::Error<E>) -> Self {
        Sgp30Error::Bus(e)
    }
}

/// Sgp30 driver object
/// This is generic over an I2C connector and delay implementation, and latches the
/// values from each IAQ measurement for the following reads
pub struct Sgp30Driver<Conn, Delay> {
    sgp: Sgp30<Conn, Delay>,
    probe: bool,
    serial: Option<[u8; 6]>,
    tvoc: u16,
    eco2: u16,
}

impl <Conn, Delay, Err> Sgp30Driver<Conn, Delay> where
    Conn: i2c::Read<Error=Err> + i2c::Write<Error=Err> + i2c::WriteRead<Error=Err>,
    Delay: DelayUs<u16> + DelayMs<u16>,
    Err: Debug,
{
    /// Create a new driver at the default address
    pub fn new(conn: Conn, delay: Delay) -> Self {
        Self::with_address(conn, DEFAULT_ADDRESS, delay)
    }

    /// Create a new driver at the provided address
    pub fn with_address(conn: Conn, address: u8, delay: Delay) -> Self {
        Sgp30Driver{
            sgp: Sgp30::new(conn, address, delay),
            probe: true,
            serial: None,
            tvoc: WARMUP_TVOC,
            eco2: WARMUP_ECO2,
        }
    }

    /// Skip the serial number and feature set checks on initialisation
    pub fn without_probe(mut self) -> Self {
        self.probe = false;
        self
    }

    /// Serial number read while probing, if any
    pub fn serial(&self) -> Option<[u8; 6]> {
        self.serial
    }

    /// Read raw H2 and ethanol signals
    pub fn raw_signals(&mut self) -> Result<RawSignals, Sgp30Error<Err>> {
        // Device commands are rejected until IAQ init has been sent, this is a no-op once sent
        self.sgp.init()?;

        let s = self.sgp.measure_raw_signals()?;

        trace!("Raw signals H2: {} ethanol: {}", s.h2, s.ethanol);

        Ok(s)
    }

    /// Set absolute humidity compensation in g/m^3, or disable compensation with `None`.
    /// Values below the 8.8 fixed-point resolution also disable compensation, values up to
    /// the 256 g/m^3 limit saturate at the largest encodable value
    pub fn set_humidity(&mut self, absolute: Option<f32>) -> Result<(), Sgp30Error<Err>> {
        let h = match absolute {
            None => None,
            Some(v) if !(0.0..=MAX_HUMIDITY).contains(&v) => {
                return Err(Sgp30Error::HumidityOutOfRange);
            },
            Some(v) if v < HUMIDITY_RESOLUTION => None,
            Some(v) if v >= MAX_HUMIDITY - HUMIDITY_RESOLUTION => {
                Some(Humidity::new(0xFF, 0xFF).map_err(|_| Sgp30Error::HumidityOutOfRange)?)
            },
            Some(v) => {
                Some(Humidity::from_f32(v).map_err(|_| Sgp30Error::HumidityOutOfRange)?)
            },
        };

        debug!("Setting humidity compensation: {:?}", absolute);

        self.sgp.init()?;
        self.sgp.set_humidity(h.as_ref())?;

        Ok(())
    }

    fn check_device(&mut self) -> Result<(), Sgp30Error<Err>> {
        let serial = self.sgp.serial()?;
        debug!("Serial: {:02x?}", serial);

        let features = self.sgp.get_feature_set()?;
        if !matches!(features.product_type, ProductType::Sgp30) {
            warn!("Unexpected product type (version: {:#x})", features.product_version);
            return Err(Sgp30Error::UnsupportedProduct);
        }

        self.serial = Some(serial);

        Ok(())
    }
}

impl <Conn, Delay, Err> Driver for Sgp30Driver<Conn, Delay> where
    Conn: i2c::Read<Error=Err> + i2c::Write<Error=Err> + i2c::WriteRead<Error=Err>,
    Delay: DelayUs<u16> + DelayMs<u16>,
    Err: Debug,
{
    type Error = Sgp30Error<Err>;

    fn initialize(&mut self) -> Result<(), Self::Error> {
        if self.probe {
            self.check_device()?;
        }

        self.sgp.init()?;

        Ok(())
    }

    fn trigger_measurement(&mut self) -> Result<(), Self::Error> {
        let m = self.sgp.measure()?;

        trace!("Measured eCO2: {} ppm TVOC: {} ppb", m.co2eq_ppm, m.tvoc_ppb);

        self.eco2 = m.co2eq_ppm;
        self.tvoc = m.tvoc_ppb;

        Ok(())
    }

    fn read_tvoc(&mut self) -> u16 {
        self.tvoc
    }

    fn read_eco2(&mut self) -> u16 {
        self.eco2
    }
}
