//! Sgp30 command-line utility
//!
//! Copyright 2019 Ryan Kurte

extern crate linux_embedded_hal;
use linux_embedded_hal::{Delay, I2cdev};

extern crate structopt;
use structopt::StructOpt;

extern crate humantime;
use humantime::{Duration as HumanDuration};

#[macro_use] extern crate log;
extern crate simplelog;
use simplelog::{TermLogger, LevelFilter};

extern crate sensor_sgp30;
use sensor_sgp30::{Options as SessionOptions, Session, Sgp30Driver};
use sensor_sgp30::device::{self, DEFAULT_ADDRESS};

#[derive(StructOpt)]
#[structopt(name = "sgp30-util")]
/// A Command Line Interface (CLI) for interacting with a local Sgp30 air quality sensor over I2C
pub struct Options {

    /// Specify the i2c interface to use to connect to the sgp30 device
    #[structopt(short="d", long = "i2c", default_value = "/dev/i2c-1", env = "SGP30_I2C")]
    i2c: String,

    /// Specify the i2c address of the sgp30 device
    #[structopt(short="a", long = "address", default_value = "88")]
    address: u8,

    /// Specify period for taking measurements
    #[structopt(short = "p", long = "sample-period", default_value="1s")]
    pub period: HumanDuration,

    /// Share one measurement between TVOC and eCO2 reads taken within this window
    #[structopt(long = "freshness")]
    pub freshness: Option<HumanDuration>,

    /// Absolute humidity (g/m^3) for compensation
    #[structopt(long = "humidity")]
    pub humidity: Option<f32>,

    /// Skip serial number and feature set checks
    #[structopt(long = "no-probe")]
    pub no_probe: bool,

    /// Number of consecutive failed reads allowed prior to exiting
    #[structopt(long = "allowed-errors", default_value="3")]
    pub allowed_errors: usize,

    /// Enable verbose logging
    #[structopt(long = "log-level", default_value = "info")]
    level: LevelFilter,
}

fn main() {
    // Load options
    let opts = Options::from_args();

    // Setup logging
    if let Err(e) = TermLogger::init(opts.level, simplelog::Config::default()) {
        eprintln!("Error initialising logger: {:?}", e);
    }

    debug!("Connecting to I2C device");
    let i2c = match I2cdev::new(&opts.i2c) {
        Ok(v) => v,
        Err(e) => {
            error!("Error opening I2C device '{}': {:?}", &opts.i2c, e);
            std::process::exit(-1);
        }
    };

    if opts.address != DEFAULT_ADDRESS {
        debug!("Using non-default address: {:#x}", opts.address);
    }

    let mut driver = Sgp30Driver::with_address(i2c, opts.address, Delay);
    if opts.no_probe {
        driver = driver.without_probe();
    }

    let session_opts = SessionOptions{ freshness: opts.freshness.map(|d| *d) };
    let session = Session::with_options(driver, session_opts);

    debug!("Connecting to SGP30");
    if let Err(e) = session.ensure_initialized() {
        error!("Error connecting to SGP30: {}", e);
        std::process::exit(-2);
    }

    if let Some(serial) = session.with_driver(|d| d.serial()) {
        info!("Connected to SGP30 (serial: {:02x?})", serial);
    }

    if let Some(h) = opts.humidity {
        if let Err(e) = session.with_driver(|d| d.set_humidity(Some(h))) {
            error!("Error setting humidity compensation: {:?}", e);
            std::process::exit(-3);
        }
    }

    if *opts.period > device::MEASUREMENT_INTERVAL {
        warn!("Sample periods above {:?} degrade the on-chip baseline compensation", device::MEASUREMENT_INTERVAL);
    }

    let mut errors = 0;

    loop {
        debug!("Starting sensor read cycle");

        let tvoc = session.tvoc_or_sentinel();
        let eco2 = session.eco2_or_sentinel();

        match (tvoc.fault, eco2.fault) {
            (None, None) => {
                errors = 0;

                if device::is_warmup_sample(eco2.value, tvoc.value) {
                    debug!("Sensor warming up");
                }

                info!("TVOC: {} ppb, eCO2: {} ppm", tvoc.value, eco2.value);
            },
            (t, e) => {
                warn!("Error reading sensor data (TVOC: {:?}, eCO2: {:?})", t, e);
                errors += 1;
            },
        }

        if errors > opts.allowed_errors {
            error!("Exceeded maximum allowed read errors");
            std::process::exit(-4);
        }

        // Wait for the next measurement period
        std::thread::sleep(*opts.period);
    }
}
