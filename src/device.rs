//! Sgp30 device definitions
//!
//! Copyright 2019 Ryan Kurte

use core::time::Duration;

/// Sgp30 default I2C address
pub const DEFAULT_ADDRESS: u8 = 0x58;

/// Interval at which IAQ measurements should be triggered.
/// The on-chip baseline compensation assumes a 1 Hz measurement cadence
pub const MEASUREMENT_INTERVAL: Duration = Duration::from_secs(1);

/// Period following IAQ init during which the device reports fixed values
/// (`WARMUP_ECO2` / `WARMUP_TVOC`) rather than real measurements
pub const WARMUP_PERIOD: Duration = Duration::from_secs(15);

/// eCO2 value (ppm) reported during warm-up
pub const WARMUP_ECO2: u16 = 400;

/// TVOC value (ppb) reported during warm-up
pub const WARMUP_TVOC: u16 = 0;

/// Upper bound for absolute humidity compensation, in mg/m^3
pub const MAX_ABSOLUTE_HUMIDITY: u32 = 256_000;

/// Returns true if a reading pair matches the fixed warm-up output
pub fn is_warmup_sample(eco2: u16, tvoc: u16) -> bool {
    eco2 == WARMUP_ECO2 && tvoc == WARMUP_TVOC
}
