use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::constants::{CLOCK_SPEED, MAX_CLOCK_SPEED, MAX_SAVED_STATES};
use crate::error::Chip8Error;

/// # Quirks
/// Interpreters disagree on a handful of instructions and test ROMs probe each
/// behaviour separately. Every quirk defaults to the commonly expected
/// (modern) behaviour.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quirks {
    /// 8XY6/8XYE copy Vy into Vx before shifting (COSMAC VIP)
    pub shift_uses_vy: bool,
    /// FX55/FX65 leave I pointing one past the last register touched (COSMAC VIP)
    pub load_store_increments_i: bool,
    /// Sprite pixels past the right/bottom edge wrap around instead of being clipped
    pub wrap_sprites: bool,
}

impl Quirks {
    /// The behaviour of the original COSMAC VIP interpreter
    pub fn cosmac() -> Self {
        Quirks {
            shift_uses_vy: true,
            load_store_increments_i: true,
            wrap_sprites: false,
        }
    }
}

/// Tunables for a `Chip8`
///
/// Hosts typically build one with `Config::default()` or load it from JSON:
/// ```
/// let config = emu8_core::Config::from_json(r#"{ "clock_speed": 700 }"#).unwrap();
/// assert_eq!(config.clock_speed, 700);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Instructions executed per second of wall-clock time passed to `Chip8::update`,
    /// at most `MAX_CLOCK_SPEED`
    pub clock_speed: u32,
    /// How many past states are kept for `Chip8::reverse_cycle`; 0 disables rewinding
    pub history_depth: usize,
    /// Seed for the random number instruction; entropy is used when unset
    pub seed: Option<u64>,
    pub quirks: Quirks,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            clock_speed: CLOCK_SPEED,
            history_depth: MAX_SAVED_STATES,
            seed: None,
            quirks: Quirks::default(),
        }
    }
}

impl Config {
    /// Parse a config from a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, Chip8Error> {
        let config: Config = serde_json::from_str(json)?;
        if config.clock_speed > MAX_CLOCK_SPEED {
            return Err(Chip8Error::Config(serde_json::Error::custom(format!(
                "clock_speed {} Hz is above the {} Hz maximum",
                config.clock_speed, MAX_CLOCK_SPEED
            ))));
        }
        Ok(config)
    }
}
