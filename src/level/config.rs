//! Level header settings

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::Number;
use crate::Result;

/// Level color, an index into the game's 256-entry palette
///
/// Out-of-range values wrap modulo 256.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct Color(u8);

impl Color {
    pub fn new(value: i64) -> Self {
        Color(value.rem_euclid(256) as u8)
    }

    /// Uniformly random palette entry drawn from a caller-seeded RNG
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Color(rng.gen())
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<i64> for Color {
    fn from(value: i64) -> Self {
        Color::new(value)
    }
}

impl From<Color> for i64 {
    fn from(color: Color) -> Self {
        color.0 as i64
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Music selection: `(mode, track)`
///
/// Mode 0 plays the default, 1 prefers `track`, 2 forces it. Track 4 is
/// silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Music(pub i64, pub i64);

impl Music {
    pub const NONE: Music = Music(0, 0);

    pub fn preferred(track: i64) -> Self {
        Music(1, track)
    }

    pub fn forced(track: i64) -> Self {
        Music(2, track)
    }

    /// True when no `music` line is written
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

/// Everything the level header stores
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Collectables needed to finish the level
    pub segments: Number,
    pub gravity_scale: Number,
    /// Degrees; 270 is down
    pub gravity_direction: Number,
    pub start_full: bool,
    pub color: Color,
    pub music: Music,
    /// Ask the player to turn sound effects on
    pub recommend_sfx: bool,
    pub script_version: u32,
    /// Unix time in milliseconds written to the `_SAVE_TIME_` line
    pub save_time: u64,
}

impl LevelConfig {
    pub const DEFAULT_SCRIPT_VERSION: u32 = 8;
    pub const DEFAULT_SAVE_TIME: u64 = 1_721_799_879_000;

    /// Default header with a random color
    pub fn with_random_color<R: Rng>(rng: &mut R) -> Self {
        LevelConfig {
            color: Color::random(rng),
            ..LevelConfig::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for LevelConfig {
    fn default() -> Self {
        LevelConfig {
            segments: Number::Int(7),
            gravity_scale: Number::Int(1),
            gravity_direction: Number::Int(270),
            start_full: false,
            color: Color::default(),
            music: Music::NONE,
            recommend_sfx: false,
            script_version: LevelConfig::DEFAULT_SCRIPT_VERSION,
            save_time: LevelConfig::DEFAULT_SAVE_TIME,
        }
    }
}
