use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::color::{DEFAULT_PALETTE, Rgb};
use crate::game::SpeedTier;

pub const CONFIG_ENV: &str = "NEON_SNAKE_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "neon_snake.json";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodAnimation {
    /// Food cycles through the hue wheel and glows.
    HueCycle,
    /// Plain red food with a red pickup pulse.
    Static,
}

/// Tick interval in milliseconds for each speed tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedLevels {
    pub slow: u64,
    pub normal: u64,
    pub fast: u64,
    pub ultra: u64,
}

impl Default for SpeedLevels {
    fn default() -> Self {
        Self {
            slow: 180,
            normal: 130,
            fast: 80,
            ultra: 50,
        }
    }
}

impl SpeedLevels {
    pub fn interval(&self, tier: SpeedTier) -> Duration {
        let ms = match tier {
            SpeedTier::Slow => self.slow,
            SpeedTier::Normal => self.normal,
            SpeedTier::Fast => self.fast,
            SpeedTier::Ultra => self.ultra,
        };
        Duration::from_millis(ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub segment_size: i32,
    pub food_size: u32,
    pub food_reward: u32,
    pub reset_delay_ms: u64,
    pub speed_levels: SpeedLevels,
    pub initial_speed: SpeedTier,
    pub palette: Vec<Rgb>,
    pub food_animation: FoodAnimation,
    pub credits: Option<String>,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Neon Snake".to_string(),
            width: 800,
            height: 600,
            segment_size: 20,
            food_size: 12,
            food_reward: 10,
            reset_delay_ms: 2000,
            speed_levels: SpeedLevels::default(),
            initial_speed: SpeedTier::Normal,
            palette: DEFAULT_PALETTE.to_vec(),
            food_animation: FoodAnimation::HueCycle,
            credits: None,
            log_level: "info".to_string(),
            log_file: Some(PathBuf::from("neon_snake.log")),
        }
    }
}

impl Config {
    /// Reads the config named by `NEON_SNAKE_CONFIG`, or `neon_snake.json` in
    /// the working directory. A missing default file yields the defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("loading config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("parsing config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.segment_size > 0, "segment_size must be positive");
        ensure!(self.food_size > 0, "food_size must be positive");
        ensure!(!self.palette.is_empty(), "palette must not be empty");
        let levels = self.speed_levels;
        ensure!(
            levels.slow > 0 && levels.normal > 0 && levels.fast > 0 && levels.ultra > 0,
            "speed levels must be positive"
        );
        // Room for the starting snake plus a ring of spawnable food cells.
        let min_half = self
            .segment_size
            .checked_mul(3)
            .with_context(|| format!("segment_size {} is too large", self.segment_size))?;
        if i64::from(self.width / 2) <= i64::from(min_half)
            || i64::from(self.height / 2) <= i64::from(min_half)
        {
            bail!(
                "field {}x{} is too small for segment size {}",
                self.width,
                self.height,
                self.segment_size
            );
        }
        self.log_level
            .parse::<log::LevelFilter>()
            .map_err(|_| anyhow::anyhow!("unknown log_level {:?}", self.log_level))?;
        Ok(())
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }

    pub fn reset_delay(&self) -> Duration {
        Duration::from_millis(self.reset_delay_ms)
    }
}
