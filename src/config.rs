//! Demo configuration
//!
//! Tunables for the ball simulation and the checkerboard backdrop, loadable
//! from a JSON file. Missing fields fall back to the defaults below, so a
//! config file only needs the values it changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::display::{rgba, Pixel};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Number of balls spawned at startup
    pub num_balls: usize,
    /// Velocity components are drawn from [-max_speed, max_speed]
    pub max_speed: i32,
    pub min_radius: i32,
    pub max_radius: i32,
    /// Simulation step interval; drawing is paced independently
    pub frame_interval_ms: u64,
    /// Stop advancing after this many steps (None = run forever)
    pub max_steps: Option<u32>,
    /// Checkerboard cell edge in pixels
    pub checker_size: i32,
    /// The two checkerboard colors
    pub background: [Pixel; 2],
    /// Ball fill colors, packed RGBA
    pub palette: Vec<Pixel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_balls: 7,
            max_speed: 5,
            min_radius: 25,
            max_radius: 60,
            frame_interval_ms: 25,
            max_steps: None,
            checker_size: 16,
            background: [rgba(0, 0, 80, 255), rgba(40, 40, 40, 255)],
            palette: vec![
                0xE2275EFF, 0x752A2EFF, 0x83B23DFF, 0xD1100FFF, 0xDD651BFF, 0xFF0000FF,
                0x00FF00FF, 0x0000FFFF, 0xFF00FFFF, 0xFFFFFFFF, 0x808080FF,
            ],
        }
    }
}

impl Config {
    /// Save config to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }

    /// Reject configurations the simulation cannot start from: an empty
    /// palette, an inverted radius range, or balls too big to place fully
    /// inside the window.
    pub fn validate(&self, width: u32, height: u32) -> Result<(), String> {
        if self.palette.is_empty() {
            return Err("config: palette must not be empty".to_string());
        }
        if self.min_radius < 1 || self.max_radius < self.min_radius {
            return Err(format!(
                "config: bad radius range [{}, {}]",
                self.min_radius, self.max_radius
            ));
        }
        if self.max_speed < 0 {
            return Err(format!("config: max_speed {} is negative", self.max_speed));
        }
        if self.checker_size < 1 {
            return Err(format!(
                "config: checker_size {} must be at least 1",
                self.checker_size
            ));
        }
        if self.frame_interval_ms == 0 {
            return Err("config: frame_interval_ms must be at least 1".to_string());
        }
        // A max-radius ball needs room for its whole disk: x is placed in
        // [r, width - r - 1], so that interval must be non-empty.
        let limit = 2 * self.max_radius + 1;
        if (width as i32) <= limit || (height as i32) <= limit {
            return Err(format!(
                "config: {}x{} window too small for max_radius {}",
                width, height, self.max_radius
            ));
        }
        Ok(())
    }
}
