//! Page-level settings.
//!
//! Every field is optional in the page file and falls back to the timings the
//! gallery has always used.

use std::time::Duration;

use serde::Deserialize;

pub const MIN_GRID_COLUMNS: usize = 1;
pub const MAX_GRID_COLUMNS: usize = 10;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Delay between showing the page and registering its triggers.
    pub startup_delay_ms: u64,
    /// Delay between inserting a media element and starting its fade-in.
    pub fade_in_delay_ms: u64,
    /// Offsets of the close stages, measured from the close request.
    pub close_hide_ms: u64,
    pub close_mark_hidden_ms: u64,
    pub close_teardown_ms: u64,
    /// Edge length of decoded thumbnails, in pixels.
    pub thumbnail_size: u32,
    pub grid_columns: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            startup_delay_ms: 1500,
            fade_in_delay_ms: 10,
            close_hide_ms: 500,
            close_mark_hidden_ms: 600,
            close_teardown_ms: 900,
            thumbnail_size: 96,
            grid_columns: 4,
        }
    }
}

impl Settings {
    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }

    pub fn fade_in_delay(&self) -> Duration {
        Duration::from_millis(self.fade_in_delay_ms)
    }

    pub fn grid_columns(&self) -> usize {
        self.grid_columns.clamp(MIN_GRID_COLUMNS, MAX_GRID_COLUMNS)
    }
}
