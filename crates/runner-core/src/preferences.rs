//! User display preferences.

use serde::Serialize;

pub const MIN_FONT_SIZE: u8 = 10;
pub const MAX_FONT_SIZE: u8 = 20;
pub const DEFAULT_FONT_SIZE: u8 = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionPreferences {
    pub dark_mode: bool,
    pub font_size_px: u8,
}

impl Default for SessionPreferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            font_size_px: DEFAULT_FONT_SIZE,
        }
    }
}

impl SessionPreferences {
    /// Rebuilds preferences from their stored string forms. Absent or
    /// malformed values fall back to the defaults independently.
    pub fn from_stored(dark_mode: Option<&str>, font_size: Option<&str>) -> Self {
        let defaults = Self::default();

        let dark_mode = match dark_mode {
            Some("true") => true,
            Some("false") => false,
            _ => defaults.dark_mode,
        };

        let font_size_px = font_size
            .and_then(|value| value.trim().parse::<u8>().ok())
            .filter(|size| (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(size))
            .unwrap_or(defaults.font_size_px);

        Self {
            dark_mode,
            font_size_px,
        }
    }

    pub fn toggle_dark_mode(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    pub fn increase_font_size(&mut self) -> u8 {
        self.font_size_px = self.font_size_px.saturating_add(1).min(MAX_FONT_SIZE);
        self.font_size_px
    }

    pub fn decrease_font_size(&mut self) -> u8 {
        self.font_size_px = self.font_size_px.saturating_sub(1).max(MIN_FONT_SIZE);
        self.font_size_px
    }

    pub fn can_increase_font_size(&self) -> bool {
        self.font_size_px < MAX_FONT_SIZE
    }

    pub fn can_decrease_font_size(&self) -> bool {
        self.font_size_px > MIN_FONT_SIZE
    }

    pub fn theme_name(&self) -> &'static str {
        if self.dark_mode {
            "dark"
        } else {
            "light"
        }
    }
}
