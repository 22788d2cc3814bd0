// quality.rs - texture quality tiers derived from the viewport width
//
// The viewport width is process-global: the viewer writes it on resize and
// panoramas read it whenever a quality hint is needed. Nothing is cached.

use once_cell::sync::OnceCell;
use std::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ImageQuality {
    Low = 1,
    Fair = 2,
    Medium = 3,
    High = 4,
    SuperHigh = 5,
}

impl ImageQuality {
    /// Step function over the viewport width. Negative or NaN widths fall through to `Low`.
    pub fn from_viewport_width(width: f32) -> Self {
        if (0.0..=800.0).contains(&width) {
            ImageQuality::Fair
        } else if width > 800.0 && width <= 1280.0 {
            ImageQuality::Medium
        } else if width > 1280.0 && width <= 1920.0 {
            ImageQuality::High
        } else if width > 1920.0 {
            ImageQuality::SuperHigh
        } else {
            ImageQuality::Low
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }
}

static VIEWPORT_WIDTH: OnceCell<RwLock<Option<f32>>> = OnceCell::new();

fn cell() -> &'static RwLock<Option<f32>> {
    VIEWPORT_WIDTH.get_or_init(|| RwLock::new(None))
}

pub fn set_viewport_width(width: f32) {
    if let Ok(mut w) = cell().write() {
        *w = Some(width);
    }
}

/// `None` until a viewer reported a size.
pub fn viewport_width() -> Option<f32> {
    cell().read().ok().and_then(|w| *w)
}

/// Quality hint for the current global viewport.
pub fn current_zoom_level() -> ImageQuality {
    viewport_width()
        .map(ImageQuality::from_viewport_width)
        .unwrap_or(ImageQuality::Low)
}
