//! Dual-unit position and size values.
//!
//! Each value carries the canonical fixed-point (EMU) pair and the derived
//! render-pixel pair. The serialized shape exposes both, but every mutation
//! goes through a write method that recomputes the sibling representation,
//! so the two pairs always describe the same physical point within one
//! pixel of rounding.

use crate::common::unit::{emu_to_px_x, emu_to_px_y, px_to_emu_x, px_to_emu_y};
use serde::{Deserialize, Serialize};

/// A point on the page, in EMU and in render pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Horizontal offset in EMU
    pub x: i64,
    /// Vertical offset in EMU
    pub y: i64,
    /// Horizontal offset in canvas pixels
    pub x_px: f64,
    /// Vertical offset in canvas pixels
    pub y_px: f64,
}

impl Position {
    /// Build a position from a fixed-point EMU pair.
    pub fn from_emu(x: i64, y: i64) -> Self {
        Self {
            x,
            y,
            x_px: emu_to_px_x(x),
            y_px: emu_to_px_y(y),
        }
    }

    /// Build a position from a canvas-pixel pair.
    pub fn from_px(x_px: f64, y_px: f64) -> Self {
        Self {
            x: px_to_emu_x(x_px),
            y: px_to_emu_y(y_px),
            x_px,
            y_px,
        }
    }

    /// Overwrite the supplied pixel axes, keeping the EMU pair in sync.
    pub fn set_px(&mut self, x_px: Option<f64>, y_px: Option<f64>) {
        if let Some(x) = x_px {
            self.x_px = x;
            self.x = px_to_emu_x(x);
        }
        if let Some(y) = y_px {
            self.y_px = y;
            self.y = px_to_emu_y(y);
        }
    }

    /// Shift by a pixel delta, keeping the EMU pair in sync.
    pub fn translate_px(&mut self, dx: f64, dy: f64) {
        self.set_px(Some(self.x_px + dx), Some(self.y_px + dy));
    }
}

/// An extent on the page, in EMU and in render pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Size {
    /// Width in EMU
    pub width: i64,
    /// Height in EMU
    pub height: i64,
    /// Width in canvas pixels
    pub width_px: f64,
    /// Height in canvas pixels
    pub height_px: f64,
}

impl Size {
    /// Build a size from a fixed-point EMU pair.
    pub fn from_emu(width: i64, height: i64) -> Self {
        Self {
            width,
            height,
            width_px: emu_to_px_x(width),
            height_px: emu_to_px_y(height),
        }
    }

    /// Build a size from a canvas-pixel pair.
    pub fn from_px(width_px: f64, height_px: f64) -> Self {
        Self {
            width: px_to_emu_x(width_px),
            height: px_to_emu_y(height_px),
            width_px,
            height_px,
        }
    }

    /// Overwrite the supplied pixel dimensions, keeping EMU in sync.
    pub fn set_px(&mut self, width_px: Option<f64>, height_px: Option<f64>) {
        if let Some(w) = width_px {
            self.width_px = w;
            self.width = px_to_emu_x(w);
        }
        if let Some(h) = height_px {
            self.height_px = h;
            self.height = px_to_emu_y(h);
        }
    }

    /// Multiply both dimensions by a factor, keeping EMU in sync.
    pub fn scale(&mut self, factor: f64) {
        self.set_px(
            Some(self.width_px * factor),
            Some(self.height_px * factor),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::{emu_per_px_x, emu_per_px_y, EMU_PER_INCH};

    fn assert_in_sync(pos: &Position) {
        assert!((pos.x - px_to_emu_x(pos.x_px)).abs() as f64 <= emu_per_px_x());
        assert!((pos.y - px_to_emu_y(pos.y_px)).abs() as f64 <= emu_per_px_y());
    }

    #[test]
    fn test_from_emu() {
        let pos = Position::from_emu(EMU_PER_INCH, EMU_PER_INCH);
        assert_eq!(pos.x_px, 96.0);
        assert_eq!(pos.y_px, 72.0);

        let size = Size::from_emu(914_400, 457_200);
        assert_eq!(size.width_px, 96.0);
        assert_eq!(size.height_px, 36.0);
    }

    #[test]
    fn test_set_px_updates_emu() {
        let mut pos = Position::from_emu(0, 0);
        pos.set_px(Some(96.0), None);
        assert_eq!(pos.x, EMU_PER_INCH);
        assert_eq!(pos.y, 0);
        assert_in_sync(&pos);
    }

    #[test]
    fn test_translate_px() {
        let mut pos = Position::from_px(100.0, 100.0);
        pos.translate_px(20.0, 20.0);
        assert_eq!(pos.x_px, 120.0);
        assert_eq!(pos.y_px, 120.0);
        assert_in_sync(&pos);
    }

    #[test]
    fn test_scale() {
        let mut size = Size::from_px(200.0, 100.0);
        size.scale(0.5);
        assert_eq!(size.width_px, 100.0);
        assert_eq!(size.height_px, 50.0);
        assert_eq!(size.width, px_to_emu_x(100.0));
    }

    #[test]
    fn test_serde_shape() {
        let pos = Position::from_emu(914_400, 0);
        let json = serde_json::to_value(pos).unwrap();
        assert_eq!(json["x"], 914_400);
        assert_eq!(json["xPx"], 96.0);
    }
}
