//! Unit conversion between the fixed-point document unit (EMU) and render
//! pixels.
//!
//! A presentation page is measured in English Metric Units (914,400 per
//! inch). Rendering happens on a fixed-size pixel canvas whose per-axis
//! scale factors are derived from the canvas size, the native page size in
//! inches, and the target DPI. When the canvas aspect ratio diverges from
//! the page aspect ratio the two scale factors differ and every pixel
//! rendering is non-uniformly stretched; correcting that is the caller's
//! configuration responsibility, not done here.
//!
//! Conversions round to the nearest integer pixel or EMU. The rounding is
//! lossy but deterministic: a value that has been through one round-trip is
//! a fixed point of further round-trips.

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Target rendering DPI.
pub const RENDER_DPI: f64 = 96.0;

/// Native page width by convention, in inches.
pub const PAGE_WIDTH_IN: f64 = 10.0;

/// Native page height by convention, in inches.
pub const PAGE_HEIGHT_IN: f64 = 7.5;

/// Native page width in EMU (10 inches).
pub const PAGE_WIDTH_EMU: i64 = 9_144_000;

/// Native page height in EMU (7.5 inches).
pub const PAGE_HEIGHT_EMU: i64 = 6_858_000;

/// Render canvas width in pixels.
pub const CANVAS_WIDTH_PX: f64 = 960.0;

/// Render canvas height in pixels.
pub const CANVAS_HEIGHT_PX: f64 = 540.0;

/// Horizontal canvas scale factor.
pub const SCALE_X: f64 = CANVAS_WIDTH_PX / (PAGE_WIDTH_IN * RENDER_DPI);

/// Vertical canvas scale factor.
pub const SCALE_Y: f64 = CANVAS_HEIGHT_PX / (PAGE_HEIGHT_IN * RENDER_DPI);

/// Convert EMU to canvas pixels along the horizontal axis.
#[inline]
pub fn emu_to_px_x(emu: i64) -> f64 {
    (emu as f64 / EMU_PER_INCH as f64 * RENDER_DPI * SCALE_X).round()
}

/// Convert EMU to canvas pixels along the vertical axis.
#[inline]
pub fn emu_to_px_y(emu: i64) -> f64 {
    (emu as f64 / EMU_PER_INCH as f64 * RENDER_DPI * SCALE_Y).round()
}

/// Convert canvas pixels to EMU along the horizontal axis.
#[inline]
pub fn px_to_emu_x(px: f64) -> i64 {
    (px / (RENDER_DPI * SCALE_X) * EMU_PER_INCH as f64).round() as i64
}

/// Convert canvas pixels to EMU along the vertical axis.
#[inline]
pub fn px_to_emu_y(px: f64) -> i64 {
    (px / (RENDER_DPI * SCALE_Y) * EMU_PER_INCH as f64).round() as i64
}

/// Convert an EMU line width to points (1/72 inch).
#[inline]
pub fn emu_to_pt(emu: i64) -> f64 {
    emu as f64 / EMU_PER_INCH as f64 * 72.0
}

/// One horizontal pixel expressed in EMU.
#[inline]
pub fn emu_per_px_x() -> f64 {
    EMU_PER_INCH as f64 / (RENDER_DPI * SCALE_X)
}

/// One vertical pixel expressed in EMU.
#[inline]
pub fn emu_per_px_y() -> f64 {
    EMU_PER_INCH as f64 / (RENDER_DPI * SCALE_Y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scale_factors() {
        assert_eq!(SCALE_X, 1.0);
        assert_eq!(SCALE_Y, 0.75);
    }

    #[test]
    fn test_known_conversions() {
        // One inch lands at 96px horizontally, 72px vertically.
        assert_eq!(emu_to_px_x(EMU_PER_INCH), 96.0);
        assert_eq!(emu_to_px_y(EMU_PER_INCH), 72.0);

        // Full page fills the canvas exactly on both axes.
        assert_eq!(emu_to_px_x(PAGE_WIDTH_EMU), CANVAS_WIDTH_PX);
        assert_eq!(emu_to_px_y(PAGE_HEIGHT_EMU), CANVAS_HEIGHT_PX);

        assert_eq!(px_to_emu_x(96.0), EMU_PER_INCH);
        assert_eq!(px_to_emu_y(72.0), EMU_PER_INCH);
    }

    #[test]
    fn test_emu_to_pt() {
        assert_eq!(emu_to_pt(12_700), 1.0);
        assert_eq!(emu_to_pt(EMU_PER_INCH), 72.0);
    }

    proptest! {
        // Round-tripping EMU through pixels moves the value by at most one
        // pixel-equivalent, and a second round-trip is a no-op.
        #[test]
        fn round_trip_bounded_x(emu in 0i64..40_000_000) {
            let back = px_to_emu_x(emu_to_px_x(emu));
            prop_assert!((back - emu).abs() as f64 <= emu_per_px_x());

            let again = px_to_emu_x(emu_to_px_x(back));
            prop_assert_eq!(again, back);
        }

        #[test]
        fn round_trip_bounded_y(emu in 0i64..40_000_000) {
            let back = px_to_emu_y(emu_to_px_y(emu));
            prop_assert!((back - emu).abs() as f64 <= emu_per_px_y());

            let again = px_to_emu_y(emu_to_px_y(back));
            prop_assert_eq!(again, back);
        }

        #[test]
        fn px_round_trip_stable(px in 0u32..2000u32) {
            let px = px as f64;
            let back = emu_to_px_x(px_to_emu_x(px));
            prop_assert_eq!(back, px);
        }
    }
}
