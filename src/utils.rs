//! Pure presentation helpers: palette, CSS strings and wheel geometry.

use crate::config::{
    EMPTY_WHEEL_COLOR, FULL_TURN_DEG, LABEL_INSET_PX, PALETTE_BASE_LIGHTNESS,
    PALETTE_BASE_SATURATION, PALETTE_HUE, PALETTE_LIGHTNESS_STEP, PALETTE_SATURATION_STEP,
    POINTER_OFFSET_DEG, SPIN_EASING,
};

/// Measured size of the rendered wheel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub diameter_px: f64,
    /// Distance from the center at which slice labels are drawn
    pub label_radius_px: f64,
}

impl WheelGeometry {
    pub fn from_diameter(diameter_px: f64) -> Self {
        let diameter_px = if diameter_px.is_finite() { diameter_px.max(0.0) } else { 0.0 };
        Self {
            diameter_px,
            label_radius_px: (diameter_px / 2.0 - LABEL_INSET_PX).max(0.0),
        }
    }
}

/// Blue palette, one shade per active slice.
pub fn generate_colors(n: usize) -> Vec<String> {
    (0..n as u32)
        .map(|i| {
            format!(
                "hsl({} {}% {}%)",
                PALETTE_HUE,
                PALETTE_BASE_SATURATION + i * PALETTE_SATURATION_STEP,
                PALETTE_BASE_LIGHTNESS + i * PALETTE_LIGHTNESS_STEP
            )
        })
        .collect()
}

/// Conic gradient drawing one equal slice per color, starting at the wheel's zero reference.
pub fn build_gradient(colors: &[String]) -> String {
    if colors.is_empty() {
        return format!(
            "conic-gradient(from -{}deg, {} 0 {}deg)",
            POINTER_OFFSET_DEG, EMPTY_WHEEL_COLOR, FULL_TURN_DEG
        );
    }
    let slice = FULL_TURN_DEG / colors.len() as f64;
    let stops = colors
        .iter()
        .enumerate()
        .map(|(i, color)| {
            format!(
                "{} {:.4}deg {:.4}deg",
                color,
                slice * i as f64,
                slice * (i + 1) as f64
            )
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("conic-gradient(from -{}deg, {})", POINTER_OFFSET_DEG, stops)
}

/// Place a label at `center_deg` of the wheel frame, pushed out to `radius_px`, text kept upright.
pub fn label_transform(center_deg: f64, radius_px: f64) -> String {
    let screen_deg = center_deg - POINTER_OFFSET_DEG;
    format!(
        "rotate({:.4}deg) translateY(-{:.1}px) rotate({:.4}deg)",
        screen_deg, radius_px, -screen_deg
    )
}

pub fn rotate_css(deg: f64) -> String {
    format!("rotate({}deg)", deg)
}

pub fn transition_css(duration_secs: f64) -> String {
    format!("transform {}s {}", duration_secs, SPIN_EASING)
}

/// Inline styles that start a spin, applied together in one frame so a
/// transition queued by an earlier snap cannot replace the spin's duration.
pub fn spin_frame_styles(to_deg: f64, duration_secs: f64) -> [(&'static str, String); 2] {
    [
        ("transition", transition_css(duration_secs)),
        ("transform", rotate_css(to_deg)),
    ]
}

pub fn history_heading(count: usize) -> String {
    if count == 0 {
        "📋 No topics selected yet".to_string()
    } else {
        format!("📋 Selected Topics ({})", count)
    }
}
