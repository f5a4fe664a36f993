//! Application-level configuration constants.

// Wheel geometry
/// Offset between the wheel's own zero reference and the pointer at the top.
/// The planner lands slices against it and the gradient/labels are drawn from it,
/// so both sides change together.
pub const POINTER_OFFSET_DEG: f64 = 90.0;
pub const FULL_TURN_DEG: f64 = 360.0;
pub const LABEL_INSET_PX: f64 = 88.0;
pub const DEFAULT_WHEEL_SIZE_PX: f64 = 420.0;

// Spin timing
pub const MIN_EXTRA_SPINS: u32 = 2;
pub const MAX_EXTRA_SPINS: u32 = 4;
pub const BASE_DURATION_SEC: f64 = 1.6;
pub const DURATION_PER_SPIN_SEC: f64 = 0.6;
pub const MIN_DURATION_SEC: f64 = 2.0;
pub const MAX_DURATION_SEC: f64 = 4.0;
pub const IDLE_TRANSITION_SEC: f64 = 3.0;
pub const SPIN_EASING: &str = "cubic-bezier(.17,.67,.31,1)";

// UI Behavior
pub const RESIZE_DEBOUNCE_MS: u32 = 150;

// Palette
pub const PALETTE_HUE: u32 = 220;
pub const PALETTE_BASE_SATURATION: u32 = 75;
pub const PALETTE_SATURATION_STEP: u32 = 5;
pub const PALETTE_BASE_LIGHTNESS: u32 = 45;
pub const PALETTE_LIGHTNESS_STEP: u32 = 8;
pub const EMPTY_WHEEL_COLOR: &str = "#ddd";
pub const FALLBACK_SWATCH: &str = "#ddd";
pub const REMOVED_SWATCH: &str = "repeating-linear-gradient(45deg, #666 0 6px, #888 6px 12px)";

// Status messages
pub const STATUS_READY: &str = "Click Spin to select a topic!";
pub const STATUS_PLEASE_WAIT: &str = "Please wait for the current spin to finish.";
pub const STATUS_ALL_SELECTED: &str = "🎉 All topics have been selected!";

/// Topic list shipped with the page, one name per row under a `name` header.
pub const TOPICS_CSV: &str = include_str!("topics.csv");

pub fn selected_status(name: &str) -> String {
    format!("🎯 Selected: {}", name)
}
