//! Rotation planning: where the wheel has to stop and how long it takes to get there.
//!
//! Angles are degrees, measured clockwise. Slice `i` of `n` spans
//! `[i * 360/n, (i + 1) * 360/n)` in the wheel's own frame, whose zero sits
//! `POINTER_OFFSET_DEG` counter-clockwise of the pointer at the top. Rotating the
//! wheel by `R` therefore places wheel angle `POINTER_OFFSET_DEG - R` under the pointer.

use crate::config::{
    BASE_DURATION_SEC, DURATION_PER_SPIN_SEC, FULL_TURN_DEG, MAX_DURATION_SEC, MAX_EXTRA_SPINS,
    MIN_DURATION_SEC, MIN_EXTRA_SPINS, POINTER_OFFSET_DEG,
};
use crate::WheelError;
use log::debug;
use rand_distr::{Distribution, Uniform};

/// Result of planning one spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinPlan {
    pub selected_index: usize,
    pub slice_count: usize,
    /// Center of the chosen slice in the wheel's frame
    pub center_deg: f64,
    pub extra_spins: u32,
    pub duration_secs: f64,
    /// Absolute rotation to animate to; may exceed 360 until the wheel lands
    pub final_rotation: f64,
}

impl SpinPlan {
    /// Resting rotation once the landing has been renormalized.
    pub fn landed_rotation(&self) -> f64 {
        normalize_degrees(self.final_rotation)
    }
}

/// Normalise an angle to the half-open range [0°, 360°).
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(FULL_TURN_DEG);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= FULL_TURN_DEG {
        0.0
    } else {
        wrapped
    }
}

pub fn slice_size(n: usize) -> f64 {
    FULL_TURN_DEG / n as f64
}

/// Angular center of slice `index` out of `n`.
pub fn slice_center(n: usize, index: usize) -> f64 {
    let slice = slice_size(n);
    index as f64 * slice + slice / 2.0
}

/// Animation length for a given number of extra turns, in seconds.
pub fn spin_duration(extra_spins: u32) -> f64 {
    (BASE_DURATION_SEC + extra_spins as f64 * DURATION_PER_SPIN_SEC)
        .clamp(MIN_DURATION_SEC, MAX_DURATION_SEC)
}

/// Which of `n` slices sits under the pointer when the wheel rests at `rotation`.
pub fn slice_under_pointer(n: usize, rotation: f64) -> Option<usize> {
    if n == 0 || !rotation.is_finite() {
        return None;
    }
    let wheel_angle = normalize_degrees(POINTER_OFFSET_DEG - rotation);
    let index = (wheel_angle / slice_size(n)).floor() as usize;
    Some(index.min(n - 1))
}

/// Plan a spin with a fixed number of extra turns.
pub fn plan_rotation(
    n: usize,
    selected_index: usize,
    current_rotation: f64,
    extra_spins: u32,
) -> Result<SpinPlan, WheelError> {
    if n == 0 {
        return Err(WheelError::InvalidArgument("wheel has no slices".to_string()));
    }
    if selected_index >= n {
        return Err(WheelError::InvalidArgument(format!(
            "slice {} out of range for {} slices",
            selected_index, n
        )));
    }
    if !current_rotation.is_finite() {
        return Err(WheelError::InvalidArgument(format!(
            "rotation {} is not finite",
            current_rotation
        )));
    }

    let center_deg = slice_center(n, selected_index);
    let current_norm = normalize_degrees(current_rotation);
    let duration_secs = spin_duration(extra_spins);
    let delta = extra_spins as f64 * FULL_TURN_DEG + (POINTER_OFFSET_DEG - center_deg) - current_norm;
    let final_rotation = current_rotation + delta;

    debug!(
        "Planned slice {}/{}: center {:.2}°, {} extra turns, {:.2}° → {:.2}° over {:.1}s",
        selected_index, n, center_deg, extra_spins, current_rotation, final_rotation, duration_secs
    );

    Ok(SpinPlan {
        selected_index,
        slice_count: n,
        center_deg,
        extra_spins,
        duration_secs,
        final_rotation,
    })
}

/// Draw the number of extra turns uniformly from the configured range.
pub fn draw_extra_spins<R: rand::Rng + ?Sized>(rng: &mut R) -> Result<u32, WheelError> {
    let turns = Uniform::new_inclusive(MIN_EXTRA_SPINS, MAX_EXTRA_SPINS)
        .map_err(|e| WheelError::InvalidArgument(format!("extra spin range: {}", e)))?;
    Ok(turns.sample(rng))
}

/// Plan a spin with a randomly drawn number of extra turns.
pub fn plan_spin<R: rand::Rng + ?Sized>(
    rng: &mut R,
    n: usize,
    selected_index: usize,
    current_rotation: f64,
) -> Result<SpinPlan, WheelError> {
    let extra_spins = draw_extra_spins(rng)?;
    plan_rotation(n, selected_index, current_rotation, extra_spins)
}
