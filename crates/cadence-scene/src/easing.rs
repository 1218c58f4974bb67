//! Cubic ease-out timing for counter tweens.
//!
//! ```
//! use cadence_scene::easing::ease_out_cubic;
//!
//! assert_eq!(ease_out_cubic(1.0), 1.0);
//! assert!(ease_out_cubic(0.5) > 0.5);
//! ```

/// `1 - (1 - t)^3`: fast initial change, gentle approach to the target.
///
/// Input outside 0.0-1.0 is clamped, so 0 maps to exactly 0 and 1 to exactly 1.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}
