//! Duty cycle scaling between the device's 0-100 percent scale and the
//! 0-255 PWM scale used by sensor clients.

/// Map `value` from `0..=from_max` onto `0..=to_max`, rounding to nearest.
///
/// Halves round up. Out-of-range inputs clamp to the range ends.
pub fn scale_nearest(value: i64, from_max: i64, to_max: i64) -> i64 {
    if value <= 0 || from_max <= 0 {
        return 0;
    }
    if value >= from_max {
        return to_max;
    }

    let product = value * to_max;
    let quotient = product / from_max;
    let remainder = product % from_max;

    if remainder * 2 >= from_max {
        quotient + 1
    } else {
        quotient
    }
}

/// Like [`scale_nearest`], but a positive input never maps to zero.
///
/// Used on the write path: a duty of 0 turns the fan off completely, which
/// control loops asking for "barely on" never mean.
///
/// # Arguments
/// * `value` - Input on the `0..=from_max` scale
/// * `from_max` - Top of the input scale, e.g. 255 for PWM
/// * `to_max` - Top of the output scale, e.g. 100 for device duty
///
/// # Returns
/// The scaled value; 1 rather than 0 for any positive input.
///
/// # Example
/// ```
/// use nzxt_smart_devices::utils::scaling::scale;
///
/// assert_eq!(scale(1, 255, 100), 1);
/// assert_eq!(scale(128, 255, 100), 50);
/// assert_eq!(scale(255, 255, 100), 100);
/// ```
pub fn scale(value: i64, from_max: i64, to_max: i64) -> i64 {
    let scaled = scale_nearest(value, from_max, to_max);
    if scaled == 0 && value > 0 && to_max > 0 {
        1
    } else {
        scaled
    }
}
