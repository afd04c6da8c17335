//! Funding-rate normalization to a common 8-hour basis.

use rust_decimal::Decimal;

/// Hours in the reference funding period.
pub const REFERENCE_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Rescale a per-interval funding rate to its 8-hour equivalent.
///
/// The rescaling is linear: funding is assumed proportional to elapsed time,
/// with no compounding. A zero interval yields zero instead of dividing by
/// zero.
#[must_use]
pub fn normalize_to_8h(raw_rate: Decimal, interval_hours: Decimal) -> Decimal {
    if interval_hours.is_zero() {
        return Decimal::ZERO;
    }
    raw_rate * REFERENCE_HOURS / interval_hours
}
