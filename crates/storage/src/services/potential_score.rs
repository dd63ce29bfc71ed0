//! Potential score: a 0–100 ranking value derived from rating, rentals and recency.
//!
//! Score = round2(100 · (0.6 · rating/5 + 0.3 · min(rentals/100, 1) + 0.1 · recency))
//! where recency falls linearly from 1 (active now) to 0 (30 or more days ago).

pub const RATING_WEIGHT: f64 = 0.6;
pub const RENTALS_WEIGHT: f64 = 0.3;
pub const RECENCY_WEIGHT: f64 = 0.1;

pub const MAX_RATING: f64 = 5.0;
/// Rental count at which the rentals term saturates.
pub const RENTALS_SATURATION: f64 = 100.0;
pub const RECENCY_WINDOW_DAYS: f64 = 30.0;

pub const MAX_SCORE: f64 = 100.0;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Compute a user's potential score against the supplied `now` (epoch ms).
pub fn compute_potential_score(
    average_rating: f64,
    rental_count: u32,
    last_active_at: i64,
    now: i64,
) -> f64 {
    let rating_norm = if average_rating.is_finite() {
        (average_rating / MAX_RATING).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let rental_norm = (f64::from(rental_count) / RENTALS_SATURATION).min(1.0);

    let days_since_active = (now - last_active_at) as f64 / MILLIS_PER_DAY;
    // Future timestamps would push this above 1 without the upper clamp
    let recency_norm = (1.0 - days_since_active / RECENCY_WINDOW_DAYS).clamp(0.0, 1.0);

    let raw = rating_norm * RATING_WEIGHT
        + rental_norm * RENTALS_WEIGHT
        + recency_norm * RECENCY_WEIGHT;

    ((raw * MAX_SCORE * 100.0).round() / 100.0).clamp(0.0, MAX_SCORE)
}
