pub const MIN_SCORE: f64 = 1.0;
pub const MAX_SCORE: f64 = 50.0;

const ATTEMPTS_WEIGHT: f64 = 1000.0;
const TIME_WEIGHT: f64 = 300.0;

/// Efficiency score of a win, always within `[MIN_SCORE, MAX_SCORE]`.
///
/// `1000 / attempts + 300 / max(elapsed_seconds, 1)`, clamped. Sub-second
/// wins count as one second. `attempts` must be at least 1.
pub fn score(elapsed_seconds: f64, attempts: u32) -> f64 {
    debug_assert!(attempts >= 1, "a win takes at least one guess");
    let attempts_factor = ATTEMPTS_WEIGHT / f64::from(attempts);
    let time_factor = TIME_WEIGHT / elapsed_seconds.max(1.0);
    (attempts_factor + time_factor).clamp(MIN_SCORE, MAX_SCORE)
}
