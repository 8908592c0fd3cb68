//! Jitter source port - bounded random perturbations

/// Largest date shift, in days, in either direction
pub const MAX_DAY_SHIFT: i64 = 365;

/// Largest amount shift, in minor currency units, in either direction
pub const MAX_CENT_SHIFT: i64 = 100;

/// Source of the random draws used to perturb dates and amounts
///
/// Each call is one independent draw. Implementations must stay inside
/// `[-MAX_DAY_SHIFT, MAX_DAY_SHIFT]` and `[-MAX_CENT_SHIFT, MAX_CENT_SHIFT]`.
pub trait JitterSource: Send + Sync {
    /// Days to add to a date
    fn day_shift(&self) -> i64;

    /// Minor units (cents) to add to an amount
    fn cent_shift(&self) -> i64;
}
