//! Placeholder growth-rate series.
//!
//! The Graph API exposes no follower history, so the dashboard's growth chart
//! has nothing real to plot. These sources fill it with clearly synthetic
//! values; none of them is a measurement.

use rand::Rng;

/// Number of points in a growth series (one per month).
pub const GROWTH_POINTS: usize = 12;

/// Inclusive magnitude bound for every growth point.
pub const GROWTH_BOUND: f64 = 5.0;

/// Supplies the twelve placeholder growth values for one computation.
pub trait GrowthSeriesSource: Send + Sync {
    fn series(&self) -> [f64; GROWTH_POINTS];
}

/// Draws each point independently and uniformly from `[-5, 5]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomGrowth;

impl GrowthSeriesSource for RandomGrowth {
    fn series(&self) -> [f64; GROWTH_POINTS] {
        let mut rng = rand::rng();
        std::array::from_fn(|_| rng.random_range(-GROWTH_BOUND..=GROWTH_BOUND))
    }
}

/// Twelve zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatGrowth;

impl GrowthSeriesSource for FlatGrowth {
    fn series(&self) -> [f64; GROWTH_POINTS] {
        [0.0; GROWTH_POINTS]
    }
}

/// Returns the same caller-supplied values every time.
#[derive(Debug, Clone, Copy)]
pub struct FixedGrowth(pub [f64; GROWTH_POINTS]);

impl GrowthSeriesSource for FixedGrowth {
    fn series(&self) -> [f64; GROWTH_POINTS] {
        self.0
    }
}

/// Forces a value into `[-5, 5]`; non-finite values become `0.0`.
pub(crate) fn bound_point(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-GROWTH_BOUND, GROWTH_BOUND)
    } else {
        0.0
    }
}
