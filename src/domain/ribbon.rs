//! Exponential moving average ribbon.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! Values exist from bar 0 but are not statistically settled before the long
//! span has elapsed; eligibility is the caller's policy.

use crate::domain::bar::Bar;
use crate::domain::error::RibbonError;

/// The three EMA periods making up the ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RibbonSpans {
    pub short: usize,
    pub medium: usize,
    pub long: usize,
}

impl RibbonSpans {
    /// Spans must be nonzero and strictly increasing.
    pub fn new(short: usize, medium: usize, long: usize) -> Result<Self, RibbonError> {
        if short == 0 || short >= medium || medium >= long {
            return Err(RibbonError::InvalidSpans {
                short,
                medium,
                long,
            });
        }
        Ok(RibbonSpans {
            short,
            medium,
            long,
        })
    }
}

impl Default for RibbonSpans {
    fn default() -> Self {
        RibbonSpans {
            short: 9,
            medium: 21,
            long: 55,
        }
    }
}

/// Smoothed values for one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmaTriple {
    pub short: f64,
    pub medium: f64,
    pub long: f64,
}

/// Streaming EMA accumulator, O(1) state.
struct Ema {
    k: f64,
    value: Option<f64>,
}

impl Ema {
    fn new(span: usize) -> Self {
        Ema {
            k: 2.0 / (span as f64 + 1.0),
            value: None,
        }
    }

    fn update(&mut self, close: f64) -> f64 {
        let next = match self.value {
            None => close,
            Some(prev) => close * self.k + prev * (1.0 - self.k),
        };
        self.value = Some(next);
        next
    }
}

/// Compute all three EMAs in a single pass over the series.
pub fn compute_ribbon(bars: &[Bar], spans: &RibbonSpans) -> Vec<EmaTriple> {
    let mut short = Ema::new(spans.short);
    let mut medium = Ema::new(spans.medium);
    let mut long = Ema::new(spans.long);

    bars.iter()
        .map(|bar| EmaTriple {
            short: short.update(bar.close),
            medium: medium.update(bar.close),
            long: long.update(bar.close),
        })
        .collect()
}
