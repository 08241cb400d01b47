//! Multi-trial statistics: mean, sample standard deviation, and normal-approximation
//! confidence intervals.

use libm::sqrt;
use serde::Serialize;

/// z-score for a two-sided 95% interval
pub const Z_95: f64 = 1.96;
/// z-score for a two-sided 99% interval
pub const Z_99: f64 = 2.576;
/// z-score used for any other requested confidence level (two-sided 90%)
pub const Z_DEFAULT: f64 = 1.645;

/// Symmetric interval around a mean
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
    pub margin_of_error: f64,
}

/// Summary of a set of trials
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub confidence: f64,
    pub interval: ConfidenceInterval,
}

/// Divide, returning zero when the denominator is zero
pub fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        tracing::debug!(num, "zero denominator, defaulting to 0");
        0.0
    } else {
        num / den
    }
}

/// Arithmetic mean, zero for no samples
pub fn mean(samples: &[f64]) -> f64 {
    ratio(samples.iter().sum::<f64>(), samples.len() as f64)
}

/// Sample variance (n - 1 denominator), zero for fewer than two samples
pub fn variance(samples: &[f64]) -> f64 {
    let n = samples.len();
    if n < 2 {
        return 0.0;
    }

    let m = mean(samples);
    samples.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (n - 1) as f64
}

/// Sample standard deviation, zero for fewer than two samples
pub fn std_dev(samples: &[f64]) -> f64 {
    sqrt(variance(samples))
}

/// z-score for a two-sided confidence level
///
/// Only 0.95 and 0.99 are tabulated, anything else uses 1.645
pub fn z_score(confidence: f64) -> f64 {
    if confidence == 0.95 {
        Z_95
    } else if confidence == 0.99 {
        Z_99
    } else {
        Z_DEFAULT
    }
}

/// Interval `mean ± z * std / sqrt(n)`
///
/// With no samples the margin is zero
pub fn confidence_interval(
    mean: f64,
    std_dev: f64,
    n: usize,
    confidence: f64,
) -> ConfidenceInterval {
    let margin_of_error = ratio(z_score(confidence) * std_dev, sqrt(n as f64));

    ConfidenceInterval {
        lower: mean - margin_of_error,
        upper: mean + margin_of_error,
        margin_of_error,
    }
}

/// Summarize a set of samples at the given confidence level
pub fn summarize(samples: &[f64], confidence: f64) -> Summary {
    let m = mean(samples);
    let s = std_dev(samples);

    let (min, max) = if samples.is_empty() {
        (0.0, 0.0)
    } else {
        samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| (lo.min(x), hi.max(x)))
    };

    Summary {
        count: samples.len(),
        mean: m,
        std_dev: s,
        min,
        max,
        confidence,
        interval: confidence_interval(m, s, samples.len(), confidence),
    }
}
