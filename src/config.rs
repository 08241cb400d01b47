//! Tunables for the analyzers.

use crate::attack::Error;

/// Iteration counts and thresholds shared by the analyzers
///
/// Defaults reproduce the fixed experiment protocols; `quick` is for tests,
/// `thorough` for measurements that need tighter intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Encryptions timed by the timing profiler. Default: 100.
    pub timing_iterations: usize,

    /// Sequential keys tried by the brute-force estimator. Default: 1000.
    pub brute_force_iterations: usize,

    /// Random blocks sampled per input difference. Default: 1000.
    pub differential_samples: usize,

    /// Characteristics reported by the differential search. Default: 10.
    pub differential_top: usize,

    /// Random plaintexts per key bit in the side-channel analysis. Default: 10.
    pub side_channel_repeats: usize,

    /// Encryptions averaged into each side-channel measurement. Default: 5.
    pub side_channel_inner_repeats: usize,

    /// Key bits reported by the side-channel analysis. Default: 20.
    pub side_channel_top: usize,

    /// |t| above which a key bit is significant. Default: 2.0.
    pub significance_threshold: f64,

    /// Step between key-recovery candidates for word 0. Must be a power of two. Default: 2^16.
    pub key_recovery_stride: u32,

    /// Confidence level for reported intervals. Default: 0.95.
    pub confidence: f64,

    /// Seed for sampled plaintexts. `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timing_iterations: 100,
            brute_force_iterations: 1000,
            differential_samples: 1000,
            differential_top: 10,
            side_channel_repeats: 10,
            side_channel_inner_repeats: 5,
            side_channel_top: 20,
            significance_threshold: 2.0,
            key_recovery_stride: 1 << 16,
            confidence: 0.95,
            seed: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Small iteration counts, seeded
    pub fn quick() -> Self {
        Self {
            timing_iterations: 20,
            brute_force_iterations: 100,
            differential_samples: 200,
            side_channel_repeats: 4,
            side_channel_inner_repeats: 2,
            seed: Some(0x5eed),
            ..Self::default()
        }
    }

    /// Large iteration counts, 99% intervals
    pub fn thorough() -> Self {
        Self {
            timing_iterations: 10_000,
            brute_force_iterations: 100_000,
            differential_samples: 100_000,
            side_channel_repeats: 50,
            side_channel_inner_repeats: 20,
            confidence: 0.99,
            ..Self::default()
        }
    }

    // Builder methods

    pub fn timing_iterations(mut self, iterations: usize) -> Self {
        self.timing_iterations = iterations;
        self
    }

    pub fn brute_force_iterations(mut self, iterations: usize) -> Self {
        self.brute_force_iterations = iterations;
        self
    }

    pub fn differential_samples(mut self, samples: usize) -> Self {
        self.differential_samples = samples;
        self
    }

    pub fn differential_top(mut self, top: usize) -> Self {
        self.differential_top = top;
        self
    }

    pub fn side_channel_repeats(mut self, repeats: usize, inner: usize) -> Self {
        self.side_channel_repeats = repeats;
        self.side_channel_inner_repeats = inner;
        self
    }

    pub fn side_channel_top(mut self, top: usize) -> Self {
        self.side_channel_top = top;
        self
    }

    pub fn significance_threshold(mut self, threshold: f64) -> Self {
        self.significance_threshold = threshold;
        self
    }

    pub fn key_recovery_stride(mut self, stride: u32) -> Self {
        self.key_recovery_stride = stride;
        self
    }

    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject settings no experiment can run with
    pub fn validate(&self) -> Result<(), Error> {
        if self.timing_iterations == 0 {
            return Err(Error::InvalidConfig("timing_iterations must be > 0"));
        }
        if self.brute_force_iterations == 0 {
            return Err(Error::InvalidConfig("brute_force_iterations must be > 0"));
        }
        if self.differential_samples == 0 {
            return Err(Error::InvalidConfig("differential_samples must be > 0"));
        }
        if self.side_channel_repeats == 0 || self.side_channel_inner_repeats == 0 {
            return Err(Error::InvalidConfig("side-channel repeats must be > 0"));
        }
        if !self.key_recovery_stride.is_power_of_two() || self.key_recovery_stride < 2 {
            return Err(Error::InvalidConfig("key_recovery_stride must be a power of two >= 2"));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(Error::InvalidConfig("confidence must be in (0, 1)"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_default_config() {
        let config = Config::default();
        assert_eq!(config.timing_iterations, 100);
        assert_eq!(config.brute_force_iterations, 1000);
        assert_eq!(config.differential_top, 10);
        assert_eq!(config.side_channel_top, 20);
        assert_eq!(config.key_recovery_stride, 0x1_0000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn check_presets() {
        assert!(Config::quick().validate().is_ok());
        assert!(Config::thorough().validate().is_ok());
        assert_eq!(Config::thorough().confidence, 0.99);
        assert_eq!(Config::quick().seed, Some(0x5eed));
    }

    #[test]
    fn check_validate() {
        assert!(Config::new().timing_iterations(0).validate().is_err());
        assert!(Config::new().key_recovery_stride(3).validate().is_err());
        assert!(Config::new().key_recovery_stride(1).validate().is_err());
        assert!(Config::new().confidence(1.0).validate().is_err());
        assert!(Config::new().side_channel_repeats(1, 0).validate().is_err());
        assert!(Config::new().seed(1).differential_top(3).validate().is_ok());
    }
}
