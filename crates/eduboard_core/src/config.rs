//! Store configuration.

/// Configuration for opening a [`crate::Store`].
///
/// # Example
///
/// ```rust
/// use eduboard_core::Config;
///
/// let config = Config::default()
///     .seed_on_empty(false)
///     .pass_threshold_pct(60);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Populate demo seed data for collections whose storage key is absent.
    pub seed_on_empty: bool,
    /// Default quiz pass threshold, in percent. Individual quizzes may
    /// override this with their own threshold.
    pub pass_threshold_pct: u8,
}

impl Config {
    /// Sets whether absent collections are seeded with demo data.
    #[must_use]
    pub fn seed_on_empty(mut self, seed: bool) -> Self {
        self.seed_on_empty = seed;
        self
    }

    /// Sets the default quiz pass threshold (percent, clamped to 100).
    #[must_use]
    pub fn pass_threshold_pct(mut self, pct: u8) -> Self {
        self.pass_threshold_pct = pct.min(100);
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_on_empty: true,
            pass_threshold_pct: 40,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert!(config.seed_on_empty);
        assert_eq!(config.pass_threshold_pct, 40);
    }

    #[test]
    fn builder_setters() {
        let config = Config::default().seed_on_empty(false).pass_threshold_pct(75);
        assert!(!config.seed_on_empty);
        assert_eq!(config.pass_threshold_pct, 75);
    }

    #[test]
    fn threshold_is_clamped() {
        let config = Config::default().pass_threshold_pct(150);
        assert_eq!(config.pass_threshold_pct, 100);
    }
}
