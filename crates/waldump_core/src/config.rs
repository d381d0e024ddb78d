//! Dump configuration.

use crate::error::{CoreError, CoreResult};
use crate::scan::Bound;
use crate::tail::DEFAULT_POLL_INTERVAL;
use std::time::Duration;

/// Options for one dump run.
///
/// # Example
///
/// ```rust
/// use waldump_core::DumpConfig;
///
/// let config = DumpConfig::default().after(100).short(true);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    /// Only entries with an index greater than this are dumped. Zero disables.
    pub after: u64,
    /// Only entries with an index less than this are dumped. Zero disables.
    pub before: u64,
    /// Keep polling for new entries once the existing ones are dumped.
    pub follow: bool,
    /// Print compact summaries instead of full operations.
    pub short: bool,
    /// Delay between follow passes.
    pub poll_interval: Duration,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            after: 0,
            before: 0,
            follow: false,
            short: false,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl DumpConfig {
    /// Sets the exclusive lower bound.
    #[must_use]
    pub const fn after(mut self, index: u64) -> Self {
        self.after = index;
        self
    }

    /// Sets the exclusive upper bound.
    #[must_use]
    pub const fn before(mut self, index: u64) -> Self {
        self.before = index;
        self
    }

    /// Enables or disables follow mode.
    #[must_use]
    pub const fn follow(mut self, enabled: bool) -> Self {
        self.follow = enabled;
        self
    }

    /// Enables or disables compact output.
    #[must_use]
    pub const fn short(mut self, enabled: bool) -> Self {
        self.short = enabled;
        self
    }

    /// Sets the delay between follow passes.
    #[must_use]
    pub const fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Returns the index range of the initial pass.
    #[must_use]
    pub const fn bound(&self) -> Bound {
        Bound::new(self.after, self.before)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if follow mode is combined with an
    /// upper bound, or follow mode has a zero poll interval.
    pub fn validate(&self) -> CoreResult<()> {
        if self.follow && self.before > 0 {
            return Err(CoreError::invalid_config(
                "follow mode cannot be combined with an upper bound",
            ));
        }
        if self.follow && self.poll_interval.is_zero() {
            return Err(CoreError::invalid_config(
                "poll interval must be greater than zero",
            ));
        }
        if self.before > 0 && self.before <= self.after.saturating_add(1) {
            tracing::warn!(
                after = self.after,
                before = self.before,
                "index range is empty, nothing will be dumped"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = DumpConfig::default();
        assert_eq!(config.bound(), Bound::new(0, 0));
        assert!(!config.follow);
        assert!(!config.short);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_sets_fields() {
        let config = DumpConfig::default()
            .after(10)
            .before(20)
            .short(true)
            .poll_interval(Duration::from_millis(250));
        assert_eq!(config.bound(), Bound::new(10, 20));
        assert!(config.short);
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn follow_with_upper_bound_is_rejected() {
        let err = DumpConfig::default().follow(true).before(5).validate().unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig { .. }));
    }

    #[test]
    fn follow_with_lower_bound_is_fine() {
        assert!(DumpConfig::default().follow(true).after(5).validate().is_ok());
    }

    #[test]
    fn follow_needs_a_poll_interval() {
        let config = DumpConfig::default()
            .follow(true)
            .poll_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_range_is_allowed() {
        assert!(DumpConfig::default().after(5).before(6).validate().is_ok());
    }
}
