//! Outer audit deadline and the sub-timeouts derived from it.

use std::time::Duration;

use tokio::time::Instant;

use agentrank_config::AuditConfig;

/// Clamp a caller-supplied timeout into the configured window.
///
/// `None` selects the configured default, itself clamped.
pub fn clamp_timeout(requested: Option<Duration>, config: &AuditConfig) -> Duration {
    let min = Duration::from_secs(config.min_timeout_seconds);
    let max = Duration::from_secs(config.max_timeout_seconds.max(config.min_timeout_seconds));
    requested
        .unwrap_or(Duration::from_secs(config.default_timeout_seconds))
        .clamp(min, max)
}

/// Time budget of one audit.
///
/// Capture and each Tier-1 interaction get a fixed share of the total so
/// that a Tier-2 escalation can still run before the deadline.
#[derive(Debug, Clone)]
pub struct AuditBudget {
    total: Duration,
    deadline: Instant,
    capture_share: f64,
    interaction_share: f64,
}

impl AuditBudget {
    pub fn start(total: Duration, config: &AuditConfig) -> Self {
        Self {
            total,
            deadline: Instant::now() + total,
            capture_share: config.capture_share,
            interaction_share: config.interaction_share,
        }
    }

    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Sub-timeout for navigation and context capture.
    pub fn capture_timeout(&self) -> Duration {
        self.share(self.capture_share)
    }

    /// Sub-timeout for one Tier-1 interaction attempt.
    pub fn interaction_timeout(&self) -> Duration {
        self.share(self.interaction_share)
    }

    /// Everything that is left goes to Tier-2.
    pub fn tier2_timeout(&self) -> Duration {
        self.remaining()
    }

    fn share(&self, fraction: f64) -> Duration {
        self.total.mul_f64(fraction).min(self.remaining())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuditConfig {
        AuditConfig::default()
    }

    #[test]
    fn test_clamp_default() {
        assert_eq!(clamp_timeout(None, &config()), Duration::from_secs(120));
    }

    #[test]
    fn test_clamp_bounds() {
        let cfg = config();
        assert_eq!(
            clamp_timeout(Some(Duration::from_secs(1)), &cfg),
            Duration::from_secs(30)
        );
        assert_eq!(
            clamp_timeout(Some(Duration::from_secs(3600)), &cfg),
            Duration::from_secs(600)
        );
        assert_eq!(
            clamp_timeout(Some(Duration::from_secs(90)), &cfg),
            Duration::from_secs(90)
        );
    }

    #[test]
    fn test_clamp_tolerates_inverted_window() {
        let cfg = AuditConfig {
            min_timeout_seconds: 60,
            max_timeout_seconds: 10,
            ..Default::default()
        };
        assert_eq!(clamp_timeout(Some(Duration::from_secs(5)), &cfg), Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sub_timeouts_are_shorter_than_total() {
        let budget = AuditBudget::start(Duration::from_secs(100), &config());
        assert_eq!(budget.capture_timeout(), Duration::from_secs(40));
        assert_eq!(budget.interaction_timeout(), Duration::from_secs(15));
        assert!(budget.capture_timeout() + 2 * budget.interaction_timeout() < budget.total());
    }

    #[tokio::test(start_paused = true)]
    async fn test_remaining_shrinks() {
        let budget = AuditBudget::start(Duration::from_secs(100), &config());
        tokio::time::advance(Duration::from_secs(70)).await;
        assert_eq!(budget.remaining(), Duration::from_secs(30));
        assert_eq!(budget.tier2_timeout(), Duration::from_secs(30));
        tokio::time::advance(Duration::from_secs(20)).await;
        // shares never exceed what is left
        assert_eq!(budget.capture_timeout(), Duration::from_secs(10));
        tokio::time::advance(Duration::from_secs(20)).await;
        assert!(budget.is_exhausted());
    }
}
