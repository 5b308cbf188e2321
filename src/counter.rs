use std::time::Duration;

/// Time taken for a counter to reach its target
pub const COUNT_UP_DURATION: Duration = Duration::from_millis(2500);

/// Circular ease-out: fast start, gentle landing
pub fn circ_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    (1.0 - (t - 1.0).powi(2)).sqrt()
}

/// A headline statistic that counts up from zero
#[derive(Debug, Clone, PartialEq)]
pub struct StatCounter {
    pub label: &'static str,
    pub prefix: &'static str,
    pub suffix: &'static str,
    pub target: f32,
    pub decimals: usize,
}

impl StatCounter {
    pub const fn new(
        label: &'static str,
        prefix: &'static str,
        target: f32,
        suffix: &'static str,
    ) -> Self {
        Self {
            label,
            prefix,
            suffix,
            target,
            decimals: 0,
        }
    }

    /// Value shown `elapsed` after the count started
    pub fn value_at(&self, elapsed: Duration) -> f32 {
        let t = elapsed.as_secs_f32() / COUNT_UP_DURATION.as_secs_f32();
        if t >= 1.0 {
            self.target
        } else {
            self.target * circ_out(t)
        }
    }

    /// Formatted display text, e.g. "$125M+"
    pub fn display_at(&self, elapsed: Duration) -> String {
        format!(
            "{}{:.*}{}",
            self.prefix,
            self.decimals,
            self.value_at(elapsed),
            self.suffix
        )
    }
}

/// The firm's headline numbers
pub fn default_stats() -> Vec<StatCounter> {
    vec![
        StatCounter::new("Client Value Unlocked", "$", 125.0, "M+"),
        StatCounter::new("Avg. Cost Reduction", "", 18.0, "%"),
        StatCounter::new("AI Agents Deployed", "", 20.0, "+"),
        StatCounter::new("# Clients", "", 20.0, "+"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circ_out_endpoints() {
        assert_eq!(circ_out(0.0), 0.0);
        assert_eq!(circ_out(1.0), 1.0);
        assert_eq!(circ_out(-2.0), 0.0);
        assert_eq!(circ_out(3.0), 1.0);
        // front-loaded: more than half done at the midpoint
        assert!(circ_out(0.5) > 0.8);
    }

    #[test]
    fn test_counts_up_monotonically() {
        let stat = StatCounter::new("Client Value Unlocked", "$", 125.0, "M+");
        let mut previous = -1.0;
        for ms in (0..=3000).step_by(100) {
            let v = stat.value_at(Duration::from_millis(ms));
            assert!(v >= previous);
            assert!(v <= 125.0);
            previous = v;
        }
        assert_eq!(stat.value_at(Duration::ZERO), 0.0);
        assert_eq!(stat.value_at(COUNT_UP_DURATION), 125.0);
    }

    #[test]
    fn test_display_formatting() {
        let stat = StatCounter::new("Client Value Unlocked", "$", 125.0, "M+");
        assert_eq!(stat.display_at(Duration::ZERO), "$0M+");
        assert_eq!(stat.display_at(Duration::from_secs(10)), "$125M+");

        let precise = StatCounter {
            decimals: 1,
            ..StatCounter::new("Avg. Cost Reduction", "", 18.0, "%")
        };
        assert_eq!(precise.display_at(Duration::from_secs(3)), "18.0%");
    }

    #[test]
    fn test_default_stats() {
        let stats = default_stats();
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[1].display_at(COUNT_UP_DURATION), "18%");
    }
}
