use crate::analysis::rules::AnalysisRule;
use crate::analysis::{AnalysisContext, Severity, Warning};
use crate::fmt::format_decimal;

/// Hit rate percentage below which the cache is considered ineffective.
pub const HIT_RATE_MIN_PCT: f64 = 80.0;

/// Lookups required before the hit rate is judged at all.
pub const HIT_RATE_MIN_SAMPLES: u64 = 100;

// ============================================================
// HitRateLowRule: keyspace hit rate on a busy server
// ============================================================

pub struct HitRateLowRule;

impl AnalysisRule for HitRateLowRule {
    fn id(&self) -> &'static str {
        "hit_rate_low"
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Option<Warning> {
        let lookups = ctx.snapshot.stats.keyspace_lookups();
        if lookups <= HIT_RATE_MIN_SAMPLES || ctx.hit_rate >= HIT_RATE_MIN_PCT {
            return None;
        }

        Some(Warning {
            rule_id: self.id(),
            severity: Severity::Caution,
            message: format!("Low cache hit rate: {}%", format_decimal(ctx.hit_rate)),
            value: Some(ctx.hit_rate),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HealthSnapshot;

    fn with_lookups(hits: u64, misses: u64) -> HealthSnapshot {
        let mut snapshot = HealthSnapshot::default();
        snapshot.stats.keyspace_hits = hits;
        snapshot.stats.keyspace_misses = misses;
        snapshot
    }

    fn eval(snapshot: &HealthSnapshot) -> Option<Warning> {
        HitRateLowRule.evaluate(&AnalysisContext::new(snapshot))
    }

    #[test]
    fn test_exactly_min_samples_never_fires() {
        assert!(eval(&with_lookups(0, 100)).is_none());
        assert!(eval(&with_lookups(50, 50)).is_none());
    }

    #[test]
    fn test_low_hit_rate_fires_above_min_samples() {
        let warning = eval(&with_lookups(50, 51)).unwrap();
        assert_eq!(warning.message, "Low cache hit rate: 49.5%");
        assert_eq!(warning.value, Some(49.5));
    }

    #[test]
    fn test_whole_percentage_keeps_decimal() {
        let warning = eval(&with_lookups(400, 600)).unwrap();
        assert_eq!(warning.message, "Low cache hit rate: 40.0%");
    }

    #[test]
    fn test_eighty_percent_passes() {
        assert!(eval(&with_lookups(800, 200)).is_none());
        assert!(eval(&with_lookups(799, 201)).is_some());
    }

    #[test]
    fn test_idle_server_passes() {
        assert!(eval(&with_lookups(0, 0)).is_none());
    }
}
