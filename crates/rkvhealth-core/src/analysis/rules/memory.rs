use crate::analysis::{AnalysisContext, Severity, Warning};
use crate::fmt::format_decimal;

use super::AnalysisRule;

/// Fragmentation ratio above which memory is considered fragmented.
pub const FRAGMENTATION_RATIO_MAX: f64 = 1.5;

// ============================================================
// FragmentationHighRule
// ============================================================

pub struct FragmentationHighRule;

impl AnalysisRule for FragmentationHighRule {
    fn id(&self) -> &'static str {
        "memory_fragmentation"
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Option<Warning> {
        let ratio = ctx.snapshot.memory.fragmentation_ratio;
        if ratio <= FRAGMENTATION_RATIO_MAX {
            return None;
        }

        Some(Warning {
            rule_id: self.id(),
            severity: Severity::Caution,
            message: format!("High memory fragmentation: {}", format_decimal(ratio)),
            value: Some(ratio),
        })
    }
}

// ============================================================
// KeysEvictedRule
// ============================================================

pub struct KeysEvictedRule;

impl AnalysisRule for KeysEvictedRule {
    fn id(&self) -> &'static str {
        "keys_evicted"
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Option<Warning> {
        let evicted = ctx.snapshot.memory.evicted_keys;
        if evicted == 0 {
            return None;
        }

        Some(Warning {
            rule_id: self.id(),
            severity: Severity::Caution,
            message: format!("Keys being evicted: {evicted}"),
            value: Some(evicted as f64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::HealthSnapshot;

    fn with_memory(ratio: f64, evicted: u64) -> HealthSnapshot {
        let mut snapshot = HealthSnapshot::default();
        snapshot.memory.fragmentation_ratio = ratio;
        snapshot.memory.evicted_keys = evicted;
        snapshot
    }

    #[test]
    fn test_fragmentation_boundary() {
        let at_limit = with_memory(1.5, 0);
        assert!(FragmentationHighRule
            .evaluate(&AnalysisContext::new(&at_limit))
            .is_none());

        let above = with_memory(1.51, 0);
        let warning = FragmentationHighRule
            .evaluate(&AnalysisContext::new(&above))
            .unwrap();
        assert_eq!(warning.message, "High memory fragmentation: 1.51");
        assert_eq!(warning.value, Some(1.51));
        assert_eq!(warning.severity, Severity::Caution);
    }

    #[test]
    fn test_low_fragmentation_passes() {
        let snapshot = with_memory(0.8, 0);
        assert!(FragmentationHighRule
            .evaluate(&AnalysisContext::new(&snapshot))
            .is_none());
    }

    #[test]
    fn test_whole_ratio_keeps_decimal() {
        let snapshot = with_memory(2.0, 0);
        let warning = FragmentationHighRule
            .evaluate(&AnalysisContext::new(&snapshot))
            .unwrap();
        assert_eq!(warning.message, "High memory fragmentation: 2.0");
    }

    #[test]
    fn test_eviction_fires_iff_positive() {
        let none = with_memory(1.0, 0);
        assert!(KeysEvictedRule
            .evaluate(&AnalysisContext::new(&none))
            .is_none());

        let one = with_memory(1.0, 1);
        let warning = KeysEvictedRule
            .evaluate(&AnalysisContext::new(&one))
            .unwrap();
        assert_eq!(warning.message, "Keys being evicted: 1");
    }
}
