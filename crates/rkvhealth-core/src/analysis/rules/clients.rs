use crate::analysis::rules::AnalysisRule;
use crate::analysis::{AnalysisContext, Severity, Warning};

/// Connected/max clients percentage above which the server is near its limit.
pub const CLIENT_SATURATION_MAX_PCT: f64 = 80.0;

// ============================================================
// ClientSaturationRule: connected clients near maxclients
// ============================================================

pub struct ClientSaturationRule;

impl AnalysisRule for ClientSaturationRule {
    fn id(&self) -> &'static str {
        "client_saturation"
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Option<Warning> {
        let usage = ctx.client_saturation;
        if usage <= CLIENT_SATURATION_MAX_PCT {
            return None;
        }

        Some(Warning {
            rule_id: self.id(),
            severity: Severity::Caution,
            message: format!("High client usage: {usage:.1}%"),
            value: Some(usage),
        })
    }
}
