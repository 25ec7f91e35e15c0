use crate::analysis::rules::AnalysisRule;
use crate::analysis::{AnalysisContext, Severity, Warning};
use crate::model::{LinkStatus, Role};

// ============================================================
// ReplicationLinkDownRule: replica not connected to its master
// ============================================================

pub struct ReplicationLinkDownRule;

impl AnalysisRule for ReplicationLinkDownRule {
    fn id(&self) -> &'static str {
        "replication_link_down"
    }

    fn evaluate(&self, ctx: &AnalysisContext) -> Option<Warning> {
        let repl = &ctx.snapshot.replication;
        if repl.role != Role::Replica || repl.link_status == Some(LinkStatus::Up) {
            return None;
        }

        Some(Warning {
            rule_id: self.id(),
            severity: Severity::Critical,
            message: "Replication link DOWN!".to_string(),
            value: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{HealthSnapshot, ReplicationInfo};

    fn with_replication(role: Role, link_status: Option<LinkStatus>) -> HealthSnapshot {
        HealthSnapshot {
            replication: ReplicationInfo {
                role,
                link_status,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn fires(snapshot: &HealthSnapshot) -> bool {
        ReplicationLinkDownRule
            .evaluate(&AnalysisContext::new(snapshot))
            .is_some()
    }

    #[test]
    fn test_replica_states() {
        assert!(!fires(&with_replication(Role::Replica, Some(LinkStatus::Up))));
        assert!(fires(&with_replication(Role::Replica, Some(LinkStatus::Down))));
        assert!(fires(&with_replication(Role::Replica, Some(LinkStatus::Unknown))));
        assert!(fires(&with_replication(Role::Replica, None)));
    }

    #[test]
    fn test_non_replica_roles_never_fire() {
        for link in [None, Some(LinkStatus::Down), Some(LinkStatus::Unknown)] {
            assert!(!fires(&with_replication(Role::Master, link)));
            assert!(!fires(&with_replication(Role::Unknown, link)));
        }
    }
}
