pub mod clients;
pub mod keyspace;
pub mod memory;
pub mod replication;

use super::{AnalysisContext, Warning};

pub trait AnalysisRule: Send + Sync {
    fn id(&self) -> &'static str;
    fn evaluate(&self, ctx: &AnalysisContext) -> Option<Warning>;
}

/// Every rule in evaluation order. The order of the returned list is the
/// order of the warnings in a report.
pub fn all_rules() -> Vec<Box<dyn AnalysisRule>> {
    vec![
        // Memory
        Box::new(memory::FragmentationHighRule),
        Box::new(memory::KeysEvictedRule),
        // Clients
        Box::new(clients::ClientSaturationRule),
        // Keyspace
        Box::new(keyspace::HitRateLowRule),
        // Replication
        Box::new(replication::ReplicationLinkDownRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_ids_unique() {
        let rules = all_rules();
        let ids: HashSet<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), rules.len());
    }
}
