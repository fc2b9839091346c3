use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::DataStore;

/// Need counts, total and grouped three ways
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_needs: usize,
    pub by_user_group: BTreeMap<String, usize>,
    pub by_workflow_phase: BTreeMap<String, usize>,
    /// A need tagged with several entities counts once for each
    pub by_entity: BTreeMap<String, usize>,
}

impl DataStore {
    pub fn statistics(&self) -> Statistics {
        let mut stats = Statistics {
            total_needs: self.user_needs.len(),
            ..Default::default()
        };

        for need in &self.user_needs {
            *stats
                .by_user_group
                .entry(need.user_group_id.clone())
                .or_default() += 1;
            *stats
                .by_workflow_phase
                .entry(need.workflow_phase.clone())
                .or_default() += 1;
            for entity in &need.entities {
                *stats.by_entity.entry(entity.clone()).or_default() += 1;
            }
        }

        stats
    }
}
