//! Filtered retrieval of user needs

use serde::Deserialize;
use std::collections::HashSet;

use crate::models::{DataStore, UserNeed};

/// Review-status bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefinedFilter {
    /// `refined` is true
    Refined,
    /// `refined` is false or was never set
    NeedsRefinement,
}

impl RefinedFilter {
    /// Parses the wire value; anything else means "no restriction"
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "refined" => Some(RefinedFilter::Refined),
            "needsRefinement" => Some(RefinedFilter::NeedsRefinement),
            _ => None,
        }
    }

    fn matches(self, need: &UserNeed) -> bool {
        match self {
            RefinedFilter::Refined => need.refined,
            RefinedFilter::NeedsRefinement => !need.refined,
        }
    }
}

/// Optional predicates for listing needs, combined with AND.
///
/// Field names match the list endpoint's query parameters. Empty strings
/// count as "not supplied".
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NeedFilter {
    #[serde(default)]
    pub user_group_id: Option<String>,
    #[serde(default)]
    pub entity: Option<String>,
    #[serde(default)]
    pub workflow_phase: Option<String>,
    #[serde(default)]
    pub super_group: Option<String>,
    /// "refined" or "needsRefinement"
    #[serde(default)]
    pub refined: Option<String>,
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl DataStore {
    /// Needs matching every supplied filter, in stored order
    pub fn filter_user_needs(&self, filter: &NeedFilter) -> Vec<&UserNeed> {
        let group_id = supplied(&filter.user_group_id);
        let entity = supplied(&filter.entity);
        let phase = supplied(&filter.workflow_phase);
        let refined = supplied(&filter.refined).and_then(RefinedFilter::parse);

        // Super group filtering goes through the user groups it owns
        let groups_in_super_group: Option<HashSet<&str>> =
            supplied(&filter.super_group).map(|super_group| {
                self.user_groups
                    .iter()
                    .filter(|g| g.super_group.as_deref() == Some(super_group))
                    .map(|g| g.id.as_str())
                    .collect()
            });

        self.user_needs
            .iter()
            .filter(|n| group_id.map_or(true, |id| n.user_group_id == id))
            .filter(|n| entity.map_or(true, |e| n.entities.iter().any(|x| x == e)))
            .filter(|n| phase.map_or(true, |p| n.workflow_phase == p))
            .filter(|n| {
                groups_in_super_group
                    .as_ref()
                    .map_or(true, |ids| ids.contains(n.user_group_id.as_str()))
            })
            .filter(|n| refined.map_or(true, |r| r.matches(n)))
            .collect()
    }
}
