use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A category of end users whose needs are tracked
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserGroup {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Id of the owning super group. Not validated on write; the ID allocator
    /// is the only consumer that requires it to resolve.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_group: Option<String>,
}

/// A higher-level grouping of user groups sharing an ID-prefix namespace
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSuperGroup {
    pub id: String,

    pub name: String,

    /// Short code used for need IDs (e.g. "AYK" in "AYK-001"), unique across super groups
    pub prefix: String,
}

/// A domain noun needs can be tagged with
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    pub id: String,

    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An ordered stage in a process that a need is attached to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WorkflowPhase {
    pub id: String,

    pub name: String,

    /// Display/process ordering, not required to be unique
    pub order: i64,
}

/// The core tracked record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserNeed {
    /// Human-readable id (e.g. "AYK-001")
    pub id: String,

    pub user_group_id: String,

    pub title: String,

    pub description: String,

    /// Ids of tagged entities, in caller order
    pub entities: Vec<String>,

    /// Id of the workflow phase
    pub workflow_phase: String,

    #[serde(default, deserialize_with = "null_as_false")]
    pub refined: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sla: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggers_state_change: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_state: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optional: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub future_feature: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<String>>,
}

fn null_as_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// The whole persisted collection graph, loaded and saved as one unit
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DataStore {
    #[serde(default)]
    pub user_groups: Vec<UserGroup>,

    #[serde(default)]
    pub entities: Vec<Entity>,

    #[serde(default)]
    pub workflow_phases: Vec<WorkflowPhase>,

    #[serde(default)]
    pub user_needs: Vec<UserNeed>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub user_super_groups: Vec<UserSuperGroup>,
}

impl DataStore {
    /// Creates a store with all collections empty
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_group(&self, id: &str) -> Option<&UserGroup> {
        self.user_groups.iter().find(|g| g.id == id)
    }

    pub fn super_group(&self, id: &str) -> Option<&UserSuperGroup> {
        self.user_super_groups.iter().find(|sg| sg.id == id)
    }

    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn workflow_phase(&self, id: &str) -> Option<&WorkflowPhase> {
        self.workflow_phases.iter().find(|p| p.id == id)
    }

    pub fn user_need(&self, id: &str) -> Option<&UserNeed> {
        self.user_needs.iter().find(|n| n.id == id)
    }
}

/// A single field of a partial update.
///
/// Keeps "not sent" apart from "sent as null": fields tagged with
/// `#[serde(default)]` deserialize to `Absent` when missing from the payload,
/// `Null` when given as JSON `null`, and `Set` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// The supplied value, if any
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Patch::Set(value) => Some(value),
            _ => None,
        }
    }

    /// Applies this patch to a nullable field
    pub fn apply_to(self, target: &mut Option<T>) {
        match self {
            Patch::Absent => {}
            Patch::Null => *target = None,
            Patch::Set(value) => *target = Some(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Set(value),
            None => Patch::Null,
        })
    }
}

impl<T> Serialize for Patch<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

/// Partial update payload for a user need. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserNeedPatch {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub user_group_id: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub title: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub description: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub entities: Patch<Vec<String>>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub workflow_phase: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub refined: Patch<bool>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub sla: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub triggers_state_change: Patch<bool>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub from_state: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub to_state: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub optional: Patch<bool>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub future_feature: Patch<bool>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub constraints: Patch<Vec<String>>,
}

/// Partial update payload for a super group. A full record is also a valid patch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSuperGroupPatch {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub id: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub name: Patch<String>,

    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub prefix: Patch<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_need_wire_names_are_camel_case() {
        let json = r#"{
            "id": "AYK-001",
            "userGroupId": "admins",
            "title": "Export",
            "description": "Export data",
            "entities": ["report"],
            "workflowPhase": "review",
            "triggersStateChange": true,
            "fromState": "draft",
            "toState": "final",
            "futureFeature": false
        }"#;

        let need: UserNeed = serde_json::from_str(json).unwrap();
        assert_eq!(need.user_group_id, "admins");
        assert_eq!(need.workflow_phase, "review");
        assert!(!need.refined);
        assert_eq!(need.triggers_state_change, Some(true));
        assert_eq!(need.from_state.as_deref(), Some("draft"));
        assert_eq!(need.future_feature, Some(false));
        assert!(need.sla.is_none());

        let value = serde_json::to_value(&need).unwrap();
        assert_eq!(value["userGroupId"], "admins");
        assert_eq!(value["toState"], "final");
        assert_eq!(value["refined"], false);
        assert!(value.get("sla").is_none());
    }

    #[test]
    fn test_refined_null_reads_as_false() {
        let json = r#"{"id":"X-001","userGroupId":"g","title":"t","description":"d",
            "entities":[],"workflowPhase":"p","refined":null}"#;
        let need: UserNeed = serde_json::from_str(json).unwrap();
        assert!(!need.refined);
    }

    #[test]
    fn test_empty_store_has_four_arrays() {
        let value = serde_json::to_value(DataStore::new()).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 4);
        assert!(value.get("userSuperGroups").is_none());

        let store: DataStore =
            serde_json::from_str(r#"{"userGroups":[],"entities":[],"workflowPhases":[],"userNeeds":[]}"#)
                .unwrap();
        assert!(store.user_super_groups.is_empty());
    }

    #[test]
    fn test_user_group_super_group_field() {
        let group: UserGroup =
            serde_json::from_str(r#"{"id":"ops","name":"Ops","superGroup":"aykua"}"#).unwrap();
        assert_eq!(group.super_group.as_deref(), Some("aykua"));
        assert!(group.description.is_none());
    }

    #[test]
    fn test_patch_distinguishes_absent_null_and_set() {
        let patch: UserNeedPatch =
            serde_json::from_str(r#"{"title":"New","sla":null}"#).unwrap();
        assert_eq!(patch.title, Patch::Set("New".to_string()));
        assert_eq!(patch.sla, Patch::Null);
        assert_eq!(patch.description, Patch::Absent);
        assert_eq!(patch.entities, Patch::Absent);
    }

    #[test]
    fn test_patch_apply_to() {
        let mut sla = Some("24h".to_string());
        Patch::Absent.apply_to(&mut sla);
        assert_eq!(sla.as_deref(), Some("24h"));

        Patch::Set("48h".to_string()).apply_to(&mut sla);
        assert_eq!(sla.as_deref(), Some("48h"));

        Patch::<String>::Null.apply_to(&mut sla);
        assert!(sla.is_none());
    }

    #[test]
    fn test_patch_serializes_only_supplied_fields() {
        let patch = UserNeedPatch {
            title: Patch::Set("T".into()),
            sla: Patch::Null,
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value, serde_json::json!({"title": "T", "sla": null}));
    }
}
