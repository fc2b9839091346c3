//! Sequential need IDs such as `AYK-007`, scoped by super group prefix

use serde::Serialize;

use crate::error::{NeedsError, RecordKind, Result};
use crate::models::DataStore;

/// A candidate id. Nothing is reserved until a need is created with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextId {
    pub next_id: String,
    pub prefix: String,
}

/// Formats `<prefix>-<number>`, zero-padding the number to three digits
pub fn format_need_id(prefix: &str, number: u64) -> String {
    format!("{}-{:03}", prefix, number)
}

/// Numeric suffix of `id` when it has the form `<prefix>-<digits>`
fn parse_suffix(id: &str, prefix: &str) -> Option<u64> {
    let digits = id.strip_prefix(prefix)?.strip_prefix('-')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl DataStore {
    /// Highest numeric suffix among need ids under `prefix`, or 0.
    /// Ids that do not fit the pattern are skipped.
    pub fn highest_need_number(&self, prefix: &str) -> u64 {
        self.user_needs
            .iter()
            .filter_map(|n| parse_suffix(&n.id, prefix))
            .max()
            .unwrap_or(0)
    }

    /// Computes the next need id for a user group, from its super group's prefix
    pub fn next_need_id(&self, user_group_id: &str) -> Result<NextId> {
        let group = self
            .user_group(user_group_id)
            .ok_or_else(|| NeedsError::not_found(RecordKind::UserGroup, user_group_id))?;

        let super_group = group
            .super_group
            .as_deref()
            .and_then(|id| self.super_group(id))
            .ok_or_else(|| {
                NeedsError::InvalidReference(format!(
                    "Invalid super group for user group '{}'",
                    user_group_id
                ))
            })?;

        let prefix = super_group.prefix.clone();
        let next = self
            .highest_need_number(&prefix)
            .checked_add(1)
            .ok_or_else(|| {
                NeedsError::Conflict(format!("No need ids left under prefix '{}'", prefix))
            })?;
        Ok(NextId {
            next_id: format_need_id(&prefix, next),
            prefix,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crud::tests::{group, need, seeded_store, super_group};

    #[test]
    fn test_next_id_after_gap() {
        let mut store = seeded_store();
        for id in ["AYK-001", "AYK-002", "AYK-005"] {
            store.user_needs.push(need(id, "admins", &[]));
        }

        let next = store.next_need_id("clerks").unwrap();
        assert_eq!(next.next_id, "AYK-006");
        assert_eq!(next.prefix, "AYK");
    }

    #[test]
    fn test_first_id_for_prefix() {
        let store = seeded_store();
        assert_eq!(store.next_need_id("admins").unwrap().next_id, "AYK-001");
    }

    #[test]
    fn test_other_prefixes_and_malformed_ids_are_skipped() {
        let mut store = seeded_store();
        store.user_super_groups.push(super_group("partners", "AYKX"));
        for id in [
            "AYK-003", "AYKX-050", "AYK-", "AYK-abc", "AYK-12b", "AYK", "XYZ-900", "AYK-+7",
        ] {
            store.user_needs.push(need(id, "admins", &[]));
        }

        assert_eq!(store.highest_need_number("AYK"), 3);
        assert_eq!(store.highest_need_number("AYKX"), 50);
        assert_eq!(store.next_need_id("admins").unwrap().next_id, "AYK-004");
    }

    #[test]
    fn test_number_wider_than_padding() {
        let mut store = seeded_store();
        store.user_needs.push(need("AYK-999", "admins", &[]));
        assert_eq!(store.next_need_id("admins").unwrap().next_id, "AYK-1000");

        assert_eq!(format_need_id("AYK", 7), "AYK-007");
        assert_eq!(format_need_id("AYK", 1234), "AYK-1234");
    }

    #[test]
    fn test_largest_suffix_exhausts_prefix() {
        let mut store = seeded_store();
        store
            .create_user_need(need("AYK-18446744073709551615", "admins", &[]))
            .unwrap();

        assert_eq!(store.highest_need_number("AYK"), u64::MAX);
        assert!(matches!(
            store.next_need_id("admins"),
            Err(NeedsError::Conflict(_))
        ));
    }

    #[test]
    fn test_suffix_too_large_to_parse_is_skipped() {
        let mut store = seeded_store();
        store.user_needs.push(need("AYK-004", "admins", &[]));
        store
            .user_needs
            .push(need("AYK-99999999999999999999999", "admins", &[]));

        assert_eq!(store.next_need_id("admins").unwrap().next_id, "AYK-005");
    }

    #[test]
    fn test_unknown_user_group() {
        let store = seeded_store();
        assert!(matches!(
            store.next_need_id("ghosts"),
            Err(NeedsError::NotFound {
                kind: RecordKind::UserGroup,
                ..
            })
        ));
    }

    #[test]
    fn test_group_without_usable_super_group() {
        let mut store = seeded_store();
        store.user_groups.push(group("loners", "Loners", None));
        store
            .user_groups
            .push(group("orphans", "Orphans", Some("deleted")));

        for id in ["loners", "orphans"] {
            assert!(matches!(
                store.next_need_id(id),
                Err(NeedsError::InvalidReference(_))
            ));
        }
    }

    #[test]
    fn test_next_id_wire_shape() {
        let store = seeded_store();
        let value = serde_json::to_value(store.next_need_id("admins").unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"nextId": "AYK-001", "prefix": "AYK"}));
    }
}
