//! Validated create/update/delete over the in-memory store.
//!
//! Every method either applies its change completely or returns an error with
//! the store untouched, so callers can run them inside
//! [`Storage::update_atomically`](crate::storage::Storage::update_atomically).

use crate::error::{NeedsError, RecordKind, Result};
use crate::models::{
    DataStore, Patch, UserGroup, UserNeed, UserNeedPatch, UserSuperGroup, UserSuperGroupPatch,
};

impl DataStore {
    fn check_user_group_ref(&self, id: &str) -> Result<()> {
        if self.user_group(id).is_none() {
            return Err(NeedsError::InvalidReference(format!(
                "Invalid userGroupId: {}",
                id
            )));
        }
        Ok(())
    }

    fn check_workflow_phase_ref(&self, id: &str) -> Result<()> {
        if self.workflow_phase(id).is_none() {
            return Err(NeedsError::InvalidReference(format!(
                "Invalid workflowPhase: {}",
                id
            )));
        }
        Ok(())
    }

    fn check_entity_refs(&self, ids: &[String]) -> Result<()> {
        match ids.iter().find(|id| self.entity(id).is_none()) {
            Some(missing) => Err(NeedsError::InvalidReference(format!(
                "Invalid entity: {}",
                missing
            ))),
            None => Ok(()),
        }
    }

    fn check_prefix_free(&self, prefix: &str) -> Result<()> {
        if self.user_super_groups.iter().any(|sg| sg.prefix == prefix) {
            return Err(NeedsError::Conflict(format!(
                "User super group with prefix '{}' already exists",
                prefix
            )));
        }
        Ok(())
    }

    /// Appends a user group. The super group reference is not checked.
    pub fn create_user_group(&mut self, group: UserGroup) -> Result<&UserGroup> {
        if self.user_group(&group.id).is_some() {
            return Err(NeedsError::duplicate_id(RecordKind::UserGroup, &group.id));
        }
        self.user_groups.push(group);
        Ok(&self.user_groups[self.user_groups.len() - 1])
    }

    /// Appends a user need after checking id uniqueness and every reference
    pub fn create_user_need(&mut self, need: UserNeed) -> Result<&UserNeed> {
        if self.user_need(&need.id).is_some() {
            return Err(NeedsError::duplicate_id(RecordKind::UserNeed, &need.id));
        }
        self.check_user_group_ref(&need.user_group_id)?;
        self.check_workflow_phase_ref(&need.workflow_phase)?;
        self.check_entity_refs(&need.entities)?;

        self.user_needs.push(need);
        Ok(&self.user_needs[self.user_needs.len() - 1])
    }

    /// Merges the supplied fields into an existing need, in place.
    ///
    /// Only references present in the patch are revalidated.
    pub fn update_user_need(&mut self, id: &str, patch: UserNeedPatch) -> Result<&UserNeed> {
        let index = self
            .user_needs
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| NeedsError::not_found(RecordKind::UserNeed, id))?;

        if let Some(group_id) = patch.user_group_id.as_set() {
            self.check_user_group_ref(group_id)?;
        }
        if let Some(phase_id) = patch.workflow_phase.as_set() {
            self.check_workflow_phase_ref(phase_id)?;
        }
        if let Some(entities) = patch.entities.as_set() {
            self.check_entity_refs(entities)?;
        }

        let mut need = self.user_needs[index].clone();
        set_required(&mut need.user_group_id, patch.user_group_id, "userGroupId")?;
        set_required(&mut need.title, patch.title, "title")?;
        set_required(&mut need.description, patch.description, "description")?;
        set_required(&mut need.entities, patch.entities, "entities")?;
        set_required(&mut need.workflow_phase, patch.workflow_phase, "workflowPhase")?;
        match patch.refined {
            Patch::Absent => {}
            Patch::Null => need.refined = false,
            Patch::Set(refined) => need.refined = refined,
        }
        patch.sla.apply_to(&mut need.sla);
        patch
            .triggers_state_change
            .apply_to(&mut need.triggers_state_change);
        patch.from_state.apply_to(&mut need.from_state);
        patch.to_state.apply_to(&mut need.to_state);
        patch.optional.apply_to(&mut need.optional);
        patch.future_feature.apply_to(&mut need.future_feature);
        patch.constraints.apply_to(&mut need.constraints);

        self.user_needs[index] = need;
        Ok(&self.user_needs[index])
    }

    /// Removes a need and returns it
    pub fn delete_user_need(&mut self, id: &str) -> Result<UserNeed> {
        let index = self
            .user_needs
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| NeedsError::not_found(RecordKind::UserNeed, id))?;
        Ok(self.user_needs.remove(index))
    }

    /// Appends a super group; both id and prefix must be unused
    pub fn create_super_group(&mut self, super_group: UserSuperGroup) -> Result<&UserSuperGroup> {
        if self.super_group(&super_group.id).is_some() {
            return Err(NeedsError::duplicate_id(
                RecordKind::UserSuperGroup,
                &super_group.id,
            ));
        }
        self.check_prefix_free(&super_group.prefix)?;

        self.user_super_groups.push(super_group);
        Ok(&self.user_super_groups[self.user_super_groups.len() - 1])
    }

    /// Merges the supplied fields into a super group.
    ///
    /// A changed id must not collide with another super group, and user
    /// groups pointing at the old id are re-pointed to the new one.
    pub fn update_super_group(
        &mut self,
        id: &str,
        patch: UserSuperGroupPatch,
    ) -> Result<&UserSuperGroup> {
        let index = self
            .user_super_groups
            .iter()
            .position(|sg| sg.id == id)
            .ok_or_else(|| NeedsError::not_found(RecordKind::UserSuperGroup, id))?;

        if let Some(new_id) = patch.id.as_set() {
            if new_id != id && self.super_group(new_id).is_some() {
                return Err(NeedsError::duplicate_id(RecordKind::UserSuperGroup, new_id));
            }
        }
        if let Some(prefix) = patch.prefix.as_set() {
            if *prefix != self.user_super_groups[index].prefix {
                self.check_prefix_free(prefix)?;
            }
        }

        let mut super_group = self.user_super_groups[index].clone();
        set_required(&mut super_group.id, patch.id, "id")?;
        set_required(&mut super_group.name, patch.name, "name")?;
        set_required(&mut super_group.prefix, patch.prefix, "prefix")?;

        if super_group.id != id {
            for group in self
                .user_groups
                .iter_mut()
                .filter(|g| g.super_group.as_deref() == Some(id))
            {
                group.super_group = Some(super_group.id.clone());
            }
        }

        self.user_super_groups[index] = super_group;
        Ok(&self.user_super_groups[index])
    }

    /// Removes a super group that no user group depends on
    pub fn delete_super_group(&mut self, id: &str) -> Result<UserSuperGroup> {
        let dependents: Vec<&str> = self
            .user_groups
            .iter()
            .filter(|g| g.super_group.as_deref() == Some(id))
            .map(|g| g.name.as_str())
            .collect();
        if !dependents.is_empty() {
            return Err(NeedsError::Conflict(format!(
                "Cannot delete super group: {} user group(s) depend on it ({})",
                dependents.len(),
                dependents.join(", ")
            )));
        }

        let index = self
            .user_super_groups
            .iter()
            .position(|sg| sg.id == id)
            .ok_or_else(|| NeedsError::not_found(RecordKind::UserSuperGroup, id))?;
        Ok(self.user_super_groups.remove(index))
    }
}

/// Applies a patch to a field that cannot be null
fn set_required<T>(target: &mut T, patch: Patch<T>, field: &str) -> Result<()> {
    match patch {
        Patch::Absent => Ok(()),
        Patch::Null => Err(NeedsError::InvalidField(format!(
            "Field '{}' cannot be null",
            field
        ))),
        Patch::Set(value) => {
            *target = value;
            Ok(())
        }
    }
}
