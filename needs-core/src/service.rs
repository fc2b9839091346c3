//! Request-level operations.
//!
//! Each call routes `mode` to a data file, loads the whole store, and for
//! mutations writes the whole store back under the file's write lock.

use log::info;

use crate::error::{NeedsError, RecordKind, Result};
use crate::ids::NextId;
use crate::models::{
    DataStore, Entity, UserGroup, UserNeed, UserNeedPatch, UserSuperGroup, UserSuperGroupPatch,
    WorkflowPhase,
};
use crate::query::NeedFilter;
use crate::router::{StorageMode, StoragePaths, StorageRouter};
use crate::setup::{check_setup, SetupStatus};
use crate::stats::Statistics;
use crate::storage::Storage;

pub struct NeedsService {
    router: StorageRouter,
}

impl NeedsService {
    pub fn new(paths: StoragePaths) -> Self {
        Self {
            router: StorageRouter::new(paths),
        }
    }

    pub fn router(&self) -> &StorageRouter {
        &self.router
    }

    fn storage(&self, mode: StorageMode) -> Result<Storage> {
        Ok(self.router.storage(mode)?)
    }

    /// Loads the whole store for `mode`
    pub fn load(&self, mode: StorageMode) -> Result<DataStore> {
        Ok(self.storage(mode)?.load()?)
    }

    fn update<T, F>(&self, mode: StorageMode, update_fn: F) -> Result<T>
    where
        F: FnOnce(&mut DataStore) -> Result<T>,
    {
        self.storage(mode)?.update_atomically(update_fn)
    }

    // =========================================================================
    // User groups
    // =========================================================================

    pub fn list_user_groups(&self, mode: StorageMode) -> Result<Vec<UserGroup>> {
        Ok(self.load(mode)?.user_groups)
    }

    pub fn create_user_group(&self, mode: StorageMode, group: UserGroup) -> Result<UserGroup> {
        let created = self.update(mode, |store| store.create_user_group(group).cloned())?;
        info!("Created user group {} ({} storage)", created.id, mode);
        Ok(created)
    }

    pub fn next_need_id(&self, mode: StorageMode, user_group_id: &str) -> Result<NextId> {
        self.load(mode)?.next_need_id(user_group_id)
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn list_entities(&self, mode: StorageMode) -> Result<Vec<Entity>> {
        Ok(self.load(mode)?.entities)
    }

    pub fn list_workflow_phases(&self, mode: StorageMode) -> Result<Vec<WorkflowPhase>> {
        Ok(self.load(mode)?.workflow_phases)
    }

    // =========================================================================
    // User needs
    // =========================================================================

    pub fn list_user_needs(&self, mode: StorageMode, filter: &NeedFilter) -> Result<Vec<UserNeed>> {
        let store = self.load(mode)?;
        Ok(store.filter_user_needs(filter).into_iter().cloned().collect())
    }

    pub fn get_user_need(&self, mode: StorageMode, id: &str) -> Result<UserNeed> {
        self.load(mode)?
            .user_need(id)
            .cloned()
            .ok_or_else(|| NeedsError::not_found(RecordKind::UserNeed, id))
    }

    pub fn create_user_need(&self, mode: StorageMode, need: UserNeed) -> Result<UserNeed> {
        let created = self.update(mode, |store| store.create_user_need(need).cloned())?;
        info!("Created user need {} ({} storage)", created.id, mode);
        Ok(created)
    }

    pub fn update_user_need(
        &self,
        mode: StorageMode,
        id: &str,
        patch: UserNeedPatch,
    ) -> Result<UserNeed> {
        let updated = self.update(mode, |store| store.update_user_need(id, patch).cloned())?;
        info!("Updated user need {} ({} storage)", id, mode);
        Ok(updated)
    }

    pub fn delete_user_need(&self, mode: StorageMode, id: &str) -> Result<UserNeed> {
        let removed = self.update(mode, |store| store.delete_user_need(id))?;
        info!("Deleted user need {} ({} storage)", id, mode);
        Ok(removed)
    }

    // =========================================================================
    // User super groups
    // =========================================================================

    pub fn list_super_groups(&self, mode: StorageMode) -> Result<Vec<UserSuperGroup>> {
        Ok(self.load(mode)?.user_super_groups)
    }

    pub fn get_super_group(&self, mode: StorageMode, id: &str) -> Result<UserSuperGroup> {
        self.load(mode)?
            .super_group(id)
            .cloned()
            .ok_or_else(|| NeedsError::not_found(RecordKind::UserSuperGroup, id))
    }

    pub fn create_super_group(
        &self,
        mode: StorageMode,
        super_group: UserSuperGroup,
    ) -> Result<UserSuperGroup> {
        let created = self.update(mode, |store| store.create_super_group(super_group).cloned())?;
        info!("Created user super group {} ({} storage)", created.id, mode);
        Ok(created)
    }

    pub fn update_super_group(
        &self,
        mode: StorageMode,
        id: &str,
        patch: UserSuperGroupPatch,
    ) -> Result<UserSuperGroup> {
        let updated = self.update(mode, |store| store.update_super_group(id, patch).cloned())?;
        info!("Updated user super group {} ({} storage)", updated.id, mode);
        Ok(updated)
    }

    pub fn delete_super_group(&self, mode: StorageMode, id: &str) -> Result<UserSuperGroup> {
        let removed = self.update(mode, |store| store.delete_super_group(id))?;
        info!("Deleted user super group {} ({} storage)", id, mode);
        Ok(removed)
    }

    // =========================================================================
    // Setup and statistics
    // =========================================================================

    /// Setup status of the primary store, whatever mode is active
    pub fn check_setup(&self) -> SetupStatus {
        check_setup(&self.router.paths().data_file)
    }

    pub fn statistics(&self, mode: StorageMode) -> Result<Statistics> {
        Ok(self.load(mode)?.statistics())
    }
}
