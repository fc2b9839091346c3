pub mod crud;
pub mod demo;
pub mod error;
pub mod ids;
pub mod models;
pub mod query;
pub mod router;
pub mod service;
pub mod setup;
pub mod stats;
pub mod storage;

// Re-export commonly used types
pub use demo::{DemoModeGate, DemoModeStatus};
pub use error::{NeedsError, RecordKind, Result};
pub use ids::{format_need_id, NextId};
pub use models::{
    DataStore, Entity, Patch, UserGroup, UserNeed, UserNeedPatch, UserSuperGroup,
    UserSuperGroupPatch, WorkflowPhase,
};
pub use query::{NeedFilter, RefinedFilter};
pub use router::{StorageMode, StoragePaths, StorageRouter};
pub use service::NeedsService;
pub use setup::{check_setup, SetupStatus};
pub use stats::Statistics;
pub use storage::Storage;
