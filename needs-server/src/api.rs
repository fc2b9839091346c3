//! HTTP routes over the user needs service

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use needs_core::{
    DemoModeStatus, Entity, NeedFilter, NextId, SetupStatus, Statistics, UserGroup, UserNeed,
    UserNeedPatch, UserSuperGroup, UserSuperGroupPatch, WorkflowPhase,
};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Per-request storage override sent by the web client
#[derive(Debug, Default, Deserialize)]
pub struct DemoQuery {
    pub demo_mode: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct DemoModeRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/api/demo-mode", get(get_demo_mode).post(set_demo_mode))
        .route("/api/user-groups", get(list_user_groups).post(create_user_group))
        .route("/api/user-groups/next-id/{user_group_id}", get(next_need_id))
        .route("/api/next-id/{user_group_id}", get(next_need_id))
        .route("/api/entities", get(list_entities))
        .route("/api/workflow-phases", get(list_workflow_phases))
        .route("/api/user-needs", get(list_user_needs).post(create_user_need))
        .route(
            "/api/user-needs/{id}",
            get(get_user_need)
                .put(update_user_need)
                .delete(delete_user_need),
        )
        .route(
            "/api/user-super-groups",
            get(list_super_groups).post(create_super_group),
        )
        .route(
            "/api/user-super-groups/{id}",
            get(get_super_group)
                .put(update_super_group)
                .delete(delete_super_group),
        )
        .route("/api/check-setup", get(check_setup))
        .route("/api/statistics", get(statistics))
        .with_state(state)
}

async fn service_info() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "User Needs Management API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Demo mode
// =============================================================================

async fn get_demo_mode(State(state): State<AppState>) -> Json<DemoModeStatus> {
    Json(state.demo.status())
}

async fn set_demo_mode(
    State(state): State<AppState>,
    Json(request): Json<DemoModeRequest>,
) -> ApiResult<DemoModeStatus> {
    Ok(Json(state.demo.set_enabled(request.enabled)?))
}

// =============================================================================
// User groups
// =============================================================================

async fn list_user_groups(
    State(state): State<AppState>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<Vec<UserGroup>> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.list_user_groups(mode))
        .await
}

async fn create_user_group(
    State(state): State<AppState>,
    Query(demo): Query<DemoQuery>,
    Json(group): Json<UserGroup>,
) -> ApiResult<UserGroup> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.create_user_group(mode, group))
        .await
}

async fn next_need_id(
    State(state): State<AppState>,
    Path(user_group_id): Path<String>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<NextId> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.next_need_id(mode, &user_group_id))
        .await
}

// =============================================================================
// Metadata
// =============================================================================

async fn list_entities(
    State(state): State<AppState>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<Vec<Entity>> {
    let mode = state.mode(demo.demo_mode);
    state.run(move |service| service.list_entities(mode)).await
}

async fn list_workflow_phases(
    State(state): State<AppState>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<Vec<WorkflowPhase>> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.list_workflow_phases(mode))
        .await
}

// =============================================================================
// User needs
// =============================================================================

async fn list_user_needs(
    State(state): State<AppState>,
    Query(demo): Query<DemoQuery>,
    Query(filter): Query<NeedFilter>,
) -> ApiResult<Vec<UserNeed>> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.list_user_needs(mode, &filter))
        .await
}

async fn get_user_need(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<UserNeed> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.get_user_need(mode, &id))
        .await
}

async fn create_user_need(
    State(state): State<AppState>,
    Query(demo): Query<DemoQuery>,
    Json(need): Json<UserNeed>,
) -> ApiResult<UserNeed> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.create_user_need(mode, need))
        .await
}

async fn update_user_need(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(demo): Query<DemoQuery>,
    Json(patch): Json<UserNeedPatch>,
) -> ApiResult<UserNeed> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.update_user_need(mode, &id, patch))
        .await
}

async fn delete_user_need(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<DeleteResponse> {
    let mode = state.mode(demo.demo_mode);
    let Json(removed) = state
        .run(move |service| service.delete_user_need(mode, &id))
        .await?;
    Ok(Json(DeleteResponse {
        message: "User need deleted successfully".to_string(),
        id: removed.id,
    }))
}

// =============================================================================
// User super groups
// =============================================================================

async fn list_super_groups(
    State(state): State<AppState>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<Vec<UserSuperGroup>> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.list_super_groups(mode))
        .await
}

async fn get_super_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<UserSuperGroup> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.get_super_group(mode, &id))
        .await
}

async fn create_super_group(
    State(state): State<AppState>,
    Query(demo): Query<DemoQuery>,
    Json(super_group): Json<UserSuperGroup>,
) -> ApiResult<UserSuperGroup> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.create_super_group(mode, super_group))
        .await
}

async fn update_super_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(demo): Query<DemoQuery>,
    Json(patch): Json<UserSuperGroupPatch>,
) -> ApiResult<UserSuperGroup> {
    let mode = state.mode(demo.demo_mode);
    state
        .run(move |service| service.update_super_group(mode, &id, patch))
        .await
}

async fn delete_super_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<DeleteResponse> {
    let mode = state.mode(demo.demo_mode);
    let Json(removed) = state
        .run(move |service| service.delete_super_group(mode, &id))
        .await?;
    Ok(Json(DeleteResponse {
        message: "User super group deleted successfully".to_string(),
        id: removed.id,
    }))
}

// =============================================================================
// Setup and statistics
// =============================================================================

/// Always inspects the primary store
async fn check_setup(State(state): State<AppState>) -> ApiResult<SetupStatus> {
    state
        .run(|service| Ok(service.check_setup()))
        .await
}

async fn statistics(
    State(state): State<AppState>,
    Query(demo): Query<DemoQuery>,
) -> ApiResult<Statistics> {
    let mode = state.mode(demo.demo_mode);
    state.run(move |service| service.statistics(mode)).await
}
