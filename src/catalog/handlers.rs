use axum::{
    extract::{Path, State},
    Json,
};
use tracing::{info, instrument, warn};

use super::{models::TestModel, types::TestRequest};
use crate::database::{parse_id, DeleteResult, InsertResult, UpdateResult};
use crate::shared::{AppError, AppState};

/// HTTP handler for listing the catalog
///
/// GET /allTests
#[instrument(name = "list_tests", skip(state))]
pub async fn list_tests(State(state): State<AppState>) -> Result<Json<Vec<TestModel>>, AppError> {
    let tests = state.test_repository.list_tests().await?;
    info!(test_count = tests.len(), "Tests listed successfully");
    Ok(Json(tests))
}

/// HTTP handler for adding a catalog entry
///
/// POST /allTests
/// Returns the generated ID
#[instrument(name = "create_test", skip(state, request))]
pub async fn create_test(
    State(state): State<AppState>,
    Json(request): Json<TestRequest>,
) -> Result<Json<InsertResult>, AppError> {
    let test = TestModel::new(request);
    state.test_repository.create_test(&test).await?;

    info!(test_id = %test.id, title = ?test.title, "Test created successfully");
    Ok(Json(InsertResult::new(test.id)))
}

/// PATCH /allTests/:id
///
/// Overwrites every editable field from the body
#[instrument(name = "update_test", skip(state, request))]
pub async fn update_test(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<TestRequest>,
) -> Result<Json<UpdateResult>, AppError> {
    let matched = match parse_id(&id) {
        Some(id) => state.test_repository.replace_test(id, &request).await?,
        None => {
            warn!(id = %id, "Malformed test id");
            0
        }
    };

    info!(id = %id, matched, "Test update finished");
    Ok(Json(UpdateResult::matched(matched)))
}

/// DELETE /allTests/:id
#[instrument(name = "delete_test", skip(state))]
pub async fn delete_test(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResult>, AppError> {
    let deleted = match parse_id(&id) {
        Some(id) => state.test_repository.delete_test(id).await?,
        None => {
            warn!(id = %id, "Malformed test id");
            0
        }
    };

    info!(id = %id, deleted, "Test delete finished");
    Ok(Json(DeleteResult::deleted(deleted)))
}
