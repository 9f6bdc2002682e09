use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::{models::TestModel, types::TestRequest};
use crate::database::lock_collection;
use crate::shared::AppError;

const TEST_COLUMNS: &str = "id, title, details, img_url, date, price, slots";

/// Trait for catalog repository operations
#[async_trait]
pub trait TestRepository {
    async fn list_tests(&self) -> Result<Vec<TestModel>, AppError>;
    async fn create_test(&self, test: &TestModel) -> Result<(), AppError>;

    /// Overwrites every editable field, returning the number of matched records
    async fn replace_test(&self, id: Uuid, request: &TestRequest) -> Result<u64, AppError>;

    /// Removes one entry, returning the number of deleted records
    async fn delete_test(&self, id: Uuid) -> Result<u64, AppError>;
}

/// In-memory implementation of TestRepository for development and testing
pub struct InMemoryTestRepository {
    tests: Mutex<Vec<TestModel>>,
}

impl Default for InMemoryTestRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTestRepository {
    pub fn new() -> Self {
        Self {
            tests: Mutex::new(Vec::new()),
        }
    }

    pub fn test_count(&self) -> usize {
        self.tests.lock().map(|tests| tests.len()).unwrap_or(0)
    }
}

#[async_trait]
impl TestRepository for InMemoryTestRepository {
    #[instrument(skip(self))]
    async fn list_tests(&self) -> Result<Vec<TestModel>, AppError> {
        let tests = lock_collection(&self.tests)?;
        debug!(test_count = tests.len(), "Listing tests from memory");
        Ok(tests.clone())
    }

    #[instrument(skip(self, test), fields(test_id = %test.id))]
    async fn create_test(&self, test: &TestModel) -> Result<(), AppError> {
        let mut tests = lock_collection(&self.tests)?;
        if tests.iter().any(|t| t.id == test.id) {
            warn!("Test already exists in memory");
            return Err(AppError::DatabaseError("Test already exists".to_string()));
        }
        tests.push(test.clone());

        debug!("Test created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self, request))]
    async fn replace_test(&self, id: Uuid, request: &TestRequest) -> Result<u64, AppError> {
        let mut tests = lock_collection(&self.tests)?;

        match tests.iter_mut().find(|t| t.id == id) {
            Some(test) => {
                test.overwrite(request.clone());
                debug!(test_id = %id, "Test overwritten in memory");
                Ok(1)
            }
            None => {
                debug!(test_id = %id, "Test not found for update in memory");
                Ok(0)
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_test(&self, id: Uuid) -> Result<u64, AppError> {
        let mut tests = lock_collection(&self.tests)?;
        match tests.iter().position(|t| t.id == id) {
            Some(index) => {
                tests.remove(index);
                debug!(test_id = %id, "Test deleted from memory");
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// PostgreSQL implementation of catalog repository
pub struct PostgresTestRepository {
    pool: PgPool,
}

impl PostgresTestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TestRepository for PostgresTestRepository {
    #[instrument(skip(self))]
    async fn list_tests(&self) -> Result<Vec<TestModel>, AppError> {
        sqlx::query_as::<_, TestModel>(&format!(
            "SELECT {} FROM tests ORDER BY seq",
            TEST_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list tests");
            AppError::from(e)
        })
    }

    #[instrument(skip(self, test), fields(test_id = %test.id))]
    async fn create_test(&self, test: &TestModel) -> Result<(), AppError> {
        sqlx::query(&format!(
            "INSERT INTO tests ({}) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            TEST_COLUMNS
        ))
        .bind(test.id)
        .bind(&test.title)
        .bind(&test.details)
        .bind(&test.img_url)
        .bind(&test.date)
        .bind(test.price)
        .bind(test.slots)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create test in database");
            AppError::from(e)
        })?;

        debug!("Test created successfully in database");
        Ok(())
    }

    #[instrument(skip(self, request))]
    async fn replace_test(&self, id: Uuid, request: &TestRequest) -> Result<u64, AppError> {
        let result = sqlx::query(
            "UPDATE tests SET title = $2, details = $3, img_url = $4, date = $5, price = $6, slots = $7 \
             WHERE id = $1",
        )
        .bind(id)
        .bind(&request.title)
        .bind(&request.details)
        .bind(&request.img_url)
        .bind(&request.date)
        .bind(request.price)
        .bind(request.slots)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, test_id = %id, "Failed to update test in database");
            AppError::from(e)
        })?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn delete_test(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM tests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, test_id = %id, "Failed to delete test from database");
                AppError::from(e)
            })?;

        Ok(result.rows_affected())
    }
}
