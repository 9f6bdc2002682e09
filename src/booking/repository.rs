use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Mutex;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::BookingModel;
use crate::database::lock_collection;
use crate::shared::AppError;

const BOOKING_COLUMNS: &str = "id, email, test_id, title, date, price, booked_at";

/// Trait for booking repository operations
#[async_trait]
pub trait BookingRepository {
    async fn create_booking(&self, booking: &BookingModel) -> Result<(), AppError>;
    async fn list_bookings(&self) -> Result<Vec<BookingModel>, AppError>;
    async fn list_bookings_by_email(&self, email: &str) -> Result<Vec<BookingModel>, AppError>;

    /// Removes one booking, returning the number of deleted records
    async fn delete_booking(&self, id: Uuid) -> Result<u64, AppError>;
}

/// In-memory implementation of BookingRepository for development and testing
pub struct InMemoryBookingRepository {
    bookings: Mutex<Vec<BookingModel>>,
}

impl Default for InMemoryBookingRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryBookingRepository {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
        }
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.lock().map(|b| b.len()).unwrap_or(0)
    }
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id, email = %booking.email))]
    async fn create_booking(&self, booking: &BookingModel) -> Result<(), AppError> {
        let mut bookings = lock_collection(&self.bookings)?;
        if bookings.iter().any(|b| b.id == booking.id) {
            warn!("Booking already exists in memory");
            return Err(AppError::DatabaseError("Booking already exists".to_string()));
        }
        bookings.push(booking.clone());

        debug!("Booking created successfully in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_bookings(&self) -> Result<Vec<BookingModel>, AppError> {
        let bookings = lock_collection(&self.bookings)?;
        Ok(bookings.clone())
    }

    #[instrument(skip(self))]
    async fn list_bookings_by_email(&self, email: &str) -> Result<Vec<BookingModel>, AppError> {
        let bookings = lock_collection(&self.bookings)?;
        let matching: Vec<BookingModel> = bookings
            .iter()
            .filter(|b| b.email == email)
            .cloned()
            .collect();

        debug!(email = %email, booking_count = matching.len(), "Bookings found in memory");
        Ok(matching)
    }

    #[instrument(skip(self))]
    async fn delete_booking(&self, id: Uuid) -> Result<u64, AppError> {
        let mut bookings = lock_collection(&self.bookings)?;
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        Ok((before - bookings.len()) as u64)
    }
}

/// PostgreSQL implementation of booking repository
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    #[instrument(skip(self, booking), fields(booking_id = %booking.id, email = %booking.email))]
    async fn create_booking(&self, booking: &BookingModel) -> Result<(), AppError> {
        sqlx::query(&format!(
            "INSERT INTO bookings ({}) VALUES ($1, $2, $3, $4, $5, $6, $7)",
            BOOKING_COLUMNS
        ))
        .bind(booking.id)
        .bind(&booking.email)
        .bind(&booking.test_id)
        .bind(&booking.title)
        .bind(&booking.date)
        .bind(booking.price)
        .bind(booking.booked_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create booking in database");
            AppError::from(e)
        })?;

        debug!("Booking created successfully in database");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_bookings(&self) -> Result<Vec<BookingModel>, AppError> {
        sqlx::query_as::<_, BookingModel>(&format!(
            "SELECT {} FROM bookings ORDER BY seq",
            BOOKING_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list bookings");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn list_bookings_by_email(&self, email: &str) -> Result<Vec<BookingModel>, AppError> {
        sqlx::query_as::<_, BookingModel>(&format!(
            "SELECT {} FROM bookings WHERE email = $1 ORDER BY seq",
            BOOKING_COLUMNS
        ))
        .bind(email)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, email = %email, "Failed to list bookings by email");
            AppError::from(e)
        })
    }

    #[instrument(skip(self))]
    async fn delete_booking(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, booking_id = %id, "Failed to delete booking");
                AppError::from(e)
            })?;

        Ok(result.rows_affected())
    }
}
