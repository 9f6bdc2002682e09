// Public API - what other modules can use
pub use handlers::{create_booking, delete_booking, list_all_bookings, list_bookings};
pub use models::BookingModel;
pub use types::BookingRequest;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod types;
