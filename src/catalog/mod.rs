// Public API - what other modules can use
pub use handlers::{create_test, delete_test, list_tests, update_test};
pub use models::TestModel;
pub use types::TestRequest;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
pub mod types;
