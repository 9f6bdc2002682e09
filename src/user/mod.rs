// Public API - what other modules can use
pub use handlers::{
    check_admin, delete_user, demote_user, list_users, promote_user, upsert_user, user_details,
};
pub use models::{Role, UserModel};
pub use service::UserService;

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
pub mod types;
