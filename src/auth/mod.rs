// Public API - what other modules can use
pub use handlers::{issue_token, logout};
pub use middleware::{require_admin, require_authenticated, Access};
pub use token::TokenConfig;
pub use transport::{BearerTransport, CookieTransport, CredentialTransport, TOKEN_COOKIE};
pub use types::{SuccessResponse, TokenClaims, TokenResponse};

// Internal modules
mod handlers;
mod middleware;
mod token;
pub mod transport;
mod types;
