//! Biolink Auth
//!
//! Discord sign-in for the landing page. State lives in two cookies; there is
//! no session store.

pub mod config;
pub mod error;
pub mod provider;
pub mod routes;

pub use config::AuthConfig;
pub use error::{AuthError, ProviderError};
pub use provider::{DiscordClient, IdentityProvider, UserRecord};
pub use routes::{router, AuthState};
