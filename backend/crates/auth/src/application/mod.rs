//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod login;
pub mod logout;
pub mod register;
pub mod session;
pub mod token;
pub mod user_accounts;

// Re-exports
pub use authenticate::{AuthenticateUseCase, CurrentUser};
pub use config::AuthConfig;
pub use login::{LoginInput, LoginOutput, LoginUseCase};
pub use logout::LogoutUseCase;
pub use register::{RegisterInput, RegisterOutput, RegisterUseCase};
pub use session::{IssuedSession, SessionIssuer};
pub use token::{TokenClaims, TokenCodec, TokenError};
pub use user_accounts::{CreateUserInput, UpdateUserInput, UserAccountsUseCase};
