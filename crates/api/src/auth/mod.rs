pub mod config;
pub mod cookie;
pub mod session;

pub use config::AuthConfig;
pub use session::{SessionClient, SessionError};
