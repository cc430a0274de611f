mod error;
mod functions;
mod static_tokens;
mod traits;
mod types;

pub use error::AuthError;
pub use functions::parse_bearer;
pub use static_tokens::StaticTokenAuthenticator;
pub use traits::{Authenticator, Result};
pub use types::{Principal, Role};
