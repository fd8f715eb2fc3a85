pub mod authenticator;
pub mod delegate;
pub mod error;
pub mod extractor;
pub mod factory;
pub mod principal;
pub mod token;

pub use authenticator::{AuthResult, Authentication, Authenticator};
pub use delegate::{ErrorDelegate, JsonErrorDelegate};
pub use error::{AuthError, AuthErrorKind};
pub use extractor::bearer_token;
pub use factory::build_authenticator;
pub use principal::{PrincipalResolver, ResolveError};
pub use token::{Claims, JwtTokenValidator, TokenError, TokenValidator, ValidationSettings};
