pub mod claims;
pub mod errors;
pub mod handler;
pub mod token;

pub use claims::Claims;
pub use errors::JwtError;
pub use errors::VerificationReason;
pub use handler::JwtHandler;
pub use token::Token;
