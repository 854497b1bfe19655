//! Token signing infrastructure

mod token;

pub use token::JwtTokenIssuer;
