//! Frontend configuration

/// Authentication configuration
pub struct AuthConfig;

impl AuthConfig {
    /// localStorage key for the bearer token
    pub const TOKEN_KEY: &'static str = "jwt_token";

    /// localStorage key for the signed-in user record
    pub const USER_KEY: &'static str = "user";
}
