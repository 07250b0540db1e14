mod service;

pub use service::{AuthService, AuthenticatedUser, LoginCommand, LoginResponse};
