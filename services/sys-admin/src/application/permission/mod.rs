pub mod commands;
mod handlers;

pub use commands::{CreatePermissionCommand, UpdatePermissionCommand};
pub use handlers::PermissionCommandHandler;
