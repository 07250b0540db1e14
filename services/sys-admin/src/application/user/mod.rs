pub mod commands;
mod handlers;

pub use commands::{
    AssignRolesCommand, CreateUserCommand, UpdatePasswordCommand, UpdateUserCommand,
};
pub use handlers::UserCommandHandler;
