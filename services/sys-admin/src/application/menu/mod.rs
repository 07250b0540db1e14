pub mod commands;
mod handlers;

pub use commands::{CreateMenuCommand, UpdateMenuCommand};
pub use handlers::MenuCommandHandler;
