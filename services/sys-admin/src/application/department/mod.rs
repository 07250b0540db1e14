pub mod commands;
mod handlers;

pub use commands::{CreateDepartmentCommand, UpdateDepartmentCommand};
pub use handlers::DepartmentCommandHandler;
