pub mod commands;
mod handlers;

pub use commands::{
    CreateRoleCommand, ReassignAssociationsCommand, RoleAssociation, SetDataScopeCommand,
    UpdateRoleCommand,
};
pub use handlers::{RoleAssignmentHandler, RoleCommandHandler, RoleDetail};
