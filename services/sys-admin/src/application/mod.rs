pub mod auth;
pub mod authorization;
pub mod data_scope;
pub mod department;
pub mod menu;
pub mod permission;
pub mod role;
pub mod user;
