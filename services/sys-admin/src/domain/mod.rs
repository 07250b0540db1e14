pub mod department;
pub mod menu;
pub mod role;
pub mod unit_of_work;
pub mod user;
