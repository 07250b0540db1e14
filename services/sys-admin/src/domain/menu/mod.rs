mod menu;
pub mod repository;

pub use menu::{Menu, MenuId, MenuKind, MenuTree};
pub use repository::MenuRepository;
