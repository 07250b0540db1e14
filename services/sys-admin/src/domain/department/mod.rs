mod department;
pub mod repository;

pub use department::{Department, DepartmentId, DepartmentTree};
pub use repository::DepartmentRepository;
