mod department_repository;
mod error_mapper;
mod menu_repository;
mod permission_repository;
mod role_association_repository;
mod role_repository;
mod unit_of_work;
mod user_repository;
mod user_role_repository;

pub use department_repository::PostgresDepartmentRepository;
pub use error_mapper::map_sqlx_error;
pub use menu_repository::PostgresMenuRepository;
pub use permission_repository::PostgresPermissionRepository;
pub use role_association_repository::{
    PostgresRoleDepartmentRepository, PostgresRoleMenuRepository,
    PostgresRolePermissionRepository,
};
pub use role_repository::PostgresRoleRepository;
pub use unit_of_work::{PostgresUnitOfWork, PostgresUnitOfWorkFactory};
pub use user_repository::PostgresUserRepository;
pub use user_role_repository::PostgresUserRoleRepository;
