mod permission;
pub mod repository;
mod role;

pub use permission::{Permission, PermissionId};
pub use repository::{
    PermissionRepository, RoleDepartmentRepository, RoleMenuRepository,
    RolePermissionRepository, RoleRepository, UserRoleRepository,
};
pub use role::{DataScope, Role, RoleId};
