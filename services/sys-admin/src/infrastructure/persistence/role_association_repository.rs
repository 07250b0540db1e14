//! PostgreSQL 角色关联只读仓储实现

use async_trait::async_trait;
use cobalt_errors::AppResult;
use sqlx::PgPool;
use uuid::Uuid;

use super::error_mapper::map_sqlx_error;
use super::menu_repository::MenuRow;
use super::permission_repository::PermissionRow;
use crate::domain::department::DepartmentId;
use crate::domain::menu::{Menu, MenuId};
use crate::domain::role::{
    Permission, PermissionId, RoleDepartmentRepository, RoleId, RoleMenuRepository,
    RolePermissionRepository,
};

pub struct PostgresRoleMenuRepository {
    pool: PgPool,
}

impl PostgresRoleMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleMenuRepository for PostgresRoleMenuRepository {
    async fn get_role_menus(&self, role_id: &RoleId) -> AppResult<Vec<Menu>> {
        let rows = sqlx::query_as::<_, MenuRow>(
            r#"
            SELECT m.id, m.parent_id, m.name, m.title, m.kind, m.path, m.component, m.permission,
                   m.icon, m.sort_order, m.visible, m.is_active, m.created_at, m.updated_at
            FROM menus m
            INNER JOIN role_menus rm ON m.id = rm.menu_id
            WHERE rm.role_id = $1
            ORDER BY m.sort_order
            "#,
        )
        .bind(role_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(MenuRow::into_menu).collect()
    }

    async fn count_roles_with_menu(&self, menu_id: &MenuId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM role_menus WHERE menu_id = $1")
            .bind(menu_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

pub struct PostgresRolePermissionRepository {
    pool: PgPool,
}

impl PostgresRolePermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RolePermissionRepository for PostgresRolePermissionRepository {
    async fn get_role_permissions(&self, role_id: &RoleId) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT p.id, p.code, p.name, p.description, p.path, p.method, p.is_active,
                   p.created_at, p.updated_at
            FROM permissions p
            INNER JOIN role_permissions rp ON p.id = rp.permission_id
            WHERE rp.role_id = $1
            ORDER BY p.code
            "#,
        )
        .bind(role_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    async fn count_roles_with_permission(&self, permission_id: &PermissionId) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM role_permissions WHERE permission_id = $1")
                .bind(permission_id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

pub struct PostgresRoleDepartmentRepository {
    pool: PgPool,
}

impl PostgresRoleDepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleDepartmentRepository for PostgresRoleDepartmentRepository {
    async fn get_role_department_ids(&self, role_id: &RoleId) -> AppResult<Vec<DepartmentId>> {
        let ids: Vec<Uuid> = sqlx::query_scalar(
            "SELECT department_id FROM role_departments WHERE role_id = $1",
        )
        .bind(role_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(ids.into_iter().map(DepartmentId::from_uuid).collect())
    }
}
