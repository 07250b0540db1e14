//! PostgreSQL 用户角色关联仓储实现

use std::sync::Arc;

use async_trait::async_trait;
use cobalt_common::UserId;
use cobalt_errors::AppResult;
use sqlx::PgPool;
use tracing::warn;

use super::error_mapper::map_sqlx_error;
use super::permission_repository::PermissionRow;
use super::role_repository::RoleRow;
use crate::domain::role::{Permission, Role, RoleId, UserRoleRepository};
use crate::infrastructure::cache::AuthCache;

/// 用户角色关联仓储
///
/// 可选挂接缓存：读取优先走缓存，缓存不可用时直接回源，
/// 缓存错误只记日志，不影响结果。
pub struct PostgresUserRoleRepository {
    pool: PgPool,
    cache: Option<Arc<AuthCache>>,
}

impl PostgresUserRoleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, cache: None }
    }

    pub fn with_cache(mut self, cache: Arc<AuthCache>) -> Self {
        self.cache = Some(cache);
        self
    }
}

#[async_trait]
impl UserRoleRepository for PostgresUserRoleRepository {
    async fn get_user_roles(&self, user_id: &UserId) -> AppResult<Vec<Role>> {
        if let Some(cache) = &self.cache {
            if let Ok(Some(roles)) = cache.get_user_roles(user_id).await {
                return Ok(roles);
            }
        }

        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT r.id, r.code, r.name, r.description, r.data_scope, r.sort_order, r.is_active,
                   r.created_at, r.created_by, r.updated_at, r.updated_by
            FROM roles r
            INNER JOIN user_roles ur ON r.id = ur.role_id
            WHERE ur.user_id = $1
            ORDER BY r.sort_order
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let roles: Vec<Role> = rows
            .into_iter()
            .map(RoleRow::into_role)
            .collect::<AppResult<_>>()?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_user_roles(user_id, &roles).await {
                warn!(user_id = %user_id, error = %e, "failed to cache user roles");
            }
        }

        Ok(roles)
    }

    async fn get_user_permissions(&self, user_id: &UserId) -> AppResult<Vec<Permission>> {
        if let Some(cache) = &self.cache {
            if let Ok(Some(permissions)) = cache.get_user_permissions(user_id).await {
                return Ok(permissions);
            }
        }

        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT DISTINCT p.id, p.code, p.name, p.description, p.path, p.method, p.is_active,
                   p.created_at, p.updated_at
            FROM permissions p
            INNER JOIN role_permissions rp ON p.id = rp.permission_id
            INNER JOIN user_roles ur ON rp.role_id = ur.role_id
            WHERE ur.user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let permissions: Vec<Permission> = rows.into_iter().map(Permission::from).collect();

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set_user_permissions(user_id, &permissions).await {
                warn!(user_id = %user_id, error = %e, "failed to cache user permissions");
            }
        }

        Ok(permissions)
    }

    async fn count_users_with_role(&self, role_id: &RoleId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_roles WHERE role_id = $1")
            .bind(role_id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn invalidate(&self, user_id: &UserId) -> AppResult<()> {
        if let Some(cache) = &self.cache {
            cache.invalidate_user(user_id).await?;
        }
        Ok(())
    }
}
