//! PostgreSQL 权限仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cobalt_errors::AppResult;
use sqlx::PgPool;
use uuid::Uuid;

use super::error_mapper::map_sqlx_error;
use crate::domain::role::{Permission, PermissionId, PermissionRepository};

pub struct PostgresPermissionRepository {
    pool: PgPool,
}

impl PostgresPermissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionRepository for PostgresPermissionRepository {
    async fn create(&self, permission: &Permission) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO permissions (id, code, name, description, path, method, is_active,
                                     created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(permission.id.0)
        .bind(&permission.code)
        .bind(&permission.name)
        .bind(&permission.description)
        .bind(&permission.path)
        .bind(&permission.method)
        .bind(permission.is_active)
        .bind(permission.created_at)
        .bind(permission.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, permission: &Permission) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE permissions
            SET code = $2, name = $3, description = $4, path = $5, method = $6,
                is_active = $7, updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(permission.id.0)
        .bind(&permission.code)
        .bind(&permission.name)
        .bind(&permission.description)
        .bind(&permission.path)
        .bind(&permission.method)
        .bind(permission.is_active)
        .bind(permission.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, id: &PermissionId) -> AppResult<()> {
        sqlx::query("DELETE FROM permissions WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &PermissionId) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, code, name, description, path, method, is_active, created_at, updated_at
            FROM permissions WHERE id = $1
            "#,
        )
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Permission::from))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Permission>> {
        let row = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, code, name, description, path, method, is_active, created_at, updated_at
            FROM permissions WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Permission::from))
    }

    async fn list(&self) -> AppResult<Vec<Permission>> {
        let rows = sqlx::query_as::<_, PermissionRow>(
            r#"
            SELECT id, code, name, description, path, method, is_active, created_at, updated_at
            FROM permissions ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Permission::from).collect())
    }

    async fn count_by_ids(&self, ids: &[PermissionId]) -> AppResult<i64> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM permissions WHERE id = ANY($1)")
            .bind(&uuids)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

// ============ 数据行映射 ============

#[derive(sqlx::FromRow)]
pub(super) struct PermissionRow {
    id: Uuid,
    code: String,
    name: String,
    description: Option<String>,
    path: Option<String>,
    method: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PermissionRow> for Permission {
    fn from(row: PermissionRow) -> Self {
        Permission {
            id: PermissionId::from_uuid(row.id),
            code: row.code,
            name: row.name,
            description: row.description,
            path: row.path,
            method: row.method,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
