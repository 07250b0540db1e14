//! PostgreSQL Unit of Work 实现
//!
//! 重分配事务先以 `SELECT ... FOR UPDATE` 锁定聚合行，
//! 同一角色（或用户）上的并发替换在数据库层串行化。

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use cobalt_common::UserId;
use cobalt_errors::{AppError, AppResult};
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::error_mapper::map_sqlx_error;
use crate::domain::department::DepartmentId;
use crate::domain::menu::MenuId;
use crate::domain::role::{DataScope, PermissionId, RoleId};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

/// 共享事务句柄
type SharedTx = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

/// Postgres Unit of Work 工厂
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresUnitOfWork {
            tx: Arc::new(Mutex::new(Some(tx))),
        }))
    }
}

/// Postgres Unit of Work 实现
pub struct PostgresUnitOfWork {
    tx: SharedTx,
}

impl PostgresUnitOfWork {
    async fn delete_by_role(&self, table: &str, role_id: &RoleId) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query(&format!("DELETE FROM {} WHERE role_id = $1", table))
            .bind(role_id.0)
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_role_links(
        &self,
        table: &str,
        column: &str,
        role_id: &RoleId,
        ids: &[Uuid],
    ) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        for id in ids {
            sqlx::query(&format!(
                "INSERT INTO {} (role_id, {}, assigned_at) VALUES ($1, $2, $3)",
                table, column
            ))
            .bind(role_id.0)
            .bind(id)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    async fn lock_role(&self, role_id: &RoleId) -> AppResult<bool> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM roles WHERE id = $1 FOR UPDATE")
                .bind(role_id.0)
                .fetch_optional(&mut **tx)
                .await
                .map_err(map_sqlx_error)?;

        Ok(locked.is_some())
    }

    async fn lock_user(&self, user_id: &UserId) -> AppResult<bool> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        let locked: Option<Uuid> =
            sqlx::query_scalar("SELECT id FROM users WHERE id = $1 FOR UPDATE")
                .bind(user_id.0)
                .fetch_optional(&mut **tx)
                .await
                .map_err(map_sqlx_error)?;

        Ok(locked.is_some())
    }

    async fn clear_role_menus(&self, role_id: &RoleId) -> AppResult<()> {
        self.delete_by_role("role_menus", role_id).await
    }

    async fn insert_role_menus(&self, role_id: &RoleId, menu_ids: &[MenuId]) -> AppResult<()> {
        let ids: Vec<Uuid> = menu_ids.iter().map(|id| id.0).collect();
        self.insert_role_links("role_menus", "menu_id", role_id, &ids)
            .await
    }

    async fn clear_role_permissions(&self, role_id: &RoleId) -> AppResult<()> {
        self.delete_by_role("role_permissions", role_id).await
    }

    async fn insert_role_permissions(
        &self,
        role_id: &RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        let ids: Vec<Uuid> = permission_ids.iter().map(|id| id.0).collect();
        self.insert_role_links("role_permissions", "permission_id", role_id, &ids)
            .await
    }

    async fn clear_role_departments(&self, role_id: &RoleId) -> AppResult<()> {
        self.delete_by_role("role_departments", role_id).await
    }

    async fn insert_role_departments(
        &self,
        role_id: &RoleId,
        department_ids: &[DepartmentId],
    ) -> AppResult<()> {
        let ids: Vec<Uuid> = department_ids.iter().map(|id| id.0).collect();
        self.insert_role_links("role_departments", "department_id", role_id, &ids)
            .await
    }

    async fn update_role_data_scope(&self, role_id: &RoleId, scope: DataScope) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query("UPDATE roles SET data_scope = $2, updated_at = $3 WHERE id = $1")
            .bind(role_id.0)
            .bind(scope.as_i16())
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn clear_user_roles(&self, user_id: &UserId) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn insert_user_roles(&self, user_id: &UserId, role_ids: &[RoleId]) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;

        for role_id in role_ids {
            sqlx::query(
                "INSERT INTO user_roles (user_id, role_id, assigned_at) VALUES ($1, $2, $3)",
            )
            .bind(user_id.0)
            .bind(role_id.0)
            .bind(Utc::now())
            .execute(&mut **tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))?;

        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))?;

        Ok(())
    }
}
