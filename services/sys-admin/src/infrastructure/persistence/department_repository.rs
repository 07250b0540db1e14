//! PostgreSQL 部门仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cobalt_common::UserId;
use cobalt_errors::AppResult;
use sqlx::PgPool;
use uuid::Uuid;

use super::error_mapper::map_sqlx_error;
use crate::domain::department::{Department, DepartmentId, DepartmentRepository};

pub struct PostgresDepartmentRepository {
    pool: PgPool,
}

impl PostgresDepartmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const DEPARTMENT_COLUMNS: &str = "id, parent_id, name, code, leader_id, phone, email, \
                                  description, sort_order, created_at, updated_at";

#[async_trait]
impl DepartmentRepository for PostgresDepartmentRepository {
    async fn create(&self, department: &Department) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO departments (id, parent_id, name, code, leader_id, phone, email,
                                     description, sort_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(department.id.0)
        .bind(department.parent_id.map(|p| p.0))
        .bind(&department.name)
        .bind(&department.code)
        .bind(department.leader_id.map(|u| u.0))
        .bind(&department.phone)
        .bind(&department.email)
        .bind(&department.description)
        .bind(department.sort_order)
        .bind(department.created_at)
        .bind(department.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, department: &Department) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE departments
            SET parent_id = $2, name = $3, code = $4, leader_id = $5, phone = $6, email = $7,
                description = $8, sort_order = $9, updated_at = $10
            WHERE id = $1
            "#,
        )
        .bind(department.id.0)
        .bind(department.parent_id.map(|p| p.0))
        .bind(&department.name)
        .bind(&department.code)
        .bind(department.leader_id.map(|u| u.0))
        .bind(&department.phone)
        .bind(&department.email)
        .bind(&department.description)
        .bind(department.sort_order)
        .bind(department.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, id: &DepartmentId) -> AppResult<()> {
        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &DepartmentId) -> AppResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(&format!(
            "SELECT {} FROM departments WHERE id = $1",
            DEPARTMENT_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Department::from))
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Department>> {
        let row = sqlx::query_as::<_, DepartmentRow>(&format!(
            "SELECT {} FROM departments WHERE code = $1",
            DEPARTMENT_COLUMNS
        ))
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Department::from))
    }

    async fn list(&self) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(&format!(
            "SELECT {} FROM departments ORDER BY sort_order",
            DEPARTMENT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Department::from).collect())
    }

    async fn list_children(&self, id: &DepartmentId) -> AppResult<Vec<Department>> {
        let rows = sqlx::query_as::<_, DepartmentRow>(&format!(
            "SELECT {} FROM departments WHERE parent_id = $1 ORDER BY sort_order",
            DEPARTMENT_COLUMNS
        ))
        .bind(id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Department::from).collect())
    }

    async fn count_children(&self, id: &DepartmentId) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM departments WHERE parent_id = $1")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn exists(&self, id: &DepartmentId) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM departments WHERE id = $1)")
                .bind(id.0)
                .fetch_one(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(exists)
    }

    async fn count_by_ids(&self, ids: &[DepartmentId]) -> AppResult<i64> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments WHERE id = ANY($1)")
            .bind(&uuids)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

// ============ 数据行映射 ============

#[derive(sqlx::FromRow)]
pub(super) struct DepartmentRow {
    id: Uuid,
    parent_id: Option<Uuid>,
    name: String,
    code: Option<String>,
    leader_id: Option<Uuid>,
    phone: Option<String>,
    email: Option<String>,
    description: Option<String>,
    sort_order: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DepartmentRow> for Department {
    fn from(row: DepartmentRow) -> Self {
        Department {
            id: DepartmentId::from_uuid(row.id),
            parent_id: row.parent_id.map(DepartmentId::from_uuid),
            name: row.name,
            code: row.code,
            leader_id: row.leader_id.map(UserId::from_uuid),
            phone: row.phone,
            email: row.email,
            description: row.description,
            sort_order: row.sort_order,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
