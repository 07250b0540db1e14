//! PostgreSQL 菜单仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cobalt_errors::{AppError, AppResult};
use sqlx::PgPool;
use uuid::Uuid;

use super::error_mapper::map_sqlx_error;
use crate::domain::menu::{Menu, MenuId, MenuKind, MenuRepository};

pub struct PostgresMenuRepository {
    pool: PgPool,
}

impl PostgresMenuRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const MENU_COLUMNS: &str = "id, parent_id, name, title, kind, path, component, permission, \
                            icon, sort_order, visible, is_active, created_at, updated_at";

#[async_trait]
impl MenuRepository for PostgresMenuRepository {
    async fn create(&self, menu: &Menu) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO menus (id, parent_id, name, title, kind, path, component, permission,
                               icon, sort_order, visible, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(menu.id.0)
        .bind(menu.parent_id.map(|p| p.0))
        .bind(&menu.name)
        .bind(&menu.title)
        .bind(menu.kind.as_str())
        .bind(&menu.path)
        .bind(&menu.component)
        .bind(&menu.permission)
        .bind(&menu.icon)
        .bind(menu.sort_order)
        .bind(menu.visible)
        .bind(menu.is_active)
        .bind(menu.created_at)
        .bind(menu.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn update(&self, menu: &Menu) -> AppResult<()> {
        sqlx::query(
            r#"
            UPDATE menus
            SET parent_id = $2, name = $3, title = $4, kind = $5, path = $6, component = $7,
                permission = $8, icon = $9, sort_order = $10, visible = $11, is_active = $12,
                updated_at = $13
            WHERE id = $1
            "#,
        )
        .bind(menu.id.0)
        .bind(menu.parent_id.map(|p| p.0))
        .bind(&menu.name)
        .bind(&menu.title)
        .bind(menu.kind.as_str())
        .bind(&menu.path)
        .bind(&menu.component)
        .bind(&menu.permission)
        .bind(&menu.icon)
        .bind(menu.sort_order)
        .bind(menu.visible)
        .bind(menu.is_active)
        .bind(menu.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete(&self, id: &MenuId) -> AppResult<()> {
        sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: &MenuId) -> AppResult<Option<Menu>> {
        let row = sqlx::query_as::<_, MenuRow>(&format!(
            "SELECT {} FROM menus WHERE id = $1",
            MENU_COLUMNS
        ))
        .bind(id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(MenuRow::into_menu).transpose()
    }

    async fn list(&self) -> AppResult<Vec<Menu>> {
        let rows = sqlx::query_as::<_, MenuRow>(&format!(
            "SELECT {} FROM menus ORDER BY sort_order",
            MENU_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.into_iter().map(MenuRow::into_menu).collect()
    }

    async fn count_children(&self, id: &MenuId) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menus WHERE parent_id = $1")
            .bind(id.0)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }

    async fn count_by_ids(&self, ids: &[MenuId]) -> AppResult<i64> {
        let uuids: Vec<Uuid> = ids.iter().map(|id| id.0).collect();
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menus WHERE id = ANY($1)")
            .bind(&uuids)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(count)
    }
}

// ============ 数据行映射 ============

#[derive(sqlx::FromRow)]
pub(super) struct MenuRow {
    id: Uuid,
    parent_id: Option<Uuid>,
    name: String,
    title: String,
    kind: String,
    path: Option<String>,
    component: Option<String>,
    permission: Option<String>,
    icon: Option<String>,
    sort_order: i32,
    visible: bool,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MenuRow {
    pub(super) fn into_menu(self) -> AppResult<Menu> {
        let kind = MenuKind::parse(&self.kind)
            .ok_or_else(|| AppError::internal(format!("Invalid menu kind: {}", self.kind)))?;

        Ok(Menu {
            id: MenuId::from_uuid(self.id),
            parent_id: self.parent_id.map(MenuId::from_uuid),
            name: self.name,
            title: self.title,
            kind,
            path: self.path,
            component: self.component,
            permission: self.permission,
            icon: self.icon,
            sort_order: self.sort_order,
            visible: self.visible,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
