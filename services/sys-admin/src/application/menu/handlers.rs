//! 菜单命令处理器

use std::sync::Arc;

use chrono::Utc;
use cobalt_common::build_forest;
use cobalt_errors::{AppError, AppResult};
use tracing::info;

use super::commands::*;
use crate::domain::menu::{Menu, MenuId, MenuKind, MenuRepository, MenuTree};
use crate::domain::role::RoleMenuRepository;

/// 菜单命令处理器
pub struct MenuCommandHandler {
    menus: Arc<dyn MenuRepository>,
    role_menus: Arc<dyn RoleMenuRepository>,
}

impl MenuCommandHandler {
    pub fn new(menus: Arc<dyn MenuRepository>, role_menus: Arc<dyn RoleMenuRepository>) -> Self {
        Self { menus, role_menus }
    }

    /// 创建菜单
    pub async fn handle_create(&self, cmd: CreateMenuCommand) -> AppResult<Menu> {
        self.check_parent(cmd.parent_id.as_ref()).await?;
        check_kind_fields(cmd.kind, cmd.path.as_deref(), cmd.permission.as_deref())?;

        let now = Utc::now();
        let menu = Menu {
            id: MenuId::new(),
            parent_id: cmd.parent_id,
            name: cmd.name,
            title: cmd.title,
            kind: cmd.kind,
            path: cmd.path,
            component: cmd.component,
            permission: cmd.permission,
            icon: cmd.icon,
            sort_order: cmd.sort_order,
            visible: cmd.visible,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        self.menus.create(&menu).await?;
        info!(menu_id = %menu.id, title = %menu.title, "menu created");

        Ok(menu)
    }

    /// 更新菜单
    pub async fn handle_update(&self, cmd: UpdateMenuCommand) -> AppResult<Menu> {
        let mut menu = self
            .menus
            .find_by_id(&cmd.menu_id)
            .await?
            .ok_or_else(|| AppError::not_found("Menu not found"))?;

        if cmd.parent_id == Some(cmd.menu_id) {
            return Err(AppError::conflict("A menu cannot be its own parent"));
        }

        self.check_parent(cmd.parent_id.as_ref()).await?;
        check_kind_fields(cmd.kind, cmd.path.as_deref(), cmd.permission.as_deref())?;

        menu.parent_id = cmd.parent_id;
        menu.name = cmd.name;
        menu.title = cmd.title;
        menu.kind = cmd.kind;
        menu.path = cmd.path;
        menu.component = cmd.component;
        menu.permission = cmd.permission;
        menu.icon = cmd.icon;
        menu.sort_order = cmd.sort_order;
        menu.visible = cmd.visible;
        menu.updated_at = Utc::now();

        self.menus.update(&menu).await?;

        Ok(menu)
    }

    /// 删除菜单
    pub async fn handle_delete(&self, menu_id: &MenuId) -> AppResult<()> {
        if self.menus.find_by_id(menu_id).await?.is_none() {
            return Err(AppError::not_found("Menu not found"));
        }

        if self.menus.count_children(menu_id).await? > 0 {
            return Err(AppError::conflict("Menu still has children"));
        }

        if self.role_menus.count_roles_with_menu(menu_id).await? > 0 {
            return Err(AppError::conflict("Menu is still assigned to roles"));
        }

        self.menus.delete(menu_id).await?;
        info!(menu_id = %menu_id, "menu deleted");

        Ok(())
    }

    /// 查询单个菜单
    pub async fn handle_get(&self, menu_id: &MenuId) -> AppResult<Menu> {
        self.menus
            .find_by_id(menu_id)
            .await?
            .ok_or_else(|| AppError::not_found("Menu not found"))
    }

    /// 菜单树
    pub async fn handle_tree(&self) -> AppResult<Vec<MenuTree>> {
        let menus = self.menus.list().await?;
        Ok(build_forest(menus.into_iter().map(MenuTree::from).collect()))
    }

    async fn check_parent(&self, parent_id: Option<&MenuId>) -> AppResult<()> {
        let Some(parent_id) = parent_id else {
            return Ok(());
        };

        let parent = self
            .menus
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Parent menu not found"))?;

        if parent.is_button() {
            return Err(AppError::conflict("A button cannot be a parent menu"));
        }

        Ok(())
    }
}

fn check_kind_fields(
    kind: MenuKind,
    path: Option<&str>,
    permission: Option<&str>,
) -> AppResult<()> {
    match kind {
        MenuKind::Menu => {
            if path.is_none_or(str::is_empty) {
                return Err(AppError::validation("A menu requires a route path"));
            }
        }
        MenuKind::Button => {
            if permission.is_none_or(str::is_empty) {
                return Err(AppError::validation("A button requires a permission code"));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemStore;

    fn handler(store: &Arc<MemStore>) -> MenuCommandHandler {
        MenuCommandHandler::new(store.clone(), store.clone())
    }

    fn menu_cmd(title: &str, parent_id: Option<MenuId>) -> CreateMenuCommand {
        CreateMenuCommand {
            parent_id,
            name: title.to_string(),
            title: title.to_string(),
            kind: MenuKind::Menu,
            path: Some(format!("/{}", title)),
            component: None,
            permission: None,
            icon: None,
            sort_order: 0,
            visible: true,
        }
    }

    fn button_cmd(title: &str, parent_id: Option<MenuId>) -> CreateMenuCommand {
        CreateMenuCommand {
            parent_id,
            name: title.to_string(),
            title: title.to_string(),
            kind: MenuKind::Button,
            path: None,
            component: None,
            permission: Some(format!("{}:action", title)),
            icon: None,
            sort_order: 0,
            visible: true,
        }
    }

    #[tokio::test]
    async fn test_button_cannot_be_parent() {
        let store = MemStore::new();
        let handler = handler(&store);

        let button = handler.handle_create(button_cmd("export", None)).await.unwrap();
        let err = handler
            .handle_create(menu_cmd("child", Some(button.id)))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_menu_kind_requires_path() {
        let store = MemStore::new();
        let mut cmd = menu_cmd("users", None);
        cmd.path = None;

        let err = handler(&store).handle_create(cmd).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_button_kind_requires_permission() {
        let store = MemStore::new();
        let mut cmd = button_cmd("export", None);
        cmd.permission = None;

        let err = handler(&store).handle_create(cmd).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_menu_cannot_become_its_own_parent() {
        let store = MemStore::new();
        let handler = handler(&store);
        let menu = handler.handle_create(menu_cmd("users", None)).await.unwrap();

        let err = handler
            .handle_update(UpdateMenuCommand {
                menu_id: menu.id,
                parent_id: Some(menu.id),
                name: menu.name.clone(),
                title: menu.title.clone(),
                kind: menu.kind,
                path: menu.path.clone(),
                component: None,
                permission: None,
                icon: None,
                sort_order: 0,
                visible: true,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_refused_with_children_or_role_refs() {
        let store = MemStore::new();
        let handler = handler(&store);

        let parent = handler.handle_create(menu_cmd("system", None)).await.unwrap();
        let child = handler
            .handle_create(menu_cmd("users", Some(parent.id)))
            .await
            .unwrap();

        let err = handler.handle_delete(&parent.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let role_id = store.add_role(crate::domain::role::Role::new(
            "ops".to_string(),
            "Ops".to_string(),
            None,
        ));
        store.link_role_menus(role_id, vec![child.id]);

        let err = handler.handle_delete(&child.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        store.link_role_menus(role_id, vec![]);
        handler.handle_delete(&child.id).await.unwrap();
        handler.handle_delete(&parent.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_tree_orders_siblings_and_nests_children() {
        let store = MemStore::new();
        let handler = handler(&store);

        let mut first = menu_cmd("dashboard", None);
        first.sort_order = 1;
        let mut second = menu_cmd("system", None);
        second.sort_order = 2;

        let system = handler.handle_create(second).await.unwrap();
        handler.handle_create(first).await.unwrap();
        let mut child = menu_cmd("users", Some(system.id));
        child.sort_order = 1;
        handler.handle_create(child).await.unwrap();

        let tree = handler.handle_tree().await.unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].menu.title, "dashboard");
        assert!(tree[0].children.is_none());
        assert_eq!(tree[1].menu.title, "system");
        assert_eq!(tree[1].children.as_ref().unwrap()[0].menu.title, "users");
    }
}
