//! 菜单命令

use crate::domain::menu::{MenuId, MenuKind};

/// 创建菜单命令
#[derive(Debug, Clone)]
pub struct CreateMenuCommand {
    pub parent_id: Option<MenuId>,
    pub name: String,
    pub title: String,
    pub kind: MenuKind,
    pub path: Option<String>,
    pub component: Option<String>,
    pub permission: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub visible: bool,
}

/// 更新菜单命令
#[derive(Debug, Clone)]
pub struct UpdateMenuCommand {
    pub menu_id: MenuId,
    pub parent_id: Option<MenuId>,
    pub name: String,
    pub title: String,
    pub kind: MenuKind,
    pub path: Option<String>,
    pub component: Option<String>,
    pub permission: Option<String>,
    pub icon: Option<String>,
    pub sort_order: i32,
    pub visible: bool,
}
