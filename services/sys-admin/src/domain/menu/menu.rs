//! 菜单实体

use chrono::{DateTime, Utc};
use cobalt_common::TreeNode;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 菜单 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MenuId(pub Uuid);

impl MenuId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for MenuId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MenuId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 菜单类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuKind {
    /// 路由菜单
    Menu,
    /// 操作按钮
    Button,
}

impl MenuKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Button => "button",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "menu" => Some(Self::Menu),
            "button" => Some(Self::Button),
            _ => None,
        }
    }
}

/// 菜单实体
///
/// kind = Menu 时 path 必填；kind = Button 时 permission 必填。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Menu {
    pub id: MenuId,
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
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    pub fn is_button(&self) -> bool {
        self.kind == MenuKind::Button
    }
}

/// 菜单树节点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuTree {
    #[serde(flatten)]
    pub menu: Menu,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MenuTree>>,
}

impl From<Menu> for MenuTree {
    fn from(menu: Menu) -> Self {
        Self {
            menu,
            children: None,
        }
    }
}

impl TreeNode for MenuTree {
    fn node_id(&self) -> Uuid {
        self.menu.id.0
    }

    fn parent_node_id(&self) -> Option<Uuid> {
        self.menu.parent_id.map(|id| id.0)
    }

    fn sort_key(&self) -> i32 {
        self.menu.sort_order
    }

    fn attach_children(&mut self, children: Vec<Self>) {
        self.children = Some(children);
    }
}
