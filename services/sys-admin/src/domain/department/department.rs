//! 部门实体

use chrono::{DateTime, Utc};
use cobalt_common::{TreeNode, UserId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 部门 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DepartmentId(pub Uuid);

impl DepartmentId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for DepartmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 部门实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub parent_id: Option<DepartmentId>,
    pub name: String,
    pub code: Option<String>,
    pub leader_id: Option<UserId>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 部门树节点
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentTree {
    #[serde(flatten)]
    pub department: Department,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DepartmentTree>>,
}

impl From<Department> for DepartmentTree {
    fn from(department: Department) -> Self {
        Self {
            department,
            children: None,
        }
    }
}

impl TreeNode for DepartmentTree {
    fn node_id(&self) -> Uuid {
        self.department.id.0
    }

    fn parent_node_id(&self) -> Option<Uuid> {
        self.department.parent_id.map(|id| id.0)
    }

    fn sort_key(&self) -> i32 {
        self.department.sort_order
    }

    fn attach_children(&mut self, children: Vec<Self>) {
        self.children = Some(children);
    }
}
