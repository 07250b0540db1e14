//! 权限实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 权限 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PermissionId(pub Uuid);

impl PermissionId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for PermissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PermissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 权限实体
///
/// `code` 形如 `user:create`，path/method 为可选的 API 元数据。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: PermissionId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub path: Option<String>,
    pub method: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Permission {
    pub fn new(code: String, name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PermissionId::new(),
            code,
            name,
            description,
            path: None,
            method: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_api(mut self, path: impl Into<String>, method: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self.method = Some(method.into());
        self
    }
}
