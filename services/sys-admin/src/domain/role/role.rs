//! 角色实体

use cobalt_common::AuditInfo;
use cobalt_domain_core::{AggregateRoot, Entity};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 角色 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleId(pub Uuid);

impl RoleId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RoleId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// 数据权限范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataScope {
    /// 全部数据
    All,
    /// 本部门及以下
    DeptAndBelow,
    /// 本部门
    Dept,
    /// 仅本人
    SelfOnly,
    /// 自定义部门集合
    Custom,
}

impl DataScope {
    pub fn as_i16(self) -> i16 {
        match self {
            Self::All => 1,
            Self::DeptAndBelow => 2,
            Self::Dept => 3,
            Self::SelfOnly => 4,
            Self::Custom => 5,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(Self::All),
            2 => Some(Self::DeptAndBelow),
            3 => Some(Self::Dept),
            4 => Some(Self::SelfOnly),
            5 => Some(Self::Custom),
            _ => None,
        }
    }
}

/// 角色实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub data_scope: DataScope,
    pub sort_order: i32,
    pub is_active: bool,
    pub audit_info: AuditInfo,
}

impl Role {
    pub fn new(code: String, name: String, description: Option<String>) -> Self {
        Self {
            id: RoleId::new(),
            code,
            name,
            description,
            data_scope: DataScope::SelfOnly,
            sort_order: 0,
            is_active: true,
            audit_info: AuditInfo::default(),
        }
    }

    /// 更新角色信息
    pub fn update(&mut self, name: String, description: Option<String>, sort_order: i32) {
        self.name = name;
        self.description = description;
        self.sort_order = sort_order;
    }

    /// 设置数据权限范围
    pub fn set_data_scope(&mut self, scope: DataScope) {
        self.data_scope = scope;
    }

    /// 激活角色
    pub fn activate(&mut self) {
        self.is_active = true;
    }

    /// 停用角色
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

impl Entity for Role {
    type Id = RoleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for Role {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_role() {
        let role = Role::new(
            "admin".to_string(),
            "Administrator".to_string(),
            Some("System administrator role".to_string()),
        );

        assert_eq!(role.code, "admin");
        assert_eq!(role.name, "Administrator");
        assert_eq!(role.data_scope, DataScope::SelfOnly);
        assert!(role.is_active);
    }

    #[test]
    fn test_data_scope_round_trip() {
        for scope in [
            DataScope::All,
            DataScope::DeptAndBelow,
            DataScope::Dept,
            DataScope::SelfOnly,
            DataScope::Custom,
        ] {
            assert_eq!(DataScope::from_i16(scope.as_i16()), Some(scope));
        }
        assert_eq!(DataScope::from_i16(0), None);
        assert_eq!(DataScope::from_i16(6), None);
    }

    #[test]
    fn test_activate_deactivate() {
        let mut role = Role::new("test".to_string(), "Test".to_string(), None);

        role.deactivate();
        assert!(!role.is_active);

        role.activate();
        assert!(role.is_active);
    }
}
