//! 用户实体

use chrono::{DateTime, Utc};
use cobalt_common::{AuditInfo, UserId};
use cobalt_domain_core::{AggregateRoot, Entity};
use serde::{Deserialize, Serialize};

use super::password::HashedPassword;
use crate::domain::department::DepartmentId;

/// 用户状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Enabled,
    Disabled,
}

impl UserStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 0,
        }
    }

    pub fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(Self::Enabled),
            0 => Some(Self::Disabled),
            _ => None,
        }
    }
}

/// 用户实体
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password: HashedPassword,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub department_id: Option<DepartmentId>,
    pub audit_info: AuditInfo,
}

impl User {
    pub fn new(username: String, password: HashedPassword) -> Self {
        Self {
            id: UserId::new(),
            username,
            password,
            nickname: None,
            email: None,
            phone: None,
            avatar: None,
            status: UserStatus::Enabled,
            department_id: None,
            audit_info: AuditInfo::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.status == UserStatus::Enabled
    }

    /// 修改密码
    pub fn change_password(&mut self, password: HashedPassword) {
        self.password = password;
    }

    /// 公开资料视图，不含凭证哈希
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            nickname: self.nickname.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            avatar: self.avatar.clone(),
            status: self.status,
            department_id: self.department_id,
            created_at: self.audit_info.created_at,
            updated_at: self.audit_info.updated_at,
        }
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl AggregateRoot for User {
    fn audit_info(&self) -> &AuditInfo {
        &self.audit_info
    }

    fn audit_info_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit_info
    }
}

/// 用户公开资料
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub department_id: Option<DepartmentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
