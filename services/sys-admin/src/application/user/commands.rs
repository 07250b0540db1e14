//! 用户命令

use cobalt_common::UserId;

use crate::domain::department::DepartmentId;
use crate::domain::role::RoleId;
use crate::domain::user::UserStatus;

/// 创建用户命令
#[derive(Debug, Clone)]
pub struct CreateUserCommand {
    pub username: String,
    pub password: String,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// 更新用户命令
#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub user_id: UserId,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub avatar: Option<String>,
    pub status: Option<UserStatus>,
    pub department_id: Option<DepartmentId>,
}

/// 修改密码命令
#[derive(Debug, Clone)]
pub struct UpdatePasswordCommand {
    pub user_id: UserId,
    pub old_password: String,
    pub new_password: String,
}

/// 分配角色命令：整体替换用户的角色集合
#[derive(Debug, Clone)]
pub struct AssignRolesCommand {
    pub user_id: UserId,
    pub role_ids: Vec<RoleId>,
}
