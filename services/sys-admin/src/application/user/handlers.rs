//! 用户命令处理器

use std::collections::HashSet;
use std::sync::Arc;

use cobalt_common::UserId;
use cobalt_errors::{AppError, AppResult};
use tracing::info;

use super::commands::*;
use crate::domain::role::{Role, RoleRepository, UserRoleRepository};
use crate::domain::unit_of_work::UnitOfWorkFactory;
use crate::domain::user::{HashedPassword, User, UserProfile, UserRepository};

/// 用户命令处理器
pub struct UserCommandHandler {
    users: Arc<dyn UserRepository>,
    roles: Arc<dyn RoleRepository>,
    user_roles: Arc<dyn UserRoleRepository>,
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl UserCommandHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        roles: Arc<dyn RoleRepository>,
        user_roles: Arc<dyn UserRoleRepository>,
        uow_factory: Arc<dyn UnitOfWorkFactory>,
    ) -> Self {
        Self {
            users,
            roles,
            user_roles,
            uow_factory,
        }
    }

    /// 创建用户
    pub async fn handle_create(&self, cmd: CreateUserCommand) -> AppResult<UserProfile> {
        if self.users.exists_by_username(&cmd.username).await? {
            return Err(AppError::conflict("Username already exists"));
        }

        let mut user = User::new(cmd.username, HashedPassword::from_plain(&cmd.password)?);
        user.nickname = cmd.nickname;
        user.email = cmd.email;
        user.phone = cmd.phone;

        self.users.create(&user).await?;
        info!(user_id = %user.id, username = %user.username, "user created");

        Ok(user.profile())
    }

    /// 更新用户
    pub async fn handle_update(&self, cmd: UpdateUserCommand) -> AppResult<UserProfile> {
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        user.nickname = cmd.nickname;
        user.email = cmd.email;
        user.phone = cmd.phone;
        user.avatar = cmd.avatar;
        user.department_id = cmd.department_id;
        if let Some(status) = cmd.status {
            user.status = status;
        }
        user.audit_info.update(None);

        self.users.update(&user).await?;

        Ok(user.profile())
    }

    /// 删除用户
    pub async fn handle_delete(&self, user_id: &UserId) -> AppResult<()> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        self.users.delete(user_id).await?;
        self.user_roles.invalidate(user_id).await?;
        info!(user_id = %user_id, "user deleted");

        Ok(())
    }

    /// 查询单个用户
    pub async fn handle_get(&self, user_id: &UserId) -> AppResult<UserProfile> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(user.profile())
    }

    /// 用户列表
    pub async fn handle_list(&self) -> AppResult<Vec<UserProfile>> {
        let users = self.users.list().await?;
        Ok(users.iter().map(User::profile).collect())
    }

    /// 修改密码：先校验旧密码
    pub async fn handle_update_password(&self, cmd: UpdatePasswordCommand) -> AppResult<()> {
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !user.password.verify(&cmd.old_password)? {
            return Err(AppError::validation("Old password is incorrect"));
        }

        user.change_password(HashedPassword::from_plain(&cmd.new_password)?);
        user.audit_info.update(Some(cmd.user_id));
        self.users.update(&user).await?;

        Ok(())
    }

    /// 整体替换用户的角色集合
    pub async fn handle_assign_roles(&self, cmd: AssignRolesCommand) -> AppResult<Vec<Role>> {
        if self.users.find_by_id(&cmd.user_id).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        let role_ids = dedup(cmd.role_ids);
        let found = self.roles.count_by_ids(&role_ids).await?;
        if found != role_ids.len() as i64 {
            return Err(AppError::not_found("Some roles do not exist"));
        }

        let uow = self.uow_factory.begin().await?;
        let result = async {
            if !uow.lock_user(&cmd.user_id).await? {
                return Err(AppError::not_found("User not found"));
            }
            uow.clear_user_roles(&cmd.user_id).await?;
            uow.insert_user_roles(&cmd.user_id, &role_ids).await?;
            Ok(())
        }
        .await;

        match result {
            Ok(()) => uow.commit().await?,
            Err(e) => {
                uow.rollback().await?;
                return Err(e);
            }
        }

        self.user_roles.invalidate(&cmd.user_id).await?;
        info!(user_id = %cmd.user_id, roles = role_ids.len(), "user roles reassigned");

        self.user_roles.get_user_roles(&cmd.user_id).await
    }
}

fn dedup(ids: Vec<crate::domain::role::RoleId>) -> Vec<crate::domain::role::RoleId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
