//! 权限命令处理器

use std::sync::Arc;

use chrono::Utc;
use cobalt_errors::{AppError, AppResult};
use tracing::info;

use super::commands::*;
use crate::domain::role::{
    Permission, PermissionId, PermissionRepository, RolePermissionRepository,
};

/// 权限命令处理器
pub struct PermissionCommandHandler {
    permissions: Arc<dyn PermissionRepository>,
    role_permissions: Arc<dyn RolePermissionRepository>,
}

impl PermissionCommandHandler {
    pub fn new(
        permissions: Arc<dyn PermissionRepository>,
        role_permissions: Arc<dyn RolePermissionRepository>,
    ) -> Self {
        Self {
            permissions,
            role_permissions,
        }
    }

    /// 创建权限
    pub async fn handle_create(&self, cmd: CreatePermissionCommand) -> AppResult<Permission> {
        if self.permissions.find_by_code(&cmd.code).await?.is_some() {
            return Err(AppError::conflict("Permission code already exists"));
        }

        let mut permission = Permission::new(cmd.code, cmd.name, cmd.description);
        permission.path = cmd.path;
        permission.method = cmd.method;

        self.permissions.create(&permission).await?;
        info!(permission_id = %permission.id, code = %permission.code, "permission created");

        Ok(permission)
    }

    /// 更新权限
    pub async fn handle_update(&self, cmd: UpdatePermissionCommand) -> AppResult<Permission> {
        let mut permission = self
            .permissions
            .find_by_id(&cmd.permission_id)
            .await?
            .ok_or_else(|| AppError::not_found("Permission not found"))?;

        if let Some(existing) = self.permissions.find_by_code(&cmd.code).await? {
            if existing.id != permission.id {
                return Err(AppError::conflict("Permission code already exists"));
            }
        }

        permission.code = cmd.code;
        permission.name = cmd.name;
        permission.description = cmd.description;
        permission.path = cmd.path;
        permission.method = cmd.method;
        permission.updated_at = Utc::now();

        self.permissions.update(&permission).await?;

        Ok(permission)
    }

    /// 删除权限
    pub async fn handle_delete(&self, permission_id: &PermissionId) -> AppResult<()> {
        if self.permissions.find_by_id(permission_id).await?.is_none() {
            return Err(AppError::not_found("Permission not found"));
        }

        if self
            .role_permissions
            .count_roles_with_permission(permission_id)
            .await?
            > 0
        {
            return Err(AppError::conflict("Permission is still assigned to roles"));
        }

        self.permissions.delete(permission_id).await?;
        info!(permission_id = %permission_id, "permission deleted");

        Ok(())
    }

    /// 查询单个权限
    pub async fn handle_get(&self, permission_id: &PermissionId) -> AppResult<Permission> {
        self.permissions
            .find_by_id(permission_id)
            .await?
            .ok_or_else(|| AppError::not_found("Permission not found"))
    }

    /// 权限列表，创建时间倒序
    pub async fn handle_list(&self) -> AppResult<Vec<Permission>> {
        self.permissions.list().await
    }
}
