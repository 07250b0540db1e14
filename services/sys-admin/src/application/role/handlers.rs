//! 角色命令处理器

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use cobalt_errors::{AppError, AppResult};
use tracing::info;

use super::commands::*;
use crate::domain::department::{DepartmentId, DepartmentRepository};
use crate::domain::menu::{Menu, MenuRepository};
use crate::domain::role::{
    DataScope, Permission, PermissionRepository, Role, RoleDepartmentRepository, RoleId,
    RoleMenuRepository, RolePermissionRepository, RoleRepository, UserRoleRepository,
};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

/// 角色视图，按需加载关联
#[derive(Debug, Clone)]
pub struct RoleDetail {
    pub role: Role,
    pub menus: Option<Vec<Menu>>,
    pub permissions: Option<Vec<Permission>>,
    pub department_ids: Option<Vec<DepartmentId>>,
}

/// 角色 CRUD 命令处理器
pub struct RoleCommandHandler {
    roles: Arc<dyn RoleRepository>,
    user_roles: Arc<dyn UserRoleRepository>,
}

impl RoleCommandHandler {
    pub fn new(roles: Arc<dyn RoleRepository>, user_roles: Arc<dyn UserRoleRepository>) -> Self {
        Self { roles, user_roles }
    }

    /// 创建角色
    ///
    /// 自定义数据权限必须通过 set_data_scope 携带部门列表设置，
    /// 创建时不接受。
    pub async fn handle_create(&self, cmd: CreateRoleCommand) -> AppResult<Role> {
        if self.roles.find_by_name(&cmd.name).await?.is_some() {
            return Err(AppError::conflict("Role name already exists"));
        }

        if self.roles.find_by_code(&cmd.code).await?.is_some() {
            return Err(AppError::conflict("Role code already exists"));
        }

        if cmd.data_scope == Some(DataScope::Custom) {
            return Err(AppError::validation(
                "Custom data scope requires a department list; use set_data_scope",
            ));
        }

        let mut role = Role::new(cmd.code, cmd.name, cmd.description);
        role.sort_order = cmd.sort_order;
        if let Some(scope) = cmd.data_scope {
            role.set_data_scope(scope);
        }

        self.roles.create(&role).await?;
        info!(role_id = %role.id, code = %role.code, "role created");

        Ok(role)
    }

    /// 更新角色
    pub async fn handle_update(&self, cmd: UpdateRoleCommand) -> AppResult<Role> {
        let mut role = self
            .roles
            .find_by_id(&cmd.role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;

        if let Some(existing) = self.roles.find_by_name(&cmd.name).await? {
            if existing.id != role.id {
                return Err(AppError::conflict("Role name already exists"));
            }
        }

        role.update(cmd.name, cmd.description, cmd.sort_order);
        role.audit_info.update(None);
        self.roles.update(&role).await?;

        Ok(role)
    }

    /// 删除角色
    pub async fn handle_delete(&self, role_id: &RoleId) -> AppResult<()> {
        if !self.roles.exists(role_id).await? {
            return Err(AppError::not_found("Role not found"));
        }

        if self.user_roles.count_users_with_role(role_id).await? > 0 {
            return Err(AppError::conflict("Role is still assigned to users"));
        }

        self.roles.delete(role_id).await?;
        info!(role_id = %role_id, "role deleted");

        Ok(())
    }

    /// 角色列表，按排序键升序
    pub async fn handle_list(&self) -> AppResult<Vec<Role>> {
        self.roles.list().await
    }
}

/// 角色关联重分配处理器
///
/// 替换全部关联在单个事务内完成：清空与写入同时提交或同时
/// 回滚，部分替换对外永不可见。
pub struct RoleAssignmentHandler {
    roles: Arc<dyn RoleRepository>,
    menus: Arc<dyn MenuRepository>,
    permissions: Arc<dyn PermissionRepository>,
    departments: Arc<dyn DepartmentRepository>,
    role_menus: Arc<dyn RoleMenuRepository>,
    role_permissions: Arc<dyn RolePermissionRepository>,
    role_departments: Arc<dyn RoleDepartmentRepository>,
    uow_factory: Arc<dyn UnitOfWorkFactory>,
}

impl RoleAssignmentHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        roles: Arc<dyn RoleRepository>,
        menus: Arc<dyn MenuRepository>,
        permissions: Arc<dyn PermissionRepository>,
        departments: Arc<dyn DepartmentRepository>,
        role_menus: Arc<dyn RoleMenuRepository>,
        role_permissions: Arc<dyn RolePermissionRepository>,
        role_departments: Arc<dyn RoleDepartmentRepository>,
        uow_factory: Arc<dyn UnitOfWorkFactory>,
    ) -> Self {
        Self {
            roles,
            menus,
            permissions,
            departments,
            role_menus,
            role_permissions,
            role_departments,
            uow_factory,
        }
    }

    /// 加载角色及其全部关联
    pub async fn get_role_detail(&self, role_id: &RoleId) -> AppResult<RoleDetail> {
        let role = self
            .roles
            .find_by_id(role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;

        let menus = self.role_menus.get_role_menus(role_id).await?;
        let permissions = self.role_permissions.get_role_permissions(role_id).await?;
        let department_ids = self.role_departments.get_role_department_ids(role_id).await?;

        Ok(RoleDetail {
            role,
            menus: Some(menus),
            permissions: Some(permissions),
            department_ids: Some(department_ids),
        })
    }

    /// 整体替换角色在某一种类上的关联
    pub async fn handle_reassign(&self, cmd: ReassignAssociationsCommand) -> AppResult<RoleDetail> {
        let role = self
            .roles
            .find_by_id(&cmd.role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;

        let association = self.dedup_and_verify(cmd.association).await?;

        let uow = self.uow_factory.begin().await?;
        match Self::apply_reassign(uow.as_ref(), &cmd.role_id, &association).await {
            Ok(()) => uow.commit().await?,
            Err(e) => {
                uow.rollback().await?;
                return Err(e);
            }
        }

        info!(role_id = %cmd.role_id, "role associations reassigned");
        self.load_detail_for(role, &association).await
    }

    /// 设置数据权限范围
    ///
    /// 范围更新与部门关联替换在同一事务内；非自定义范围清空
    /// 部门关联。
    pub async fn handle_set_data_scope(&self, cmd: SetDataScopeCommand) -> AppResult<RoleDetail> {
        let mut role = self
            .roles
            .find_by_id(&cmd.role_id)
            .await?
            .ok_or_else(|| AppError::not_found("Role not found"))?;

        let department_ids = dedup(cmd.department_ids);

        if cmd.scope == DataScope::Custom {
            if department_ids.is_empty() {
                return Err(AppError::validation(
                    "Custom data scope requires a department list",
                ));
            }

            let found = self.departments.count_by_ids(&department_ids).await?;
            if found != department_ids.len() as i64 {
                return Err(AppError::not_found("Some departments do not exist"));
            }
        }

        let uow = self.uow_factory.begin().await?;
        let result = async {
            if !uow.lock_role(&cmd.role_id).await? {
                return Err(AppError::not_found("Role not found"));
            }

            uow.update_role_data_scope(&cmd.role_id, cmd.scope).await?;
            uow.clear_role_departments(&cmd.role_id).await?;
            if cmd.scope == DataScope::Custom {
                uow.insert_role_departments(&cmd.role_id, &department_ids)
                    .await?;
            }
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

        role.set_data_scope(cmd.scope);
        let department_ids = self
            .role_departments
            .get_role_department_ids(&cmd.role_id)
            .await?;

        Ok(RoleDetail {
            role,
            menus: None,
            permissions: None,
            department_ids: Some(department_ids),
        })
    }

    /// 去重并校验所有引用的实体存在
    async fn dedup_and_verify(&self, association: RoleAssociation) -> AppResult<RoleAssociation> {
        match association {
            RoleAssociation::Menus(ids) => {
                let ids = dedup(ids);
                let found = self.menus.count_by_ids(&ids).await?;
                if found != ids.len() as i64 {
                    return Err(AppError::not_found("Some menus do not exist"));
                }
                Ok(RoleAssociation::Menus(ids))
            }
            RoleAssociation::Permissions(ids) => {
                let ids = dedup(ids);
                let found = self.permissions.count_by_ids(&ids).await?;
                if found != ids.len() as i64 {
                    return Err(AppError::not_found("Some permissions do not exist"));
                }
                Ok(RoleAssociation::Permissions(ids))
            }
            RoleAssociation::Departments(ids) => {
                let ids = dedup(ids);
                let found = self.departments.count_by_ids(&ids).await?;
                if found != ids.len() as i64 {
                    return Err(AppError::not_found("Some departments do not exist"));
                }
                Ok(RoleAssociation::Departments(ids))
            }
        }
    }

    async fn apply_reassign(
        uow: &dyn UnitOfWork,
        role_id: &RoleId,
        association: &RoleAssociation,
    ) -> AppResult<()> {
        if !uow.lock_role(role_id).await? {
            return Err(AppError::not_found("Role not found"));
        }

        match association {
            RoleAssociation::Menus(ids) => {
                uow.clear_role_menus(role_id).await?;
                uow.insert_role_menus(role_id, ids).await?;
            }
            RoleAssociation::Permissions(ids) => {
                uow.clear_role_permissions(role_id).await?;
                uow.insert_role_permissions(role_id, ids).await?;
            }
            RoleAssociation::Departments(ids) => {
                uow.clear_role_departments(role_id).await?;
                uow.insert_role_departments(role_id, ids).await?;
            }
        }

        Ok(())
    }

    /// 重分配后按触及的种类刷新关联
    async fn load_detail_for(
        &self,
        role: Role,
        association: &RoleAssociation,
    ) -> AppResult<RoleDetail> {
        let mut detail = RoleDetail {
            role,
            menus: None,
            permissions: None,
            department_ids: None,
        };

        match association {
            RoleAssociation::Menus(_) => {
                detail.menus = Some(self.role_menus.get_role_menus(&detail.role.id).await?);
            }
            RoleAssociation::Permissions(_) => {
                detail.permissions = Some(
                    self.role_permissions
                        .get_role_permissions(&detail.role.id)
                        .await?,
                );
            }
            RoleAssociation::Departments(_) => {
                detail.department_ids = Some(
                    self.role_departments
                        .get_role_department_ids(&detail.role.id)
                        .await?,
                );
            }
        }

        Ok(detail)
    }
}

/// 去重并保持原有顺序
fn dedup<T: Eq + Hash + Copy>(ids: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
