//! 数据权限解析
//!
//! 将主体的角色集合解析为具体的部门过滤条件、
//! "仅本人" 或 "不限" 标记。

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use cobalt_common::UserId;
use cobalt_errors::{AppError, AppResult};
use tracing::debug;

use crate::domain::department::{DepartmentId, DepartmentRepository};
use crate::domain::role::{DataScope, RoleDepartmentRepository, UserRoleRepository};
use crate::domain::user::UserRepository;

/// 数据权限解析结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeResult {
    /// 不过滤部门
    Unrestricted,
    /// 按部门 ID 集合过滤；空集合表示不匹配任何数据，而非不过滤
    Departments(HashSet<DepartmentId>),
    /// 仅本人数据，调用方需按主体 ID 过滤
    SelfOnly,
}

impl ScopeResult {
    pub fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    pub fn is_self_only(&self) -> bool {
        matches!(self, Self::SelfOnly)
    }
}

/// 数据权限解析器
pub struct DataScopeResolver {
    users: Arc<dyn UserRepository>,
    user_roles: Arc<dyn UserRoleRepository>,
    departments: Arc<dyn DepartmentRepository>,
    role_departments: Arc<dyn RoleDepartmentRepository>,
}

impl DataScopeResolver {
    pub fn new(
        users: Arc<dyn UserRepository>,
        user_roles: Arc<dyn UserRoleRepository>,
        departments: Arc<dyn DepartmentRepository>,
        role_departments: Arc<dyn RoleDepartmentRepository>,
    ) -> Self {
        Self {
            users,
            user_roles,
            departments,
            role_departments,
        }
    }

    /// 解析主体的数据权限
    ///
    /// 按网关返回的角色顺序扫描；All 与 SelfOnly 命中即返回。
    /// 同时持有宽范围和仅本人角色的主体，结果取决于先处理到
    /// 哪个角色——这一取舍行为保持原样并由测试固定。
    pub async fn resolve(&self, user_id: &UserId) -> AppResult<ScopeResult> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let roles = self.user_roles.get_user_roles(user_id).await?;

        let mut department_ids: HashSet<DepartmentId> = HashSet::new();

        for role in &roles {
            match role.data_scope {
                // 首个命中即返回，后续角色的贡献不再收集
                DataScope::All => return Ok(ScopeResult::Unrestricted),
                DataScope::SelfOnly => return Ok(ScopeResult::SelfOnly),

                DataScope::DeptAndBelow => {
                    if let Some(department_id) = user.department_id {
                        department_ids.extend(self.expand_subtree(&department_id).await?);
                    }
                }

                DataScope::Dept => {
                    if let Some(department_id) = user.department_id {
                        department_ids.insert(department_id);
                    }
                }

                DataScope::Custom => {
                    let custom = self
                        .role_departments
                        .get_role_department_ids(&role.id)
                        .await?;
                    department_ids.extend(custom);
                }
            }
        }

        debug!(user_id = %user_id, departments = department_ids.len(), "data scope resolved");
        Ok(ScopeResult::Departments(department_ids))
    }

    /// 展开部门子树，始终包含起点部门
    ///
    /// 沿 parent→child 边广度优先遍历。部门关系应当是森林，
    /// 但 visited 集合保证意外成环的数据也能终止。
    pub async fn expand_subtree(
        &self,
        department_id: &DepartmentId,
    ) -> AppResult<HashSet<DepartmentId>> {
        let mut visited: HashSet<DepartmentId> = HashSet::from([*department_id]);
        let mut queue: VecDeque<DepartmentId> = VecDeque::from([*department_id]);

        while let Some(current) = queue.pop_front() {
            for child in self.departments.list_children(&current).await? {
                if visited.insert(child.id) {
                    queue.push_back(child.id);
                }
            }
        }

        Ok(visited)
    }
}
