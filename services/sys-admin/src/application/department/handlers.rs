//! 部门命令处理器

use std::sync::Arc;

use chrono::Utc;
use cobalt_common::build_forest;
use cobalt_errors::{AppError, AppResult};
use tracing::info;

use super::commands::*;
use crate::domain::department::{
    Department, DepartmentId, DepartmentRepository, DepartmentTree,
};
use crate::domain::user::UserRepository;

/// 部门命令处理器
pub struct DepartmentCommandHandler {
    departments: Arc<dyn DepartmentRepository>,
    users: Arc<dyn UserRepository>,
}

impl DepartmentCommandHandler {
    pub fn new(
        departments: Arc<dyn DepartmentRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { departments, users }
    }

    /// 创建部门
    pub async fn handle_create(&self, cmd: CreateDepartmentCommand) -> AppResult<Department> {
        if let Some(code) = &cmd.code {
            if self.departments.find_by_code(code).await?.is_some() {
                return Err(AppError::conflict("Department code already exists"));
            }
        }

        if let Some(parent_id) = &cmd.parent_id {
            if !self.departments.exists(parent_id).await? {
                return Err(AppError::not_found("Parent department not found"));
            }
        }

        let now = Utc::now();
        let department = Department {
            id: DepartmentId::new(),
            parent_id: cmd.parent_id,
            name: cmd.name,
            code: cmd.code,
            leader_id: cmd.leader_id,
            phone: cmd.phone,
            email: cmd.email,
            description: cmd.description,
            sort_order: cmd.sort_order,
            created_at: now,
            updated_at: now,
        };

        self.departments.create(&department).await?;
        info!(department_id = %department.id, name = %department.name, "department created");

        Ok(department)
    }

    /// 更新部门
    pub async fn handle_update(&self, cmd: UpdateDepartmentCommand) -> AppResult<Department> {
        let mut department = self
            .departments
            .find_by_id(&cmd.department_id)
            .await?
            .ok_or_else(|| AppError::not_found("Department not found"))?;

        if let Some(code) = &cmd.code {
            if let Some(existing) = self.departments.find_by_code(code).await? {
                if existing.id != department.id {
                    return Err(AppError::conflict("Department code already exists"));
                }
            }
        }

        if cmd.parent_id == Some(cmd.department_id) {
            return Err(AppError::conflict("A department cannot be its own parent"));
        }

        if let Some(parent_id) = &cmd.parent_id {
            if !self.departments.exists(parent_id).await? {
                return Err(AppError::not_found("Parent department not found"));
            }
        }

        department.parent_id = cmd.parent_id;
        department.name = cmd.name;
        department.code = cmd.code;
        department.leader_id = cmd.leader_id;
        department.phone = cmd.phone;
        department.email = cmd.email;
        department.description = cmd.description;
        department.sort_order = cmd.sort_order;
        department.updated_at = Utc::now();

        self.departments.update(&department).await?;

        Ok(department)
    }

    /// 删除部门
    pub async fn handle_delete(&self, department_id: &DepartmentId) -> AppResult<()> {
        if !self.departments.exists(department_id).await? {
            return Err(AppError::not_found("Department not found"));
        }

        if self.departments.count_children(department_id).await? > 0 {
            return Err(AppError::conflict("Department still has children"));
        }

        if self.users.count_by_department(department_id).await? > 0 {
            return Err(AppError::conflict("Department still has users"));
        }

        self.departments.delete(department_id).await?;
        info!(department_id = %department_id, "department deleted");

        Ok(())
    }

    /// 查询单个部门
    pub async fn handle_get(&self, department_id: &DepartmentId) -> AppResult<Department> {
        self.departments
            .find_by_id(department_id)
            .await?
            .ok_or_else(|| AppError::not_found("Department not found"))
    }

    /// 部门树
    pub async fn handle_tree(&self) -> AppResult<Vec<DepartmentTree>> {
        let departments = self.departments.list().await?;
        Ok(build_forest(
            departments.into_iter().map(DepartmentTree::from).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{HashedPassword, User};
    use crate::testing::MemStore;

    fn handler(store: &Arc<MemStore>) -> DepartmentCommandHandler {
        DepartmentCommandHandler::new(store.clone(), store.clone())
    }

    fn create_cmd(name: &str, parent_id: Option<DepartmentId>) -> CreateDepartmentCommand {
        CreateDepartmentCommand {
            parent_id,
            name: name.to_string(),
            code: Some(name.to_string()),
            leader_id: None,
            phone: None,
            email: None,
            description: None,
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicate_code() {
        let store = MemStore::new();
        let handler = handler(&store);

        handler.handle_create(create_cmd("tech", None)).await.unwrap();
        let err = handler.handle_create(create_cmd("tech", None)).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_requires_existing_parent() {
        let store = MemStore::new();

        let err = handler(&store)
            .handle_create(create_cmd("tech", Some(DepartmentId::new())))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_refused_with_children_or_users() {
        let store = MemStore::new();
        let handler = handler(&store);

        let parent = handler.handle_create(create_cmd("tech", None)).await.unwrap();
        let child = handler
            .handle_create(create_cmd("backend", Some(parent.id)))
            .await
            .unwrap();

        let err = handler.handle_delete(&parent.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let mut user = User::new(
            "worker".to_string(),
            HashedPassword::from_hash("$argon2id$fake"),
        );
        user.department_id = Some(child.id);
        store.add_user(user);

        let err = handler.handle_delete(&child.id).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_tree_nests_children_under_parents() {
        let store = MemStore::new();
        let handler = handler(&store);

        let parent = handler.handle_create(create_cmd("tech", None)).await.unwrap();
        handler
            .handle_create(create_cmd("backend", Some(parent.id)))
            .await
            .unwrap();

        let tree = handler.handle_tree().await.unwrap();
        assert_eq!(tree.len(), 1);
        let children = tree[0].children.as_ref().unwrap();
        assert_eq!(children[0].department.name, "backend");
        assert!(children[0].children.is_none());
    }
}
