//! 测试用内存实现
//!
//! 以进程内 HashMap 实现全部仓储接口和 Unit of Work，
//! 供应用层测试共用。提交/回滚次数可被断言。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cobalt_common::UserId;
use cobalt_errors::AppResult;

use crate::domain::department::{Department, DepartmentId, DepartmentRepository};
use crate::domain::menu::{Menu, MenuId, MenuRepository};
use crate::domain::role::{
    DataScope, Permission, PermissionId, PermissionRepository, Role, RoleDepartmentRepository,
    RoleId, RoleMenuRepository, RolePermissionRepository, RoleRepository, UserRoleRepository,
};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::user::{User, UserRepository};

/// 关联表状态
#[derive(Debug, Default, Clone)]
pub struct AssocState {
    pub role_menus: HashMap<RoleId, Vec<MenuId>>,
    pub role_permissions: HashMap<RoleId, Vec<PermissionId>>,
    pub role_departments: HashMap<RoleId, Vec<DepartmentId>>,
    pub user_roles: HashMap<UserId, Vec<RoleId>>,
}

/// 内存数据存储，实现全部仓储接口
#[derive(Default)]
pub struct MemStore {
    pub users: Mutex<HashMap<UserId, User>>,
    pub roles: Mutex<HashMap<RoleId, Role>>,
    pub permissions: Mutex<HashMap<PermissionId, Permission>>,
    pub menus: Mutex<HashMap<MenuId, Menu>>,
    pub departments: Mutex<HashMap<DepartmentId, Department>>,
    pub assoc: Mutex<AssocState>,
    pub committed: AtomicUsize,
    pub rolled_back: AtomicUsize,
    pub invalidations: AtomicUsize,
}

impl MemStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, user: User) -> UserId {
        let id = user.id;
        self.users.lock().unwrap().insert(id, user);
        id
    }

    pub fn add_role(&self, role: Role) -> RoleId {
        let id = role.id;
        self.roles.lock().unwrap().insert(id, role);
        id
    }

    pub fn add_permission(&self, permission: Permission) -> PermissionId {
        let id = permission.id;
        self.permissions.lock().unwrap().insert(id, permission);
        id
    }

    pub fn add_menu(&self, menu: Menu) -> MenuId {
        let id = menu.id;
        self.menus.lock().unwrap().insert(id, menu);
        id
    }

    pub fn add_department(&self, department: Department) -> DepartmentId {
        let id = department.id;
        self.departments.lock().unwrap().insert(id, department);
        id
    }

    pub fn link_user_roles(&self, user_id: UserId, role_ids: Vec<RoleId>) {
        self.assoc.lock().unwrap().user_roles.insert(user_id, role_ids);
    }

    pub fn link_role_permissions(&self, role_id: RoleId, permission_ids: Vec<PermissionId>) {
        self.assoc
            .lock()
            .unwrap()
            .role_permissions
            .insert(role_id, permission_ids);
    }

    pub fn link_role_menus(&self, role_id: RoleId, menu_ids: Vec<MenuId>) {
        self.assoc.lock().unwrap().role_menus.insert(role_id, menu_ids);
    }

    pub fn link_role_departments(&self, role_id: RoleId, department_ids: Vec<DepartmentId>) {
        self.assoc
            .lock()
            .unwrap()
            .role_departments
            .insert(role_id, department_ids);
    }
}

#[async_trait]
impl UserRepository for MemStore {
    async fn create(&self, user: &User) -> AppResult<()> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> AppResult<()> {
        self.users.lock().unwrap().insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> AppResult<()> {
        self.users.lock().unwrap().remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .any(|u| u.username == username))
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Ok(self.users.lock().unwrap().values().cloned().collect())
    }

    async fn count_by_department(&self, department_id: &DepartmentId) -> AppResult<i64> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .filter(|u| u.department_id.as_ref() == Some(department_id))
            .count() as i64)
    }
}

#[async_trait]
impl RoleRepository for MemStore {
    async fn create(&self, role: &Role) -> AppResult<()> {
        self.roles.lock().unwrap().insert(role.id, role.clone());
        Ok(())
    }

    async fn update(&self, role: &Role) -> AppResult<()> {
        self.roles.lock().unwrap().insert(role.id, role.clone());
        Ok(())
    }

    async fn delete(&self, id: &RoleId) -> AppResult<()> {
        self.roles.lock().unwrap().remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &RoleId) -> AppResult<Option<Role>> {
        Ok(self.roles.lock().unwrap().get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .values()
            .find(|r| r.code == code)
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .values()
            .find(|r| r.name == name)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.lock().unwrap().values().cloned().collect();
        roles.sort_by_key(|r| r.sort_order);
        Ok(roles)
    }

    async fn exists(&self, id: &RoleId) -> AppResult<bool> {
        Ok(self.roles.lock().unwrap().contains_key(id))
    }

    async fn count_by_ids(&self, ids: &[RoleId]) -> AppResult<i64> {
        let roles = self.roles.lock().unwrap();
        let unique: HashSet<&RoleId> = ids.iter().collect();
        Ok(unique.iter().filter(|id| roles.contains_key(**id)).count() as i64)
    }
}

#[async_trait]
impl PermissionRepository for MemStore {
    async fn create(&self, permission: &Permission) -> AppResult<()> {
        self.permissions
            .lock()
            .unwrap()
            .insert(permission.id, permission.clone());
        Ok(())
    }

    async fn update(&self, permission: &Permission) -> AppResult<()> {
        self.permissions
            .lock()
            .unwrap()
            .insert(permission.id, permission.clone());
        Ok(())
    }

    async fn delete(&self, id: &PermissionId) -> AppResult<()> {
        self.permissions.lock().unwrap().remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &PermissionId) -> AppResult<Option<Permission>> {
        Ok(self.permissions.lock().unwrap().get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Permission>> {
        Ok(self
            .permissions
            .lock()
            .unwrap()
            .values()
            .find(|p| p.code == code)
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Permission>> {
        let mut permissions: Vec<Permission> =
            self.permissions.lock().unwrap().values().cloned().collect();
        permissions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(permissions)
    }

    async fn count_by_ids(&self, ids: &[PermissionId]) -> AppResult<i64> {
        let permissions = self.permissions.lock().unwrap();
        let unique: HashSet<&PermissionId> = ids.iter().collect();
        Ok(unique
            .iter()
            .filter(|id| permissions.contains_key(**id))
            .count() as i64)
    }
}

#[async_trait]
impl MenuRepository for MemStore {
    async fn create(&self, menu: &Menu) -> AppResult<()> {
        self.menus.lock().unwrap().insert(menu.id, menu.clone());
        Ok(())
    }

    async fn update(&self, menu: &Menu) -> AppResult<()> {
        self.menus.lock().unwrap().insert(menu.id, menu.clone());
        Ok(())
    }

    async fn delete(&self, id: &MenuId) -> AppResult<()> {
        self.menus.lock().unwrap().remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &MenuId) -> AppResult<Option<Menu>> {
        Ok(self.menus.lock().unwrap().get(id).cloned())
    }

    async fn list(&self) -> AppResult<Vec<Menu>> {
        let mut menus: Vec<Menu> = self.menus.lock().unwrap().values().cloned().collect();
        menus.sort_by_key(|m| m.sort_order);
        Ok(menus)
    }

    async fn count_children(&self, id: &MenuId) -> AppResult<i64> {
        Ok(self
            .menus
            .lock()
            .unwrap()
            .values()
            .filter(|m| m.parent_id.as_ref() == Some(id))
            .count() as i64)
    }

    async fn count_by_ids(&self, ids: &[MenuId]) -> AppResult<i64> {
        let menus = self.menus.lock().unwrap();
        let unique: HashSet<&MenuId> = ids.iter().collect();
        Ok(unique.iter().filter(|id| menus.contains_key(**id)).count() as i64)
    }
}

#[async_trait]
impl DepartmentRepository for MemStore {
    async fn create(&self, department: &Department) -> AppResult<()> {
        self.departments
            .lock()
            .unwrap()
            .insert(department.id, department.clone());
        Ok(())
    }

    async fn update(&self, department: &Department) -> AppResult<()> {
        self.departments
            .lock()
            .unwrap()
            .insert(department.id, department.clone());
        Ok(())
    }

    async fn delete(&self, id: &DepartmentId) -> AppResult<()> {
        self.departments.lock().unwrap().remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &DepartmentId) -> AppResult<Option<Department>> {
        Ok(self.departments.lock().unwrap().get(id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> AppResult<Option<Department>> {
        Ok(self
            .departments
            .lock()
            .unwrap()
            .values()
            .find(|d| d.code.as_deref() == Some(code))
            .cloned())
    }

    async fn list(&self) -> AppResult<Vec<Department>> {
        let mut departments: Vec<Department> =
            self.departments.lock().unwrap().values().cloned().collect();
        departments.sort_by_key(|d| d.sort_order);
        Ok(departments)
    }

    async fn list_children(&self, id: &DepartmentId) -> AppResult<Vec<Department>> {
        Ok(self
            .departments
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.parent_id.as_ref() == Some(id))
            .cloned()
            .collect())
    }

    async fn count_children(&self, id: &DepartmentId) -> AppResult<i64> {
        Ok(self.list_children(id).await?.len() as i64)
    }

    async fn exists(&self, id: &DepartmentId) -> AppResult<bool> {
        Ok(self.departments.lock().unwrap().contains_key(id))
    }

    async fn count_by_ids(&self, ids: &[DepartmentId]) -> AppResult<i64> {
        let departments = self.departments.lock().unwrap();
        let unique: HashSet<&DepartmentId> = ids.iter().collect();
        Ok(unique
            .iter()
            .filter(|id| departments.contains_key(**id))
            .count() as i64)
    }
}

#[async_trait]
impl UserRoleRepository for MemStore {
    async fn get_user_roles(&self, user_id: &UserId) -> AppResult<Vec<Role>> {
        let role_ids = self
            .assoc
            .lock()
            .unwrap()
            .user_roles
            .get(user_id)
            .cloned()
            .unwrap_or_default();
        let roles = self.roles.lock().unwrap();
        Ok(role_ids.iter().filter_map(|id| roles.get(id).cloned()).collect())
    }

    async fn get_user_permissions(&self, user_id: &UserId) -> AppResult<Vec<Permission>> {
        let assoc = self.assoc.lock().unwrap();
        let role_ids = assoc.user_roles.get(user_id).cloned().unwrap_or_default();

        let mut seen: HashSet<PermissionId> = HashSet::new();
        let permissions = self.permissions.lock().unwrap();
        let mut result = Vec::new();
        for role_id in role_ids {
            for permission_id in assoc.role_permissions.get(&role_id).cloned().unwrap_or_default() {
                if !seen.insert(permission_id) {
                    continue;
                }
                if let Some(permission) = permissions.get(&permission_id) {
                    result.push(permission.clone());
                }
            }
        }
        Ok(result)
    }

    async fn count_users_with_role(&self, role_id: &RoleId) -> AppResult<i64> {
        Ok(self
            .assoc
            .lock()
            .unwrap()
            .user_roles
            .values()
            .filter(|ids| ids.contains(role_id))
            .count() as i64)
    }

    async fn invalidate(&self, _user_id: &UserId) -> AppResult<()> {
        self.invalidations.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl RoleMenuRepository for MemStore {
    async fn get_role_menus(&self, role_id: &RoleId) -> AppResult<Vec<Menu>> {
        let menu_ids = self
            .assoc
            .lock()
            .unwrap()
            .role_menus
            .get(role_id)
            .cloned()
            .unwrap_or_default();
        let menus = self.menus.lock().unwrap();
        Ok(menu_ids.iter().filter_map(|id| menus.get(id).cloned()).collect())
    }

    async fn count_roles_with_menu(&self, menu_id: &MenuId) -> AppResult<i64> {
        Ok(self
            .assoc
            .lock()
            .unwrap()
            .role_menus
            .values()
            .filter(|ids| ids.contains(menu_id))
            .count() as i64)
    }
}

#[async_trait]
impl RolePermissionRepository for MemStore {
    async fn get_role_permissions(&self, role_id: &RoleId) -> AppResult<Vec<Permission>> {
        let permission_ids = self
            .assoc
            .lock()
            .unwrap()
            .role_permissions
            .get(role_id)
            .cloned()
            .unwrap_or_default();
        let permissions = self.permissions.lock().unwrap();
        Ok(permission_ids
            .iter()
            .filter_map(|id| permissions.get(id).cloned())
            .collect())
    }

    async fn count_roles_with_permission(&self, permission_id: &PermissionId) -> AppResult<i64> {
        Ok(self
            .assoc
            .lock()
            .unwrap()
            .role_permissions
            .values()
            .filter(|ids| ids.contains(permission_id))
            .count() as i64)
    }
}

#[async_trait]
impl RoleDepartmentRepository for MemStore {
    async fn get_role_department_ids(&self, role_id: &RoleId) -> AppResult<Vec<DepartmentId>> {
        Ok(self
            .assoc
            .lock()
            .unwrap()
            .role_departments
            .get(role_id)
            .cloned()
            .unwrap_or_default())
    }
}

/// 内存 Unit of Work：在暂存副本上操作，提交时写回共享状态
pub struct MemUnitOfWork {
    store: Arc<MemStore>,
    staged: Mutex<AssocState>,
    scope_updates: Mutex<Vec<(RoleId, DataScope)>>,
    fail_inserts: bool,
}

impl MemUnitOfWork {
    fn ensure_inserts_allowed(&self) -> AppResult<()> {
        if self.fail_inserts {
            Err(cobalt_errors::AppError::database("simulated insert failure"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UnitOfWork for MemUnitOfWork {
    async fn lock_role(&self, role_id: &RoleId) -> AppResult<bool> {
        Ok(self.store.roles.lock().unwrap().contains_key(role_id))
    }

    async fn lock_user(&self, user_id: &UserId) -> AppResult<bool> {
        Ok(self.store.users.lock().unwrap().contains_key(user_id))
    }

    async fn clear_role_menus(&self, role_id: &RoleId) -> AppResult<()> {
        self.staged.lock().unwrap().role_menus.remove(role_id);
        Ok(())
    }

    async fn insert_role_menus(&self, role_id: &RoleId, menu_ids: &[MenuId]) -> AppResult<()> {
        self.ensure_inserts_allowed()?;
        self.staged
            .lock()
            .unwrap()
            .role_menus
            .entry(*role_id)
            .or_default()
            .extend_from_slice(menu_ids);
        Ok(())
    }

    async fn clear_role_permissions(&self, role_id: &RoleId) -> AppResult<()> {
        self.staged.lock().unwrap().role_permissions.remove(role_id);
        Ok(())
    }

    async fn insert_role_permissions(
        &self,
        role_id: &RoleId,
        permission_ids: &[PermissionId],
    ) -> AppResult<()> {
        self.ensure_inserts_allowed()?;
        self.staged
            .lock()
            .unwrap()
            .role_permissions
            .entry(*role_id)
            .or_default()
            .extend_from_slice(permission_ids);
        Ok(())
    }

    async fn clear_role_departments(&self, role_id: &RoleId) -> AppResult<()> {
        self.staged.lock().unwrap().role_departments.remove(role_id);
        Ok(())
    }

    async fn insert_role_departments(
        &self,
        role_id: &RoleId,
        department_ids: &[DepartmentId],
    ) -> AppResult<()> {
        self.ensure_inserts_allowed()?;
        self.staged
            .lock()
            .unwrap()
            .role_departments
            .entry(*role_id)
            .or_default()
            .extend_from_slice(department_ids);
        Ok(())
    }

    async fn update_role_data_scope(&self, role_id: &RoleId, scope: DataScope) -> AppResult<()> {
        self.scope_updates.lock().unwrap().push((*role_id, scope));
        Ok(())
    }

    async fn clear_user_roles(&self, user_id: &UserId) -> AppResult<()> {
        self.staged.lock().unwrap().user_roles.remove(user_id);
        Ok(())
    }

    async fn insert_user_roles(&self, user_id: &UserId, role_ids: &[RoleId]) -> AppResult<()> {
        self.ensure_inserts_allowed()?;
        self.staged
            .lock()
            .unwrap()
            .user_roles
            .entry(*user_id)
            .or_default()
            .extend_from_slice(role_ids);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let staged = self.staged.into_inner().unwrap();
        let scope_updates = self.scope_updates.into_inner().unwrap();

        *self.store.assoc.lock().unwrap() = staged;
        {
            let mut roles = self.store.roles.lock().unwrap();
            for (role_id, scope) in scope_updates {
                if let Some(role) = roles.get_mut(&role_id) {
                    role.data_scope = scope;
                }
            }
        }

        self.store.committed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        self.store.rolled_back.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct MemUnitOfWorkFactory {
    store: Arc<MemStore>,
    fail_inserts: bool,
}

impl MemUnitOfWorkFactory {
    pub fn new(store: Arc<MemStore>) -> Self {
        Self {
            store,
            fail_inserts: false,
        }
    }

    /// 让后续事务中的写入失败，用于验证回滚路径
    pub fn failing_inserts(store: Arc<MemStore>) -> Self {
        Self {
            store,
            fail_inserts: true,
        }
    }
}

#[async_trait]
impl UnitOfWorkFactory for MemUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let staged = self.store.assoc.lock().unwrap().clone();
        Ok(Box::new(MemUnitOfWork {
            store: self.store.clone(),
            staged: Mutex::new(staged),
            scope_updates: Mutex::new(Vec::new()),
            fail_inserts: self.fail_inserts,
        }))
    }
}
