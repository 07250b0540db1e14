//! 用户仓储接口

use async_trait::async_trait;
use cobalt_common::UserId;
use cobalt_errors::AppResult;

use super::user::User;
use crate::domain::department::DepartmentId;

/// 用户仓储接口
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 创建用户
    async fn create(&self, user: &User) -> AppResult<()>;

    /// 更新用户
    async fn update(&self, user: &User) -> AppResult<()>;

    /// 删除用户
    async fn delete(&self, id: &UserId) -> AppResult<()>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: &UserId) -> AppResult<Option<User>>;

    /// 根据用户名查找用户
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// 检查用户名是否已存在
    async fn exists_by_username(&self, username: &str) -> AppResult<bool>;

    /// 列出所有用户
    async fn list(&self) -> AppResult<Vec<User>>;

    /// 统计某部门下的用户数
    async fn count_by_department(&self, department_id: &DepartmentId) -> AppResult<i64>;
}
