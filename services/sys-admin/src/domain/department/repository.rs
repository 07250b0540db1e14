//! 部门仓储接口

use async_trait::async_trait;
use cobalt_errors::AppResult;

use super::department::{Department, DepartmentId};

/// 部门仓储接口
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    /// 创建部门
    async fn create(&self, department: &Department) -> AppResult<()>;

    /// 更新部门
    async fn update(&self, department: &Department) -> AppResult<()>;

    /// 删除部门
    async fn delete(&self, id: &DepartmentId) -> AppResult<()>;

    /// 根据 ID 查找部门
    async fn find_by_id(&self, id: &DepartmentId) -> AppResult<Option<Department>>;

    /// 根据编码查找部门
    async fn find_by_code(&self, code: &str) -> AppResult<Option<Department>>;

    /// 列出所有部门，按排序键升序
    async fn list(&self) -> AppResult<Vec<Department>>;

    /// 列出直接子部门
    async fn list_children(&self, id: &DepartmentId) -> AppResult<Vec<Department>>;

    /// 统计直接子部门数
    async fn count_children(&self, id: &DepartmentId) -> AppResult<i64>;

    /// 检查部门是否存在
    async fn exists(&self, id: &DepartmentId) -> AppResult<bool>;

    /// 统计给定 ID 中实际存在的部门数
    async fn count_by_ids(&self, ids: &[DepartmentId]) -> AppResult<i64>;
}
