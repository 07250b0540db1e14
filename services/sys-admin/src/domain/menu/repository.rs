//! 菜单仓储接口

use async_trait::async_trait;
use cobalt_errors::AppResult;

use super::menu::{Menu, MenuId};

/// 菜单仓储接口
#[async_trait]
pub trait MenuRepository: Send + Sync {
    /// 创建菜单
    async fn create(&self, menu: &Menu) -> AppResult<()>;

    /// 更新菜单
    async fn update(&self, menu: &Menu) -> AppResult<()>;

    /// 删除菜单
    async fn delete(&self, id: &MenuId) -> AppResult<()>;

    /// 根据 ID 查找菜单
    async fn find_by_id(&self, id: &MenuId) -> AppResult<Option<Menu>>;

    /// 列出所有菜单，按排序键升序
    async fn list(&self) -> AppResult<Vec<Menu>>;

    /// 统计子菜单数
    async fn count_children(&self, id: &MenuId) -> AppResult<i64>;

    /// 统计给定 ID 中实际存在的菜单数
    async fn count_by_ids(&self, ids: &[MenuId]) -> AppResult<i64>;
}
