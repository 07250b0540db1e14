//! 认证缓存
//!
//! 缓存用户的角色集合与聚合权限集合。纯性能优化，
//! 所有读取路径在缓存缺失时回源数据库。

use std::sync::Arc;
use std::time::Duration;

use cobalt_common::UserId;
use cobalt_errors::{AppError, AppResult};
use cobalt_ports::CachePort;

use crate::domain::role::{Permission, Role};

/// 认证缓存配置
#[derive(Clone)]
pub struct AuthCacheConfig {
    /// 用户角色缓存 TTL（秒）
    pub user_roles_ttl_secs: u64,
    /// 用户权限缓存 TTL（秒）
    pub user_permissions_ttl_secs: u64,
}

impl Default for AuthCacheConfig {
    fn default() -> Self {
        Self {
            user_roles_ttl_secs: 300,
            user_permissions_ttl_secs: 300,
        }
    }
}

pub struct AuthCache {
    cache: Arc<dyn CachePort>,
    config: AuthCacheConfig,
}

impl AuthCache {
    pub fn new(cache: Arc<dyn CachePort>) -> Self {
        Self {
            cache,
            config: AuthCacheConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AuthCacheConfig) -> Self {
        self.config = config;
        self
    }

    fn user_roles_key(user_id: &UserId) -> String {
        format!("sys:admin:user_roles:{}", user_id)
    }

    fn user_permissions_key(user_id: &UserId) -> String {
        format!("sys:admin:user_permissions:{}", user_id)
    }

    pub async fn get_user_roles(&self, user_id: &UserId) -> AppResult<Option<Vec<Role>>> {
        let key = Self::user_roles_key(user_id);
        match self.cache.get(&key).await? {
            Some(json) => {
                let roles: Vec<Role> = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Failed to deserialize cached roles: {}", e))
                })?;
                Ok(Some(roles))
            }
            None => Ok(None),
        }
    }

    pub async fn set_user_roles(&self, user_id: &UserId, roles: &[Role]) -> AppResult<()> {
        let key = Self::user_roles_key(user_id);
        let json = serde_json::to_string(roles)
            .map_err(|e| AppError::internal(format!("Failed to serialize roles: {}", e)))?;

        let ttl = Duration::from_secs(self.config.user_roles_ttl_secs);
        self.cache.set(&key, &json, Some(ttl)).await
    }

    pub async fn get_user_permissions(
        &self,
        user_id: &UserId,
    ) -> AppResult<Option<Vec<Permission>>> {
        let key = Self::user_permissions_key(user_id);
        match self.cache.get(&key).await? {
            Some(json) => {
                let permissions: Vec<Permission> = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Failed to deserialize cached permissions: {}", e))
                })?;
                Ok(Some(permissions))
            }
            None => Ok(None),
        }
    }

    pub async fn set_user_permissions(
        &self,
        user_id: &UserId,
        permissions: &[Permission],
    ) -> AppResult<()> {
        let key = Self::user_permissions_key(user_id);
        let json = serde_json::to_string(permissions)
            .map_err(|e| AppError::internal(format!("Failed to serialize permissions: {}", e)))?;

        let ttl = Duration::from_secs(self.config.user_permissions_ttl_secs);
        self.cache.set(&key, &json, Some(ttl)).await
    }

    /// 失效用户的角色与权限缓存
    pub async fn invalidate_user(&self, user_id: &UserId) -> AppResult<()> {
        self.cache.delete(&Self::user_roles_key(user_id)).await?;
        self.cache
            .delete(&Self::user_permissions_key(user_id))
            .await
    }
}
