//! 权限守卫
//!
//! 聚合主体所有角色的权限编码并执行全量匹配：
//! 要求的每一个编码都必须在聚合集合中出现。

use std::collections::HashSet;
use std::sync::Arc;

use cobalt_common::UserId;
use cobalt_errors::{AppError, AppResult};
use metrics::counter;
use tracing::debug;

use super::operations;
use crate::domain::role::UserRoleRepository;

/// 权限守卫
///
/// 只读决策，无副作用；设计为每个受保护操作调用一次，
/// 在昂贵的业务逻辑之前短路。
pub struct PermissionGuard {
    user_roles: Arc<dyn UserRoleRepository>,
}

impl PermissionGuard {
    pub fn new(user_roles: Arc<dyn UserRoleRepository>) -> Self {
        Self { user_roles }
    }

    /// 检查主体是否持有全部所需权限
    ///
    /// 空的 required 集合直接放行；未附加主体的请求拒绝。
    /// 多角色只会扩大授权集合，不会收缩。
    pub async fn authorize(
        &self,
        subject: Option<&UserId>,
        required: &[&str],
    ) -> AppResult<()> {
        if required.is_empty() {
            return Ok(());
        }

        let Some(user_id) = subject else {
            counter!("authorization_denied_total", "reason" => "unauthenticated").increment(1);
            return Err(AppError::forbidden("Not authenticated"));
        };

        let granted = self.user_roles.get_user_permissions(user_id).await?;
        let codes: HashSet<&str> = granted.iter().map(|p| p.code.as_str()).collect();

        let missing: Vec<&&str> = required.iter().filter(|c| !codes.contains(*c)).collect();

        if missing.is_empty() {
            counter!("authorization_checks_total", "allowed" => "true").increment(1);
            Ok(())
        } else {
            debug!(user_id = %user_id, ?missing, "permission check failed");
            counter!("authorization_checks_total", "allowed" => "false").increment(1);
            Err(AppError::forbidden("Insufficient permissions"))
        }
    }

    /// 按操作名检查权限（查静态注册表）
    pub async fn authorize_operation(
        &self,
        subject: Option<&UserId>,
        operation: &str,
    ) -> AppResult<()> {
        self.authorize(subject, operations::required_permissions(operation))
            .await
    }
}
