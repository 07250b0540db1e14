//! 服务装配
//!
//! 从配置构建基础设施资源并接线全部应用服务。
//! 传输层（HTTP/gRPC）由调用方自行接入。

use std::sync::Arc;

use cobalt_adapter_postgres::{PostgresOptions, check_connection, create_pool};
use cobalt_adapter_redis::{RedisCache, create_connection_manager};
use cobalt_auth_core::TokenService;
use cobalt_config::AppConfig;
use cobalt_errors::AppResult;
use secrecy::ExposeSecret;
use tracing::{info, warn};

use crate::application::auth::AuthService;
use crate::application::authorization::PermissionGuard;
use crate::application::data_scope::DataScopeResolver;
use crate::application::department::DepartmentCommandHandler;
use crate::application::menu::MenuCommandHandler;
use crate::application::permission::PermissionCommandHandler;
use crate::application::role::{RoleAssignmentHandler, RoleCommandHandler};
use crate::application::user::UserCommandHandler;
use crate::infrastructure::cache::AuthCache;
use crate::infrastructure::persistence::{
    PostgresDepartmentRepository, PostgresMenuRepository, PostgresPermissionRepository,
    PostgresRoleDepartmentRepository, PostgresRoleMenuRepository,
    PostgresRolePermissionRepository, PostgresRoleRepository, PostgresUnitOfWorkFactory,
    PostgresUserRepository, PostgresUserRoleRepository,
};

/// 装配完成的服务集合
pub struct AdminServices {
    pub auth: Arc<AuthService>,
    pub guard: Arc<PermissionGuard>,
    pub data_scope: Arc<DataScopeResolver>,
    pub users: Arc<UserCommandHandler>,
    pub roles: Arc<RoleCommandHandler>,
    pub role_assignments: Arc<RoleAssignmentHandler>,
    pub permissions: Arc<PermissionCommandHandler>,
    pub menus: Arc<MenuCommandHandler>,
    pub departments: Arc<DepartmentCommandHandler>,
}

/// 初始化 tracing（生产环境输出 JSON）
pub fn init_telemetry(config: &AppConfig) {
    cobalt_telemetry::init_tracing(&config.telemetry.log_level, config.is_production());
}

/// 构建服务
///
/// Redis 不可用时降级为无缓存运行，正确性不依赖缓存。
pub async fn build(config: &AppConfig) -> AppResult<AdminServices> {
    let pool = create_pool(
        &PostgresOptions::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections),
    )
    .await?;
    check_connection(&pool).await?;
    info!(app = %config.app_name, "database connection established");

    let auth_cache = match create_connection_manager(config.redis.url.expose_secret()).await {
        Ok(conn) => Some(Arc::new(AuthCache::new(Arc::new(RedisCache::new(conn))))),
        Err(e) => {
            warn!(error = %e, "redis unavailable, running without auth cache");
            None
        }
    };

    let users: Arc<PostgresUserRepository> = Arc::new(PostgresUserRepository::new(pool.clone()));
    let roles = Arc::new(PostgresRoleRepository::new(pool.clone()));
    let permissions = Arc::new(PostgresPermissionRepository::new(pool.clone()));
    let menus = Arc::new(PostgresMenuRepository::new(pool.clone()));
    let departments = Arc::new(PostgresDepartmentRepository::new(pool.clone()));
    let role_menus = Arc::new(PostgresRoleMenuRepository::new(pool.clone()));
    let role_permissions = Arc::new(PostgresRolePermissionRepository::new(pool.clone()));
    let role_departments = Arc::new(PostgresRoleDepartmentRepository::new(pool.clone()));

    let mut user_roles = PostgresUserRoleRepository::new(pool.clone());
    if let Some(cache) = auth_cache {
        user_roles = user_roles.with_cache(cache);
    }
    let user_roles = Arc::new(user_roles);

    let uow_factory = Arc::new(PostgresUnitOfWorkFactory::new(pool));

    let tokens = TokenService::new(
        config.jwt.secret.expose_secret(),
        config.jwt.expires_in as i64,
        config.jwt.issuer.clone(),
        config.jwt.audience.clone(),
    );

    Ok(AdminServices {
        auth: Arc::new(AuthService::new(users.clone(), tokens)),
        guard: Arc::new(PermissionGuard::new(user_roles.clone())),
        data_scope: Arc::new(DataScopeResolver::new(
            users.clone(),
            user_roles.clone(),
            departments.clone(),
            role_departments.clone(),
        )),
        users: Arc::new(UserCommandHandler::new(
            users.clone(),
            roles.clone(),
            user_roles.clone(),
            uow_factory.clone(),
        )),
        roles: Arc::new(RoleCommandHandler::new(roles.clone(), user_roles)),
        role_assignments: Arc::new(RoleAssignmentHandler::new(
            roles,
            menus.clone(),
            permissions.clone(),
            departments.clone(),
            role_menus.clone(),
            role_permissions.clone(),
            role_departments,
            uow_factory,
        )),
        permissions: Arc::new(PermissionCommandHandler::new(permissions, role_permissions)),
        menus: Arc::new(MenuCommandHandler::new(menus, role_menus)),
        departments: Arc::new(DepartmentCommandHandler::new(departments, users)),
    })
}
