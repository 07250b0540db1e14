//! 操作权限注册表
//!
//! 每个受保护操作所需的权限编码在此静态声明，
//! 守卫按操作名查表，未登记的操作不设权限要求。

/// 查询操作所需的权限编码集合
pub fn required_permissions(operation: &str) -> &'static [&'static str] {
    match operation {
        "user.create" => &["user:create"],
        "user.read" => &["user:read"],
        "user.update" => &["user:update"],
        "user.delete" => &["user:delete"],
        "user.assign_roles" => &["user:assign"],

        "role.create" => &["role:create"],
        "role.read" => &["role:read"],
        "role.update" => &["role:update"],
        "role.delete" => &["role:delete"],
        "role.assign_menus" => &["role:assign"],
        "role.assign_permissions" => &["role:assign"],
        "role.set_data_scope" => &["role:assign"],

        "permission.create" => &["permission:create"],
        "permission.read" => &["permission:read"],
        "permission.update" => &["permission:update"],
        "permission.delete" => &["permission:delete"],

        "menu.create" => &["menu:create"],
        "menu.read" => &["menu:read"],
        "menu.update" => &["menu:update"],
        "menu.delete" => &["menu:delete"],

        "department.create" => &["department:create"],
        "department.read" => &["department:read"],
        "department.update" => &["department:update"],
        "department.delete" => &["department:delete"],

        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_operation_has_codes() {
        assert_eq!(required_permissions("role.assign_menus"), &["role:assign"]);
    }

    #[test]
    fn test_unregistered_operation_is_unguarded() {
        assert!(required_permissions("auth.login").is_empty());
    }
}
