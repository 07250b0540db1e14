//! 密码值对象

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use cobalt_errors::{AppError, AppResult};

/// 哈希后的密码
///
/// 不参与序列化，公开视图永远不携带。
#[derive(Debug, Clone)]
pub struct HashedPassword(String);

impl HashedPassword {
    /// 从明文密码创建哈希密码
    pub fn from_plain(password: &str) -> AppResult<Self> {
        validate_password(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

        Ok(Self(hash.to_string()))
    }

    /// 从已有的哈希值创建
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// 验证密码
    pub fn verify(&self, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&self.0)
            .map_err(|e| AppError::internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < 6 {
        return Err(AppError::validation("Password must be at least 6 characters"));
    }

    if password.len() > 128 {
        return Err(AppError::validation("Password must be at most 128 characters"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = HashedPassword::from_plain("s3cret-pw").unwrap();

        assert!(hashed.verify("s3cret-pw").unwrap());
        assert!(!hashed.verify("wrong-pw").unwrap());
    }

    #[test]
    fn test_rejects_short_password() {
        let err = HashedPassword::from_plain("12345").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
