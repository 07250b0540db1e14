//! sqlx 错误映射

use cobalt_errors::AppError;

/// 将 sqlx 错误转换为 AppError
///
/// 唯一约束冲突映射为 Conflict，外键冲突同样视为业务冲突，
/// 其余归入数据库错误。
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::conflict("Duplicate value violates a unique constraint")
        }
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            AppError::conflict("Operation violates a referential constraint")
        }
        _ => AppError::database(e.to_string()),
    }
}
