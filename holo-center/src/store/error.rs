//! 持久化错误.

use thiserror::Error;

/// 读写中心点表时的错误.
#[derive(Debug, Error)]
pub enum StoreError {
    /// 项目名不是合法的 SQL 标识符, 不能用来拼接表名.
    #[error("project name `{0}` is not a valid table prefix")]
    InvalidProject(String),

    /// SQLite 错误.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// 无法创建数据库文件所在目录.
    #[error("unable to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

/// 持久化操作结果.
pub type StoreResult<T> = Result<T, StoreError>;
