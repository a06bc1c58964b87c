//! 连接池模块
//!
//! 构建器生成的是 MySQL 系方言（反引号标识符、`LIMIT offset, count`、`REGEXP`），
//! SQLite 接受同样的表层语法，因此保留这两种驱动。

#[cfg(any(feature = "mysql", feature = "sqlite"))]
use sqlx::Pool;
use std::sync::Arc;

use crate::error::{DbError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbDriver {
    MySql,
    Sqlite,
}

impl DbDriver {
    pub fn from_url(url: &str) -> Result<Self> {
        if url.starts_with("mysql://") || url.starts_with("mariadb://") {
            Ok(DbDriver::MySql)
        } else if url.starts_with("sqlite://") || url.starts_with("sqlite:") {
            Ok(DbDriver::Sqlite)
        } else {
            Err(DbError::UnsupportedDatabase(url.to_string()))
        }
    }

    /// SQLite 没有原生 REGEXP 函数，编译出的 REGEXP 谓词会在执行时报错
    pub fn supports_regexp(&self) -> bool {
        matches!(self, DbDriver::MySql)
    }
}

#[derive(Debug, Clone)]
pub struct DbPool {
    driver: DbDriver,
    #[cfg(feature = "mysql")]
    mysql: Option<Arc<Pool<sqlx::MySql>>>,
    #[cfg(feature = "sqlite")]
    sqlite: Option<Arc<Pool<sqlx::Sqlite>>>,
}

impl DbPool {
    /// 从数据库 URL 连接并创建 DbPool
    pub async fn connect(url: &str) -> Result<Self> {
        let driver = DbDriver::from_url(url)?;

        match driver {
            #[cfg(feature = "mysql")]
            DbDriver::MySql => {
                let pool = Pool::<sqlx::MySql>::connect(url).await?;
                Ok(Self::from_mysql_pool(Arc::new(pool)))
            }
            #[cfg(feature = "sqlite")]
            DbDriver::Sqlite => {
                let pool = Pool::<sqlx::Sqlite>::connect(url).await?;
                Ok(Self::from_sqlite_pool(Arc::new(pool)))
            }
            #[allow(unreachable_patterns)]
            _ => Err(DbError::UnsupportedDatabase(format!(
                "Driver feature is not enabled for: {:?}",
                driver
            ))),
        }
    }

    /// 从 MySQL Pool 创建 DbPool
    #[cfg(feature = "mysql")]
    pub fn from_mysql_pool(pool: Arc<Pool<sqlx::MySql>>) -> Self {
        Self {
            driver: DbDriver::MySql,
            mysql: Some(pool),
            #[cfg(feature = "sqlite")]
            sqlite: None,
        }
    }

    /// 从 SQLite Pool 创建 DbPool
    #[cfg(feature = "sqlite")]
    pub fn from_sqlite_pool(pool: Arc<Pool<sqlx::Sqlite>>) -> Self {
        Self {
            driver: DbDriver::Sqlite,
            #[cfg(feature = "mysql")]
            mysql: None,
            sqlite: Some(pool),
        }
    }

    pub fn driver(&self) -> DbDriver {
        self.driver
    }

    #[cfg(feature = "mysql")]
    pub fn mysql_pool(&self) -> Option<&Pool<sqlx::MySql>> {
        self.mysql.as_deref()
    }

    #[cfg(feature = "sqlite")]
    pub fn sqlite_pool(&self) -> Option<&Pool<sqlx::Sqlite>> {
        self.sqlite.as_deref()
    }

    /// 关闭底层连接池
    pub async fn close(&self) {
        match self.driver {
            #[cfg(feature = "mysql")]
            DbDriver::MySql => {
                if let Some(pool) = self.mysql.as_deref() {
                    pool.close().await;
                }
            }
            #[cfg(feature = "sqlite")]
            DbDriver::Sqlite => {
                if let Some(pool) = self.sqlite.as_deref() {
                    pool.close().await;
                }
            }
            #[allow(unreachable_patterns)]
            _ => {}
        }
    }
}
