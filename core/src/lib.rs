//! # fluentsql
//!
//! 基于 sqlx 的流式 SQL 构建与执行库。
//!
//! ## 功能特性
//!
//! - 流式累积接口：`select` / `where_` / `like` / `order` / `limit` / `join` 链式调用
//! - 操作符由值形态推断：前导比较符号、`%` 片段（LIKE）、正则哨兵（REGEXP）
//! - 预处理与字面量双执行路径，按 `Setting::Prepare` 切换
//! - 失败降级为状态码（兼容 0 / 1 / 2 / 3 / 9 约定），不向调用方抛错
//! - 结果行为保持列序的 JSON 映射，形状按语句从列元数据发现
//!
//! ## 快速开始
//!
//! ```rust,no_run
//! use fluentsql::{Database, DbConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = DbConfig::new("localhost", "root", "password", "mydb");
//!     let mut db = Database::connect(&config).await;
//!
//!     let rows = db
//!         .where_("city", "NYC")
//!         .where_("age", ">30")
//!         .order("name", "ASC")
//!         .limit(0, 10)
//!         .get("customers")
//!         .await;
//!
//!     if rows.is_empty() && !db.status().is_ok() {
//!         eprintln!("query failed: {}", db.status().text());
//!     }
//! }
//! ```

mod clause;
mod compile;

pub mod database;
pub mod error;
pub mod pool;
pub mod reserved;
pub mod row;
pub mod settings;
pub mod status;
pub mod utils;
pub mod value;

pub use clause::{JoinKind, DEFAULT_ROW_COUNT};
pub use database::{Database, DbConfig, QueryResult};
pub use error::{DbError, Result};
pub use pool::{DbDriver, DbPool};
pub use reserved::sql_const;
pub use row::Record;
pub use settings::{Setting, Settings};
pub use status::{Status, StatusCode};
pub use value::BindValue;
