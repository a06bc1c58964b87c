//! 数据库句柄模块
//!
//! 流式构建接口：累积方法同步返回 `&mut Self` 以便链式调用，
//! 终端操作异步执行并在之后（autoreset 开启时）清空子句状态。
//! 预期内的失败降级为状态变更加空结果 / `false`，不向调用方抛错。

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::clause::{
    ClauseSet, Direction, Filter, Join, JoinKind, Joiner, Membership, Ordering, RowWindow,
    Selection, DEFAULT_ROW_COUNT,
};
use crate::compile::{self, Statement, REGEXP_MARKER};
use crate::error::{DbError, Result};
use crate::pool::{DbDriver, DbPool};
use crate::row::Record;
use crate::settings::{Setting, Settings};
use crate::status::{Status, StatusCode};
use crate::utils;
use crate::value::BindValue;

/// 连接参数，等价于按 host / username / password / database 构造
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl DbConfig {
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            database: database.into(),
            port: 3306,
        }
    }

    fn url(&self) -> Result<String> {
        if self.host.is_empty() {
            return Err(DbError::MissingParameter("host"));
        }
        Ok(format!(
            "mysql://{}:{}@{}:{}/{}",
            self.username, self.password, self.host, self.port, self.database
        ))
    }
}

/// 原始查询的结果：读语句返回行集，写语句返回成功与否
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Rows(Vec<Record>),
    Done(bool),
}

impl QueryResult {
    /// 取出行集；写语句结果产出空集
    pub fn rows(self) -> Vec<Record> {
        match self {
            QueryResult::Rows(rows) => rows,
            QueryResult::Done(_) => Vec::new(),
        }
    }
}

/// 写语句的执行结果
struct WriteOutcome {
    rows_affected: u64,
    last_insert_id: u64,
}

/// 数据库句柄：连接池、累积中的子句状态、设置与连接状态
#[derive(Debug, Clone)]
pub struct Database {
    pool: Option<DbPool>,
    clauses: ClauseSet,
    settings: Settings,
    status: Status,
    last_query: String,
    last_insert_id: u64,
}

/// 把参数序列按变体逐个绑定到 sqlx 查询上
macro_rules! bind_params {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for param in $params {
            query = match param {
                BindValue::String(s) => query.bind(s),
                BindValue::Int(i) => query.bind(i),
                BindValue::Double(f) => query.bind(f),
                BindValue::Blob(b) => query.bind(b),
                BindValue::Null => query.bind(Option::<String>::None),
            };
        }
        query
    }};
}

impl Database {
    /// 按连接参数建立连接。参数不完整 ⇒ ConstructError，连接失败 ⇒ ConnectError；
    /// 两种情况都返回可用的句柄，操作会得到空结果，状态可供查询。
    pub async fn connect(config: &DbConfig) -> Self {
        match config.url() {
            Ok(url) => Self::connect_url(&url).await,
            Err(error) => {
                warn!(error = %error, "invalid construct parameters");
                Self::with_status(StatusCode::ConstructError)
            }
        }
    }

    /// 按数据库 URL 建立连接
    pub async fn connect_url(url: &str) -> Self {
        match DbPool::connect(url).await {
            Ok(pool) => Self::from_pool(pool),
            Err(error) => {
                warn!(error = %error, "database connect failed");
                Self::with_status(StatusCode::ConnectError)
            }
        }
    }

    /// 复用已有连接池
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            pool: Some(pool),
            clauses: ClauseSet::default(),
            settings: Settings::default(),
            status: Status::new(StatusCode::Ok),
            last_query: String::new(),
            last_insert_id: 0,
        }
    }

    fn with_status(code: StatusCode) -> Self {
        Self {
            pool: None,
            clauses: ClauseSet::default(),
            settings: Settings::default(),
            status: Status::new(code),
            last_query: String::new(),
            last_insert_id: 0,
        }
    }

    // ---------- 累积方法 ----------

    /// 追加投影列，接受逗号分隔的列名
    pub fn select(&mut self, columns: &str) -> &mut Self {
        for part in columns.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            self.clauses.selections.push(Selection {
                column: part.to_string(),
                alias: part.to_string(),
                table: None,
            });
        }
        self
    }

    /// 追加带别名的投影列。长度不一致时本次调用不产生任何投影项。
    pub fn select_as(&mut self, columns: &[&str], aliases: &[&str]) -> &mut Self {
        if columns.len() != aliases.len() {
            return self;
        }
        for (column, alias) in columns.iter().zip(aliases) {
            self.clauses.selections.push(Selection {
                column: column.to_string(),
                alias: alias.to_string(),
                table: None,
            });
        }
        self
    }

    /// 追加指定所属表的投影列，用于联表场景
    pub fn select_from(&mut self, columns: &[&str], table: &str) -> &mut Self {
        for column in columns {
            self.clauses.selections.push(Selection {
                column: column.to_string(),
                alias: column.to_string(),
                table: Some(table.to_string()),
            });
        }
        self
    }

    fn push_filter(
        &mut self,
        column: &str,
        value: BindValue,
        table: Option<&str>,
        joiner: Joiner,
    ) -> &mut Self {
        self.clauses.filters.push(Filter {
            column: column.to_string(),
            value,
            table: table.map(|t| t.to_string()),
            joiner,
        });
        self
    }

    /// 追加过滤条件，以 AND 接入。操作符由值形态推断：
    /// 前导 `>` `<` `>=` `<=` `=>` 紧跟数字 ⇒ 比较，前导 `%` ⇒ LIKE，其余 ⇒ 等值。
    pub fn where_(&mut self, column: &str, value: impl Into<BindValue>) -> &mut Self {
        self.push_filter(column, value.into(), None, Joiner::And)
    }

    /// 追加指定所属表的过滤条件，以 AND 接入
    pub fn where_on(
        &mut self,
        table: &str,
        column: &str,
        value: impl Into<BindValue>,
    ) -> &mut Self {
        self.push_filter(column, value.into(), Some(table), Joiner::And)
    }

    /// 追加过滤条件，以 OR 接入
    pub fn where_or(&mut self, column: &str, value: impl Into<BindValue>) -> &mut Self {
        self.push_filter(column, value.into(), None, Joiner::Or)
    }

    /// 追加指定所属表的过滤条件，以 OR 接入
    pub fn where_or_on(
        &mut self,
        table: &str,
        column: &str,
        value: impl Into<BindValue>,
    ) -> &mut Self {
        self.push_filter(column, value.into(), Some(table), Joiner::Or)
    }

    /// 追加 IN (...) 集合过滤。空集合不产生任何条件。
    pub fn where_in<V: Into<BindValue>>(&mut self, column: &str, values: Vec<V>) -> &mut Self {
        if values.is_empty() {
            return self;
        }
        self.clauses.memberships.push(Membership {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        });
        self
    }

    /// 追加 LIKE 过滤，片段两侧自动补 `%`
    pub fn like(&mut self, column: &str, fragment: &str) -> &mut Self {
        self.push_filter(
            column,
            BindValue::String(format!("%{fragment}")),
            None,
            Joiner::And,
        )
    }

    /// 追加指定所属表的 LIKE 过滤
    pub fn like_on(&mut self, table: &str, column: &str, fragment: &str) -> &mut Self {
        self.push_filter(
            column,
            BindValue::String(format!("%{fragment}")),
            Some(table),
            Joiner::And,
        )
    }

    fn regexp_pattern(pattern: &str) -> String {
        // 接受 /pattern/ 形式，剥去两侧分隔符
        let pattern = pattern
            .strip_prefix('/')
            .and_then(|p| p.strip_suffix('/'))
            .filter(|p| !p.is_empty())
            .unwrap_or(pattern);
        format!("{REGEXP_MARKER}{pattern}")
    }

    /// 追加 REGEXP 过滤。SQLite 驱动下编译出的谓词在执行时会报错，
    /// 可先用 [`DbDriver::supports_regexp`] 判断。
    pub fn regexp(&mut self, column: &str, pattern: &str) -> &mut Self {
        self.push_filter(
            column,
            BindValue::String(Self::regexp_pattern(pattern)),
            None,
            Joiner::And,
        )
    }

    /// 追加指定所属表的 REGEXP 过滤
    pub fn regexp_on(&mut self, table: &str, column: &str, pattern: &str) -> &mut Self {
        self.push_filter(
            column,
            BindValue::String(Self::regexp_pattern(pattern)),
            Some(table),
            Joiner::And,
        )
    }

    fn push_order(&mut self, column: &str, direction: &str, table: Option<&str>) -> &mut Self {
        // 只接受 ASC / DESC，其余输入静默丢弃
        if let Some(direction) = Direction::parse(direction) {
            self.clauses.orderings.push(Ordering {
                column: column.to_string(),
                direction,
                table: table.map(|t| t.to_string()),
            });
        }
        self
    }

    /// 追加排序项，direction 取 "ASC" 或 "DESC"
    pub fn order(&mut self, column: &str, direction: &str) -> &mut Self {
        self.push_order(column, direction, None)
    }

    /// 追加指定所属表的排序项
    pub fn order_on(&mut self, table: &str, column: &str, direction: &str) -> &mut Self {
        self.push_order(column, direction, Some(table))
    }

    /// `order` 的别名
    pub fn sort(&mut self, column: &str, direction: &str) -> &mut Self {
        self.push_order(column, direction, None)
    }

    /// 设置行窗口：LIMIT offset, count
    pub fn limit(&mut self, offset: u64, count: u64) -> &mut Self {
        self.clauses.window = Some(RowWindow { offset, count });
        self
    }

    /// 设置约定的默认行窗口（前 [`DEFAULT_ROW_COUNT`] 行）
    pub fn limit_default(&mut self) -> &mut Self {
        self.limit(0, DEFAULT_ROW_COUNT)
    }

    /// 追加 INNER JOIN：ON (<联入表>.<join_column> = <目标表>.<base_column>)
    pub fn join(&mut self, table: &str, join_column: &str, base_column: &str) -> &mut Self {
        self.join_with(JoinKind::Inner, table, join_column, base_column)
    }

    /// 追加指定方式的联表
    pub fn join_with(
        &mut self,
        kind: JoinKind,
        table: &str,
        join_column: &str,
        base_column: &str,
    ) -> &mut Self {
        self.clauses.joins.push(Join {
            table: table.to_string(),
            join_column: join_column.to_string(),
            base_column: base_column.to_string(),
            kind,
        });
        self
    }

    // ---------- 终端操作 ----------

    /// 按累积的子句读取行集。失败时返回空集并把状态置为 QueryError。
    pub async fn get(&mut self, table: &str) -> Vec<Record> {
        self.clauses.table = Some(table.to_string());
        let stmt = compile::select(&self.clauses, &self.settings);
        self.finish(&stmt);
        match self.fetch_rows(stmt).await {
            Ok(rows) => rows,
            Err(error) => {
                self.fail(error);
                Vec::new()
            }
        }
    }

    /// 按累积的过滤与联表统计行数，忽略排序与窗口
    pub async fn get_total(&mut self, table: &str) -> i64 {
        self.clauses.table = Some(table.to_string());
        let stmt = compile::total(&self.clauses, &self.settings);
        self.finish(&stmt);
        match self.fetch_rows(stmt).await {
            Ok(rows) => rows
                .first()
                .and_then(|row| row.get("total"))
                .and_then(Value::as_i64)
                .unwrap_or(0),
            Err(error) => {
                self.fail(error);
                0
            }
        }
    }

    /// 插入一行。cleanNull 开启时先丢弃值为 null 的键；
    /// 成功且产生自增主键时记录到 [`Database::insert_id`]。
    pub async fn insert(&mut self, table: &str, mut data: Record) -> bool {
        if self.settings.clean_null {
            utils::clean_null(&mut data);
        }
        let stmt = compile::insert(table, &data, &self.settings);
        self.finish(&stmt);
        match self.execute_write(stmt).await {
            Ok(outcome) => {
                if outcome.last_insert_id != 0 {
                    self.last_insert_id = outcome.last_insert_id;
                }
                true
            }
            Err(error) => {
                self.fail(error);
                false
            }
        }
    }

    /// 按累积的过滤更新行。没有任何过滤会更新整表。
    /// 字面量路径下按影响行数判定成败，预处理路径下执行成功即为 true。
    pub async fn update(&mut self, table: &str, mut data: Record) -> bool {
        if self.settings.clean_null {
            utils::clean_null(&mut data);
        }
        let prepared = self.settings.prepare;
        let stmt = compile::update(table, &data, &self.clauses, &self.settings);
        self.finish(&stmt);
        match self.execute_write(stmt).await {
            Ok(outcome) => prepared || outcome.rows_affected > 0,
            Err(error) => {
                self.fail(error);
                false
            }
        }
    }

    /// 按累积的过滤删除行。没有任何过滤会清空整表。
    pub async fn delete(&mut self, table: &str) -> bool {
        self.clauses.table = Some(table.to_string());
        let stmt = compile::delete(&self.clauses, &self.settings);
        self.finish(&stmt);
        match self.execute_write(stmt).await {
            Ok(_) => true,
            Err(error) => {
                self.fail(error);
                false
            }
        }
    }

    /// 执行原始 SQL。SELECT / SHOW 开头的语句返回行集，其余返回成功与否。
    pub async fn query(&mut self, sql: &str, params: Vec<BindValue>) -> QueryResult {
        let stmt = Statement::raw(sql, params);
        self.finish(&stmt);
        if is_read_statement(sql) {
            match self.fetch_rows(stmt).await {
                Ok(rows) => QueryResult::Rows(rows),
                Err(error) => {
                    self.fail(error);
                    QueryResult::Rows(Vec::new())
                }
            }
        } else {
            match self.execute_write(stmt).await {
                Ok(outcome) => {
                    if outcome.last_insert_id != 0 {
                        self.last_insert_id = outcome.last_insert_id;
                    }
                    QueryResult::Done(true)
                }
                Err(error) => {
                    self.fail(error);
                    QueryResult::Done(false)
                }
            }
        }
    }

    /// 取单个常量 / SQL 表达式的值，例如 `get_value("NOW()")`。
    /// 返回单行单列的行，列名由驱动决定。
    pub async fn get_value(&mut self, value: &str) -> Option<Record> {
        let stmt = Statement::raw(compile::value_select(value), Vec::new());
        self.finish(&stmt);
        match self.fetch_rows(stmt).await {
            Ok(mut rows) => {
                if rows.is_empty() {
                    None
                } else {
                    Some(rows.remove(0))
                }
            }
            Err(error) => {
                self.fail(error);
                None
            }
        }
    }

    // ---------- 执行 ----------

    fn finish(&mut self, stmt: &Statement) {
        debug!(sql = %stmt.sql, params = stmt.params.len(), "executing statement");
        self.last_query = stmt.sql.clone();
        self.reset(true);
    }

    /// 查询失败：记录日志并把状态置为 QueryError（携带驱动诊断文本）。
    /// 连接期失败已经记录在状态里，不再覆盖。
    fn fail(&mut self, error: DbError) {
        warn!(error = %error, "statement execution failed");
        if !matches!(error, DbError::NoPoolAvailable) {
            self.status = Status::query_error(error.to_string());
        }
    }

    async fn fetch_rows(&self, stmt: Statement) -> Result<Vec<Record>> {
        let pool = self.pool.as_ref().ok_or(DbError::NoPoolAvailable)?;
        let Statement { sql, params } = stmt;
        match pool.driver() {
            #[cfg(feature = "mysql")]
            DbDriver::MySql => {
                let pool = pool.mysql_pool().ok_or(DbError::NoPoolAvailable)?;
                let query = bind_params!(sqlx::query(&sql), params);
                let rows = query.fetch_all(pool).await?;
                Ok(rows.iter().map(crate::row::from_mysql_row).collect())
            }
            #[cfg(feature = "sqlite")]
            DbDriver::Sqlite => {
                let pool = pool.sqlite_pool().ok_or(DbError::NoPoolAvailable)?;
                let query = bind_params!(sqlx::query(&sql), params);
                let rows = query.fetch_all(pool).await?;
                Ok(rows.iter().map(crate::row::from_sqlite_row).collect())
            }
            #[allow(unreachable_patterns)]
            _ => Err(DbError::NoPoolAvailable),
        }
    }

    async fn execute_write(&self, stmt: Statement) -> Result<WriteOutcome> {
        let pool = self.pool.as_ref().ok_or(DbError::NoPoolAvailable)?;
        let Statement { sql, params } = stmt;
        match pool.driver() {
            #[cfg(feature = "mysql")]
            DbDriver::MySql => {
                let pool = pool.mysql_pool().ok_or(DbError::NoPoolAvailable)?;
                let query = bind_params!(sqlx::query(&sql), params);
                let result = query.execute(pool).await?;
                Ok(WriteOutcome {
                    rows_affected: result.rows_affected(),
                    last_insert_id: result.last_insert_id(),
                })
            }
            #[cfg(feature = "sqlite")]
            DbDriver::Sqlite => {
                let pool = pool.sqlite_pool().ok_or(DbError::NoPoolAvailable)?;
                let query = bind_params!(sqlx::query(&sql), params);
                let result = query.execute(pool).await?;
                Ok(WriteOutcome {
                    rows_affected: result.rows_affected(),
                    last_insert_id: result.last_insert_rowid() as u64,
                })
            }
            #[allow(unreachable_patterns)]
            _ => Err(DbError::NoPoolAvailable),
        }
    }

    // ---------- 状态与设置 ----------

    /// 清空子句状态。auto 为 true 时受 autoreset 设置约束，
    /// 为 false 时无条件清空（手动重置）。
    pub fn reset(&mut self, auto: bool) {
        if !auto || self.settings.autoreset {
            self.clauses.clear();
        }
    }

    pub fn setting(&self, key: Setting) -> bool {
        self.settings.get(key)
    }

    pub fn set_setting(&mut self, key: Setting, value: bool) -> &mut Self {
        self.settings.set(key, value);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn driver(&self) -> Option<DbDriver> {
        self.pool.as_ref().map(DbPool::driver)
    }

    /// 最近一次成功 insert 产生的自增主键
    pub fn insert_id(&self) -> u64 {
        self.last_insert_id
    }

    /// 最近一次编译 / 执行的 SQL 文本
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    /// 字面量字符串转义，等价于 mysqli 的 real_escape_string
    pub fn escape(value: &str) -> String {
        utils::escape_str(value)
    }

    /// 丢弃映射中值为 null 的键
    pub fn clean_null(data: &mut Record) {
        utils::clean_null(data);
    }

    /// 关闭底层连接池。仅在状态为 OK 时真正关闭。
    pub async fn close(self) {
        if self.status.is_ok() {
            if let Some(pool) = self.pool {
                pool.close().await;
            }
        }
    }
}

fn is_read_statement(sql: &str) -> bool {
    let head = sql.trim_start().trim_start_matches('(').trim_start();
    let word: String = head
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    matches!(word.to_ascii_uppercase().as_str(), "SELECT" | "SHOW")
}
