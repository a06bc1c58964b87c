//! 保留字表模块
//!
//! insert / update 的字符串值若命中此表（或带哨兵标记），将作为原始 SQL 令牌
//! 原样输出，不加引号也不转义。这是静态配置数据，不在运行时推导。

/// 视为原始 SQL 令牌的保留字 / 函数调用
const RESERVED_TOKENS: &[&str] = &[
    "NULL",
    "TRUE",
    "FALSE",
    "DEFAULT",
    "NOW()",
    "CURRENT_TIMESTAMP",
    "CURRENT_TIMESTAMP()",
    "CURRENT_DATE",
    "CURRENT_DATE()",
    "CURRENT_TIME",
    "CURRENT_TIME()",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "UTC_TIMESTAMP()",
    "UTC_DATE()",
    "UTC_TIME()",
    "UUID()",
    "RAND()",
    "LAST_INSERT_ID()",
];

const SENTINEL_PREFIX: &str = "SQL_CONST_";
const SENTINEL_SUFFIX: &str = "_SQL_CONST";

/// 将任意表达式包装为原始令牌哨兵，编译时原样输出。
/// 对不在保留字表里的表达式使用，例如 `sql_const("UNIX_TIMESTAMP(created)")`。
pub fn sql_const(token: &str) -> String {
    format!("{SENTINEL_PREFIX}{token}{SENTINEL_SUFFIX}")
}

/// 若该值应作为原始 SQL 令牌输出，返回令牌文本
pub(crate) fn as_raw_token(value: &str) -> Option<&str> {
    if let Some(inner) = value
        .strip_prefix(SENTINEL_PREFIX)
        .and_then(|rest| rest.strip_suffix(SENTINEL_SUFFIX))
    {
        if !inner.is_empty() {
            return Some(inner);
        }
    }
    if RESERVED_TOKENS
        .iter()
        .any(|token| value.eq_ignore_ascii_case(token))
    {
        return Some(value);
    }
    None
}
