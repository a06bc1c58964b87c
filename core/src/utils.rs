//! 工具函数模块

use serde_json::Value;

use crate::row::Record;

/// 转义 SQL 标识符（MySQL / SQLite 均接受反引号）
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name)
}

/// 字面量字符串转义，等价于 mysqli 的 real_escape_string
pub fn escape_str(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{1a}' => out.push_str("\\Z"),
            _ => out.push(c),
        }
    }
    out
}

/// 递归去除空白：深入映射和数组，对叶子字符串做 trim
pub fn trim_value(data: &mut Value) {
    match data {
        Value::String(s) => {
            *s = s.trim().to_string();
        }
        Value::Array(items) => {
            for item in items {
                trim_value(item);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                trim_value(item);
            }
        }
        _ => {}
    }
}

/// 递归转义：深入映射和数组，对叶子字符串做字面量转义
pub fn escape_value(data: &mut Value) {
    match data {
        Value::String(s) => {
            *s = escape_str(s);
        }
        Value::Array(items) => {
            for item in items {
                escape_value(item);
            }
        }
        Value::Object(map) => {
            for (_, item) in map.iter_mut() {
                escape_value(item);
            }
        }
        _ => {}
    }
}

/// 丢弃映射中值为 null 的键
pub fn clean_null(data: &mut Record) {
    data.retain(|_, value| !value.is_null());
}

/// 数字字符串检测与收窄：仅接受无前导零的十进制非负整数
pub fn coerce_number(value: &str) -> Option<i64> {
    if value == "0" {
        return Some(0);
    }
    if value.is_empty() || value.starts_with('0') {
        return None;
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}
