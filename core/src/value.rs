//! 绑定值模块
//!
//! 绑定值的变体即参数类型标签：null / 字符串 ⇒ string，整数 ⇒ integer，
//! 二进制 ⇒ blob，浮点 ⇒ double。占位符序列与参数序列必须一一对应。

use serde_json::Value;

use crate::settings::Settings;
use crate::utils;

/// 绑定值，用于安全地传递参数
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    String(String),
    Int(i64),
    Double(f64),
    Blob(Vec<u8>),
    Null,
}

impl BindValue {
    /// mysqli 风格的参数类型标签（s / i / b / d）
    pub fn type_tag(&self) -> char {
        match self {
            BindValue::Null | BindValue::String(_) => 's',
            BindValue::Int(_) => 'i',
            BindValue::Blob(_) => 'b',
            BindValue::Double(_) => 'd',
        }
    }

    /// 从 JSON 值转换，用于 insert / update 映射
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => BindValue::Null,
            Value::Bool(b) => BindValue::Int(i64::from(*b)),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    BindValue::Int(i)
                } else {
                    BindValue::Double(n.as_f64().unwrap_or_default())
                }
            }
            Value::String(s) => BindValue::String(s.clone()),
            // 数组 / 对象按其 JSON 文本存储
            other => BindValue::String(other.to_string()),
        }
    }

    /// 按设置去除字符串两端空白
    pub(crate) fn trimmed(self, settings: &Settings) -> Self {
        match self {
            BindValue::String(s) if settings.trim => BindValue::String(s.trim().to_string()),
            other => other,
        }
    }

    /// 渲染为字面量 SQL 片段（非预处理路径使用）
    pub(crate) fn to_literal(&self, settings: &Settings) -> String {
        match self {
            BindValue::String(s) => {
                let mut s = if settings.trim { s.trim().to_string() } else { s.clone() };
                if settings.escape {
                    s = utils::escape_str(&s);
                }
                format!("'{}'", s)
            }
            BindValue::Int(i) => i.to_string(),
            BindValue::Double(f) => f.to_string(),
            BindValue::Blob(b) => {
                let mut hex = String::with_capacity(b.len() * 2);
                for byte in b {
                    hex.push_str(&format!("{:02X}", byte));
                }
                format!("X'{}'", hex)
            }
            BindValue::Null => "NULL".to_string(),
        }
    }
}

impl From<String> for BindValue {
    fn from(s: String) -> Self {
        BindValue::String(s)
    }
}

impl From<&str> for BindValue {
    fn from(s: &str) -> Self {
        BindValue::String(s.to_string())
    }
}

impl From<i64> for BindValue {
    fn from(i: i64) -> Self {
        BindValue::Int(i)
    }
}

impl From<i32> for BindValue {
    fn from(i: i32) -> Self {
        BindValue::Int(i64::from(i))
    }
}

impl From<i16> for BindValue {
    fn from(i: i16) -> Self {
        BindValue::Int(i64::from(i))
    }
}

impl From<u32> for BindValue {
    fn from(i: u32) -> Self {
        BindValue::Int(i64::from(i))
    }
}

impl From<f64> for BindValue {
    fn from(f: f64) -> Self {
        BindValue::Double(f)
    }
}

impl From<f32> for BindValue {
    fn from(f: f32) -> Self {
        BindValue::Double(f64::from(f))
    }
}

impl From<bool> for BindValue {
    fn from(b: bool) -> Self {
        BindValue::Int(i64::from(b))
    }
}

impl From<Vec<u8>> for BindValue {
    fn from(b: Vec<u8>) -> Self {
        BindValue::Blob(b)
    }
}

impl From<&[u8]> for BindValue {
    fn from(b: &[u8]) -> Self {
        BindValue::Blob(b.to_vec())
    }
}

impl<T: Into<BindValue>> From<Option<T>> for BindValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => BindValue::Null,
        }
    }
}
