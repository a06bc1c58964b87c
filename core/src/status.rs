//! 连接状态模块
//!
//! 预期内的失败不抛出错误，而是降级为一次状态变更加上空结果 / `false` 返回值，
//! 由调用方在结果看起来为空时检查状态。

/// 状态码。
/// 0 = OK / 一切正常
/// 1 = 数据库连接错误
/// 2 = 构造参数不正确
/// 3 = 查询错误（带驱动的诊断文本）
/// 9 = 未知错误
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    ConnectError,
    ConstructError,
    QueryError,
    Unknown,
}

impl StatusCode {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => StatusCode::Ok,
            1 => StatusCode::ConnectError,
            2 => StatusCode::ConstructError,
            3 => StatusCode::QueryError,
            _ => StatusCode::Unknown,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            StatusCode::Ok => 0,
            StatusCode::ConnectError => 1,
            StatusCode::ConstructError => 2,
            StatusCode::QueryError => 3,
            StatusCode::Unknown => 9,
        }
    }

    fn default_text(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::ConnectError => "Database connect error",
            StatusCode::ConstructError => "Construct parameters are incorrect",
            StatusCode::QueryError => "Query error",
            StatusCode::Unknown => "Unknown error",
        }
    }
}

/// 当前连接状态：构造时设置一次（OK / ConnectError / ConstructError），
/// 任何 prepare / execute 失败时变更为 QueryError，其余情况保持不变。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    code: StatusCode,
    text: String,
}

impl Status {
    pub(crate) fn new(code: StatusCode) -> Self {
        Self {
            code,
            text: code.default_text().to_string(),
        }
    }

    /// 查询错误，携带驱动返回的诊断文本
    pub(crate) fn query_error(text: impl Into<String>) -> Self {
        Self {
            code: StatusCode::QueryError,
            text: text.into(),
        }
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_roundtrip() {
        assert_eq!(StatusCode::from_code(0), StatusCode::Ok);
        assert_eq!(StatusCode::from_code(1), StatusCode::ConnectError);
        assert_eq!(StatusCode::from_code(2), StatusCode::ConstructError);
        assert_eq!(StatusCode::from_code(3), StatusCode::QueryError);
        assert_eq!(StatusCode::from_code(42), StatusCode::Unknown);
        assert_eq!(StatusCode::Unknown.code(), 9);
    }

    #[test]
    fn test_query_error_keeps_driver_text() {
        let status = Status::query_error("no such table: missing");
        assert_eq!(status.code(), StatusCode::QueryError);
        assert_eq!(status.text(), "no such table: missing");
        assert!(!status.is_ok());
    }
}
