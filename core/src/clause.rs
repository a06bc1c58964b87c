//! 子句状态模块
//!
//! 一条待编译语句的全部累积描述。每次终端操作后从空重建（autoreset 关闭时除外）。

use crate::value::BindValue;

/// `limit` 约定的默认行数上限。
/// 仅当调用方显式调用 `limit` 时生效；从未调用 `limit` 的读语句不加上限。
pub const DEFAULT_ROW_COUNT: u64 = 1000;

/// 过滤条件与前一条的连接方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Joiner {
    And,
    Or,
}

impl Joiner {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
        }
    }
}

/// 联表方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
}

impl JoinKind {
    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER",
            JoinKind::Left => "LEFT",
            JoinKind::Right => "RIGHT",
            JoinKind::Outer => "OUTER",
        }
    }
}

/// 排序方向，只接受 ASC / DESC（其余输入被静默丢弃）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub(crate) fn parse(direction: &str) -> Option<Self> {
        match direction {
            "ASC" => Some(Direction::Asc),
            "DESC" => Some(Direction::Desc),
            _ => None,
        }
    }

    pub(crate) fn as_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// 一个投影项：(源列, 别名, 所属表)
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Selection {
    pub column: String,
    pub alias: String,
    pub table: Option<String>,
}

/// 一个标量过滤条件；操作符在编译期由值的形态推断
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Filter {
    pub column: String,
    pub value: BindValue,
    pub table: Option<String>,
    pub joiner: Joiner,
}

/// 一个 IN (...) 集合过滤条件
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Membership {
    pub column: String,
    pub values: Vec<BindValue>,
}

/// 一个联表描述：(联入表, 联入列, 基表列, 方式)
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Join {
    pub table: String,
    pub join_column: String,
    pub base_column: String,
    pub kind: JoinKind,
}

/// 一个排序项
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Ordering {
    pub column: String,
    pub direction: Direction,
    pub table: Option<String>,
}

/// 行窗口：LIMIT offset, count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RowWindow {
    pub offset: u64,
    pub count: u64,
}

/// 一条待编译语句的累积子句集合
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ClauseSet {
    pub table: Option<String>,
    pub selections: Vec<Selection>,
    pub filters: Vec<Filter>,
    pub memberships: Vec<Membership>,
    pub joins: Vec<Join>,
    pub orderings: Vec<Ordering>,
    pub window: Option<RowWindow>,
}

impl ClauseSet {
    /// 恢复到全空状态
    pub fn clear(&mut self) {
        *self = ClauseSet::default();
    }
}
