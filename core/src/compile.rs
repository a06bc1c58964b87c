//! SQL 编译模块
//!
//! 对子句集合快照的纯函数：同样的快照与设置永远产出同样的 SQL 文本和参数序列，
//! 且不修改快照本身。预处理路径输出 `?` 占位符并按出现顺序收集参数；
//! 字面量路径按 trim / escape 设置把值直接内插进文本。

use crate::clause::{ClauseSet, Filter, Joiner};
use crate::reserved;
use crate::row::Record;
use crate::settings::Settings;
use crate::utils::quote_ident;
use crate::value::BindValue;
use serde_json::Value;

/// 编译产物：SQL 文本加按占位符顺序排列的参数
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Statement {
    pub sql: String,
    pub params: Vec<BindValue>,
}

impl Statement {
    pub(crate) fn raw(sql: impl Into<String>, params: Vec<BindValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// 比较操作符，由值的形态推断
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operator {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    Like,
    Regexp,
}

impl Operator {
    fn as_sql(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Like => "LIKE",
            Operator::Regexp => "REGEXP",
        }
    }
}

/// REGEXP 哨兵前缀，由 regexp 累积方法写入
pub(crate) const REGEXP_MARKER: &str = "^@";

/// 比较符号前缀（`>` `<` `<=` `=>`），要求紧跟数字。
/// `=>` 规范化为 SQL 的 `>=`；`>=` 本身不是识别的前缀，按等值处理。
fn comparison_prefix(value: &str) -> Option<(Operator, &str)> {
    const SYMBOLS: [(&str, Operator); 4] = [
        ("=>", Operator::Ge),
        ("<=", Operator::Le),
        (">", Operator::Gt),
        ("<", Operator::Lt),
    ];
    for (symbol, op) in SYMBOLS {
        if let Some(rest) = value.strip_prefix(symbol) {
            if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                return Some((op, rest));
            }
        }
    }
    None
}

/// 值形态到操作符的推断：
/// 前导比较符号 ⇒ 对应比较；前导 `%` ⇒ LIKE（编译时补尾部 `%`）；
/// 前导哨兵 ⇒ REGEXP（剥去哨兵）；其余 ⇒ 等值比较
fn classify(value: BindValue) -> (Operator, BindValue) {
    if let BindValue::String(s) = &value {
        if let Some((op, rest)) = comparison_prefix(s) {
            return (op, BindValue::String(rest.to_string()));
        }
        if s.starts_with('%') && s.len() > 1 {
            return (Operator::Like, BindValue::String(format!("{s}%")));
        }
        if let Some(pattern) = s.strip_prefix(REGEXP_MARKER) {
            if !pattern.is_empty() {
                return (Operator::Regexp, BindValue::String(pattern.to_string()));
            }
        }
    }
    (Operator::Eq, value)
}

/// 过滤列的限定规则：有联表且记录了所属表 ⇒ 按所属表限定；
/// 有联表但未记录 ⇒ 按目标表限定；无联表 ⇒ 不限定
fn filter_column(filter: &Filter, table: &str, has_join: bool) -> String {
    match (&filter.table, has_join) {
        (Some(owner), true) => format!("{}.{}", quote_ident(owner), quote_ident(&filter.column)),
        (None, true) => format!("{}.{}", quote_ident(table), quote_ident(&filter.column)),
        _ => quote_ident(&filter.column),
    }
}

fn build_select_list(clauses: &ClauseSet, table: &str) -> String {
    if clauses.selections.is_empty() {
        return "*".to_string();
    }

    let joined: Vec<&str> = clauses.joins.iter().map(|j| j.table.as_str()).collect();
    let has_join = !clauses.joins.is_empty();
    let mut parts = Vec::new();

    for selection in &clauses.selections {
        // 通配符不加引号
        let column = if selection.column == "*" {
            "*".to_string()
        } else {
            quote_ident(&selection.column)
        };

        if !has_join {
            if selection.alias == selection.column {
                parts.push(column);
            } else {
                parts.push(format!("{} AS '{}'", column, selection.alias));
            }
            continue;
        }

        match &selection.table {
            Some(owner) => {
                let qualifier = if joined.contains(&owner.as_str()) {
                    owner.as_str()
                } else if owner == table {
                    table
                } else {
                    // 所属表既不是联入表也不是目标表：忽略该项
                    continue;
                };
                if selection.alias == selection.column {
                    parts.push(format!("{}.{}", quote_ident(qualifier), column));
                } else {
                    parts.push(format!(
                        "{}.{} AS '{}'",
                        quote_ident(qualifier),
                        column,
                        selection.alias
                    ));
                }
            }
            None => {
                if selection.alias == selection.column || selection.alias == table {
                    parts.push(format!("{}.{}", quote_ident(table), column));
                } else if joined.contains(&selection.alias.as_str()) {
                    // 别名命中联入表名时按所属表处理
                    parts.push(format!("{}.{}", quote_ident(&selection.alias), column));
                } else {
                    parts.push(format!(
                        "{}.{} AS '{}'",
                        quote_ident(table),
                        column,
                        selection.alias
                    ));
                }
            }
        }
    }

    if parts.is_empty() {
        return "*".to_string();
    }
    parts.join(", ")
}

fn build_join(clauses: &ClauseSet, table: &str) -> Option<String> {
    if clauses.joins.is_empty() {
        return None;
    }
    let parts: Vec<String> = clauses
        .joins
        .iter()
        .map(|join| {
            format!(
                "{} JOIN {} ON ({}.{} = {}.{})",
                join.kind.as_sql(),
                quote_ident(&join.table),
                quote_ident(&join.table),
                quote_ident(&join.join_column),
                quote_ident(table),
                quote_ident(&join.base_column)
            )
        })
        .collect();
    Some(parts.join(" "))
}

/// WHERE 子句：标量过滤各自带括号并按记录的连接符相连，
/// 集合过滤随后以 AND 接入。参数顺序为过滤序，其后是集合过滤序。
fn build_where(
    clauses: &ClauseSet,
    table: &str,
    settings: &Settings,
) -> (Option<String>, Vec<BindValue>) {
    let has_join = !clauses.joins.is_empty();
    let mut sql = String::new();
    let mut params = Vec::new();
    let mut first = true;

    for filter in &clauses.filters {
        let column = filter_column(filter, table, has_join);
        let (op, value) = classify(filter.value.clone());
        if !first {
            sql.push(' ');
            sql.push_str(filter.joiner.as_sql());
            sql.push(' ');
        }
        first = false;
        if settings.prepare {
            sql.push_str(&format!("({} {} ?)", column, op.as_sql()));
            params.push(value.trimmed(settings));
        } else {
            sql.push_str(&format!(
                "({} {} {})",
                column,
                op.as_sql(),
                value.to_literal(settings)
            ));
        }
    }

    for membership in &clauses.memberships {
        if !first {
            sql.push(' ');
            sql.push_str(Joiner::And.as_sql());
            sql.push(' ');
        }
        first = false;
        let column = quote_ident(&membership.column);
        if settings.prepare {
            let marks = vec!["?"; membership.values.len()].join(", ");
            sql.push_str(&format!("({} IN ({}))", column, marks));
            params.extend(
                membership
                    .values
                    .iter()
                    .cloned()
                    .map(|value| value.trimmed(settings)),
            );
        } else {
            let literals: Vec<String> = membership
                .values
                .iter()
                .map(|value| value.to_literal(settings))
                .collect();
            sql.push_str(&format!("({} IN ({}))", column, literals.join(", ")));
        }
    }

    if sql.is_empty() {
        (None, params)
    } else {
        (Some(format!("WHERE {}", sql)), params)
    }
}

fn build_order(clauses: &ClauseSet, table: &str) -> Option<String> {
    if clauses.orderings.is_empty() {
        return None;
    }
    let has_join = !clauses.joins.is_empty();
    let parts: Vec<String> = clauses
        .orderings
        .iter()
        .map(|ordering| {
            if has_join {
                let owner = ordering.table.as_deref().unwrap_or(table);
                format!(
                    "{}.{} {}",
                    quote_ident(owner),
                    quote_ident(&ordering.column),
                    ordering.direction.as_sql()
                )
            } else {
                format!(
                    "{} {}",
                    quote_ident(&ordering.column),
                    ordering.direction.as_sql()
                )
            }
        })
        .collect();
    Some(format!("ORDER BY {}", parts.join(", ")))
}

fn build_limit(clauses: &ClauseSet) -> Option<String> {
    clauses
        .window
        .map(|window| format!("LIMIT {}, {}", window.offset, window.count))
}

/// 读语句：SELECT <列表> FROM <表> [联表] [过滤] [排序] [窗口];
pub(crate) fn select(clauses: &ClauseSet, settings: &Settings) -> Statement {
    let table = clauses.table.as_deref().unwrap_or_default();
    let mut sql = format!(
        "SELECT {} FROM {}",
        build_select_list(clauses, table),
        quote_ident(table)
    );
    if let Some(join) = build_join(clauses, table) {
        sql.push(' ');
        sql.push_str(&join);
    }
    let (where_sql, params) = build_where(clauses, table, settings);
    if let Some(where_sql) = where_sql {
        sql.push(' ');
        sql.push_str(&where_sql);
    }
    if let Some(order) = build_order(clauses, table) {
        sql.push(' ');
        sql.push_str(&order);
    }
    if let Some(limit) = build_limit(clauses) {
        sql.push(' ');
        sql.push_str(&limit);
    }
    sql.push(';');
    Statement { sql, params }
}

/// 计数语句：列表固定为 COUNT(*) AS total，不带排序与窗口
pub(crate) fn total(clauses: &ClauseSet, settings: &Settings) -> Statement {
    let table = clauses.table.as_deref().unwrap_or_default();
    let mut sql = format!("SELECT COUNT(*) AS total FROM {}", quote_ident(table));
    if let Some(join) = build_join(clauses, table) {
        sql.push(' ');
        sql.push_str(&join);
    }
    let (where_sql, params) = build_where(clauses, table, settings);
    if let Some(where_sql) = where_sql {
        sql.push(' ');
        sql.push_str(&where_sql);
    }
    sql.push(';');
    Statement { sql, params }
}

/// 单个映射值的编译：命中保留字表或哨兵标记 ⇒ 原样输出；
/// 预处理 ⇒ 占位符加参数；否则 ⇒ 字面量
fn mapping_value(
    value: &Value,
    settings: &Settings,
    params: &mut Vec<BindValue>,
) -> String {
    if let Value::String(s) = value {
        if let Some(token) = reserved::as_raw_token(s) {
            return token.to_string();
        }
    }
    let bind = BindValue::from_json(value);
    if settings.prepare {
        params.push(bind.trimmed(settings));
        "?".to_string()
    } else {
        bind.to_literal(settings)
    }
}

/// 写语句：INSERT INTO <表> (<列>) VALUES (<值>);
pub(crate) fn insert(table: &str, data: &Record, settings: &Settings) -> Statement {
    let mut columns = Vec::new();
    let mut values = Vec::new();
    let mut params = Vec::new();

    for (key, value) in data {
        columns.push(quote_ident(key));
        values.push(mapping_value(value, settings, &mut params));
    }

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({});",
        quote_ident(table),
        columns.join(", "),
        values.join(", ")
    );
    Statement { sql, params }
}

/// 写语句：UPDATE <表> SET <赋值> [过滤];
/// 参数顺序：赋值序在前，过滤序在后。空过滤会更新整表，由调用方负责。
pub(crate) fn update(
    table: &str,
    data: &Record,
    clauses: &ClauseSet,
    settings: &Settings,
) -> Statement {
    let mut changes = Vec::new();
    let mut params = Vec::new();

    for (key, value) in data {
        let rendered = mapping_value(value, settings, &mut params);
        changes.push(format!("{} = {}", quote_ident(key), rendered));
    }

    let mut sql = format!("UPDATE {} SET {}", quote_ident(table), changes.join(", "));
    let (where_sql, where_params) = build_where(clauses, table, settings);
    if let Some(where_sql) = where_sql {
        sql.push(' ');
        sql.push_str(&where_sql);
    }
    params.extend(where_params);
    sql.push(';');
    Statement { sql, params }
}

/// 写语句：DELETE FROM <表> [过滤]; 空过滤会清空整表，由调用方负责。
pub(crate) fn delete(clauses: &ClauseSet, settings: &Settings) -> Statement {
    let table = clauses.table.as_deref().unwrap_or_default();
    let mut sql = format!("DELETE FROM {}", quote_ident(table));
    let (where_sql, params) = build_where(clauses, table, settings);
    if let Some(where_sql) = where_sql {
        sql.push(' ');
        sql.push_str(&where_sql);
    }
    sql.push(';');
    Statement { sql, params }
}

/// 常量 / 表达式取值语句：SELECT <值>;
/// 数字字符串与保留令牌不加引号，其余按转义后的字符串字面量输出。
pub(crate) fn value_select(value: &str) -> String {
    if let Some(number) = crate::utils::coerce_number(value) {
        return format!("SELECT {};", number);
    }
    match reserved::as_raw_token(value) {
        Some(token) => format!("SELECT {};", token),
        None => format!("SELECT '{}';", crate::utils::escape_str(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::{Direction, Join, JoinKind, Membership, Ordering, RowWindow, Selection};

    fn clauses_for(table: &str) -> ClauseSet {
        ClauseSet {
            table: Some(table.to_string()),
            ..ClauseSet::default()
        }
    }

    fn filter(column: &str, value: impl Into<BindValue>) -> Filter {
        Filter {
            column: column.to_string(),
            value: value.into(),
            table: None,
            joiner: Joiner::And,
        }
    }

    fn or_filter(column: &str, value: impl Into<BindValue>) -> Filter {
        Filter {
            joiner: Joiner::Or,
            ..filter(column, value)
        }
    }

    fn selection(column: &str, alias: &str, table: Option<&str>) -> Selection {
        Selection {
            column: column.to_string(),
            alias: alias.to_string(),
            table: table.map(|t| t.to_string()),
        }
    }

    fn left_join(table: &str, join_column: &str, base_column: &str) -> Join {
        Join {
            table: table.to_string(),
            join_column: join_column.to_string(),
            base_column: base_column.to_string(),
            kind: JoinKind::Left,
        }
    }

    fn prepared() -> Settings {
        Settings::default()
    }

    fn literal() -> Settings {
        Settings {
            prepare: false,
            ..Settings::default()
        }
    }

    // ========== SELECT 列表测试 ==========
    #[test]
    fn test_select_all_when_empty() {
        let clauses = clauses_for("customers");
        let stmt = select(&clauses, &prepared());
        assert_eq!(stmt.sql, "SELECT * FROM `customers`;");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_select_list_aliased_to_self() {
        let mut clauses = clauses_for("customers");
        clauses.selections.push(selection("id", "id", None));
        clauses.selections.push(selection("name", "name", None));
        let stmt = select(&clauses, &prepared());
        assert_eq!(stmt.sql, "SELECT `id`, `name` FROM `customers`;");
    }

    #[test]
    fn test_select_with_alias() {
        let mut clauses = clauses_for("customers");
        clauses.selections.push(selection("name", "n", None));
        let stmt = select(&clauses, &prepared());
        assert_eq!(stmt.sql, "SELECT `name` AS 'n' FROM `customers`;");
    }

    #[test]
    fn test_select_qualified_by_target_when_joined() {
        let mut clauses = clauses_for("customers");
        clauses.joins.push(left_join("orders", "customer_id", "id"));
        clauses.selections.push(selection("name", "name", None));
        clauses.selections.push(selection("name", "n", None));
        let stmt = select(&clauses, &prepared());
        assert!(stmt.sql.starts_with(
            "SELECT `customers`.`name`, `customers`.`name` AS 'n' FROM `customers`"
        ));
    }

    #[test]
    fn test_select_alias_matching_joined_table_is_owner() {
        let mut clauses = clauses_for("customers");
        clauses.joins.push(left_join("orders", "customer_id", "id"));
        clauses.selections.push(selection("total", "orders", None));
        let stmt = select(&clauses, &prepared());
        assert!(stmt.sql.starts_with("SELECT `orders`.`total` FROM `customers`"));
    }

    #[test]
    fn test_select_explicit_owner_table() {
        let mut clauses = clauses_for("customers");
        clauses.joins.push(left_join("orders", "customer_id", "id"));
        clauses
            .selections
            .push(selection("qty", "quantity", Some("orders")));
        clauses
            .selections
            .push(selection("name", "who", Some("customers")));
        let stmt = select(&clauses, &prepared());
        assert!(stmt.sql.starts_with(
            "SELECT `orders`.`qty` AS 'quantity', `customers`.`name` AS 'who' FROM `customers`"
        ));
    }

    #[test]
    fn test_select_unknown_owner_is_dropped() {
        let mut clauses = clauses_for("customers");
        clauses.joins.push(left_join("orders", "customer_id", "id"));
        clauses
            .selections
            .push(selection("x", "x", Some("elsewhere")));
        let stmt = select(&clauses, &prepared());
        // 全部被忽略时回退到通配
        assert!(stmt.sql.starts_with("SELECT * FROM `customers`"));
    }

    #[test]
    fn test_select_wildcard_not_quoted() {
        let mut clauses = clauses_for("customers");
        clauses.joins.push(left_join("orders", "customer_id", "id"));
        clauses.selections.push(selection("*", "*", None));
        let stmt = select(&clauses, &prepared());
        assert!(stmt.sql.starts_with("SELECT `customers`.* FROM `customers`"));
    }

    // ========== 操作符推断测试 ==========
    #[test]
    fn test_where_eq() {
        let mut clauses = clauses_for("customers");
        clauses.filters.push(filter("city", "NYC"));
        let stmt = select(&clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "SELECT * FROM `customers` WHERE (`city` = ?);"
        );
        assert_eq!(stmt.params, vec![BindValue::String("NYC".to_string())]);
    }

    #[test]
    fn test_where_comparison_prefixes() {
        let cases = [
            (">5", ">", "5"),
            ("<5", "<", "5"),
            ("<=5", "<=", "5"),
            ("=>5", ">=", "5"),
        ];
        for (input, op, bound) in cases {
            let mut clauses = clauses_for("t");
            clauses.filters.push(filter("age", input));
            let stmt = select(&clauses, &prepared());
            assert_eq!(
                stmt.sql,
                format!("SELECT * FROM `t` WHERE (`age` {} ?);", op),
                "input: {input}"
            );
            assert_eq!(stmt.params, vec![BindValue::String(bound.to_string())]);
        }
    }

    #[test]
    fn test_where_symbol_without_digit_is_equality() {
        let mut clauses = clauses_for("t");
        clauses.filters.push(filter("note", ">abc"));
        let stmt = select(&clauses, &prepared());
        assert_eq!(stmt.sql, "SELECT * FROM `t` WHERE (`note` = ?);");
        assert_eq!(stmt.params, vec![BindValue::String(">abc".to_string())]);
    }

    #[test]
    fn test_where_ge_spelling_is_equality() {
        // 识别的前缀是 > < <= =>，字面 >= 按等值处理
        let mut clauses = clauses_for("t");
        clauses.filters.push(filter("age", ">=5"));
        let stmt = select(&clauses, &prepared());
        assert_eq!(stmt.sql, "SELECT * FROM `t` WHERE (`age` = ?);");
        assert_eq!(stmt.params, vec![BindValue::String(">=5".to_string())]);
    }

    #[test]
    fn test_where_like_appends_trailing_wildcard() {
        let mut clauses = clauses_for("customers");
        clauses.filters.push(filter("name", "%inc"));
        let stmt = select(&clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "SELECT * FROM `customers` WHERE (`name` LIKE ?);"
        );
        assert_eq!(stmt.params, vec![BindValue::String("%inc%".to_string())]);
    }

    #[test]
    fn test_where_regexp_marker() {
        let mut clauses = clauses_for("customers");
        clauses
            .filters
            .push(filter("email", format!("{REGEXP_MARKER}^[a-z]+")));
        let stmt = select(&clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "SELECT * FROM `customers` WHERE (`email` REGEXP ?);"
        );
        assert_eq!(stmt.params, vec![BindValue::String("^[a-z]+".to_string())]);
    }

    #[test]
    fn test_where_integer_value_stays_equality() {
        let mut clauses = clauses_for("t");
        clauses.filters.push(filter("id", 7i64));
        let stmt = select(&clauses, &prepared());
        assert_eq!(stmt.sql, "SELECT * FROM `t` WHERE (`id` = ?);");
        assert_eq!(stmt.params, vec![BindValue::Int(7)]);
    }

    // ========== 连接符与集合过滤测试 ==========
    #[test]
    fn test_where_chain_joiners() {
        let mut clauses = clauses_for("t");
        clauses.filters.push(filter("a", 1i64));
        clauses.filters.push(filter("b", 2i64));
        clauses.filters.push(or_filter("c", 3i64));
        let stmt = select(&clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "SELECT * FROM `t` WHERE (`a` = ?) AND (`b` = ?) OR (`c` = ?);"
        );
        assert_eq!(stmt.params.len(), 3);
    }

    #[test]
    fn test_where_in_params_in_input_order() {
        let mut clauses = clauses_for("customers");
        clauses.memberships.push(Membership {
            column: "city".to_string(),
            values: vec!["london".into(), "madrid".into(), "milan".into()],
        });
        let stmt = select(&clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "SELECT * FROM `customers` WHERE (`city` IN (?, ?, ?));"
        );
        assert_eq!(
            stmt.params,
            vec![
                BindValue::String("london".to_string()),
                BindValue::String("madrid".to_string()),
                BindValue::String("milan".to_string()),
            ]
        );
    }

    #[test]
    fn test_membership_appended_after_scalars_with_and() {
        let mut clauses = clauses_for("t");
        clauses.filters.push(filter("a", 1i64));
        clauses.memberships.push(Membership {
            column: "b".to_string(),
            values: vec![2i64.into(), 3i64.into()],
        });
        let stmt = select(&clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "SELECT * FROM `t` WHERE (`a` = ?) AND (`b` IN (?, ?));"
        );
        assert_eq!(
            stmt.params,
            vec![BindValue::Int(1), BindValue::Int(2), BindValue::Int(3)]
        );
    }

    #[test]
    fn test_where_in_literal_mode() {
        let mut clauses = clauses_for("customers");
        clauses.memberships.push(Membership {
            column: "city".to_string(),
            values: vec!["london".into(), "milan".into()],
        });
        let stmt = select(&clauses, &literal());
        assert_eq!(
            stmt.sql,
            "SELECT * FROM `customers` WHERE (`city` IN ('london', 'milan'));"
        );
        assert!(stmt.params.is_empty());
    }

    // ========== 联表测试 ==========
    #[test]
    fn test_join_compilation() {
        let mut clauses = clauses_for("customers");
        clauses.joins.push(left_join("orders", "customer_id", "id"));
        let stmt = select(&clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "SELECT * FROM `customers` LEFT JOIN `orders` ON (`orders`.`customer_id` = `customers`.`id`);"
        );
    }

    #[test]
    fn test_join_kinds() {
        for (kind, keyword) in [
            (JoinKind::Inner, "INNER"),
            (JoinKind::Left, "LEFT"),
            (JoinKind::Right, "RIGHT"),
            (JoinKind::Outer, "OUTER"),
        ] {
            let mut clauses = clauses_for("t1");
            clauses.joins.push(Join {
                kind,
                ..left_join("t2", "b", "a")
            });
            let stmt = select(&clauses, &prepared());
            assert_eq!(
                stmt.sql,
                format!(
                    "SELECT * FROM `t1` {} JOIN `t2` ON (`t2`.`b` = `t1`.`a`);",
                    keyword
                )
            );
        }
    }

    #[test]
    fn test_filters_qualified_when_joined() {
        let mut clauses = clauses_for("customers");
        clauses.joins.push(left_join("orders", "customer_id", "id"));
        clauses.filters.push(filter("city", "NYC"));
        clauses.filters.push(Filter {
            table: Some("orders".to_string()),
            ..filter("status", "open")
        });
        let stmt = select(&clauses, &prepared());
        assert!(stmt
            .sql
            .contains("WHERE (`customers`.`city` = ?) AND (`orders`.`status` = ?)"));
    }

    // ========== 排序与窗口测试 ==========
    #[test]
    fn test_order_compilation() {
        let mut clauses = clauses_for("customers");
        clauses.orderings.push(Ordering {
            column: "name".to_string(),
            direction: Direction::Asc,
            table: None,
        });
        clauses.orderings.push(Ordering {
            column: "id".to_string(),
            direction: Direction::Desc,
            table: None,
        });
        let stmt = select(&clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "SELECT * FROM `customers` ORDER BY `name` ASC, `id` DESC;"
        );
    }

    #[test]
    fn test_order_qualified_when_joined() {
        let mut clauses = clauses_for("customers");
        clauses.joins.push(left_join("orders", "customer_id", "id"));
        clauses.orderings.push(Ordering {
            column: "name".to_string(),
            direction: Direction::Asc,
            table: None,
        });
        clauses.orderings.push(Ordering {
            column: "total".to_string(),
            direction: Direction::Desc,
            table: Some("orders".to_string()),
        });
        let stmt = select(&clauses, &prepared());
        assert!(stmt
            .sql
            .contains("ORDER BY `customers`.`name` ASC, `orders`.`total` DESC"));
    }

    #[test]
    fn test_limit_window() {
        let mut clauses = clauses_for("customers");
        clauses.window = Some(RowWindow { offset: 10, count: 5 });
        let stmt = select(&clauses, &prepared());
        assert_eq!(stmt.sql, "SELECT * FROM `customers` LIMIT 10, 5;");
    }

    #[test]
    fn test_no_limit_without_window() {
        let clauses = clauses_for("customers");
        let stmt = select(&clauses, &prepared());
        assert!(!stmt.sql.contains("LIMIT"));
    }

    // ========== 计数语句测试 ==========
    #[test]
    fn test_total_statement() {
        let mut clauses = clauses_for("customers");
        clauses.filters.push(filter("city", "NYC"));
        clauses.orderings.push(Ordering {
            column: "name".to_string(),
            direction: Direction::Asc,
            table: None,
        });
        clauses.window = Some(RowWindow { offset: 0, count: 10 });
        let stmt = total(&clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "SELECT COUNT(*) AS total FROM `customers` WHERE (`city` = ?);"
        );
        assert_eq!(stmt.params.len(), 1);
    }

    // ========== 写语句测试 ==========
    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_insert_prepared() {
        let data = record(serde_json::json!({ "name": "Ann", "age": 30 }));
        let stmt = insert("customers", &data, &prepared());
        assert_eq!(
            stmt.sql,
            "INSERT INTO `customers` (`name`, `age`) VALUES (?, ?);"
        );
        assert_eq!(
            stmt.params,
            vec![BindValue::String("Ann".to_string()), BindValue::Int(30)]
        );
    }

    #[test]
    fn test_insert_literal_escapes() {
        let data = record(serde_json::json!({ "name": "O'Brien" }));
        let stmt = insert("customers", &data, &literal());
        assert_eq!(
            stmt.sql,
            "INSERT INTO `customers` (`name`) VALUES ('O\\'Brien');"
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_insert_raw_tokens_pass_through() {
        let data = record(serde_json::json!({
            "created": "NOW()",
            "token": crate::reserved::sql_const("UNIX_TIMESTAMP()")
        }));
        let stmt = insert("events", &data, &prepared());
        assert_eq!(
            stmt.sql,
            "INSERT INTO `events` (`created`, `token`) VALUES (NOW(), UNIX_TIMESTAMP());"
        );
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_update_param_order_set_then_where() {
        let data = record(serde_json::json!({ "city": "LA" }));
        let mut clauses = clauses_for("customers");
        clauses.filters.push(filter("id", 9i64));
        let stmt = update("customers", &data, &clauses, &prepared());
        assert_eq!(
            stmt.sql,
            "UPDATE `customers` SET `city` = ? WHERE (`id` = ?);"
        );
        assert_eq!(
            stmt.params,
            vec![BindValue::String("LA".to_string()), BindValue::Int(9)]
        );
    }

    #[test]
    fn test_update_without_filters_touches_all_rows() {
        let data = record(serde_json::json!({ "flag": 1 }));
        let clauses = clauses_for("customers");
        let stmt = update("customers", &data, &clauses, &prepared());
        assert_eq!(stmt.sql, "UPDATE `customers` SET `flag` = ?;");
    }

    #[test]
    fn test_delete_statement() {
        let mut clauses = clauses_for("customers");
        clauses.filters.push(filter("id", 4i64));
        let stmt = delete(&clauses, &prepared());
        assert_eq!(stmt.sql, "DELETE FROM `customers` WHERE (`id` = ?);");
        assert_eq!(stmt.params, vec![BindValue::Int(4)]);

        let empty = clauses_for("customers");
        let stmt = delete(&empty, &prepared());
        assert_eq!(stmt.sql, "DELETE FROM `customers`;");
    }

    // ========== 字面量路径与设置测试 ==========
    #[test]
    fn test_literal_where_quotes_stripped_value() {
        let mut clauses = clauses_for("t");
        clauses.filters.push(filter("age", ">5"));
        let stmt = select(&clauses, &literal());
        assert_eq!(stmt.sql, "SELECT * FROM `t` WHERE (`age` > '5');");
        assert!(stmt.params.is_empty());
    }

    #[test]
    fn test_trim_setting_applies_to_bound_params() {
        let mut settings = prepared();
        settings.trim = true;
        let mut clauses = clauses_for("t");
        clauses.filters.push(filter("city", "  NYC "));
        let stmt = select(&clauses, &settings);
        assert_eq!(stmt.params, vec![BindValue::String("NYC".to_string())]);
    }

    // ========== 确定性测试 ==========
    #[test]
    fn test_compilation_is_deterministic() {
        let mut clauses = clauses_for("customers");
        clauses.joins.push(left_join("orders", "customer_id", "id"));
        clauses.selections.push(selection("name", "n", None));
        clauses.filters.push(filter("city", "NYC"));
        clauses.filters.push(or_filter("age", ">30"));
        clauses.memberships.push(Membership {
            column: "country".to_string(),
            values: vec!["USA".into(), "UK".into()],
        });
        clauses.orderings.push(Ordering {
            column: "name".to_string(),
            direction: Direction::Asc,
            table: None,
        });
        clauses.window = Some(RowWindow { offset: 0, count: 10 });

        let first = select(&clauses, &prepared());
        let second = select(&clauses, &prepared());
        assert_eq!(first, second);
    }

    #[test]
    fn test_value_select() {
        assert_eq!(value_select("NOW()"), "SELECT NOW();");
        assert_eq!(value_select("hello"), "SELECT 'hello';");
    }

    #[test]
    fn test_value_select_numeric_strings_unquoted() {
        assert_eq!(value_select("42"), "SELECT 42;");
        assert_eq!(value_select("0"), "SELECT 0;");
        // 前导零和带符号输入不算数字
        assert_eq!(value_select("007"), "SELECT '007';");
        assert_eq!(value_select("-3"), "SELECT '-3';");
    }
}
