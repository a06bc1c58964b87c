//! 结果行物化模块
//!
//! 结果形状按语句从列元数据发现，不做硬编码；每行保持列的插入顺序
//! （serde_json 开启 preserve_order）。

use serde_json::{Map, Value};

/// 查询结果行：列名到值的有序映射
pub type Record = Map<String, Value>;

/// 按列序号取值；解码失败或 SQL NULL 都落到 Value::Null
#[cfg(any(feature = "mysql", feature = "sqlite"))]
macro_rules! col_value {
    ($row:expr, $index:expr, $t:ty, $conv:expr) => {
        $row.try_get::<Option<$t>, _>($index)
            .ok()
            .flatten()
            .map($conv)
            .unwrap_or(Value::Null)
    };
}

#[cfg(feature = "mysql")]
pub(crate) fn from_mysql_row(row: &sqlx::mysql::MySqlRow) -> Record {
    use bigdecimal::BigDecimal;
    use sqlx::{Column, Row, TypeInfo};

    let mut record = Record::new();
    for (index, column) in row.columns().iter().enumerate() {
        let type_name = column.type_info().name();
        let value = match type_name {
            "NULL" => Value::Null,
            "BOOLEAN" => col_value!(row, index, bool, Value::from),
            name if name.contains("INT") && name.ends_with("UNSIGNED") => {
                col_value!(row, index, u64, Value::from)
            }
            name if name.contains("INT") || name == "YEAR" => {
                col_value!(row, index, i64, Value::from)
            }
            "FLOAT" | "DOUBLE" => col_value!(row, index, f64, Value::from),
            "DECIMAL" => col_value!(row, index, BigDecimal, |d| Value::String(d.to_string())),
            "DATE" => col_value!(row, index, chrono::NaiveDate, |d| {
                Value::String(d.format("%Y-%m-%d").to_string())
            }),
            "TIME" => col_value!(row, index, chrono::NaiveTime, |t| {
                Value::String(t.format("%H:%M:%S").to_string())
            }),
            "DATETIME" => col_value!(row, index, chrono::NaiveDateTime, |d| {
                Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string())
            }),
            "TIMESTAMP" => col_value!(row, index, chrono::DateTime<chrono::Utc>, |d| {
                Value::String(d.format("%Y-%m-%d %H:%M:%S").to_string())
            }),
            name if name.contains("BLOB") || name.contains("BINARY") => {
                col_value!(row, index, Vec<u8>, |b| {
                    Value::String(String::from_utf8_lossy(&b).into_owned())
                })
            }
            _ => col_value!(row, index, String, Value::String),
        };
        record.insert(column.name().to_string(), value);
    }
    record
}

#[cfg(feature = "sqlite")]
pub(crate) fn from_sqlite_row(row: &sqlx::sqlite::SqliteRow) -> Record {
    use sqlx::{Column, Row, TypeInfo};

    let mut record = Record::new();
    for (index, column) in row.columns().iter().enumerate() {
        let type_name = column.type_info().name();
        let value = match type_name {
            "NULL" => Value::Null,
            "BOOLEAN" => col_value!(row, index, bool, Value::from),
            name if name.contains("INT") => col_value!(row, index, i64, Value::from),
            "REAL" | "NUMERIC" => col_value!(row, index, f64, Value::from),
            "BLOB" => col_value!(row, index, Vec<u8>, |b| {
                Value::String(String::from_utf8_lossy(&b).into_owned())
            }),
            _ => col_value!(row, index, String, Value::String),
        };
        record.insert(column.name().to_string(), value);
    }
    record
}
