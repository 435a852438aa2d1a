use mysql_async::consts::{ColumnFlags, ColumnType};
use rowkit_core::{Context, Error, Parse, Result, Row, RowLabeled, RowNames, Value};
use time::{Date, Month, PrimitiveDateTime, Time};

/// Charset number the server reports for binary columns.
const BINARY_CHARSET: u16 = 63;

fn is_zero_date(text: &str) -> bool {
    text.starts_with("0000-00-00")
}

fn decode_date(
    column: &mysql_async::Column,
    (year, month, day, hour, minute, second, micro): (u16, u8, u8, u8, u8, u8, u32),
) -> Result<Value> {
    if (year, month, day) == (0, 0, 0) {
        return Ok(Value::Null);
    }
    let date = Date::from_calendar_date(year as _, Month::try_from(month)?, day)?;
    Ok(match column.column_type() {
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => Value::Date(Some(date)),
        _ => Value::Timestamp(Some(PrimitiveDateTime::new(
            date,
            Time::from_hms_micro(hour, minute, second, micro)?,
        ))),
    })
}

/// Text protocol values arrive as bytes, the column metadata tells what they hold.
fn decode_bytes(column: &mysql_async::Column, bytes: Vec<u8>) -> Result<Value> {
    let text = || String::from_utf8_lossy(&bytes).into_owned();
    Ok(match column.column_type() {
        ColumnType::MYSQL_TYPE_TINY
        | ColumnType::MYSQL_TYPE_SHORT
        | ColumnType::MYSQL_TYPE_INT24
        | ColumnType::MYSQL_TYPE_LONG
        | ColumnType::MYSQL_TYPE_LONGLONG
        | ColumnType::MYSQL_TYPE_YEAR => {
            let text = text();
            if column.flags().contains(ColumnFlags::UNSIGNED_FLAG) {
                Value::UInt64(Some(text.parse()?))
            } else {
                Value::Int64(Some(text.parse()?))
            }
        }
        ColumnType::MYSQL_TYPE_FLOAT | ColumnType::MYSQL_TYPE_DOUBLE => {
            Value::Float64(Some(text().parse()?))
        }
        ColumnType::MYSQL_TYPE_DECIMAL | ColumnType::MYSQL_TYPE_NEWDECIMAL => {
            Value::Varchar(Some(text()))
        }
        ColumnType::MYSQL_TYPE_DATE | ColumnType::MYSQL_TYPE_NEWDATE => {
            let text = text();
            if is_zero_date(&text) {
                Value::Null
            } else {
                Value::Date(Some(<Date as Parse>::parse(&text)?))
            }
        }
        ColumnType::MYSQL_TYPE_DATETIME
        | ColumnType::MYSQL_TYPE_DATETIME2
        | ColumnType::MYSQL_TYPE_TIMESTAMP
        | ColumnType::MYSQL_TYPE_TIMESTAMP2 => {
            let text = text();
            if is_zero_date(&text) {
                Value::Null
            } else {
                Value::Timestamp(Some(<PrimitiveDateTime as Parse>::parse(&text)?))
            }
        }
        ColumnType::MYSQL_TYPE_TIME | ColumnType::MYSQL_TYPE_TIME2 => {
            let text = text();
            match <Time as Parse>::parse(&text) {
                Ok(v) => Value::Time(Some(v)),
                // Negative or longer than a day
                Err(..) => Value::Varchar(Some(text)),
            }
        }
        _ if column.character_set() == BINARY_CHARSET => Value::Blob(Some(bytes.into())),
        _ => match String::from_utf8(bytes) {
            Ok(v) => Value::Varchar(Some(v)),
            Err(e) => Value::Blob(Some(e.into_bytes().into())),
        },
    })
}

fn decode_value(column: &mysql_async::Column, value: mysql_async::Value) -> Result<Value> {
    type MySQLValue = mysql_async::Value;
    Ok(match value {
        MySQLValue::NULL => Value::Null,
        MySQLValue::Bytes(v) => decode_bytes(column, v)?,
        MySQLValue::Int(v) => Value::Int64(Some(v)),
        MySQLValue::UInt(v) => Value::UInt64(Some(v)),
        MySQLValue::Float(v) => Value::Float32(Some(v)),
        MySQLValue::Double(v) => Value::Float64(Some(v)),
        MySQLValue::Date(year, month, day, hour, minute, second, micro) => {
            decode_date(column, (year, month, day, hour, minute, second, micro))?
        }
        MySQLValue::Time(negative, days, hours, minutes, seconds, micro) => {
            if !negative && days == 0 {
                Value::Time(Some(Time::from_hms_micro(hours, minutes, seconds, micro)?))
            } else {
                Value::Varchar(Some(format!(
                    "{}{}:{:02}:{:02}.{:06}",
                    if negative { "-" } else { "" },
                    days * 24 + hours as u32,
                    minutes,
                    seconds,
                    micro
                )))
            }
        }
    })
}

/// Decode a driver row, keeping the column labels.
pub(crate) fn row_labeled(row: mysql_async::Row) -> Result<RowLabeled> {
    let columns = row.columns();
    let names: RowNames = columns.iter().map(|v| v.name_str().into_owned()).collect();
    let values: Row = columns
        .iter()
        .zip(row.unwrap())
        .map(|(column, value)| {
            decode_value(column, value).with_context(|| {
                format!("While decoding the column `{}`", column.name_str())
            })
        })
        .collect::<Result<_>>()?;
    if values.len() != names.len() {
        return Err(Error::msg(format!(
            "Row has {} values for {} columns",
            values.len(),
            names.len()
        )));
    }
    Ok(RowLabeled::new(names, values))
}
