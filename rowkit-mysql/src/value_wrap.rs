use rowkit_core::{Error, Value};

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        type MySQLValue = mysql_async::Value;
        macro_rules! ensure_date_range {
            ($date:expr) => {{
                let year = $date.year();
                if (0..=9999).contains(&year) {
                    Ok(MySQLValue::Date(
                        year as _,
                        $date.month().into(),
                        $date.day(),
                        $date.hour(),
                        $date.minute(),
                        $date.second(),
                        $date.microsecond(),
                    ))
                } else {
                    Err(Error::msg(format!(
                        "Date {} is out of range for MySQL",
                        $date
                    )))
                }
            }};
        }
        Ok(match value.0 {
            ref v if v.is_null() => MySQLValue::NULL,
            Value::Boolean(Some(v)) => MySQLValue::from(v),
            Value::Int8(Some(v)) => MySQLValue::from(v),
            Value::Int16(Some(v)) => MySQLValue::from(v),
            Value::Int32(Some(v)) => MySQLValue::from(v),
            Value::Int64(Some(v)) => MySQLValue::from(v),
            Value::UInt8(Some(v)) => MySQLValue::from(v),
            Value::UInt16(Some(v)) => MySQLValue::from(v),
            Value::UInt32(Some(v)) => MySQLValue::from(v),
            Value::UInt64(Some(v)) => MySQLValue::from(v),
            Value::Float32(Some(v)) => MySQLValue::from(v),
            Value::Float64(Some(v)) => MySQLValue::from(v),
            Value::Varchar(Some(v)) => MySQLValue::Bytes(v.into_bytes()),
            Value::Blob(Some(v)) => MySQLValue::Bytes(v.into_vec()),
            Value::Date(Some(v)) => ensure_date_range!(v.midnight())?,
            Value::Time(Some(v)) => MySQLValue::Time(
                false,
                0,
                v.hour(),
                v.minute(),
                v.second(),
                v.microsecond(),
            ),
            Value::Timestamp(Some(v)) => ensure_date_range!(v)?,
            v => {
                return Err(Error::msg(format!(
                    "Value {} of type {} cannot be bound as a MySQL parameter",
                    v,
                    v.type_name()
                )));
            }
        })
    }
}

/// Convert bound parameters, failing on the first unsupported one.
pub(crate) fn mysql_params(params: Vec<Value>) -> Result<Vec<mysql_async::Value>, Error> {
    params
        .into_iter()
        .map(|v| ValueWrap(v).try_into())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime, time};

    fn convert(value: Value) -> Result<mysql_async::Value, Error> {
        ValueWrap(value).try_into()
    }

    #[test]
    fn scalars() {
        assert_eq!(convert(Value::Null).unwrap(), mysql_async::Value::NULL);
        assert_eq!(convert(Value::Int32(None)).unwrap(), mysql_async::Value::NULL);
        assert_eq!(convert(Value::Int32(Some(-4))).unwrap(), mysql_async::Value::Int(-4));
        assert_eq!(convert(Value::UInt64(Some(4))).unwrap(), mysql_async::Value::UInt(4));
        assert_eq!(
            convert(Value::Varchar(Some("钢铁侠".into()))).unwrap(),
            mysql_async::Value::Bytes("钢铁侠".as_bytes().to_vec())
        );
    }

    #[test]
    fn temporal() {
        assert_eq!(
            convert(Value::Timestamp(Some(datetime!(2024-02-29 23:59:58.123456)))).unwrap(),
            mysql_async::Value::Date(2024, 2, 29, 23, 59, 58, 123456)
        );
        assert_eq!(
            convert(Value::Date(Some(date!(1970 - 05 - 29)))).unwrap(),
            mysql_async::Value::Date(1970, 5, 29, 0, 0, 0, 0)
        );
        assert_eq!(
            convert(Value::Time(Some(time!(8:15)))).unwrap(),
            mysql_async::Value::Time(false, 0, 8, 15, 0, 0)
        );
        assert!(convert(Value::Timestamp(Some(time::Date::MIN.midnight()))).is_err());
    }

    #[test]
    fn lists_are_expanded_before() {
        let list = Value::from(vec![1u64, 2]);
        assert!(convert(list).is_err());
    }
}
