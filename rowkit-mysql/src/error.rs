use mysql_async::{DriverError, ServerError};
use rowkit_core::{DbError, Error};

/// Server error codes reported for statements that cannot be parsed.
const SYNTAX_CODES: &[u16] = &[
    1064, // ER_PARSE_ERROR
    1149, // ER_SYNTAX_ERROR
];

/// Server error codes reported for rejected data.
const CONSTRAINT_CODES: &[u16] = &[
    1048, // ER_BAD_NULL_ERROR
    1062, // ER_DUP_ENTRY
    1364, // ER_NO_DEFAULT_FOR_FIELD
    1406, // ER_DATA_TOO_LONG
    1451, // ER_ROW_IS_REFERENCED_2
    1452, // ER_NO_REFERENCED_ROW_2
    3819, // ER_CHECK_CONSTRAINT_VIOLATED
];

fn classify_server(error: &ServerError) -> DbError {
    let message = format!("{} ({}): {}", error.code, error.state, error.message);
    if SYNTAX_CODES.contains(&error.code) {
        DbError::Syntax(message)
    } else if CONSTRAINT_CODES.contains(&error.code) {
        DbError::Constraint(message)
    } else {
        DbError::Database(message)
    }
}

/// Map a driver error onto the classified kinds, keeping the driver error as source.
pub fn classify(error: mysql_async::Error) -> Error {
    let kind = match &error {
        mysql_async::Error::Server(e) => classify_server(e),
        mysql_async::Error::Io(e) => DbError::Connection(e.to_string()),
        mysql_async::Error::Url(e) => DbError::Connection(e.to_string()),
        mysql_async::Error::Driver(e @ DriverError::ConnectionClosed) => {
            DbError::Connection(e.to_string())
        }
        e => DbError::Database(e.to_string()),
    };
    Error::new(error).context(kind)
}

/// Every failure while opening a session is a connection failure.
pub(crate) fn classify_connect(error: mysql_async::Error) -> Error {
    let kind = DbError::Connection(error.to_string());
    Error::new(error).context(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(code: u16) -> mysql_async::Error {
        mysql_async::Error::Server(ServerError {
            code,
            message: "message".into(),
            state: "HY000".into(),
        })
    }

    #[test]
    fn server_codes() {
        assert!(DbError::is_syntax(&classify(server(1064))));
        assert!(DbError::is_constraint(&classify(server(1048))));
        assert!(DbError::is_constraint(&classify(server(1062))));
        assert!(matches!(
            DbError::of(&classify(server(1146))),
            Some(DbError::Database(message)) if message.starts_with("1146")
        ));
    }

    #[test]
    fn closed_connection() {
        let error = classify(mysql_async::Error::Driver(DriverError::ConnectionClosed));
        assert!(DbError::is_connection(&error));
    }
}
