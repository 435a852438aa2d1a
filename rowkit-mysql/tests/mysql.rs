mod init;

#[cfg(test)]
mod tests {
    use crate::init::init;
    use rowkit::{Database, DbError};
    use rowkit_mysql::MySQLConnection;
    use rowkit_tests::{execute_tests, init_logs};
    use std::sync::Mutex;

    static MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn mysql() {
        init_logs();
        let _guard = MUTEX.lock().unwrap();
        let Some((url, _container)) = init().await else {
            eprintln!("test mysql ... skipped: no MySQL server (set ROWKIT_MYSQL_TEST or start docker)");
            return;
        };
        let mut database = Database::<MySQLConnection>::new(url);
        database
            .initialize()
            .await
            .expect("Could not open the database");
        // Initializing twice keeps the open connection
        database
            .initialize()
            .await
            .expect("Could not reuse the open connection");
        execute_tests(database.connection().expect("Missing connection")).await;
        database.close().await.expect("Could not close the database");

        let result = database.close().await;
        assert!(result.is_err_and(|e| DbError::is_connection(&e)));
        let result = database.connection();
        assert!(result.is_err_and(|e| DbError::is_connection(&e)));
    }

    #[tokio::test]
    async fn unreachable() {
        init_logs();
        let mut database =
            Database::<MySQLConnection>::new("root:secret@tcp(127.0.0.1:1)/test?loc=UTC");
        let result = database.initialize().await;
        assert!(
            result.as_ref().is_err_and(|e| DbError::is_connection(e)),
            "Expected a connection error, got {:?}",
            result.err()
        );
        assert!(!database.is_open());
    }

    #[tokio::test]
    async fn malformed() {
        init_logs();
        for url in [
            "",
            "postgres://root@localhost/test",
            "root@tcp(127.0.0.1:3306",
            "root@/test?loc=Mars",
        ] {
            let mut database = Database::<MySQLConnection>::new(url);
            let result = database.initialize().await;
            assert!(
                result.as_ref().is_err_and(|e| DbError::is_connection(e)),
                "Expected a connection error for `{}`",
                url
            );
        }
    }

    #[tokio::test]
    async fn from_env() {
        let result = Database::<MySQLConnection>::from_env("ROWKIT_MYSQL_SURELY_NOT_SET");
        assert!(result.is_err_and(|e| DbError::is_connection(&e)));
    }
}
