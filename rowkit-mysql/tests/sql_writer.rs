#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rowkit::{Driver, Entity, Filter, Order, Query, SqlWriter, Value, params};
    use rowkit_mysql::{MySQLDriver, MySQLSqlWriter};
    use rowkit_tests::UserInfo;
    use time::macros::datetime;

    const WRITER: MySQLSqlWriter = MySQLSqlWriter {};

    #[test]
    fn create_table() {
        let mut sql = String::new();
        MySQLDriver::new()
            .sql_writer()
            .write_create_table::<UserInfo>(&mut sql, false);
        assert_eq!(
            sql,
            indoc! {"
                CREATE TABLE `user_info` (
                `id` BIGINT UNSIGNED AUTO_INCREMENT PRIMARY KEY,
                `created_at` DATETIME(6),
                `updated_at` DATETIME(6),
                `deleted_at` DATETIME(6),
                `birthday` DATETIME(6),
                `age` INTEGER NOT NULL DEFAULT 0,
                `name` VARCHAR(255) NOT NULL,
                `desc` VARCHAR(500) NOT NULL,
                INDEX `idx_user_info_deleted_at` (`deleted_at`)
                )
            "}
            .trim()
        );
    }

    #[test]
    fn drop_and_exists() {
        let mut sql = String::new();
        WRITER.write_drop_table::<UserInfo>(&mut sql, true);
        assert_eq!(sql, "DROP TABLE IF EXISTS `user_info`");

        let mut query = Query::default();
        WRITER.write_table_exists::<UserInfo>(&mut query);
        assert_eq!(
            query.sql,
            indoc! {"
                SELECT 1
                FROM information_schema.tables
                WHERE table_name = ? AND table_schema = DATABASE()
            "}
            .trim()
        );
        assert_eq!(query.params, [Value::Varchar(Some("user_info".into()))]);
    }

    #[test]
    fn quoted_identifiers() {
        let mut out = String::new();
        WRITER.write_identifier_quoted(&mut out, "we`ird");
        assert_eq!(out, "`we``ird`");
    }

    #[test]
    fn find_first_by_struct() {
        let probe = UserInfo::new("Tony Stark", 35, "");
        let mut query = Query::default();
        WRITER
            .write_select::<UserInfo>(
                &mut query,
                &Filter::from_entity(&probe),
                Some(Order::Asc),
                Some(1),
            )
            .expect("Could not write the query");
        assert_eq!(
            query.sql,
            indoc! {"
                SELECT `id`, `created_at`, `updated_at`, `deleted_at`, `birthday`, `age`, `name`, `desc`
                FROM `user_info`
                WHERE `age` = ? AND `name` = ? AND `deleted_at` IS NULL
                ORDER BY `id` ASC
                LIMIT 1
            "}
            .trim()
        );
        assert_eq!(query.params, params![35, "Tony Stark"]);
    }

    #[test]
    fn raw_in_list() {
        let filter = Filter::raw(
            "name IN (?) AND age >= ?",
            params![vec!["Tony Stark".to_string(), "Iron Man".to_string()], 22],
        );
        let mut query = Query::default();
        WRITER
            .write_select::<UserInfo>(&mut query, &filter, Some(Order::Desc), None)
            .expect("Could not write the query");
        assert!(query.sql.ends_with(indoc! {"
            WHERE (name IN (?, ?) AND age >= ?) AND `deleted_at` IS NULL
            ORDER BY `id` DESC"
        }));
        assert_eq!(query.params, params!["Tony Stark", "Iron Man", 22]);
    }

    #[test]
    fn insert() {
        let user = UserInfo {
            created_at: Some(datetime!(2024-03-01 09:30:00)),
            updated_at: Some(datetime!(2024-03-01 09:30:00)),
            ..UserInfo::new("Friday", 0, "Assistant")
        };
        let mut query = Query::default();
        WRITER.write_insert(&mut query, &user);
        assert_eq!(
            query.sql,
            indoc! {"
                INSERT INTO `user_info` (`created_at`, `updated_at`, `deleted_at`, `birthday`, `age`, `name`, `desc`) VALUES
                (?, ?, ?, ?, ?, ?, ?)
            "}
            .trim()
        );
        assert_eq!(query.params.len(), 7);
        assert_eq!(query.params[4], Value::Int32(Some(0)));
    }

    #[test]
    fn save() {
        let user = UserInfo {
            id: 7,
            ..UserInfo::new("钢铁侠", 35, "Suit")
        };
        let mut query = Query::default();
        WRITER
            .write_update(&mut query, &user)
            .expect("Could not write the query");
        assert_eq!(
            query.sql,
            indoc! {"
                UPDATE `user_info` SET `created_at` = ?, `updated_at` = ?, `deleted_at` = ?, `birthday` = ?, `age` = ?, `name` = ?, `desc` = ?
                WHERE `id` = ? AND `deleted_at` IS NULL
            "}
            .trim()
        );
        assert_eq!(query.params.last(), Some(&Value::UInt64(Some(7))));
    }

    #[test]
    fn update_where() {
        let now = Value::Timestamp(Some(datetime!(2024-03-01 10:00:00)));
        let mut query = Query::default();
        let column = UserInfo::column_def("age").expect("Missing the age column");
        WRITER
            .write_update_column::<UserInfo>(
                &mut query,
                &Filter::eq("name", "J.A.R.V.I.S."),
                column,
                Value::from(0),
                now.clone(),
            )
            .expect("Could not write the query");
        assert_eq!(
            query.sql,
            indoc! {"
                UPDATE `user_info` SET `age` = ?, `updated_at` = ?
                WHERE `name` = ? AND `deleted_at` IS NULL
            "}
            .trim()
        );
        assert_eq!(query.params, [Value::from(0), now, Value::from("J.A.R.V.I.S.")]);
    }

    #[test]
    fn soft_and_hard_delete() {
        let now = Value::Timestamp(Some(datetime!(2024-03-01 10:00:00)));
        let mut query = Query::default();
        WRITER
            .write_delete::<UserInfo>(&mut query, &Filter::all(), now.clone())
            .expect("Could not write the query");
        assert_eq!(
            query.sql,
            indoc! {"
                UPDATE `user_info` SET `deleted_at` = ?
                WHERE `deleted_at` IS NULL
            "}
            .trim()
        );
        assert_eq!(query.params, [now.clone()]);

        let mut query = Query::default();
        WRITER
            .write_delete::<UserInfo>(&mut query, &Filter::eq("id", 3u64).with_deleted(), now)
            .expect("Could not write the query");
        assert_eq!(
            query.sql,
            indoc! {"
                DELETE FROM `user_info`
                WHERE `id` = ?
            "}
            .trim()
        );
    }
}
