#[cfg(test)]
mod tests {
    use rowkit_core::{Query, RowLabeled, RowsAffected, Value, params};
    use std::sync::Arc;

    #[test]
    fn bind_positional() {
        let query = Query::bound(
            "SELECT * FROM users WHERE name = ? AND age >= ?",
            params!["Tony Stark", 22],
        )
        .unwrap();
        assert_eq!(query.sql, "SELECT * FROM users WHERE name = ? AND age >= ?");
        assert_eq!(
            query.params,
            vec![Value::Varchar(Some("Tony Stark".into())), Value::Int32(Some(22))]
        );
    }

    #[test]
    fn bind_list_expands() {
        let query = Query::bound(
            "SELECT * FROM users WHERE name IN (?) AND age > ?",
            params![vec![String::from("Tony Stark"), String::from("Iron Man")], 1],
        )
        .unwrap();
        assert_eq!(
            query.sql,
            "SELECT * FROM users WHERE name IN (?, ?) AND age > ?"
        );
        assert_eq!(query.params.len(), 3);
        assert_eq!(query.params[1], Value::Varchar(Some("Iron Man".into())));
    }

    #[test]
    fn bind_empty_list() {
        let query = Query::bound("DELETE FROM t WHERE id IN (?)", params![Vec::<u64>::new()])
            .unwrap();
        assert_eq!(query.sql, "DELETE FROM t WHERE id IN (NULL)");
        assert!(query.params.is_empty());
    }

    #[test]
    fn bind_skips_quoted() {
        let query = Query::bound(
            r#"SELECT '?', "it''s ?", `we?rd`, 'a\'?' FROM t WHERE x = ?"#,
            params![1],
        )
        .unwrap();
        assert_eq!(
            query.sql,
            r#"SELECT '?', "it''s ?", `we?rd`, 'a\'?' FROM t WHERE x = ?"#
        );
        assert_eq!(query.params, vec![Value::Int32(Some(1))]);
    }

    #[test]
    fn bind_skips_comments() {
        let query = Query::bound(
            "SELECT * FROM user_info WHERE name = ? -- who?",
            params!["Friday"],
        )
        .unwrap();
        assert_eq!(query.sql, "SELECT * FROM user_info WHERE name = ? -- who?\n");
        assert_eq!(query.params, vec![Value::Varchar(Some("Friday".into()))]);

        let query = Query::bound(
            "SELECT /* why? */ id # or?\nFROM t WHERE age > ? /**/",
            params![30],
        )
        .unwrap();
        assert_eq!(
            query.sql,
            "SELECT /* why? */ id # or?\nFROM t WHERE age > ? /**/"
        );
        assert_eq!(query.params.len(), 1);

        // `--` without a following space is two minus signs
        let query = Query::bound("SELECT 5--?", params![3]).unwrap();
        assert_eq!(query.params, vec![Value::Int32(Some(3))]);
    }

    #[test]
    fn bind_count_mismatch() {
        assert!(Query::bound("SELECT ?, ?", params![1]).is_err());
        assert!(Query::bound("SELECT ?", params![1, 2]).is_err());
        assert!(Query::bound("SELECT 1", params![]).is_ok());
    }

    #[test]
    fn rows_affected_extend() {
        let mut total = RowsAffected::default();
        total.extend([
            RowsAffected {
                rows_affected: 2,
                last_affected_id: Some(4),
            },
            RowsAffected {
                rows_affected: 1,
                last_affected_id: None,
            },
        ]);
        assert_eq!(total.rows_affected, 3);
        assert_eq!(total.last_affected_id, Some(4));
    }

    #[test]
    fn row_take() {
        let mut row = RowLabeled::new(
            Arc::from(vec!["id".to_string(), "name".to_string()]),
            vec![Value::UInt64(Some(3)), Value::Varchar(Some("Friday".into()))].into(),
        );
        assert_eq!(row.get_column("id"), Some(&Value::UInt64(Some(3))));
        assert_eq!(row.take::<String>("name").unwrap(), "Friday");
        assert_eq!(row.take::<i32>("id").unwrap(), 3);
        assert!(row.take::<i32>("age").is_err());
    }
}
