#[cfg(test)]
mod tests {
    use indoc::indoc;
    use rowkit_core::{
        AsValue, ColumnDef, ColumnRole, Entity, Filter, GenericSqlWriter, Order, Query, Result,
        RowLabeled, SqlWriter, TableRef, Value, params,
    };
    use std::sync::LazyLock;
    use time::PrimitiveDateTime;

    #[derive(Default, Debug, Clone, PartialEq)]
    struct Note {
        id: u64,
        title: String,
        deleted_at: Option<PrimitiveDateTime>,
    }

    static TABLE: TableRef = TableRef {
        name: "notes",
        schema: "",
    };

    static COLUMNS: LazyLock<Box<[ColumnDef]>> = LazyLock::new(|| {
        vec![
            ColumnDef {
                name: "id",
                value: u64::as_empty_value(),
                primary_key: true,
                auto_increment: true,
                ..Default::default()
            },
            ColumnDef {
                name: "title",
                value: String::as_empty_value(),
                size: Some(80),
                ..Default::default()
            },
            ColumnDef {
                name: "deleted_at",
                value: PrimitiveDateTime::as_empty_value(),
                nullable: true,
                role: ColumnRole::DeletedAt,
                ..Default::default()
            },
        ]
        .into()
    });

    impl Entity for Note {
        fn table() -> &'static TableRef {
            &TABLE
        }
        fn columns() -> &'static [ColumnDef] {
            &COLUMNS
        }
        fn from_row(mut row: RowLabeled) -> Result<Self> {
            Ok(Self {
                id: row.take("id")?,
                title: row.take("title")?,
                deleted_at: row.take("deleted_at")?,
            })
        }
        fn row_full(&self) -> Vec<(&'static ColumnDef, Value)> {
            let columns = Self::columns();
            vec![
                (&columns[0], self.id.as_value()),
                (&columns[1], self.title.clone().as_value()),
                (&columns[2], self.deleted_at.as_value()),
            ]
        }
        fn primary_key(&self) -> Value {
            self.id.as_value()
        }
        fn set_column(&mut self, name: &str, value: Value) -> Result<()> {
            match name {
                "id" => self.id = AsValue::try_from_value(value)?,
                "title" => self.title = AsValue::try_from_value(value)?,
                "deleted_at" => self.deleted_at = AsValue::try_from_value(value)?,
                _ => return Err(rowkit_core::Error::msg(format!("Unknown column `{name}`"))),
            }
            Ok(())
        }
    }

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    #[test]
    fn create_and_drop() {
        let mut sql = String::new();
        WRITER.write_create_table::<Note>(&mut sql, true);
        assert_eq!(
            sql,
            indoc! {r#"
                CREATE TABLE IF NOT EXISTS "notes" (
                "id" UBIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                "title" VARCHAR(80) NOT NULL,
                "deleted_at" TIMESTAMP
                )
            "#}
            .trim()
        );
        let mut sql = String::new();
        WRITER.write_drop_table::<Note>(&mut sql, true);
        assert_eq!(sql, r#"DROP TABLE IF EXISTS "notes""#);
    }

    #[test]
    fn select_scoped() {
        let mut query = Query::default();
        WRITER
            .write_select::<Note>(&mut query, &Filter::all(), Some(Order::Desc), Some(1))
            .unwrap();
        assert_eq!(
            query.sql,
            indoc! {r#"
                SELECT "id", "title", "deleted_at"
                FROM "notes"
                WHERE "deleted_at" IS NULL
                ORDER BY "id" DESC
                LIMIT 1
            "#}
            .trim()
        );
        assert!(query.params.is_empty());
    }

    #[test]
    fn select_filters() {
        let filter = Filter::raw("title LIKE ? OR id IN (?)", params!["%a%", vec![1u64, 2]])
            .and(Filter::from_map([("title", "b")]));
        let mut query = Query::default();
        WRITER
            .write_select::<Note>(&mut query, &filter, None, None)
            .unwrap();
        assert_eq!(
            query.sql,
            indoc! {r#"
                SELECT "id", "title", "deleted_at"
                FROM "notes"
                WHERE (title LIKE ? OR id IN (?, ?)) AND "title" = ? AND "deleted_at" IS NULL
            "#}
            .trim()
        );
        assert_eq!(query.params.len(), 4);

        let mut query = Query::default();
        WRITER
            .write_select::<Note>(&mut query, &Filter::all().with_deleted(), None, None)
            .unwrap();
        assert!(!query.sql.contains("WHERE"));

        let mut query = Query::default();
        assert!(
            WRITER
                .write_select::<Note>(&mut query, &Filter::eq("body", 1), None, None)
                .is_err()
        );
    }

    #[test]
    fn filter_from_entity() {
        let probe = Note {
            title: "groceries".into(),
            ..Default::default()
        };
        let filter = Filter::from_entity(&probe);
        assert_eq!(filter, Filter::eq("title", "groceries"));
    }

    #[test]
    fn insert_skips_zero_key() {
        let note = Note {
            title: "groceries".into(),
            ..Default::default()
        };
        let mut query = Query::default();
        WRITER.write_insert(&mut query, &note);
        assert_eq!(
            query.sql,
            indoc! {r#"
                INSERT INTO "notes" ("title", "deleted_at") VALUES
                (?, ?)
            "#}
            .trim()
        );
        assert_eq!(
            query.params,
            vec![Value::Varchar(Some("groceries".into())), Value::Timestamp(None)]
        );

        let note = Note { id: 9, ..note };
        let mut query = Query::default();
        WRITER.write_insert(&mut query, &note);
        assert!(query.sql.starts_with(r#"INSERT INTO "notes" ("id", "title", "deleted_at")"#));
    }

    #[test]
    fn update_and_delete() {
        let note = Note {
            id: 3,
            title: "renamed".into(),
            ..Default::default()
        };
        let mut query = Query::default();
        WRITER.write_update(&mut query, &note).unwrap();
        assert_eq!(
            query.sql,
            indoc! {r#"
                UPDATE "notes" SET "title" = ?, "deleted_at" = ?
                WHERE "id" = ? AND "deleted_at" IS NULL
            "#}
            .trim()
        );
        assert_eq!(query.params[2], Value::UInt64(Some(3)));

        let mut query = Query::default();
        WRITER
            .write_delete::<Note>(&mut query, &Filter::all(), Value::Timestamp(None))
            .unwrap();
        assert_eq!(
            query.sql,
            indoc! {r#"
                UPDATE "notes" SET "deleted_at" = ?
                WHERE "deleted_at" IS NULL
            "#}
            .trim()
        );

        let mut query = Query::default();
        WRITER
            .write_delete::<Note>(&mut query, &Filter::eq("id", 3u64).with_deleted(), Value::Null)
            .unwrap();
        assert_eq!(
            query.sql,
            indoc! {r#"
                DELETE FROM "notes"
                WHERE "id" = ?
            "#}
            .trim()
        );
    }
}
