use rowkit::{DbError, Entity, Executor, Filter, Value, params};
use std::sync::LazyLock;
use time::{PrimitiveDateTime, macros::datetime};
use tokio::sync::Mutex;

static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

#[derive(Entity, Debug, Clone, Default, PartialEq)]
#[rowkit(name = "user_info")]
pub struct UserInfo {
    #[rowkit(primary_key, auto_increment)]
    pub id: u64,
    #[rowkit(created_at)]
    pub created_at: Option<PrimitiveDateTime>,
    #[rowkit(updated_at)]
    pub updated_at: Option<PrimitiveDateTime>,
    #[rowkit(deleted_at)]
    pub deleted_at: Option<PrimitiveDateTime>,
    pub birthday: Option<PrimitiveDateTime>,
    #[rowkit(default = "0")]
    pub age: i32,
    pub name: String,
    #[rowkit(size = 500)]
    pub desc: String,
}

impl UserInfo {
    pub fn new(name: &str, age: i32, desc: &str) -> Self {
        Self {
            name: name.into(),
            age,
            desc: desc.into(),
            ..Default::default()
        }
    }
}

fn names(users: &[UserInfo]) -> Vec<&str> {
    users.iter().map(|v| v.name.as_str()).collect()
}

pub async fn user_info<C: Executor>(connection: &mut C) {
    let _lock = MUTEX.lock().await;

    // Setup, twice to go through both branches
    UserInfo::reset_table(connection)
        .await
        .expect("Failed to UserInfo::reset_table");
    UserInfo::reset_table(connection)
        .await
        .expect("Failed to UserInfo::reset_table on an existing table");
    assert!(
        UserInfo::table_exists(connection)
            .await
            .expect("Failed to UserInfo::table_exists")
    );

    // Insert
    let mut jarvis = UserInfo::new("J.A.R.V.I.S.", 1, "Just A Rather Very Intelligent System");
    let mut friday = UserInfo::new("Friday", 0, "Female Replacement Intelligent Digital Assistant Youth");
    let mut tony = UserInfo {
        birthday: Some(datetime!(1970-05-29 00:00:00)),
        ..UserInfo::new("Tony Stark", 35, "Genius, billionaire, playboy, philanthropist")
    };
    let mut iron_man = UserInfo::new("Iron Man", 35, "Suit");
    for user in [&mut jarvis, &mut friday, &mut tony, &mut iron_man] {
        let result = user
            .insert(connection)
            .await
            .expect("Failed to insert a UserInfo");
        assert_eq!(result.rows_affected, 1);
        assert_ne!(user.id, 0, "The generated key is written back");
        assert!(user.created_at.is_some());
        assert_eq!(user.created_at, user.updated_at);
    }
    assert!(jarvis.id < friday.id && friday.id < tony.id && tony.id < iron_man.id);

    // Round trip
    let found = UserInfo::find_pk(connection, tony.id)
        .await
        .expect("Failed to UserInfo::find_pk");
    assert_eq!(found, tony);

    // Ordering
    let first = UserInfo::find_first(connection, &Filter::all())
        .await
        .expect("Failed to UserInfo::find_first");
    assert_eq!(first, jarvis);
    let last = UserInfo::find_last(connection, &Filter::all())
        .await
        .expect("Failed to UserInfo::find_last");
    assert_eq!(last, iron_man);
    let stark = UserInfo::find_last(connection, &Filter::eq("age", 35))
        .await
        .expect("Failed to UserInfo::find_last with a filter");
    assert_eq!(stark.name, "Iron Man");

    let all = UserInfo::find_all(connection, &Filter::all(), None)
        .await
        .expect("Failed to UserInfo::find_all");
    assert_eq!(
        names(&all),
        ["J.A.R.V.I.S.", "Friday", "Tony Stark", "Iron Man"]
    );
    let limited = UserInfo::find_all(connection, &Filter::all(), Some(2))
        .await
        .expect("Failed to UserInfo::find_all with a limit");
    assert_eq!(names(&limited), ["J.A.R.V.I.S.", "Friday"]);

    // Raw predicates
    let like = UserInfo::find_all(
        connection,
        &Filter::raw("name LIKE ?", params!["%Stark%"]),
        None,
    )
    .await
    .expect("Failed to find with LIKE");
    assert_eq!(names(&like), ["Tony Stark"]);
    let and = UserInfo::find_all(
        connection,
        &Filter::raw("name = ? AND age >= ?", params!["Tony Stark", 22]),
        None,
    )
    .await
    .expect("Failed to find with AND");
    assert_eq!(like, and);
    let within = UserInfo::find_all(
        connection,
        &Filter::raw(
            "name IN (?)",
            params![vec!["Tony Stark".to_string(), "Iron Man".to_string()]],
        ),
        None,
    )
    .await
    .expect("Failed to find with IN");
    assert_eq!(names(&within), ["Tony Stark", "Iron Man"]);
    let none = UserInfo::find_all(
        connection,
        &Filter::raw("name IN (?)", params![Vec::<String>::new()]),
        None,
    )
    .await
    .expect("Failed to find with an empty IN");
    assert!(none.is_empty());
    let composed = UserInfo::find_all(
        connection,
        &Filter::eq("age", 35).and(Filter::raw("name <> ?", params!["Iron Man"])),
        None,
    )
    .await
    .expect("Failed to find with a composed filter");
    assert_eq!(names(&composed), ["Tony Stark"]);

    // Equivalent predicates, three forms
    let by_struct = UserInfo::find_all(
        connection,
        &Filter::from_entity(&UserInfo::new("Tony Stark", 35, "")),
        None,
    )
    .await
    .expect("Failed to find by struct");
    let by_map = UserInfo::find_all(
        connection,
        &Filter::from_map([
            ("name", Value::from("Tony Stark")),
            ("age", Value::from(35)),
        ]),
        None,
    )
    .await
    .expect("Failed to find by map");
    let by_raw = UserInfo::find_all(
        connection,
        &Filter::raw("name = ? AND age = ?", params!["Tony Stark", 35]),
        None,
    )
    .await
    .expect("Failed to find by raw predicate");
    assert_eq!(by_struct, vec![tony.clone()]);
    assert_eq!(by_struct, by_map);
    assert_eq!(by_map, by_raw);
    let unknown = UserInfo::find_all(
        connection,
        &Filter::from_map([("nickname", "Shellhead")]),
        None,
    )
    .await;
    assert!(unknown.is_err(), "Unknown columns are rejected");

    // Update one column
    let result = UserInfo::update_where(
        connection,
        &Filter::eq("name", "J.A.R.V.I.S."),
        "age",
        0,
    )
    .await
    .expect("Failed to UserInfo::update_where");
    assert_eq!(result.rows_affected, 1);
    let updated = UserInfo::find_pk(connection, jarvis.id)
        .await
        .expect("Failed to find the updated row");
    assert_eq!(updated.age, 0);
    assert!(updated.updated_at >= jarvis.updated_at);
    let unchanged = UserInfo::find_pk(connection, tony.id)
        .await
        .expect("Failed to find the untouched row");
    assert_eq!(unchanged, tony);

    // Save the whole record
    tony.name = "钢铁侠".into();
    let result = tony.save(connection).await.expect("Failed to UserInfo::save");
    assert_eq!(result.rows_affected, 1);
    let saved = UserInfo::find_pk(connection, tony.id)
        .await
        .expect("Failed to find the saved row");
    assert_eq!(saved, tony);
    assert_eq!(saved.name, "钢铁侠");
    assert!(saved.updated_at >= saved.created_at);

    // Saving a record without key inserts it
    let mut pepper = UserInfo::new("Pepper Potts", 38, "CEO");
    pepper
        .save(connection)
        .await
        .expect("Failed to save a new record");
    assert!(pepper.id > iron_man.id);

    // Missing rows
    let missing = UserInfo::find_pk(connection, 999_999u64).await;
    assert!(
        missing
            .as_ref()
            .is_err_and(|e| DbError::is_not_found(e)),
        "Expected NotFound, got {:?}",
        missing
    );
    let missing = UserInfo::find_first(connection, &Filter::eq("name", "Thanos")).await;
    assert!(missing.is_err_and(|e| DbError::is_not_found(&e)));

    // Raw execution
    let result = connection
        .exec(
            "INSERT INTO user_info (name, `desc`, age) VALUES (?, ?, ?)",
            params!["Happy Hogan", "Head of security", 40],
        )
        .await
        .expect("Failed to exec an INSERT");
    assert_eq!(result.rows_affected, 1);
    let happy_id = result.last_affected_id.expect("Missing the inserted id");
    let happy = connection
        .raw::<UserInfo>("SELECT * FROM user_info WHERE id = ?", params![happy_id])
        .await
        .expect("Failed to run a raw query");
    assert_eq!(happy.len(), 1);
    assert_eq!(happy[0].name, "Happy Hogan");
    assert_eq!(happy[0].created_at, None, "Raw statements skip the audit columns");

    // Classified failures
    let result = connection
        .exec(
            "INSERT INTO user_info (name, `desc`) VALUES (?, ?)",
            params![None::<String>, "Nobody"],
        )
        .await;
    assert!(
        result.as_ref().is_err_and(|e| DbError::is_constraint(e)),
        "Expected a constraint violation, got {:?}",
        result
    );
    let result = connection.exec("INSERT INTO user_info VALUES ((", vec![]).await;
    assert!(
        result.as_ref().is_err_and(|e| DbError::is_syntax(e)),
        "Expected a syntax error, got {:?}",
        result
    );
    let result = connection.exec("SELECT ?", vec![]).await;
    assert!(result.is_err(), "Placeholders without parameters are rejected");

    // Delete one record
    friday.delete(connection).await.expect("Failed to delete Friday");
    let result = UserInfo::find_pk(connection, friday.id).await;
    assert!(result.is_err_and(|e| DbError::is_not_found(&e)));
    let result = friday.delete(connection).await;
    assert!(result.is_err_and(|e| DbError::is_not_found(&e)));
    let friday_row = UserInfo::find_all(
        connection,
        &Filter::eq("id", friday.id).with_deleted(),
        None,
    )
    .await
    .expect("Failed to find the deleted row");
    assert_eq!(friday_row.len(), 1);
    assert!(friday_row[0].deleted_at.is_some());

    // Soft delete everything
    let result = UserInfo::delete_all(connection)
        .await
        .expect("Failed to UserInfo::delete_all");
    assert_eq!(result.rows_affected, 5);
    let remaining = UserInfo::find_all(connection, &Filter::all(), None)
        .await
        .expect("Failed to UserInfo::find_all after delete_all");
    assert!(remaining.is_empty());
    let result = UserInfo::update_where(connection, &Filter::all(), "age", 99)
        .await
        .expect("Failed to update deleted rows");
    assert_eq!(result.rows_affected, 0, "Deleted rows are out of scope");
    let rows = connection
        .raw::<UserInfo>("SELECT * FROM user_info", vec![])
        .await
        .expect("Failed to select the deleted rows");
    assert_eq!(rows.len(), 6);
    assert!(rows.iter().all(|v| v.deleted_at.is_some()));
    assert!(rows.iter().all(|v| v.age != 99));

    // Hard delete
    let result = UserInfo::delete_many(connection, &Filter::all().with_deleted())
        .await
        .expect("Failed to hard delete");
    assert_eq!(result.rows_affected, 6);
    let rows = connection
        .raw_rows("SELECT COUNT(*) AS total FROM user_info", vec![])
        .await
        .expect("Failed to count the rows");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get_column("total"), Some(&Value::Int64(Some(0))));

    // Teardown
    UserInfo::drop_table(connection, false)
        .await
        .expect("Failed to UserInfo::drop_table");
    assert!(
        !UserInfo::table_exists(connection)
            .await
            .expect("Failed to UserInfo::table_exists")
    );
    let result = UserInfo::drop_table(connection, false).await;
    assert!(result.is_err(), "Dropping a missing table is an error");
    UserInfo::drop_table(connection, true)
        .await
        .expect("Failed to drop a missing table with IF EXISTS");
}
