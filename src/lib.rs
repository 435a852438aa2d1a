//! Map Rust structs onto database tables and run CRUD on one owned connection.
//!
//! ```rust,ignore
//! use rowkit::{Database, Entity, Filter};
//! use rowkit_mysql::MySQLConnection;
//!
//! #[derive(Entity, Default)]
//! #[rowkit(name = "user_info")]
//! struct UserInfo {
//!     #[rowkit(primary_key, auto_increment)]
//!     id: u64,
//!     #[rowkit(deleted_at)]
//!     deleted_at: Option<time::PrimitiveDateTime>,
//!     name: String,
//! }
//!
//! let mut db = Database::<MySQLConnection>::new("root@tcp(127.0.0.1:3306)/app?loc=Local");
//! let connection = db.initialize().await?;
//! UserInfo::reset_table(connection).await?;
//! let mut user = UserInfo { name: "Tony Stark".into(), ..Default::default() };
//! user.insert(connection).await?;
//! let found = UserInfo::find_first(connection, &Filter::eq("name", "Tony Stark")).await?;
//! db.close().await?;
//! ```
pub use rowkit_core::*;
pub use rowkit_macros::Entity;
