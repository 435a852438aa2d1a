use crate::{
    ColumnDef, ColumnRole, DbError, Driver, Error, Executor, Filter, Order, Query, Result,
    RowLabeled, RowsAffected, SqlWriter, TableRef, Value,
    future::{self, Future},
    stream::{Stream, StreamExt, TryStreamExt},
};
use futures::TryFutureExt;
use log::Level;

/// A struct mapped onto a table, usually through `#[derive(Entity)]`.
///
/// The derive provides the mapping (table, columns, row conversion). Every
/// operation has a default implementation built on top of it: the statement is
/// rendered by the driver's [`SqlWriter`] and sent through the given executor.
pub trait Entity: Send + Sync + Sized {
    fn table() -> &'static TableRef;
    fn columns() -> &'static [ColumnDef];
    fn from_row(row: RowLabeled) -> Result<Self>;
    /// Every mapped column paired with its current value, in declaration order.
    fn row_full(&self) -> Vec<(&'static ColumnDef, Value)>;
    fn primary_key(&self) -> Value;
    /// Assign the field mapped to the column `name`.
    fn set_column(&mut self, name: &str, value: Value) -> Result<()>;

    fn primary_key_def() -> Option<&'static ColumnDef> {
        Self::columns().iter().find(|c| c.primary_key)
    }

    fn column_def(name: &str) -> Option<&'static ColumnDef> {
        Self::columns().iter().find(|c| c.name == name)
    }

    fn role_def(role: ColumnRole) -> Option<&'static ColumnDef> {
        Self::columns().iter().find(|c| c.role == role)
    }

    fn soft_delete_def() -> Option<&'static ColumnDef> {
        Self::role_def(ColumnRole::DeletedAt)
    }

    /// Like [`Entity::row_full`] but only the columns not holding a zero value.
    fn row_filled(&self) -> Vec<(&'static ColumnDef, Value)> {
        self.row_full()
            .into_iter()
            .filter(|(_, v)| !v.is_zero())
            .collect()
    }

    fn table_exists<Exec: Executor>(
        executor: &mut Exec,
    ) -> impl Future<Output = Result<bool>> + Send {
        let mut query = Query::default();
        executor
            .driver()
            .sql_writer()
            .write_table_exists::<Self>(&mut query);
        executor
            .fetch(query)
            .try_collect::<Vec<_>>()
            .map_ok(|rows| !rows.is_empty())
    }

    fn create_table<Exec: Executor>(
        executor: &mut Exec,
        if_not_exists: bool,
    ) -> impl Future<Output = Result<()>> + Send {
        let mut sql = String::with_capacity(512);
        executor
            .driver()
            .sql_writer()
            .write_create_table::<Self>(&mut sql, if_not_exists);
        executor.execute(sql.into()).map_ok(|_| ())
    }

    fn drop_table<Exec: Executor>(
        executor: &mut Exec,
        if_exists: bool,
    ) -> impl Future<Output = Result<()>> + Send {
        let mut sql = String::with_capacity(64);
        executor
            .driver()
            .sql_writer()
            .write_drop_table::<Self>(&mut sql, if_exists);
        executor.execute(sql.into()).map_ok(|_| ())
    }

    /// Drop and recreate the table when it exists, create it otherwise.
    fn reset_table<Exec: Executor>(
        executor: &mut Exec,
    ) -> impl Future<Output = Result<()>> + Send {
        async move {
            let table = Self::table().full_name();
            if Self::table_exists(executor).await? {
                log::info!("Table `{}` exists, dropping and recreating it", table);
                Self::drop_table(executor, false).await?;
            } else {
                log::info!("Table `{}` does not exist, creating it", table);
            }
            Self::create_table(executor, false).await
        }
    }

    /// Persist a new row. Empty creation and update timestamps are filled with
    /// the executor's clock, the key assigned by the database is written back.
    fn insert<Exec: Executor>(
        &mut self,
        executor: &mut Exec,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let now = Value::Timestamp(Some(executor.timestamp()));
        let stamped = stamp(self, ColumnRole::CreatedAt, &now, false)
            .and_then(|_| stamp(self, ColumnRole::UpdatedAt, &now, false));
        let mut query = Query::default();
        executor
            .driver()
            .sql_writer()
            .write_insert(&mut query, &*self);
        async move {
            stamped?;
            let result = executor.execute(query).await?;
            if let (Some(pk), Some(id)) = (Self::primary_key_def(), result.last_affected_id) {
                if pk.auto_increment && self.primary_key().is_zero() {
                    self.set_column(pk.name, Value::UInt64(Some(id)))?;
                }
            }
            Ok(result)
        }
    }

    /// Rows in scope as a stream, primary key ascending.
    fn find_many<Exec: Executor>(
        executor: &mut Exec,
        filter: &Filter,
        limit: Option<u32>,
    ) -> impl Stream<Item = Result<Self>> + Send {
        find_ordered(executor, filter, Order::Asc, limit)
    }

    fn find_all<Exec: Executor>(
        executor: &mut Exec,
        filter: &Filter,
        limit: Option<u32>,
    ) -> impl Future<Output = Result<Vec<Self>>> + Send {
        Self::find_many(executor, filter, limit).try_collect()
    }

    /// Row with the smallest primary key in scope.
    fn find_first<Exec: Executor>(
        executor: &mut Exec,
        filter: &Filter,
    ) -> impl Future<Output = Result<Self>> + Send {
        find_one(find_ordered(executor, filter, Order::Asc, Some(1)))
    }

    /// Row with the largest primary key in scope.
    fn find_last<Exec: Executor>(
        executor: &mut Exec,
        filter: &Filter,
    ) -> impl Future<Output = Result<Self>> + Send {
        find_one(find_ordered(executor, filter, Order::Desc, Some(1)))
    }

    fn find_pk<Exec: Executor>(
        executor: &mut Exec,
        primary_key: impl Into<Value>,
    ) -> impl Future<Output = Result<Self>> + Send {
        let filter = by_primary_key::<Self>(primary_key.into());
        let stream = match filter {
            Ok(filter) => find_ordered(executor, &filter, Order::Asc, Some(1)).left_stream(),
            Err(e) => crate::stream::once(future::ready(Err::<Self, _>(e))).right_stream(),
        };
        find_one(stream)
    }

    /// Write every column back, matched by primary key. A record whose key is
    /// still zero is inserted instead.
    fn save<Exec: Executor>(
        &mut self,
        executor: &mut Exec,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        async move {
            if self.primary_key().is_zero() {
                return self.insert(executor).await;
            }
            let now = Value::Timestamp(Some(executor.timestamp()));
            stamp(self, ColumnRole::UpdatedAt, &now, true)?;
            let mut query = Query::default();
            executor
                .driver()
                .sql_writer()
                .write_update(&mut query, &*self)?;
            executor.execute(query).await
        }
    }

    /// Set `column` to `value` on every row in scope.
    fn update_where<Exec: Executor>(
        executor: &mut Exec,
        filter: &Filter,
        column: &str,
        value: impl Into<Value>,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let now = Value::Timestamp(Some(executor.timestamp()));
        let mut query = Query::default();
        let written = match Self::column_def(column) {
            Some(def) => executor.driver().sql_writer().write_update_column::<Self>(
                &mut query,
                filter,
                def,
                value.into(),
                now,
            ),
            None => Err(Error::msg(format!(
                "Column `{}` does not exist in table `{}`",
                column,
                Self::table().full_name()
            ))),
        };
        async move {
            written?;
            executor.execute(query).await
        }
    }

    /// Delete the rows in scope: soft delete when the entity has a deletion
    /// mark and the filter does not include deleted rows, physical otherwise.
    fn delete_many<Exec: Executor>(
        executor: &mut Exec,
        filter: &Filter,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let now = Value::Timestamp(Some(executor.timestamp()));
        let mut query = Query::default();
        let written = executor
            .driver()
            .sql_writer()
            .write_delete::<Self>(&mut query, filter, now);
        async move {
            written?;
            executor.execute(query).await
        }
    }

    fn delete_all<Exec: Executor>(
        executor: &mut Exec,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        async move { Self::delete_many(executor, &Filter::all()).await }
    }

    /// Delete this record, by primary key.
    fn delete<Exec: Executor>(
        &self,
        executor: &mut Exec,
    ) -> impl Future<Output = Result<()>> + Send {
        let filter = by_primary_key::<Self>(self.primary_key());
        async move {
            let result = Self::delete_many(executor, &filter?).await?;
            match result.rows_affected {
                1 => Ok(()),
                0 => {
                    let error = Error::new(DbError::NotFound {
                        table: Self::table().name,
                    });
                    log::info!("{:#}", error);
                    Err(error)
                }
                n => {
                    let error = Error::msg(format!(
                        "The query deleted {} rows instead of the expected 1",
                        n
                    ));
                    log::log!(Level::Error, "{}", error);
                    Err(error)
                }
            }
        }
    }
}

/// Assign `now` to the column playing `role`, if any. Unless `overwrite`, a
/// value already present is kept.
fn stamp<E: Entity>(entity: &mut E, role: ColumnRole, now: &Value, overwrite: bool) -> Result<()> {
    let Some(column) = E::role_def(role) else {
        return Ok(());
    };
    if !overwrite {
        let current = entity
            .row_full()
            .into_iter()
            .find(|(c, _)| c.name == column.name)
            .map(|(_, v)| v);
        if current.is_some_and(|v| !v.is_null()) {
            return Ok(());
        }
    }
    entity.set_column(column.name, now.clone())
}

fn by_primary_key<E: Entity>(value: Value) -> Result<Filter> {
    match E::primary_key_def() {
        Some(pk) => Ok(Filter::eq(pk.name, value)),
        None => Err(Error::msg(format!(
            "Table `{}` has no primary key",
            E::table().full_name()
        ))),
    }
}

fn find_ordered<'e, E: Entity, Exec: Executor>(
    executor: &'e mut Exec,
    filter: &Filter,
    order: Order,
    limit: Option<u32>,
) -> impl Stream<Item = Result<E>> + Send + use<'e, E, Exec> {
    let mut query = Query::default();
    let written = executor
        .driver()
        .sql_writer()
        .write_select::<E>(&mut query, filter, Some(order), limit);
    future::ready(written.map(|_| query))
        .map_ok(move |query| executor.fetch(query))
        .try_flatten_stream()
        .and_then(|row| future::ready(E::from_row(row)))
}

async fn find_one<E: Entity>(stream: impl Stream<Item = Result<E>> + Send) -> Result<E> {
    let rows = stream.try_collect::<Vec<_>>().await?;
    rows.into_iter().next().ok_or_else(|| {
        Error::new(DbError::NotFound {
            table: E::table().name,
        })
    })
}
