use crate::{
    Driver, Entity, Query, Result, RowLabeled, RowsAffected, TimeZone, Value,
    future::{self, Future},
    stream::{Stream, TryStreamExt},
};
use time::PrimitiveDateTime;

/// Something able to run queries: an open connection.
///
/// Taking `&mut self` serializes the operations, each one completes its round
/// trip before the next can start.
pub trait Executor: Send + Sized {
    type Driver: Driver;

    fn driver(&self) -> &Self::Driver;

    /// Zone of the timestamps generated for audit columns.
    fn time_zone(&self) -> TimeZone {
        TimeZone::Utc
    }

    fn timestamp(&self) -> PrimitiveDateTime {
        self.time_zone().now()
    }

    /// Execute the query and return the rows.
    fn fetch(&mut self, query: Query) -> impl Stream<Item = Result<RowLabeled>> + Send;

    /// Execute the query and return the total number of rows affected.
    fn execute(&mut self, query: Query) -> impl Future<Output = Result<RowsAffected>> + Send;

    /// Run a statement given as SQL text with `?` placeholders.
    fn exec(
        &mut self,
        sql: impl AsRef<str>,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<RowsAffected>> + Send {
        let query = Query::bound(sql, params);
        async move { self.execute(query?).await }
    }

    /// Run a query given as SQL text and decode every row into `E`.
    ///
    /// The text is sent as is: no soft delete scope is added.
    fn raw<E: Entity>(
        &mut self,
        sql: impl AsRef<str>,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Vec<E>>> + Send {
        let query = Query::bound(sql, params);
        async move {
            self.fetch(query?)
                .and_then(|row| future::ready(E::from_row(row)))
                .try_collect()
                .await
        }
    }

    /// Run a query given as SQL text and return the rows undecoded.
    fn raw_rows(
        &mut self,
        sql: impl AsRef<str>,
        params: Vec<Value>,
    ) -> impl Future<Output = Result<Vec<RowLabeled>>> + Send {
        let query = Query::bound(sql, params);
        async move { self.fetch(query?).try_collect().await }
    }
}
