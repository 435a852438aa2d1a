use crate::{Dsn, MySQLDriver, classify, classify_connect, mysql_params, row_labeled};
use async_stream::try_stream;
use futures::{Stream, StreamExt, TryFutureExt, TryStreamExt};
use mysql_async::{Conn, Params, prelude::Queryable};
use rowkit_core::{
    Connection, Driver, Error, Executor, Query, Result, RowLabeled, RowsAffected, TimeZone,
};
use std::{future::Future, sync::Arc};

/// A single MySQL session.
pub struct MySQLConnection {
    pub(crate) connection: Conn,
    pub(crate) time_zone: TimeZone,
}

impl Executor for MySQLConnection {
    type Driver = MySQLDriver;

    fn driver(&self) -> &Self::Driver {
        &MySQLDriver {}
    }

    fn time_zone(&self) -> TimeZone {
        self.time_zone
    }

    fn fetch(&mut self, query: Query) -> impl Stream<Item = Result<RowLabeled>> + Send {
        let context = Arc::new(format!("While running the query:\n{}", query));
        try_stream! {
            log::debug!("{}", query);
            let Query { sql, params } = query;
            if params.is_empty() {
                let mut result = self.connection.query_iter(sql).await.map_err(classify)?;
                while let Some(mut stream) = result
                    .stream::<mysql_async::Row>()
                    .await
                    .map_err(classify)?
                {
                    while let Some(row) = stream.next().await.transpose().map_err(classify)? {
                        yield row_labeled(row)?;
                    }
                }
            } else {
                let params = Params::Positional(mysql_params(params)?);
                let mut stream = self
                    .connection
                    .exec_stream::<mysql_async::Row, _, _>(sql, params)
                    .await
                    .map_err(classify)?;
                while let Some(row) = stream.next().await.transpose().map_err(classify)? {
                    yield row_labeled(row)?;
                }
            }
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }

    fn execute(&mut self, query: Query) -> impl Future<Output = Result<RowsAffected>> + Send {
        let context = Arc::new(format!("While executing the query:\n{}", query));
        async move {
            log::debug!("{}", query);
            let Query { sql, params } = query;
            if params.is_empty() {
                self.connection.query_drop(sql).await.map_err(classify)?;
            } else {
                let params = Params::Positional(mysql_params(params)?);
                self.connection
                    .exec_drop(sql, params)
                    .await
                    .map_err(classify)?;
            }
            Ok::<_, Error>(RowsAffected {
                rows_affected: self.connection.affected_rows(),
                last_affected_id: self.connection.last_insert_id().filter(|v| *v != 0),
            })
        }
        .map_err(move |e: Error| {
            let e = e.context(context.clone());
            log::error!("{:#}", e);
            e
        })
    }
}

impl Connection for MySQLConnection {
    async fn connect(url: &str) -> Result<MySQLConnection> {
        let dsn: Dsn = url.parse()?;
        let connection = Conn::new(dsn.opts()).await.map_err(|e| {
            let e = classify_connect(e).context(format!("While trying to connect to `{}`", dsn));
            log::error!("{:#}", e);
            e
        })?;
        log::debug!("Opened the {} session {}", <Self::Driver as Driver>::NAME, dsn);
        Ok(MySQLConnection {
            connection,
            time_zone: dsn.loc,
        })
    }

    async fn disconnect(self) -> Result<()> {
        self.connection.disconnect().await.map_err(classify)
    }
}
