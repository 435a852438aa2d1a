use crate::{Executor, Result};
use std::future::Future;

pub trait Connection: Executor {
    /// Open a connection to the database described by `url`.
    fn connect(url: &str) -> impl Future<Output = Result<Self>> + Send;

    /// Release the connection, waiting for the server to acknowledge.
    fn disconnect(self) -> impl Future<Output = Result<()>> + Send;
}
