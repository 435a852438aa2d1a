use crate::{Connection, Context, DbError, Driver, Error, Result};
use std::env;

/// Owner of the single connection used by the application.
///
/// Built from a DSN, opened with [`Database::initialize`] and released with
/// [`Database::close`]. Every operation borrows the connection through
/// [`Database::connection`], which fails once the manager is closed.
///
/// ```rust,ignore
/// let mut db = Database::<MySQLConnection>::new("user:pass@/app?charset=utf8mb4&loc=Local");
/// db.initialize().await?;
/// let users = UserInfo::find_all(db.connection()?, &Filter::all(), None).await?;
/// db.close().await?;
/// ```
pub struct Database<C: Connection> {
    url: String,
    connection: Option<C>,
}

impl<C: Connection> Database<C> {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connection: None,
        }
    }

    /// Read the DSN from the environment variable `var`.
    pub fn from_env(var: &str) -> Result<Self> {
        let url = env::var(var)
            .map_err(|e| Error::new(DbError::Connection(format!("{var}: {e}"))))
            .context("While reading the connection string from the environment")?;
        Ok(Self::new(url))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_open(&self) -> bool {
        self.connection.is_some()
    }

    /// Open the connection. When it is already open the existing one is kept.
    pub async fn initialize(&mut self) -> Result<&mut C> {
        let name = <C::Driver as Driver>::NAME;
        if self.connection.is_some() {
            log::warn!("The {} connection is already open, reusing it", name);
        } else {
            let connection = C::connect(&self.url)
                .await
                .with_context(|| format!("While connecting to {}", redacted(&self.url)))?;
            log::info!("Connected to {} at {}", name, redacted(&self.url));
            self.connection = Some(connection);
        }
        self.connection()
    }

    /// The open connection, to be used as executor.
    pub fn connection(&mut self) -> Result<&mut C> {
        self.connection.as_mut().ok_or_else(|| {
            Error::new(DbError::Connection(
                "the database is not initialized or was closed".into(),
            ))
        })
    }

    /// Release the connection. Closing twice is an error.
    pub async fn close(&mut self) -> Result<()> {
        let Some(connection) = self.connection.take() else {
            return Err(Error::new(DbError::Connection(
                "the database is already closed".into(),
            )));
        };
        let name = <C::Driver as Driver>::NAME;
        connection
            .disconnect()
            .await
            .with_context(|| format!("While closing the {} connection", name))?;
        log::info!("Closed the {} connection to {}", name, redacted(&self.url));
        Ok(())
    }
}

/// The DSN with the password masked, for logs.
pub fn redacted(url: &str) -> String {
    let Some(at) = url.rfind('@') else {
        return url.to_string();
    };
    let start = url.find("://").map(|i| i + 3).unwrap_or(0);
    if start > at {
        return url.to_string();
    }
    match url[start..at].find(':') {
        Some(colon) => format!("{}:***{}", &url[..start + colon], &url[at..]),
        None => url.to_string(),
    }
}
