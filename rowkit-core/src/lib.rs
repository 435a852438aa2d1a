mod as_value;
mod clock;
mod column;
mod connection;
mod database;
mod driver;
mod entity;
mod error;
mod executor;
mod filter;
mod parse;
mod query;
mod sql_writer;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use clock::*;
pub use column::*;
pub use connection::*;
pub use database::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use executor::*;
pub use filter::*;
pub use parse::*;
pub use query::*;
pub use sql_writer::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
