mod user_info;

pub use user_info::*;

use log::LevelFilter;
use rowkit::Executor;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Run every scenario on the connection. The SQL dialect is MySQL.
pub async fn execute_tests<C: Executor>(connection: &mut C) {
    user_info(connection).await;
}
