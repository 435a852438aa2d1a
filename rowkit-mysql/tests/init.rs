use rowkit::future::{BoxFuture, FutureExt};
use std::{env, future, process::Command, time::Duration};
use testcontainers_modules::{
    mysql::Mysql,
    testcontainers::{
        ContainerAsync, ImageExt,
        core::logs::{LogFrame, consumer::LogConsumer},
        runners::AsyncRunner,
    },
};

struct TestcontainersLogConsumer;
impl LogConsumer for TestcontainersLogConsumer {
    fn accept<'a>(&'a self, record: &'a LogFrame) -> BoxFuture<'a, ()> {
        let log = str::from_utf8(record.bytes())
            .unwrap_or("Invalid error message")
            .trim();
        future::ready(if !log.is_empty() {
            match record {
                LogFrame::StdOut(..) => log::trace!("{log}",),
                LogFrame::StdErr(..) => log::debug!("{log}"),
            }
        })
        .boxed()
    }
}

/// DSN of the server to test against: `ROWKIT_MYSQL_TEST` when set, a fresh
/// container otherwise. `None` when neither is available.
pub async fn init() -> Option<(String, Option<ContainerAsync<Mysql>>)> {
    if let Ok(url) = env::var("ROWKIT_MYSQL_TEST") {
        return Some((url, None));
    };
    if !Command::new("docker")
        .arg("ps")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
    {
        log::warn!("Cannot access docker and ROWKIT_MYSQL_TEST is not set, skipping");
        return None;
    }
    let container = Mysql::default()
        .with_startup_timeout(Duration::from_secs(120))
        .with_log_consumer(TestcontainersLogConsumer)
        .start()
        .await
        .expect("Could not start the container");
    let port = container
        .get_host_port_ipv4(3306)
        .await
        .expect("Cannot get the port of Mysql");
    Some((
        format!("root@tcp(127.0.0.1:{port})/test?charset=utf8mb4&parseTime=True&loc=Local"),
        Some(container),
    ))
}
