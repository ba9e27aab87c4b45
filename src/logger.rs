use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// 支持通过 RUST_LOG 环境变量控制日志级别，默认 info。
/// 日志写到 stderr，stdout 留给 `--stdout` 输出的 JSON。
///
/// 示例:
/// - RUST_LOG=debug http2postman requests.http
/// - RUST_LOG=http2postman=trace http2postman
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    tracing::debug!("Logger initialized");
}
