mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;

fn main() -> Result<()> {
    // 初始化日志系统
    http2postman::logger::init_logger();

    let cli = Cli::parse();
    cli::run(cli)
}
