use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use http2postman::config::ConfigLoader;
use http2postman::converter::Converter;

pub type Result<T> = std::result::Result<T, anyhow::Error>;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 输入的 .http 文件（默认 requests.http）
    pub input: Option<PathBuf>,

    /// 输出的集合文件（默认 postman_collection.json）
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 配置文件路径，未指定时自动查找 http2postman.toml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 输出紧凑 JSON
    #[arg(long)]
    pub compact: bool,

    /// 打印到标准输出，不写文件
    #[arg(long)]
    pub stdout: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    let config = ConfigLoader::load(cli.config.as_deref())
        .context("failed to load configuration")?
        .with_overrides(cli.input, cli.output, cli.compact);

    let converter = Converter::new(config);

    if cli.stdout {
        let collection = converter.convert()?;
        println!("{}", converter.render(&collection)?);
        return Ok(());
    }

    converter.run()?;
    let message = format!(
        "Postman collection generated: {}",
        converter.config().output.display()
    );
    println!("{}", message.green());
    Ok(())
}
