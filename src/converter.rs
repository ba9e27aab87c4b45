use crate::collection::Collection;
use crate::config::ConvertConfig;
use crate::parser;
use crate::{ConvertError, Result};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// 读取 .http 文件并生成集合
///
/// 文件句柄只在本函数内存活，任何返回路径上都会被关闭。
pub fn convert_file<P: AsRef<Path>>(path: P) -> Result<Collection> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| ConvertError::input(path, e))?;
    debug!(path = %path.display(), "opened input");

    let records = parser::parse_reader(BufReader::new(file))?;
    Ok(Collection::from_records(records))
}

/// 从字符串内容生成集合
pub fn convert_content(content: &str) -> Collection {
    Collection::from_records(parser::parse_content(content))
}

/// 将集合写入文件
pub fn write_collection<P: AsRef<Path>>(collection: &Collection, path: P, pretty: bool) -> Result<()> {
    let path = path.as_ref();
    let json = collection.to_json(pretty)?;
    fs::write(path, json).map_err(|e| ConvertError::output(path, e))?;
    debug!(path = %path.display(), "wrote collection");
    Ok(())
}

/// 按配置执行一次完整转换
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// 只解析，不写文件
    pub fn convert(&self) -> Result<Collection> {
        let collection = convert_file(&self.config.input)?;
        info!(
            input = %self.config.input.display(),
            requests = collection.len(),
            "parsed requests"
        );
        Ok(collection)
    }

    pub fn render(&self, collection: &Collection) -> Result<String> {
        collection.to_json(self.config.pretty)
    }

    /// 解析并写入输出文件
    pub fn run(&self) -> Result<Collection> {
        let collection = self.convert()?;
        write_collection(&collection, &self.config.output, self.config.pretty)?;
        Ok(collection)
    }
}
