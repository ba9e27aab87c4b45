use crate::{ConvertError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_INPUT: &str = "requests.http";
pub const DEFAULT_OUTPUT: &str = "postman_collection.json";

/// 转换配置
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// 输入的 .http 文件
    pub input: PathBuf,

    /// 输出的集合文件
    pub output: PathBuf,

    /// 是否以缩进格式输出 JSON
    pub pretty: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: PathBuf::from(DEFAULT_OUTPUT),
            pretty: true,
        }
    }
}

impl ConvertConfig {
    /// 应用命令行覆盖（优先级最高）
    pub fn with_overrides(
        mut self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        compact: bool,
    ) -> Self {
        if let Some(input) = input {
            self.input = input;
        }
        if let Some(output) = output {
            self.output = output;
        }
        if compact {
            self.pretty = false;
        }
        self
    }
}

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    pub const CONFIG_FILE: &'static str = "http2postman.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ConvertConfig> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConvertError::Config {
            path: path.to_path_buf(),
            message: format!("Failed to read config file: {}", e),
        })?;

        Self::parse(&content).map_err(|message| ConvertError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(content: &str) -> std::result::Result<ConvertConfig, String> {
        toml::from_str(content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// 加载配置
    /// 指定了路径时必须存在；否则按以下顺序查找，都没有则使用默认值：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/http2postman/
    pub fn load(explicit: Option<&Path>) -> Result<ConvertConfig> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::find_config_path(),
        };

        match path {
            Some(path) => {
                debug!(path = %path.display(), "loading config");
                Self::load_from_path(&path)
            }
            None => Ok(ConvertConfig::default()),
        }
    }

    /// 查找配置文件路径
    pub fn find_config_path() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;
        Self::find_in_ancestors(&current).or_else(Self::user_config_path)
    }

    fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(Self::CONFIG_FILE))
            .find(|candidate| candidate.is_file())
    }

    fn user_config_path() -> Option<PathBuf> {
        let home = dirs::home_dir()?;
        let config_path = home
            .join(".config")
            .join("http2postman")
            .join(Self::CONFIG_FILE);

        config_path.is_file().then_some(config_path)
    }
}
