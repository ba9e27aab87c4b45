use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("无法打开输入文件 {path}: {source}")]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("读取输入失败: {0}")]
    LineReadFailure(#[from] crate::parser::ParseError),

    #[error("JSON 序列化错误: {0}")]
    SerializationFailure(#[from] serde_json::Error),

    #[error("无法写入输出文件 {path}: {source}")]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置错误 {path}: {message}")]
    Config { path: PathBuf, message: String },
}

impl ConvertError {
    pub fn input(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::InputUnavailable {
            path: path.into(),
            source,
        }
    }

    pub fn output(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::OutputWriteFailure {
            path: path.into(),
            source,
        }
    }
}

/// Result type for http2postman crate
pub type Result<T> = std::result::Result<T, ConvertError>;
