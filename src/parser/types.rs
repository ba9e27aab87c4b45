use crate::parser::url::StructuredUrl;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// 支持的 HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl Method {
    pub const ALL: [Method; 5] = [
        Method::Get,
        Method::Post,
        Method::Put,
        Method::Delete,
        Method::Patch,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ParseError;

    /// 大小写敏感，与请求行的匹配规则一致
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseError::UnknownMethod(s.to_string()))
    }
}

/// 单个解析后的请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestRecord {
    /// 显示名称，即原始 URL
    pub name: String,

    pub method: Method,

    /// Headers 列表，保持原始顺序
    pub headers: Vec<(String, String)>,

    /// 原始请求体，只有非空时才存在
    pub body: Option<String>,

    pub url: StructuredUrl,
}

impl RequestRecord {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            name: url.to_string(),
            method,
            headers: Vec::new(),
            body: None,
            url: StructuredUrl::decompose(url),
        }
    }

    pub fn raw_url(&self) -> &str {
        &self.url.raw
    }
}

/// 解析错误类型
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 读取输入时的 IO 错误
    #[error("Failed to read line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown HTTP method '{0}'")]
    UnknownMethod(String),
}

/// 解析结果类型别名
pub type ParseResult<T> = Result<T, ParseError>;
