use serde::Serialize;

const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";

/// 拆分后的 URL（Postman `url` 对象）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuredUrl {
    /// 原始 URL，不做任何修改
    pub raw: String,

    /// "http" 或 "https"，无前缀时缺省
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    /// 第一个 "/" 之前的部分，始终只有一个元素
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
}

impl StructuredUrl {
    /// 将原始 URL 拆分为 protocol / host / path
    ///
    /// 不做任何规范化：连续的 "/" 会产生空的 path 段，
    /// 查询字符串和端口号原样保留在对应的段中。
    pub fn decompose(url: &str) -> Self {
        let (protocol, rest) = if let Some(rest) = url.strip_prefix(HTTP_PREFIX) {
            (Some("http".to_string()), rest)
        } else if let Some(rest) = url.strip_prefix(HTTPS_PREFIX) {
            (Some("https".to_string()), rest)
        } else {
            (None, url)
        };

        let mut segments = rest.split('/').map(str::to_string);
        // split 至少产生一个元素，空字符串也不例外
        let host = segments.next().unwrap_or_default();

        Self {
            raw: url.to_string(),
            protocol,
            host: vec![host],
            path: segments.collect(),
        }
    }

    pub fn host(&self) -> &str {
        self.host.first().map(String::as_str).unwrap_or("")
    }
}

/// 便捷函数
pub fn decompose(url: &str) -> StructuredUrl {
    StructuredUrl::decompose(url)
}
