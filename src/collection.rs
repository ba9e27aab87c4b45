use crate::Result;
use crate::parser::{Method, RequestRecord, StructuredUrl};
use serde::Serialize;

/// 生成的集合名称
pub const COLLECTION_NAME: &str = "Generated Collection";

/// Postman Collection v2.1 schema
pub const SCHEMA_URL: &str = "https://schema.getpostman.com/json/collection/v2.1.0/collection.json";

/// Postman 集合文档
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection {
    pub info: Info,
    pub item: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Info {
    pub name: String,
    pub schema: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            name: COLLECTION_NAME.to_string(),
            schema: SCHEMA_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Request {
    pub method: Method,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub header: Vec<Header>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Body>,

    pub url: StructuredUrl,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyMode {
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Body {
    pub mode: BodyMode,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub raw: String,
}

impl From<RequestRecord> for Item {
    fn from(record: RequestRecord) -> Self {
        let header = record
            .headers
            .into_iter()
            .map(|(key, value)| Header { key, value })
            .collect();

        let body = record.body.filter(|raw| !raw.is_empty()).map(|raw| Body {
            mode: BodyMode::Raw,
            raw,
        });

        Item {
            name: record.name,
            request: Request {
                method: record.method,
                header,
                body,
                url: record.url,
            },
        }
    }
}

impl Collection {
    /// 创建一个空集合
    pub fn new() -> Self {
        Self {
            info: Info::default(),
            item: Vec::new(),
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = RequestRecord>) -> Self {
        Self {
            info: Info::default(),
            item: records.into_iter().map(Item::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.item.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item.is_empty()
    }

    /// 序列化为 JSON，pretty 模式使用两个空格缩进
    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}
