pub mod line_stream;
pub mod types;
pub mod url;

// Re-export commonly used types
pub use line_stream::{LineKind, LineStreamParser};
pub use types::{Method, ParseError, ParseResult, RequestRecord};
pub use url::{StructuredUrl, decompose};

/// 从行迭代器解析请求
pub fn parse_lines<I, S>(lines: I) -> ParseResult<Vec<RequestRecord>>
where
    I: IntoIterator<Item = std::io::Result<S>>,
    S: AsRef<str>,
{
    LineStreamParser::parse_lines(lines)
}

/// 从任意 BufRead 解析请求
pub fn parse_reader<R: std::io::BufRead>(reader: R) -> ParseResult<Vec<RequestRecord>> {
    LineStreamParser::parse_reader(reader)
}

/// 从字符串内容解析请求
pub fn parse_content(content: &str) -> Vec<RequestRecord> {
    LineStreamParser::parse_content(content)
}
