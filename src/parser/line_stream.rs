use crate::parser::types::{Method, ParseError, ParseResult, RequestRecord};
use regex::Regex;
use std::io::{self, BufRead};
use std::sync::OnceLock;
use tracing::{debug, trace};

const SEPARATOR: &str = "###";

fn request_line_regex() -> &'static Regex {
    static REQUEST_LINE_REGEX: OnceLock<Regex> = OnceLock::new();
    REQUEST_LINE_REGEX.get_or_init(|| Regex::new(r"^(GET|POST|PUT|DELETE|PATCH)(?-u:\s)").unwrap())
}

fn decode_line(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// 单行的分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `###` 分隔符
    Separator,
    /// 方法 + URL
    RequestLine,
    Header,
    /// 以 `{` 开头，进入 body 模式
    BodyStart,
    BodyContinuation,
    Ignored,
}

/// 逐行累积的解析状态
#[derive(Debug, Default)]
struct Accumulator {
    method: Option<Method>,
    url: String,
    headers: Vec<(String, String)>,
    body: String,
    in_body: bool,
}

impl Accumulator {
    /// 按优先级处理一行，先匹配的规则生效
    fn feed(&mut self, line: &str) -> LineKind {
        let line = line.trim();

        if line.starts_with(SEPARATOR) {
            return LineKind::Separator;
        }

        if request_line_regex().is_match(line) {
            let mut parts = line.split_whitespace();
            let (Some(method), Some(url)) = (parts.next(), parts.next()) else {
                return LineKind::Ignored;
            };
            let Ok(method) = method.parse::<Method>() else {
                return LineKind::Ignored;
            };
            self.method = Some(method);
            self.url = url.to_string();
            self.headers.clear();
            self.in_body = false;
            self.body.clear();
            return LineKind::RequestLine;
        }

        if !self.in_body
            && let Some((key, value)) = line.split_once(':')
        {
            self.headers
                .push((key.trim().to_string(), value.trim().to_string()));
            return LineKind::Header;
        }

        if line.starts_with('{') {
            self.in_body = true;
            self.body.push_str(line);
            return LineKind::BodyStart;
        }

        if self.in_body {
            self.body.push_str(line);
            return LineKind::BodyContinuation;
        }

        LineKind::Ignored
    }

    /// method 和 url 都已设置时，用当前内容生成一条记录并清空状态
    ///
    /// body 模式标记不随之清除，只有新的请求行才会重置它。
    fn take_ready(&mut self) -> Option<RequestRecord> {
        let method = self.method?;
        if self.url.is_empty() {
            return None;
        }

        let mut record = RequestRecord::new(method, &self.url);
        record.headers = std::mem::take(&mut self.headers);
        if !self.body.is_empty() {
            record.body = Some(std::mem::take(&mut self.body));
        }

        self.method = None;
        self.url.clear();
        self.body.clear();
        Some(record)
    }
}

/// `.http` 文件的逐行解析器
///
/// 每处理完一行都会检查是否可以生成记录。请求行本身就满足条件，
/// 因此每条记录只包含请求行的数据；其后的 header 和 body 行
/// 会被累积，但在下一个请求行出现时被丢弃。这一行为与既有的
/// 导出结果保持兼容，不要在这里"修正"。
#[derive(Debug, Default)]
pub struct LineStreamParser {
    state: Accumulator,
    records: Vec<RequestRecord>,
    line_number: usize,
}

impl LineStreamParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// 处理一行输入
    pub fn push_line(&mut self, line: &str) -> LineKind {
        self.line_number += 1;
        let kind = self.state.feed(line);
        if kind == LineKind::Ignored {
            trace!(line = self.line_number, "ignored line");
        }

        if let Some(record) = self.state.take_ready() {
            debug!(
                line = self.line_number,
                method = %record.method,
                url = %record.raw_url(),
                host = %record.url.host(),
                "request record emitted"
            );
            self.records.push(record);
        }
        kind
    }

    /// 已处理的行数
    pub fn lines_seen(&self) -> usize {
        self.line_number
    }

    pub fn finish(self) -> Vec<RequestRecord> {
        self.records
    }

    /// 从行迭代器解析，遇到读取错误立即返回
    pub fn parse_lines<I, S>(lines: I) -> ParseResult<Vec<RequestRecord>>
    where
        I: IntoIterator<Item = io::Result<S>>,
        S: AsRef<str>,
    {
        let mut parser = Self::new();
        for line in lines {
            let line = line.map_err(|source| ParseError::Read {
                line: parser.lines_seen() + 1,
                source,
            })?;
            parser.push_line(line.as_ref());
        }
        Ok(parser.finish())
    }

    /// 按字节读取行，非 UTF-8 内容以 U+FFFD 替换，只有真正的 IO 错误才会返回
    pub fn parse_reader<R: BufRead>(reader: R) -> ParseResult<Vec<RequestRecord>> {
        Self::parse_lines(reader.split(b'\n').map(|line| line.map(decode_line)))
    }

    /// 从内存中的字符串解析，不会失败
    pub fn parse_content(content: &str) -> Vec<RequestRecord> {
        let mut parser = Self::new();
        for line in content.lines() {
            parser.push_line(line);
        }
        parser.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(lines: &[&str]) -> Vec<RequestRecord> {
        LineStreamParser::parse_lines(lines.iter().map(|l| Ok::<_, io::Error>(*l))).unwrap()
    }

    #[test]
    fn test_parse_simple_get() {
        let records = parse(&["GET https://example.com/users"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].method, Method::Get);
        assert_eq!(records[0].name, "https://example.com/users");
        assert_eq!(records[0].url.path, vec!["users"]);
    }

    // Known quirk: the record is emitted right after the request line,
    // so the header that follows never reaches it.
    #[test]
    fn test_record_emitted_before_headers() {
        let records = parse(&["GET https://a.com/x", "Accept: json"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].method, Method::Get);
        assert_eq!(records[0].name, "https://a.com/x");
        assert!(records[0].headers.is_empty());
        assert_eq!(records[0].body, None);
    }

    // Known quirk: body lines after the request line are dropped as well.
    #[test]
    fn test_record_emitted_before_body() {
        let records = parse(&[
            "POST https://a.com/users",
            "Content-Type: application/json",
            "",
            "{",
            "  \"name\": \"test\"",
            "}",
        ]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].method, Method::Post);
        assert!(records[0].headers.is_empty());
        assert_eq!(records[0].body, None);
    }

    #[test]
    fn test_multiple_requests() {
        let records = parse(&[
            "### list",
            "GET https://a.com/users",
            "Accept: application/json",
            "",
            "### create",
            "POST https://a.com/users",
            "{\"name\": \"x\"}",
            "###",
            "DELETE https://a.com/users/1",
        ]);
        let methods: Vec<_> = records.iter().map(|r| r.method).collect();
        assert_eq!(methods, vec![Method::Get, Method::Post, Method::Delete]);
        assert_eq!(records[2].url.path, vec!["users", "1"]);
    }

    #[test]
    fn test_request_line_without_separator() {
        let records = parse(&["PUT a.com/1", "X-A: 1", "PATCH a.com/2"]);
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].method, Method::Patch);
        assert!(records[1].headers.is_empty());
    }

    #[test]
    fn test_separator_does_not_touch_state() {
        let mut acc = Accumulator::default();
        acc.feed("X-Trace: abc");
        acc.feed("{");
        assert_eq!(acc.feed("### next"), LineKind::Separator);
        assert_eq!(acc.headers, vec![("X-Trace".to_string(), "abc".to_string())]);
        assert_eq!(acc.body, "{");
        assert!(acc.in_body);
        assert!(acc.method.is_none());
        assert!(acc.take_ready().is_none());
    }

    #[test]
    fn test_separator_alone_never_emits() {
        assert!(parse(&["###", "### GET https://a.com", "   ###"]).is_empty());
    }

    #[test]
    fn test_no_request_lines() {
        assert!(parse(&["Accept: json", "", "{\"a\": 1}", "random"]).is_empty());
        assert!(parse(&[]).is_empty());
    }

    #[test]
    fn test_header_split_on_first_colon() {
        let mut acc = Accumulator::default();
        assert_eq!(acc.feed("  Host :  example.com:8080  "), LineKind::Header);
        assert_eq!(
            acc.headers,
            vec![("Host".to_string(), "example.com:8080".to_string())]
        );
    }

    #[test]
    fn test_body_mode_classification() {
        let mut acc = Accumulator::default();
        assert_eq!(acc.feed("plain"), LineKind::Ignored);
        assert_eq!(acc.feed("  {\"name\":  "), LineKind::Header);
        acc.headers.clear();
        assert_eq!(acc.feed("{"), LineKind::BodyStart);
        assert_eq!(acc.feed("  \"name\": \"x\"  "), LineKind::BodyContinuation);
        assert_eq!(acc.feed(""), LineKind::BodyContinuation);
        assert_eq!(acc.feed("}"), LineKind::BodyContinuation);
        assert!(acc.headers.is_empty());
        assert_eq!(acc.body, "{\"name\": \"x\"}");
    }

    #[test]
    fn test_body_survives_into_take_ready() {
        let mut acc = Accumulator::default();
        acc.feed("{}");
        acc.method = Some(Method::Post);
        acc.url = "a.com".to_string();
        let record = acc.take_ready().unwrap();
        assert_eq!(record.body.as_deref(), Some("{}"));
        assert!(acc.body.is_empty());
        // body 模式在生成记录后保持不变
        assert!(acc.in_body);
    }

    #[test]
    fn test_request_line_resets_body_mode() {
        let mut acc = Accumulator::default();
        acc.feed("{");
        assert_eq!(acc.feed("GET a.com"), LineKind::RequestLine);
        assert!(!acc.in_body);
        assert!(acc.body.is_empty());
    }

    #[test]
    fn test_method_must_be_followed_by_whitespace() {
        let records = parse(&["GET", "GEThttps://a.com", "get https://a.com", "HEAD https://a.com"]);
        assert!(records.is_empty());
    }

    #[test]
    fn test_tab_separated_request_line() {
        let records = parse(&["\tDELETE\thttps://a.com/1\tHTTP/1.1"]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].method, Method::Delete);
        assert_eq!(records[0].name, "https://a.com/1");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let content = "GET https://a.com/1\nX: 1\n###\nPOST a.com/2\n{}\n";
        assert_eq!(
            LineStreamParser::parse_content(content),
            LineStreamParser::parse_content(content)
        );
    }

    #[test]
    fn test_read_error_is_surfaced() {
        let lines = vec![
            Ok("GET https://a.com".to_string()),
            Err(io::Error::new(io::ErrorKind::InvalidData, "bad utf-8")),
        ];
        let err = LineStreamParser::parse_lines(lines).unwrap_err();
        match err {
            ParseError::Read { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unicode_space_is_not_a_request_separator() {
        let records = parse(&["GET\u{3000}https://a.com/x"]);
        assert!(records.is_empty());

        let mut acc = Accumulator::default();
        assert_eq!(acc.feed("GET\u{3000}https://a.com/x"), LineKind::Header);
        assert_eq!(acc.headers[0].0, "GET\u{3000}https");
    }

    #[test]
    fn test_parse_reader_replaces_invalid_utf8() {
        let input: &[u8] = b"GET https://a.com/x\nnote caf\xe9\n###\nPOST https://a.com/y\n";
        let records = LineStreamParser::parse_reader(input).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].method, Method::Post);
    }

    #[test]
    fn test_invalid_utf8_in_body_is_replaced() {
        let mut parser = LineStreamParser::new();
        let line = decode_line(b"{caf\xe9}\r".to_vec());
        assert_eq!(parser.push_line(&line), LineKind::BodyStart);
        assert_eq!(parser.state.body, "{caf\u{FFFD}}");
    }

    #[test]
    fn test_parse_reader_handles_crlf() {
        let input = "GET https://a.com/x\r\nAccept: */*\r\n".as_bytes();
        let records = LineStreamParser::parse_reader(input).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url.path, vec!["x"]);
    }
}
