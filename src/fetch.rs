use std::sync::LazyLock;

use async_trait::async_trait;
use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, warn};

use crate::error::{Result, ScrapeError};

const USER_AGENT: &str = concat!("bseu_staff/", env!("CARGO_PKG_VERSION"));

/// How far into the body a `<meta>` charset declaration is looked for.
const META_SNIFF_BYTES: usize = 1024;

static META_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)<meta[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).unwrap()
});

/// Anything that can hand back the body of a page by URL.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET through one shared reqwest client.
pub struct HttpSource {
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ScrapeError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for HttpSource {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let transport = |source| ScrapeError::Transport {
            url: url.to_string(),
            source,
        };

        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(transport)?;

        // Status is not an error on its own; the body is parsed regardless.
        let status = response.status();
        if !status.is_success() {
            warn!("{} answered {}", url, status);
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(transport)?;

        Ok(decode_body(&body, content_type.as_deref()))
    }
}

/// Decode a page body. Charset comes from the `Content-Type` header, then a
/// `<meta>` declaration near the top of the page, then UTF-8. A BOM beats all three.
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(header_charset)
        .or_else(|| meta_charset(body))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        debug!("Body had bytes invalid for {}", used.name());
    }
    text.into_owned()
}

fn header_charset(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches(|c| c == '"' || c == '\'').as_bytes())
    })
}

fn meta_charset(body: &[u8]) -> Option<&'static Encoding> {
    let head = &body[..body.len().min(META_SNIFF_BYTES)];
    let label = META_CHARSET_RE.captures(head)?.get(1)?;
    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use encoding_rs::WINDOWS_1251;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    fn cp1251(s: &str) -> Vec<u8> {
        WINDOWS_1251.encode(s).0.into_owned()
    }

    /// Serve one canned HTTP response on a local port; returns the page URL.
    async fn serve_once(status: &str, content_type: &str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let head = format!(
            "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            status,
            content_type,
            body.len()
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket.write_all(head.as_bytes()).await.unwrap();
            socket.write_all(&body).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}/PersonalPages/x.htm", addr)
    }

    #[tokio::test]
    async fn meta_declared_windows_1251_is_decoded() {
        let mut body = br#"<html><head><meta http-equiv="Content-Type" content="text/html; charset=windows-1251"></head><body>"#.to_vec();
        body.extend(cp1251("Доцент"));
        body.extend_from_slice(b"</body></html>");

        let url = serve_once("200 OK", "text/html", body).await;
        let text = HttpSource::new().unwrap().fetch_text(&url).await.unwrap();
        assert!(text.contains("<body>Доцент</body>"), "{}", text);
    }

    #[tokio::test]
    async fn not_found_body_is_still_returned() {
        let url = serve_once(
            "404 Not Found",
            "text/html; charset=utf-8",
            "<h1>Страница не найдена</h1>".as_bytes().to_vec(),
        )
        .await;
        let text = HttpSource::new().unwrap().fetch_text(&url).await.unwrap();
        assert_eq!(text, "<h1>Страница не найдена</h1>");
    }

    #[tokio::test]
    async fn refused_connection_is_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/index.htm", listener.local_addr().unwrap());
        drop(listener);

        match HttpSource::new().unwrap().fetch_text(&url).await.unwrap_err() {
            ScrapeError::Transport { url: failed, .. } => assert_eq!(failed, url),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn header_charset_beats_meta() {
        let mut body = br#"<meta charset="utf-8">"#.to_vec();
        body.extend(cp1251("Профессор"));
        let text = decode_body(&body, Some("text/html; Charset=\"windows-1251\""));
        assert!(text.ends_with("Профессор"));
    }

    #[test]
    fn html5_meta_charset() {
        let mut body = b"<!DOCTYPE html><meta charset=cp1251><p>".to_vec();
        body.extend(cp1251("Ассистент"));
        assert!(decode_body(&body, None).ends_with("Ассистент"));
    }

    #[test]
    fn meta_past_sniff_window_is_ignored() {
        let mut body = vec![b' '; META_SNIFF_BYTES];
        body.extend_from_slice(br#"<meta charset="windows-1251">"#);
        body.extend("Доцент".as_bytes());
        assert!(decode_body(&body, None).ends_with("Доцент"));
    }

    #[test]
    fn unknown_label_falls_back_to_utf8() {
        let text = decode_body("Иванов".as_bytes(), Some("text/html; charset=bogus"));
        assert_eq!(text, "Иванов");
    }
}
