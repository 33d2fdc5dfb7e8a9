// src/core/net.rs
//
// Blocking HTTP/1.0 GET over TCP (std-only), plus the Fetch boundary the
// traversals go through so tests can run against canned pages.

use std::{
    io::{Read, Write},
    net::TcpStream,
    time::Duration,
};

use crate::error::ScrapeError;

const TIMEOUT_SECS: u64 = 15;
const MAX_REDIRECTS: usize = 5;

/// Page retrieval boundary.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError>;
}

/// Live fetcher used by the CLI.
pub struct HttpFetch;

impl Fetch for HttpFetch {
    fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        http_get(url)
    }
}

pub fn http_get(url: &str) -> Result<String, ScrapeError> {
    let mut target = s!(url);
    for _ in 0..=MAX_REDIRECTS {
        match http_get_once(&target)? {
            Response::Body(body) => return Ok(body),
            Response::Redirect(location) => {
                target = crate::core::url::resolve(&target, &location);
            }
        }
    }
    Err(ScrapeError::fetch(url, "too many redirects"))
}

enum Response {
    Body(String),
    Redirect(String),
}

fn split_url(url: &str) -> Result<(String, String), ScrapeError> {
    let rest = url
        .strip_prefix("http://")
        .ok_or_else(|| ScrapeError::fetch(url, "only http:// URLs are supported"))?;
    let (host, path) = match rest.find('/') {
        Some(i) => (&rest[..i], &rest[i..]),
        None => (rest, "/"),
    };
    // The fragment is client-side only.
    let path = path.split('#').next().unwrap_or(path);
    if host.is_empty() {
        return Err(ScrapeError::fetch(url, "missing host"));
    }
    Ok((s!(host), s!(path)))
}

fn http_get_once(url: &str) -> Result<Response, ScrapeError> {
    let (host, path) = split_url(url)?;
    let io_err = |e: std::io::Error| ScrapeError::fetch(url, &e.to_string());

    let mut s = TcpStream::connect((host.as_str(), 80)).map_err(io_err)?;
    s.set_read_timeout(Some(Duration::from_secs(TIMEOUT_SECS))).map_err(io_err)?;
    s.set_write_timeout(Some(Duration::from_secs(TIMEOUT_SECS))).map_err(io_err)?;

    let req = format!(
        "GET {path} HTTP/1.0\r\nHost: {host}\r\nUser-Agent: parl_scrape/0.3\r\nConnection: close\r\n\r\n"
    );
    s.write_all(req.as_bytes()).map_err(io_err)?;
    s.flush().map_err(io_err)?;

    let mut buf = Vec::new();
    s.read_to_end(&mut buf).map_err(io_err)?;
    let resp = String::from_utf8_lossy(&buf);

    let status = resp.split("\r\n").next().unwrap_or("");
    let head_end = resp
        .find("\r\n\r\n")
        .ok_or_else(|| ScrapeError::fetch(url, "malformed HTTP response"))?;

    if status.contains(" 301 ") || status.contains(" 302 ") || status.contains(" 303 ") {
        for line in resp[..head_end].split("\r\n").skip(1) {
            if let Some((key, value)) = line.split_once(':') {
                if key.eq_ignore_ascii_case("location") {
                    return Ok(Response::Redirect(s!(value.trim())));
                }
            }
        }
        return Err(ScrapeError::fetch(url, "redirect without Location header"));
    }
    if !status.contains("200") {
        return Err(ScrapeError::fetch(url, &format!("HTTP error: {status}")));
    }
    Ok(Response::Body(resp[head_end + 4..].to_string()))
}
