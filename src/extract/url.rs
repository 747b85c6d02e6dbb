//! Lexical and structural features of the crawled URL plus the top-level
//! DNS / HTTP status and technology fingerprint summaries.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ExtractError, Extractor, Section};
use crate::features::FeatureVector;
use crate::fields::{char_len, round3, FieldExt, Object};

pub(crate) static IP_HOST: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\d{1,3}(?:\.\d{1,3}){3}").unwrap());
static FILE_EXTENSION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([a-zA-Z0-9]{1,6})$").unwrap());
static RANDOM_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9a-z]{15,}").unwrap());
static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d").unwrap());
static URL_SPLIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:([A-Za-z][A-Za-z0-9+.-]*):)?(?://([^/?#]*))?([^?#]*)(?:\?([^#]*))?").unwrap());

/// Schemes whose last path segment may carry `;params`.
const PARAM_SCHEMES: &[&str] =
    &["", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtspu", "sip", "sips", "mms", "sftp", "tel"];

const SUSPICIOUS_TERMS: &[&str] = &["login", "update", "verify", "secure", "bank", "account", "signin", "password", "confirm"];

const FEATURES: &[&str] = &[
    "url_length",
    "scheme_http",
    "scheme_https",
    "path_length",
    "query_length",
    "num_path_segments",
    "num_query_params",
    "has_query",
    "has_file_extension",
    "file_extension_len",
    "has_subdomain",
    "subdomain_length",
    "num_subdomain_levels",
    "contains_random_subdomain",
    "num_digits_in_url",
    "num_special_chars",
    "contains_ip_in_url",
    "contains_encoded_chars",
    "contains_suspicious_keyword",
    "digit_ratio",
    "special_char_ratio",
    "dns_resolves",
    "dns_error",
    "content_status",
    "is_http_ok",
    "is_http_redirect",
    "is_http_client_error",
    "is_http_server_error",
    "is_complex_url",
    "is_suspicious_dns_or_status",
    "tech_info_count",
    "has_tech_info",
];

pub struct UrlExtractor;

impl Extractor for UrlExtractor {
    fn name(&self) -> &'static str { "url" }
    fn section(&self) -> Section { Section::Root }
    fn feature_names(&self) -> &'static [&'static str] { FEATURES }

    fn extract(&self, record: &Object) -> Result<FeatureVector, ExtractError> {
        Ok(url_features(record))
    }
}

/// scheme / netloc / path / query split of a possibly relative URL, taken
/// from the raw text without any normalization.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct UrlParts {
    pub scheme: String,
    pub netloc: String,
    pub path: String,
    pub query: String,
}

impl UrlParts {
    pub fn parse(raw: &str) -> Self {
        let cleaned: String = raw
            .trim_start_matches(|c: char| c <= ' ')
            .chars()
            .filter(|c| !matches!(c, '\t' | '\r' | '\n'))
            .collect();
        let Some(caps) = URL_SPLIT.captures(&cleaned) else { return Self::default() };
        let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");

        let scheme = group(1).to_ascii_lowercase();
        let mut path = group(3);
        if PARAM_SCHEMES.contains(&scheme.as_str()) {
            path = strip_params(path);
        }
        Self { netloc: group(2).to_string(), path: path.to_string(), query: group(4).to_string(), scheme }
    }
}

/// Drop `;params` from the last path segment.
fn strip_params(path: &str) -> &str {
    let from = path.rfind('/').unwrap_or(0);
    match path[from..].find(';') {
        Some(i) => &path[..from + i],
        None => path,
    }
}

fn url_features(record: &Object) -> FeatureVector {
    let mut f = FeatureVector::new();

    // URL structure
    let url = record.str_or_empty("url");
    let parsed = UrlParts::parse(url);
    let url_length = char_len(url);
    f.insert("url_length", url_length);
    f.insert("scheme_http", parsed.scheme == "http");
    f.insert("scheme_https", parsed.scheme == "https");

    let path = parsed.path.as_str();
    let query = parsed.query.as_str();
    f.insert("path_length", char_len(path));
    f.insert("query_length", char_len(query));
    f.insert("num_path_segments", path.matches('/').count());
    f.insert("num_query_params", if query.is_empty() { 0 } else { query.matches('&').count() + 1 });
    f.insert("has_query", !query.is_empty());

    let extension = FILE_EXTENSION.captures(path).and_then(|c| c.get(1)).map(|m| m.as_str());
    f.insert("has_file_extension", extension.is_some());
    f.insert("file_extension_len", extension.map(char_len).unwrap_or(0));

    // Subdomain
    let subdomain = match record.str_or_empty("subdomain") {
        "" => parsed.netloc.as_str(),
        s => s,
    };
    let random_subdomain = RANDOM_LABEL.is_match(subdomain);
    f.insert("has_subdomain", record.flag("has_subdomain"));
    f.insert("subdomain_length", char_len(subdomain));
    f.insert("num_subdomain_levels", subdomain.matches('.').count());
    f.insert("contains_random_subdomain", random_subdomain);

    // Lexical indicators
    let digits = DIGIT.find_iter(url).count();
    let special = url.chars().filter(|c| !c.is_ascii_alphanumeric()).count();
    let lowered = url.to_lowercase();
    f.insert("num_digits_in_url", digits);
    f.insert("num_special_chars", special);
    f.insert("contains_ip_in_url", IP_HOST.is_match(url));
    f.insert("contains_encoded_chars", url.contains(['%', '+', '-', '_', '=']));
    f.insert("contains_suspicious_keyword", SUSPICIOUS_TERMS.iter().any(|t| lowered.contains(t)));
    f.insert("digit_ratio", round3(digits as f64 / (url_length + 1) as f64));
    f.insert("special_char_ratio", round3(special as f64 / (url_length + 1) as f64));

    // DNS and HTTP status
    let dns_status = record.text("dns_status").to_lowercase();
    let dns_error = dns_status.contains("error") || dns_status.contains("fail");
    f.insert("dns_resolves", dns_status.contains("resolve"));
    f.insert("dns_error", dns_error);

    let status = record.int_or_zero("content_status");
    let bucket = StatusBucket::of(status);
    f.insert("content_status", status);
    f.insert("is_http_ok", bucket == Some(StatusBucket::Ok));
    f.insert("is_http_redirect", bucket == Some(StatusBucket::Redirect));
    f.insert("is_http_client_error", bucket == Some(StatusBucket::ClientError));
    f.insert("is_http_server_error", bucket == Some(StatusBucket::ServerError));

    // Composite heuristics
    f.insert("is_complex_url", url_length > 80 || special > 10 || random_subdomain);
    f.insert(
        "is_suspicious_dns_or_status",
        dns_error || matches!(bucket, Some(StatusBucket::ClientError | StatusBucket::ServerError)),
    );

    let tech_count = record.len_of("tech_info");
    f.insert("tech_info_count", tech_count);
    f.insert("has_tech_info", tech_count > 0);

    f
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusBucket {
    Ok,
    Redirect,
    ClientError,
    ServerError,
}

impl StatusBucket {
    fn of(status: i64) -> Option<Self> {
        match status {
            200..=299 => Some(Self::Ok),
            300..=399 => Some(Self::Redirect),
            400..=499 => Some(Self::ClientError),
            500..=599 => Some(Self::ServerError),
            _ => None,
        }
    }
}
