//! Features of the rendered page: HTML body, redirect destination, HAR
//! network log and downloaded response descriptors.

use std::collections::HashSet;

use serde_json::Value;

use super::url::IP_HOST;
use super::{ExtractError, Extractor, Section};
use crate::features::FeatureVector;
use crate::fields::{char_len, FieldExt, Object};

const LOADER_PHRASES: &[&str] = &["please wait", "loading", "redirect"];
const DECENTRALIZED_HOSTS: &[&str] = &[".ar-io.dev", "arweave"];

const FEATURES: &[&str] = &[
    "status_code",
    "has_error",
    "title_length",
    "has_html",
    "html_length",
    "contains_loader_text",
    "contains_script_tag",
    "contains_iframe",
    "contains_form",
    "num_links",
    "num_scripts",
    "url_length",
    "num_subdomains",
    "uses_https",
    "contains_ip_in_url",
    "contains_encoded_chars",
    "is_arweave_host",
    "num_requests",
    "num_responses",
    "has_cloudflare",
    "has_aws_cloudfront",
    "has_tencent_cos",
    "num_js_files",
    "num_css_files",
    "num_html_files",
    "has_gzip_encoding",
    "has_csp_header",
    "num_unique_md5",
    "avg_file_size_class",
    "num_long_lines_files",
    "num_ascii_files",
    "is_suspicious_loader_page",
    "is_heavy_page",
];

pub struct ContentExtractor;

impl Extractor for ContentExtractor {
    fn name(&self) -> &'static str { "content" }
    fn section(&self) -> Section { Section::Key("content_info") }
    fn feature_names(&self) -> &'static [&'static str] { FEATURES }

    fn extract(&self, content: &Object) -> Result<FeatureVector, ExtractError> {
        Ok(content_features(content))
    }
}

fn content_features(content: &Object) -> FeatureVector {
    let mut f = FeatureVector::new();

    // Page metadata
    let html = content.str_or_empty("html");
    let html_length = char_len(html);
    f.insert("status_code", content.int_or_zero("status_code"));
    f.insert("has_error", content.field("error_msg").is_some());
    f.insert("title_length", char_len(content.str_or_empty("title")));
    f.insert("has_html", !html.is_empty());
    f.insert("html_length", html_length);

    let html = html.to_lowercase();
    let loader_text = LOADER_PHRASES.iter().any(|p| html.contains(p));
    f.insert("contains_loader_text", loader_text);
    f.insert("contains_script_tag", html.contains("<script"));
    f.insert("contains_iframe", html.contains("<iframe"));
    f.insert("contains_form", html.contains("<form"));
    f.insert("num_links", html.matches("href=").count());
    f.insert("num_scripts", html.matches("<script").count());

    // Redirect destination
    let destination = content.str_or_empty("destination");
    let destination_length = char_len(destination);
    f.insert("url_length", destination_length);
    f.insert("num_subdomains", destination.matches('.').count());
    f.insert("uses_https", destination.starts_with("https"));
    f.insert("contains_ip_in_url", IP_HOST.is_match(destination));
    f.insert("contains_encoded_chars", destination.contains(['%', '+', '-', '_']));
    f.insert("is_arweave_host", DECENTRALIZED_HOSTS.iter().any(|h| destination.contains(h)));

    // Network log
    let har = content.array("har");
    let responses = content.array("responses");
    f.insert("num_requests", har.len());
    f.insert("num_responses", responses.len());

    let headers = HeaderSummary::collect(har);
    let servers = headers.servers.join(" ");
    let content_types = headers.content_types.join(" ");
    let js_files = headers.content_types.iter().filter(|t| t.contains("javascript")).count();
    f.insert("has_cloudflare", servers.contains("cloudflare"));
    f.insert("has_aws_cloudfront", servers.contains("cloudfront"));
    f.insert("has_tencent_cos", servers.contains("tencent-cos"));
    f.insert("num_js_files", js_files);
    f.insert("num_css_files", headers.content_types.iter().filter(|t| t.contains("css")).count());
    f.insert("num_html_files", headers.content_types.iter().filter(|t| t.contains("html")).count());
    f.insert("has_gzip_encoding", content_types.contains("gzip"));
    f.insert("has_csp_header", content_types.contains("content-security-policy"));

    // Response descriptors
    let responses: Vec<&Object> = responses.iter().filter_map(Value::as_object).collect();
    let md5s: HashSet<&str> = responses.iter().filter_map(|r| r.field("md5").and_then(Value::as_str)).collect();
    let file_types: Vec<String> = responses.iter().map(|r| r.str_or_empty("file_type").to_lowercase()).collect();
    let descriptor_chars: usize = responses.iter().map(|r| char_len(r.str_or_empty("file_type"))).sum();
    f.insert("num_unique_md5", md5s.len());
    f.insert("avg_file_size_class", descriptor_chars as f64 / responses.len().max(1) as f64);
    f.insert("num_long_lines_files", file_types.iter().filter(|t| t.contains("long lines")).count());
    f.insert("num_ascii_files", file_types.iter().filter(|t| t.contains("ascii")).count());

    // Composite heuristics
    f.insert("is_suspicious_loader_page", loader_text && js_files > 3 && destination_length > 100);
    f.insert("is_heavy_page", html_length > 10_000 && har.len() > 5);

    f
}

/// Lowercased `server` and `content-type` response header values across all HAR entries.
#[derive(Debug, Default)]
struct HeaderSummary {
    servers: Vec<String>,
    content_types: Vec<String>,
}

impl HeaderSummary {
    fn collect(har: &[Value]) -> Self {
        let mut out = Self::default();
        let headers = har
            .iter()
            .filter_map(Value::as_object)
            .filter_map(|entry| entry.object("response"))
            .flat_map(|response| response.array("headers"))
            .filter_map(Value::as_object);
        for h in headers {
            // HAR 1.2 uses "name"; some crawlers emit "key"
            let key = match h.str_or_empty("key") {
                "" => h.str_or_empty("name"),
                k => k,
            };
            let value = h.str_or_empty("value").to_lowercase();
            match key.to_lowercase().as_str() {
                "server" => out.servers.push(value),
                "content-type" => out.content_types.push(value),
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureValue;
    use serde_json::json;

    fn extract(v: Value) -> FeatureVector {
        ContentExtractor.extract(v.as_object().unwrap()).unwrap()
    }

    fn int(fv: &FeatureVector, name: &str) -> i64 {
        match fv.get(name) {
            Some(FeatureValue::Int(i)) => i,
            other => panic!("{name}: {other:?}"),
        }
    }

    fn header(key: &str, value: &str) -> Value {
        json!({"key": key, "value": value})
    }

    #[test]
    fn cloudflare_server_header() {
        let fv = extract(json!({"har": [{"response": {"headers": [{"key": "Server", "value": "cloudflare"}]}}]}));
        assert_eq!(int(&fv, "has_cloudflare"), 1);
        assert_eq!(int(&fv, "has_aws_cloudfront"), 0);
        assert_eq!(int(&fv, "num_requests"), 1);
    }

    #[test]
    fn loader_text_alone_is_not_heavy() {
        let fv = extract(json!({"html": "<script>please wait</script>"}));
        assert_eq!(int(&fv, "contains_loader_text"), 1);
        assert_eq!(int(&fv, "contains_script_tag"), 1);
        assert_eq!(int(&fv, "num_scripts"), 1);
        assert_eq!(int(&fv, "num_requests"), 0);
        assert_eq!(int(&fv, "is_heavy_page"), 0);
        assert_eq!(int(&fv, "is_suspicious_loader_page"), 0);
    }

    #[test]
    fn heavy_page_needs_large_html_and_many_requests() {
        let html = "x".repeat(10_001);
        let har: Vec<Value> = (0..6).map(|_| json!({})).collect();
        let fv = extract(json!({"html": html, "har": har}));
        assert_eq!(int(&fv, "html_length"), 10_001);
        assert_eq!(int(&fv, "is_heavy_page"), 1);

        let fv = extract(json!({"html": "x".repeat(10_000), "har": har}));
        assert_eq!(int(&fv, "is_heavy_page"), 0);
    }

    #[test]
    fn suspicious_loader_page() {
        let destination = format!("https://{}.ar-io.dev/{}", "a".repeat(60), "b".repeat(40));
        let js = header("Content-Type", "application/javascript");
        let har: Vec<Value> = (0..4).map(|_| json!({"response": {"headers": [js.clone()]}})).collect();
        let fv = extract(json!({"html": "<div>Loading...</div>", "destination": destination, "har": har}));
        assert_eq!(int(&fv, "num_js_files"), 4);
        assert_eq!(int(&fv, "is_arweave_host"), 1);
        assert_eq!(int(&fv, "uses_https"), 1);
        assert_eq!(int(&fv, "contains_encoded_chars"), 1);
        assert_eq!(int(&fv, "is_suspicious_loader_page"), 1);
    }

    #[test]
    fn page_metadata() {
        let fv = extract(json!({
            "status_code": "200",
            "error_msg": "timeout",
            "title": "Sign in",
            "html": "<FORM action=x><a HREF=1></a><a href=2></a><iframe></iframe></form>",
            "destination": "http://10.0.0.1/login"
        }));
        assert_eq!(int(&fv, "status_code"), 200);
        assert_eq!(int(&fv, "has_error"), 1);
        assert_eq!(int(&fv, "title_length"), 7);
        assert_eq!(int(&fv, "has_html"), 1);
        assert_eq!(int(&fv, "contains_form"), 1);
        assert_eq!(int(&fv, "contains_iframe"), 1);
        assert_eq!(int(&fv, "num_links"), 2);
        assert_eq!(int(&fv, "contains_ip_in_url"), 1);
        assert_eq!(int(&fv, "num_subdomains"), 3);
        assert_eq!(int(&fv, "uses_https"), 0);
    }

    #[test]
    fn null_error_msg_is_not_an_error() {
        let fv = extract(json!({"error_msg": null, "title": null, "html": null}));
        assert_eq!(int(&fv, "has_error"), 0);
        assert_eq!(int(&fv, "title_length"), 0);
        assert_eq!(int(&fv, "has_html"), 0);
    }

    #[test]
    fn header_fingerprints_and_content_types() {
        let fv = extract(json!({"har": [
            {"response": {"headers": [header("server", "AmazonS3 CloudFront"), header("content-type", "text/css")]}},
            {"response": {"headers": [header("Server", "tencent-cos"), header("Content-Type", "text/html; charset=utf-8")]}},
            {"response": {"headers": [{"name": "content-type", "value": "application/x-gzip"}]}},
            {"response": {"headers": [header("content-type", "content-security-policy")]}}
        ]}));
        assert_eq!(int(&fv, "has_aws_cloudfront"), 1);
        assert_eq!(int(&fv, "has_tencent_cos"), 1);
        assert_eq!(int(&fv, "has_cloudflare"), 0);
        assert_eq!(int(&fv, "num_css_files"), 1);
        assert_eq!(int(&fv, "num_html_files"), 1);
        assert_eq!(int(&fv, "has_gzip_encoding"), 1);
        assert_eq!(int(&fv, "has_csp_header"), 1);
    }

    #[test]
    fn response_descriptors() {
        let fv = extract(json!({"responses": [
            {"md5": "aaa", "file_type": "ASCII text, with very long lines"},
            {"md5": "aaa", "file_type": "HTML document"},
            {"md5": "bbb"},
            {"md5": null, "file_type": "data"}
        ]}));
        assert_eq!(int(&fv, "num_responses"), 4);
        assert_eq!(int(&fv, "num_unique_md5"), 2);
        assert_eq!(int(&fv, "num_long_lines_files"), 1);
        assert_eq!(int(&fv, "num_ascii_files"), 1);
        let chars = char_len("ASCII text, with very long lines") + char_len("HTML document") + char_len("data");
        let expected = chars as f64 / 4.0;
        assert_eq!(fv.get("avg_file_size_class"), Some(FeatureValue::Float(expected)));
    }

    #[test]
    fn non_object_responses_do_not_dilute_the_average() {
        let fv = extract(json!({"responses": [{"file_type": "data"}, null, "junk", 7]}));
        assert_eq!(int(&fv, "num_responses"), 4);
        assert_eq!(fv.get("avg_file_size_class"), Some(FeatureValue::Float(4.0)));

        let fv = extract(json!({"responses": [null, "junk"]}));
        assert_eq!(fv.get("avg_file_size_class"), Some(FeatureValue::Float(0.0)));
    }

    #[test]
    fn missing_nested_structures_do_not_fail() {
        let fv = extract(json!({
            "har": [null, 3, {}, {"response": null}, {"response": {"headers": null}}, {"response": {"headers": ["x", {"key": 1}]}}],
            "responses": "not a list"
        }));
        assert_eq!(int(&fv, "num_requests"), 6);
        assert_eq!(int(&fv, "num_responses"), 0);
        assert_eq!(fv.get("avg_file_size_class"), Some(FeatureValue::Float(0.0)));
        assert_eq!(fv.len(), FEATURES.len());
    }
}
