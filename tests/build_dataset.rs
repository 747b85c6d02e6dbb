use std::fs;
use std::path::Path;

use lure::prelude::*;
use serde_json::json;

fn write(dir: &Path, name: &str, body: &str) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(name), body).unwrap();
}

fn config(root: &Path) -> Config {
    Config {
        output: root.join("output").join("phishing_dataset.csv"),
        recursive: false,
        extension: "json".into(),
        categories: vec![
            Category { name: "benign".into(), label: 1, path: root.join("benign") },
            Category { name: "malicious".into(), label: 0, path: root.join("malicious") },
        ],
    }
}

#[test]
fn builds_rectangular_csv_from_both_populations() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    let benign = json!({
        "url": "https://www.example.com/",
        "dns_status": "resolved",
        "content_status": 200,
        "tech_info": ["nginx"],
        "host_info": {"ip": "93.184.216.34", "country": "US"},
        "content_info": {"status_code": 200, "title": "Example", "html": "<html><a href=\"/\">x</a></html>"}
    });
    let phish = json!({
        "url": "https://aaaaaaaaaaaaaaaab.ar-io.dev/login",
        "content_status": 404,
        "content_info": "not an object",
        "additional": {"flags": [true, false]}
    });
    write(&root.join("benign"), "site.json", &benign.to_string());
    write(&root.join("malicious"), "phish.json", &phish.to_string());
    write(&root.join("malicious"), "empty.json", "");
    write(&root.join("malicious"), "array.json", "[]");

    let report = Lure::new(config(root)).run().unwrap();
    assert_eq!(report.files_seen, 4);
    assert_eq!(report.rows, 2);
    assert_eq!(report.skipped_total(), 2);
    assert_eq!(report.extractor_failures, 1);

    let mut reader = csv::Reader::from_path(root.join("output").join("phishing_dataset.csv")).unwrap();
    let headers = reader.headers().unwrap().clone();
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);

    let col = |name: &str| headers.iter().position(|h| h == name).unwrap_or_else(|| panic!("missing column {name}"));
    let n = headers.len();
    assert_eq!(&headers[n - 3], "label");
    assert_eq!(&headers[n - 2], "filename");
    assert_eq!(&headers[n - 1], "category");
    assert!(rows.iter().all(|r| r.len() == n));

    let (b, m) = (&rows[0], &rows[1]);
    assert_eq!(&b[col("label")], "1");
    assert_eq!(&b[col("category")], "benign");
    assert_eq!(&b[col("filename")], "site.json");
    assert_eq!(&b[col("host_has_country")], "1");
    assert_eq!(&b[col("is_http_ok")], "1");
    assert_eq!(&b[col("num_links")], "1");

    assert_eq!(&m[col("label")], "0");
    assert_eq!(&m[col("filename")], "phish.json");
    assert_eq!(&m[col("is_http_client_error")], "1");
    assert_eq!(&m[col("contains_random_subdomain")], "1");
    assert_eq!(&m[col("contains_suspicious_keyword")], "1");
    // the content section failed: its cells are zero-filled and the crawled URL length survives
    assert_eq!(&m[col("num_requests")], "0");
    assert_eq!(&m[col("url_length")], "https://aaaaaaaaaaaaaaaab.ar-io.dev/login".len().to_string());
    assert_eq!(&m[col("additional_num_true_flags")], "1");
}

#[test]
fn missing_directories_still_produce_output() {
    let dir = tempfile::tempdir().unwrap();
    let report = Lure::new(config(dir.path())).run().unwrap();
    assert_eq!(report.rows, 0);
    assert_eq!(report.missing_categories, vec!["benign", "malicious"]);
    let text = fs::read_to_string(dir.path().join("output").join("phishing_dataset.csv")).unwrap();
    assert_eq!(text, "label,filename,category\n");
}
