//! Hosting metadata: resolved addresses, network owner, exposed ports and TLS.

use std::collections::BTreeSet;

use serde_json::Value;

use super::{ExtractError, Extractor, Section};
use crate::features::FeatureVector;
use crate::fields::{as_int, FieldExt, Object};

const CLOUD_PROVIDERS: &[&str] = &[
    "amazon", "aws", "google", "microsoft", "azure", "cloudflare", "digitalocean", "ovh", "hetzner", "alibaba", "tencent", "linode", "vultr", "fastly",
];
const FREE_CERT_ISSUERS: &[&str] = &["let's encrypt", "zerossl", "cpanel", "google trust services"];
const STANDARD_PORTS: &[i64] = &[80, 443];

const FEATURES: &[&str] = &[
    "host_info_present",
    "host_num_keys",
    "host_num_ips",
    "host_has_ipv6",
    "host_has_asn",
    "host_has_country",
    "host_num_open_ports",
    "host_has_nonstandard_port",
    "host_num_hostnames",
    "host_is_cloud_hosted",
    "host_has_tls",
    "host_free_cert_issuer",
];

pub struct HostExtractor;

impl Extractor for HostExtractor {
    fn name(&self) -> &'static str { "host" }
    fn section(&self) -> Section { Section::Key("host_info") }
    fn feature_names(&self) -> &'static [&'static str] { FEATURES }

    fn extract(&self, host: &Object) -> Result<FeatureVector, ExtractError> {
        Ok(host_features(host))
    }
}

fn host_features(host: &Object) -> FeatureVector {
    let mut f = FeatureVector::new();
    f.insert("host_info_present", !host.is_empty());
    f.insert("host_num_keys", host.len());

    let mut ips: BTreeSet<&str> = host.array("ips").iter().filter_map(Value::as_str).filter(|s| !s.is_empty()).collect();
    let ip = host.str_or_empty("ip");
    if !ip.is_empty() { ips.insert(ip); }
    f.insert("host_num_ips", ips.len());
    f.insert("host_has_ipv6", ips.iter().any(|ip| ip.contains(':')));

    f.insert("host_has_asn", host.field("asn").is_some());
    f.insert("host_has_country", !host.str_or_empty("country").is_empty());

    let ports = host.array("ports");
    f.insert("host_num_open_ports", ports.len());
    f.insert(
        "host_has_nonstandard_port",
        ports.iter().map(as_int).any(|p| p > 0 && !STANDARD_PORTS.contains(&p)),
    );
    f.insert("host_num_hostnames", host.len_of("hostnames"));

    let owner = ["org", "isp", "as_name"].iter().map(|k| host.str_or_empty(k).to_lowercase()).collect::<Vec<_>>().join(" ");
    f.insert("host_is_cloud_hosted", CLOUD_PROVIDERS.iter().any(|p| owner.contains(p)));

    let tls = ["tls", "certificate"].iter().find_map(|k| host.object(k).filter(|o| !o.is_empty()));
    let issuer = tls.map(|t| t.text("issuer").to_lowercase()).unwrap_or_default();
    f.insert("host_has_tls", tls.is_some());
    f.insert("host_free_cert_issuer", FREE_CERT_ISSUERS.iter().any(|i| issuer.contains(i)));

    f
}
