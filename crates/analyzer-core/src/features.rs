//! URL feature extraction - mirrors the training-time implementation exactly.
//!
//! Each URL → fixed vector of 8 numeric features, in the column order the
//! standardizer and model were fitted with:
//! `url_length, domain_length, num_subdomains, has_https,
//! num_special_chars, query_length, path_length, trusted_domain`.
//!
//! Extraction is total: any string yields a vector. Inputs that fail URL
//! parsing produce degenerate values (empty host, zero-length components)
//! rather than an error.

use url::Url;

/// Number of features fed to the standardizer and model.
pub const NUM_FEATURES: usize = 8;

/// Characters counted by `num_special_chars`.
const SPECIAL_CHARS: [char; 5] = ['@', '%', '&', '=', '?'];

/// Registrable domains that set the `trusted_domain` feature.
pub const TRUSTED_DOMAINS: [&str; 4] = ["naver.com", "google.com", "daum.net", "wikipedia.org"];

/// Named feature set for a single URL.
///
/// The field order matches the trained column order; [`FeatureVector::to_array`]
/// is the only place that flattens it, so a reordering here cannot silently
/// reach the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    pub url_length: i64,
    pub domain_length: i64,
    pub num_subdomains: i64,
    pub has_https: i64,
    pub num_special_chars: i64,
    pub query_length: i64,
    pub path_length: i64,
    pub trusted_domain: i64,
}

impl FeatureVector {
    /// Flatten into the fixed column order the model was trained with.
    pub fn to_array(&self) -> [f32; NUM_FEATURES] {
        [
            self.url_length as f32,
            self.domain_length as f32,
            self.num_subdomains as f32,
            self.has_https as f32,
            self.num_special_chars as f32,
            self.query_length as f32,
            self.path_length as f32,
            self.trusted_domain as f32,
        ]
    }
}

/// Last two dot-separated labels of the host, or the whole host for
/// two labels or fewer.
fn registrable_domain(host: &str) -> String {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() > 2 {
        labels[labels.len() - 2..].join(".")
    } else {
        host.to_owned()
    }
}

/// Extract the feature vector from a raw URL string.
pub fn extract_features(url: &str) -> FeatureVector {
    let parsed = Url::parse(url).ok();

    let scheme = parsed.as_ref().map_or("", Url::scheme);
    let host = parsed
        .as_ref()
        .and_then(Url::host_str)
        .unwrap_or_default()
        .to_owned();
    let path = parsed.as_ref().map_or("", Url::path);
    let query = parsed.as_ref().and_then(Url::query).unwrap_or_default();

    let domain = registrable_domain(&host);
    // An empty host splits into a single empty label, so hosts with fewer
    // than two labels go negative here. The model was trained with this
    // arithmetic; it is reproduced, not clamped.
    let num_labels = host.split('.').count() as i64;

    FeatureVector {
        url_length: url.chars().count() as i64,
        domain_length: domain.chars().count() as i64,
        num_subdomains: num_labels - 2,
        has_https: i64::from(scheme == "https"),
        num_special_chars: url.chars().filter(|c| SPECIAL_CHARS.contains(c)).count() as i64,
        query_length: query.chars().count() as i64,
        path_length: path.chars().count() as i64,
        trusted_domain: i64::from(TRUSTED_DOMAINS.contains(&domain.as_str())),
    }
}
