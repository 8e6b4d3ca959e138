//! Analysis pipeline tying the components together.
//!
//! An [`Analyzer`] is built once at startup from the loaded artifacts and
//! shared read-only across requests. The library is blocking; async
//! frontends call it from worker threads.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::blocklist::BlocklistStore;
use crate::features::extract_features;
use crate::inference::{Probabilities, Standardizer, UrlScorer};
use crate::qr::{self, QrScan};
use crate::validate::is_valid_url;
use crate::verdict::{decide, Verdict};

/// Request-level analysis failures.
///
/// The first three variants are caller mistakes; `Internal` covers store,
/// oracle, and other unexpected failures and carries the full error chain
/// for operator logs.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("no URL was provided")]
    MissingInput,
    #[error("no QR code was detected in the image")]
    NoQrFound,
    #[error("the QR payload is not a valid URL")]
    NotAUrl,
    #[error("internal analysis failure")]
    Internal(#[from] anyhow::Error),
}

impl AnalyzeError {
    /// True for caller mistakes, false for server-side failures.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

/// Immutable analysis context: blocklist handle, standardizer statistics,
/// and the pretrained scorer.
pub struct Analyzer {
    blocklist: BlocklistStore,
    standardizer: Standardizer,
    oracle: Arc<dyn UrlScorer>,
}

impl Analyzer {
    pub fn new(
        blocklist: BlocklistStore,
        standardizer: Standardizer,
        oracle: Arc<dyn UrlScorer>,
    ) -> Self {
        Self { blocklist, standardizer, oracle }
    }

    /// Classify a raw URL.
    ///
    /// A blocklist hit short-circuits: the classifier is never invoked for
    /// known-malicious URLs. The input is not syntactically gated here;
    /// feature extraction is total, so any string scores.
    pub fn analyze_url(&self, url: &str) -> Result<Verdict, AnalyzeError> {
        if url.is_empty() {
            return Err(AnalyzeError::MissingInput);
        }

        if self.blocklist.contains(url)? {
            debug!(url, "blocklist hit");
            return Ok(decide(true, Probabilities::default()));
        }

        let features = extract_features(url);
        let standardized = self.standardizer.transform(&features);
        let probs = self.oracle.predict_proba(&standardized)?;
        debug!(url, safe = probs.safe, malicious = probs.malicious, "model scored");

        Ok(decide(false, probs))
    }

    /// Recover and validate the URL payload of a QR image.
    pub fn extract_url(&self, image_bytes: &[u8]) -> Result<String, AnalyzeError> {
        let payload = match qr::extract_payload(image_bytes) {
            QrScan::Payload(payload) => payload,
            QrScan::NoCode => return Err(AnalyzeError::NoQrFound),
        };

        if !is_valid_url(&payload) {
            debug!(payload = %payload, "QR payload failed URL validation");
            return Err(AnalyzeError::NotAUrl);
        }

        Ok(payload)
    }

    /// Decode a QR image and classify its payload.
    pub fn analyze_image(&self, image_bytes: &[u8]) -> Result<Verdict, AnalyzeError> {
        let url = self.extract_url(image_bytes)?;
        self.analyze_url(&url)
    }
}
