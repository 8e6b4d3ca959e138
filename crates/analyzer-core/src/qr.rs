//! QR payload extraction from raster image bytes.

use rqrr::PreparedImage;

/// Outcome of scanning an image for a QR code.
///
/// A buffer that cannot be decoded as a raster image at all folds into
/// [`QrScan::NoCode`]: callers branch only on whether a payload was
/// recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QrScan {
    Payload(String),
    NoCode,
}

/// Decode the first QR code found in the image, if any.
pub fn extract_payload(image_bytes: &[u8]) -> QrScan {
    let Ok(img) = image::load_from_memory(image_bytes) else {
        return QrScan::NoCode;
    };

    let mut prepared = PreparedImage::prepare(img.to_luma8());
    for grid in prepared.detect_grids() {
        if let Ok((_meta, content)) = grid.decode() {
            if !content.is_empty() {
                return QrScan::Payload(content);
            }
        }
    }

    QrScan::NoCode
}
