//! OCR upload probe: multipart POST of one invoice image.

use std::path::Path;

use anyhow::{Context, Result, ensure};
use reqwest::multipart::{Form, Part};
use stocktake_config::ApiConfig;
use stocktake_models::ocr::OcrResponse;
use tracing::debug;

/// Uploads `image_path` to `/api/invoices/ocr-upload` and decodes the
/// response. The caller decides how to present success and failure; a
/// `success = false` body is a normal return, not an error.
pub async fn probe_ocr(config: &ApiConfig, image_path: &Path) -> Result<OcrResponse> {
    let bytes = tokio::fs::read(image_path)
        .await
        .with_context(|| format!("failed to read image {}", image_path.display()))?;
    ensure!(!bytes.is_empty(), "image {} is empty", image_path.display());

    let file_name = image_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "invoice.png".to_string());
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(mime_for(image_path))?;
    let form = Form::new().part("file", part);

    let client = reqwest::Client::builder()
        .timeout(config.timeout())
        .build()?;
    let response = client
        .post(config.endpoint("/api/invoices/ocr-upload"))
        .multipart(form)
        .send()
        .await
        .context("OCR upload request failed")?;

    let status = response.status();
    debug!(status = status.as_u16(), "OCR upload responded");
    response
        .json::<OcrResponse>()
        .await
        .with_context(|| format!("OCR endpoint returned {} with an undecodable body", status))
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_common_extensions() {
        assert_eq!(mime_for(Path::new("sample_invoice_sarah_johnson.png")), "image/png");
        assert_eq!(mime_for(Path::new("scan.JPG")), "image/jpeg");
        assert_eq!(mime_for(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("scan.tiff")), "application/octet-stream");
        assert_eq!(mime_for(Path::new("no_extension")), "application/octet-stream");
    }
}
