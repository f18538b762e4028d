use crate::config::AppConfig;
use crate::error::{ReportBuilderError, Result};
use crate::report::client::GeminiClient;
use crate::report::types::{Content, GenerationConfig, Part};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use log::{debug, info, warn};
use std::io::Cursor;
use std::path::PathBuf;

/// Dimensions and fill of the placeholder returned when generation fails.
pub const FALLBACK_WIDTH: u32 = 540;
pub const FALLBACK_HEIGHT: u32 = 960;
pub const FALLBACK_FILL: [u8; 3] = [0, 143, 83];

const IMAGE_SIZE: &str = "1K";

/// Result of a generation attempt. `bytes` is always a decodable image;
/// when the remote call failed, `degraded` carries the cause and `bytes`
/// holds the fixed placeholder. The fallback is part of the contract, so
/// callers never need a failure branch to end up with a usable artifact.
#[derive(Debug)]
pub struct ReportOutcome {
    pub bytes: Vec<u8>,
    pub degraded: Option<ReportBuilderError>,
}

impl ReportOutcome {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Adapter around the remote image-generation model.
pub struct ReportImageService {
    client: GeminiClient,
    model: String,
    reference_image_path: Option<PathBuf>,
}

impl ReportImageService {
    pub fn new(client: GeminiClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            reference_image_path: None,
        }
    }

    /// Attach a reference style image to every request. The file is read
    /// lazily per call; if it is missing the request proceeds text-only.
    pub fn with_reference_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_image_path = Some(path.into());
        self
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            GeminiClient::new(config.api_key.clone()),
            config.model_id.as_str(),
        )
        .with_reference_image(&config.reference_image_path)
    }

    /// Generates the report image for the given prompt.
    ///
    /// Exactly one remote attempt, no retries. Every failure mode (network,
    /// auth, malformed response, stream exhausted without an image) degrades
    /// to the fixed placeholder.
    pub async fn generate_report_image(&self, prompt: &str) -> ReportOutcome {
        match self.try_generate(prompt).await {
            Ok(bytes) => {
                info!("report image generated ({} bytes)", bytes.len());
                ReportOutcome {
                    bytes,
                    degraded: None,
                }
            }
            Err(err) => {
                warn!("report generation failed, substituting placeholder: {}", err);
                ReportOutcome {
                    bytes: fallback_report_image(),
                    degraded: Some(err),
                }
            }
        }
    }

    async fn try_generate(&self, prompt: &str) -> Result<Vec<u8>> {
        let mut parts = vec![Part::text(prompt)];
        if let Some(reference) = self.load_reference_part() {
            parts.push(reference);
        }

        let mut chunks = self
            .client
            .stream_generate_content(
                &self.model,
                vec![Content::user(parts)],
                GenerationConfig::image_only(IMAGE_SIZE),
            )
            .await?;

        while let Some(chunk) = chunks.next_chunk().await? {
            let Some(Part::InlineData { inline_data }) = chunk.first_part() else {
                continue;
            };
            if let Some(bytes) = decode_inline_image(&inline_data.data) {
                // Early return releases the stream; remaining chunks are
                // never pulled.
                return Ok(bytes);
            }
            debug!("inline data in chunk did not decode as an image, continuing");
        }

        Err(ReportBuilderError::NoImageExtracted)
    }

    fn load_reference_part(&self) -> Option<Part> {
        let path = self.reference_image_path.as_deref()?;
        match std::fs::read(path) {
            Ok(bytes) => {
                let mime_type = mime_guess::from_path(path)
                    .first_or_octet_stream()
                    .to_string();
                Some(Part::inline_data(mime_type, BASE64.encode(bytes)))
            }
            Err(err) => {
                debug!(
                    "reference image {} unavailable ({}), sending text-only request",
                    path.display(),
                    err
                );
                None
            }
        }
    }
}

/// Verifies the payload as image bytes: first as-is, then after one base64
/// decode. Returns the verified bytes, or `None` when neither form decodes.
fn decode_inline_image(data: &str) -> Option<Vec<u8>> {
    let raw = data.as_bytes();
    if image::load_from_memory(raw).is_ok() {
        return Some(raw.to_vec());
    }

    let decoded = BASE64.decode(data.trim()).ok()?;
    if image::load_from_memory(&decoded).is_ok() {
        return Some(decoded);
    }
    None
}

/// The deterministic placeholder: a solid mint 540x960 PNG.
pub fn fallback_report_image() -> Vec<u8> {
    let canvas = image::RgbImage::from_pixel(
        FALLBACK_WIDTH,
        FALLBACK_HEIGHT,
        image::Rgb(FALLBACK_FILL),
    );

    let mut buf = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(canvas)
        .write_to(&mut buf, image::ImageFormat::Png)
        .expect("in-memory PNG encode");
    buf.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_image_round_trips() {
        let bytes = fallback_report_image();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!(decoded.width(), FALLBACK_WIDTH);
        assert_eq!(decoded.height(), FALLBACK_HEIGHT);

        // Deterministic: two renders are byte-identical.
        assert_eq!(bytes, fallback_report_image());
    }

    #[test]
    fn test_decode_inline_image_accepts_base64_payload() {
        let png = fallback_report_image();
        let encoded = BASE64.encode(&png);

        let decoded = decode_inline_image(&encoded).unwrap();
        assert_eq!(decoded, png);
    }

    #[test]
    fn test_decode_inline_image_rejects_garbage() {
        assert!(decode_inline_image("definitely not an image").is_none());
        // Valid base64 that decodes to non-image bytes is still rejected.
        assert!(decode_inline_image(&BASE64.encode(b"plain text")).is_none());
    }

    #[tokio::test]
    async fn test_remote_failure_degrades_to_placeholder() {
        // Port 9 (discard) on loopback refuses the connection immediately;
        // the outcome must still carry a usable image.
        let client =
            GeminiClient::new("test-key".to_string()).with_base_url("http://127.0.0.1:9");
        let service = ReportImageService::new(client, "missing-model");

        let outcome = service.generate_report_image("draw a card").await;
        assert!(outcome.is_degraded());
        assert_eq!(outcome.bytes, fallback_report_image());
    }
}
