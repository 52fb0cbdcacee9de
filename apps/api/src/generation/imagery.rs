//! Image Generator — prompt + aspect ratio → background raster.
//!
//! Failures here never abort a run: the assembler swaps in
//! `placeholder_background()` and carries on.

use std::io::Cursor;

use async_trait::async_trait;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::generation::generator::GenerationError;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::image::ImageData;

/// Aspect ratio requested for every story background.
pub const STORY_ASPECT_RATIO: &str = "9:16";

#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, aspect_ratio: &str) -> Result<ImageData, GenerationError>;
}

pub struct GeminiImageGenerator {
    llm: LlmClient,
}

impl GeminiImageGenerator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageGenerator {
    async fn generate(&self, prompt: &str, aspect_ratio: &str) -> Result<ImageData, GenerationError> {
        let inline = self.llm.call_image(prompt, aspect_ratio).await?;
        let image = ImageData::from_base64(&inline.mime_type, &inline.data);
        if image.is_empty() {
            return Err(GenerationError::Llm(LlmError::NoImage));
        }
        Ok(image)
    }
}

/// Small dark vertical gradient; the compositor scales it to the canvas.
pub fn placeholder_background() -> ImageData {
    const W: u32 = 9;
    const H: u32 = 16;
    let img = RgbaImage::from_fn(W, H, |_, y| {
        let t = y as f32 / (H - 1) as f32;
        let lerp = |a: f32, b: f32| (a + (b - a) * t).round() as u8;
        Rgba([lerp(28.0, 8.0), lerp(30.0, 10.0), lerp(48.0, 18.0), 255])
    });

    let mut out = Cursor::new(Vec::new());
    match img.write_to(&mut out, ImageFormat::Png) {
        Ok(()) => ImageData::png(out.into_inner()),
        // The compositor passes an empty payload through unchanged.
        Err(_) => ImageData::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn generator(server: &MockServer) -> GeminiImageGenerator {
        GeminiImageGenerator::new(
            LlmClient::new("k".to_string())
                .unwrap()
                .with_base_url(server.uri())
                .with_retry_base_delay(Duration::from_millis(1)),
        )
    }

    #[test]
    fn test_placeholder_is_portrait_png() {
        let img = placeholder_background();
        assert_eq!(img.mime, "image/png");
        let decoded = image::load_from_memory(&img.bytes).unwrap();
        assert!(decoded.height() > decoded.width());
    }

    #[tokio::test]
    async fn test_inline_image_is_decoded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [
                    { "inlineData": { "mimeType": "image/jpeg", "data": "/9j/AAEC" } }
                ]}}]
            })))
            .mount(&server)
            .await;

        let img = generator(&server).generate("x", STORY_ASPECT_RATIO).await.unwrap();
        assert_eq!(img.mime, "image/jpeg");
        assert_eq!(img.bytes.as_ref(), &[0xFF, 0xD8, 0xFF, 0x00, 0x01, 0x02]);
    }

    #[tokio::test]
    async fn test_undecodable_inline_data_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [
                    { "inlineData": { "mimeType": "image/png", "data": "***" } }
                ]}}]
            })))
            .mount(&server)
            .await;

        assert!(generator(&server).generate("x", STORY_ASPECT_RATIO).await.is_err());
    }
}
