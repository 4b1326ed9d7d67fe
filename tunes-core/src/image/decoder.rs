use std::fmt;

use image::RgbaImage;
use tunes_model::ByteSize;

use crate::api::decode::Decoder;
use crate::api::endpoint::{Endpoint, RequestTarget};
use crate::error::{DecodeError, NetworkError};

/// Thumbnail decoded to RGBA8, ready for display.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pixels: RgbaImage,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("footprint", &self.footprint())
            .finish()
    }
}

impl DecodedImage {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Resident size once decoded; this is what the cache budgets against.
    pub fn footprint(&self) -> ByteSize {
        ByteSize::rgba(self.width(), self.height())
    }
}

/// Decodes PNG/JPEG/GIF/WebP bytes into a [`DecodedImage`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl Decoder<DecodedImage> for ImageDecoder {
    fn decode(&self, bytes: &[u8]) -> Result<DecodedImage, DecodeError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|err| DecodeError::new(format!("image decode: {err}")))?;
        Ok(DecodedImage::from_rgba(decoded.into_rgba8()))
    }
}

/// Descriptor for downloading one artwork URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRequest {
    url: String,
}

impl ImageRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl Endpoint for ImageRequest {
    type Response = DecodedImage;

    fn target(&self) -> Result<RequestTarget, NetworkError> {
        RequestTarget::parse(&self.url)
    }

    fn decode(&self, body: &[u8]) -> Result<DecodedImage, DecodeError> {
        ImageDecoder.decode(body)
    }
}
