//! Source images travel as `data:` URLs in request and response bodies.

use std::io::Cursor;
use std::path::Path;
use anyhow::{bail, Context};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat};

const JPEG_PREFIX: &str = "data:image/jpeg;base64,";

/// Loads any image format the `image` crate understands and re-encodes it as a
/// JPEG data URL.
pub fn load_data_url(path: &Path) -> anyhow::Result<String> {
    let img = image::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    encode_data_url(&img)
}

pub fn encode_data_url(img: &DynamicImage) -> anyhow::Result<String> {
    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let mut buf = Cursor::new(Vec::new());
    rgb.write_to(&mut buf, ImageFormat::Jpeg)
        .context("failed to encode JPEG")?;

    Ok(format!("{JPEG_PREFIX}{}", STANDARD.encode(buf.into_inner())))
}

/// Decodes the payload of a base64 data URL. Bare base64 without a header is
/// accepted as well.
pub fn decode_data_url(data_url: &str) -> anyhow::Result<Vec<u8>> {
    let payload = match data_url.split_once(',') {
        Some((header, payload)) => {
            if !header.starts_with("data:") || !header.ends_with(";base64") {
                bail!("not a base64 data URL: {header}");
            }
            payload
        }
        None => data_url,
    };

    STANDARD
        .decode(payload.trim())
        .context("data URL payload is not valid base64")
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use super::*;

    #[test]
    fn test_encode_produces_jpeg_data_url() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([200, 10, 10, 128])));
        let url = encode_data_url(&img).unwrap();

        assert!(url.starts_with(JPEG_PREFIX));
        let bytes = decode_data_url(&url).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);

        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 8));
    }

    #[test]
    fn test_decode_accepts_bare_base64() {
        assert_eq!(decode_data_url("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_rejects_non_base64_headers() {
        assert!(decode_data_url("data:text/plain,hello").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_data_url(Path::new("/definitely/not/here.png")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.png"));
    }
}
