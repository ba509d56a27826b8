use super::ImageService;
use crate::models::validate_quality;
use crate::{Error, Result};
use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::DynamicImage;

pub struct JpegProcessor {
    quality: u8,
}

impl JpegProcessor {
    pub fn new(quality: u8) -> Result<Self> {
        Ok(Self {
            quality: validate_quality(quality)?,
        })
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    fn encode_sync(image: DynamicImage, quality: u8) -> Result<Vec<u8>> {
        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
        let mut bytes = Vec::new();
        rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))?;
        Ok(bytes)
    }
}

#[async_trait]
impl ImageService for JpegProcessor {
    async fn encode_jpeg(&self, image_data: &[u8]) -> Result<Vec<u8>> {
        if image_data.is_empty() {
            return Err(Error::Encoding("no image data".to_string()));
        }

        let img = image::load_from_memory(image_data)?;
        tracing::debug!(
            "Encoding {}x{} image as JPEG (quality {})",
            img.width(),
            img.height(),
            self.quality
        );

        let quality = self.quality;
        let jpeg = tokio::task::spawn_blocking(move || Self::encode_sync(img, quality))
            .await
            .map_err(|e| Error::Invariant(format!("JPEG encoding task join error: {}", e)))??;

        if jpeg.is_empty() {
            return Err(Error::Encoding("JPEG encoder produced no data".to_string()));
        }
        Ok(jpeg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn create_test_image() -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(10, 10, image::Rgba([255, 0, 0, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[tokio::test]
    async fn test_encode_png_as_jpeg() {
        let processor = JpegProcessor::new(50).unwrap();

        let jpeg = processor.encode_jpeg(&create_test_image()).await.unwrap();

        assert_eq!(&jpeg[..3], &[0xFF, 0xD8, 0xFF]);
        assert_eq!(image::guess_format(&jpeg).unwrap(), ImageFormat::Jpeg);

        let decoded = image::load_from_memory(&jpeg).unwrap();
        assert_eq!(decoded.width(), 10);
        assert_eq!(decoded.height(), 10);
    }

    #[tokio::test]
    async fn test_lower_quality_is_not_larger() {
        let img = image::RgbImage::from_fn(64, 64, |x, y| {
            image::Rgb([(x * 4) as u8, (y * 4) as u8, ((x + y) * 2) as u8])
        });
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let low = JpegProcessor::new(10).unwrap().encode_jpeg(&png).await.unwrap();
        let high = JpegProcessor::new(95).unwrap().encode_jpeg(&png).await.unwrap();

        assert!(low.len() <= high.len());
    }

    #[tokio::test]
    async fn test_rejects_empty_input() {
        let processor = JpegProcessor::new(50).unwrap();

        let err = processor.encode_jpeg(&[]).await.unwrap_err();
        assert!(matches!(err, Error::Encoding(_)));
    }

    #[tokio::test]
    async fn test_rejects_undecodable_input() {
        let processor = JpegProcessor::new(50).unwrap();

        let err = processor.encode_jpeg(b"not an image").await.unwrap_err();
        assert!(matches!(err, Error::Image(_)));
    }

    #[test]
    fn test_rejects_out_of_range_quality() {
        assert!(JpegProcessor::new(0).is_err());
        assert!(JpegProcessor::new(101).is_err());
        assert_eq!(JpegProcessor::new(100).unwrap().quality(), 100);
    }
}
