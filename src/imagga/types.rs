//! Imagga response payloads.
//!
//! Required fields are required: a missing `id`, `tag`, `r`, `g`, `b` or
//! `closest_palette_color`, or a channel outside `0..=255`, fails decoding
//! instead of falling back to a default.

use super::{COLORS_ENDPOINT, CONTENT_ENDPOINT, TAGGING_ENDPOINT};
use crate::models::{ContentId, PhotoColor};
use crate::{Error, Result};
use serde::Deserialize;

/// `POST /content` response envelope.
#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub uploaded: Vec<UploadedContent>,
}

#[derive(Debug, Deserialize)]
pub struct UploadedContent {
    pub id: String,
    pub filename: Option<String>,
}

impl UploadResponse {
    /// ID of the first uploaded file.
    pub fn into_content_id(self) -> Result<ContentId> {
        let first = self
            .uploaded
            .into_iter()
            .next()
            .ok_or_else(|| Error::schema(CONTENT_ENDPOINT, "`uploaded` is empty"))?;
        ContentId::new(first.id)
    }
}

/// `GET /tagging` response envelope.
#[derive(Debug, Deserialize)]
pub struct TaggingResponse {
    pub results: Vec<TaggingResult>,
}

#[derive(Debug, Deserialize)]
pub struct TaggingResult {
    pub image: Option<String>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Deserialize)]
pub struct Tag {
    pub tag: String,
    pub confidence: Option<f64>,
}

impl TaggingResponse {
    /// Tags of the first result, in vendor order.
    pub fn into_tags(self) -> Result<Vec<String>> {
        let first = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| Error::schema(TAGGING_ENDPOINT, "`results` is empty"))?;
        Ok(first.tags.into_iter().map(|t| t.tag).collect())
    }
}

/// `GET /colors` response envelope.
#[derive(Debug, Deserialize)]
pub struct ColorsResponse {
    pub results: Vec<ColorsResult>,
}

#[derive(Debug, Deserialize)]
pub struct ColorsResult {
    pub info: ColorInfo,
}

#[derive(Debug, Deserialize)]
pub struct ColorInfo {
    pub image_colors: Vec<ImageColor>,
}

#[derive(Debug, Deserialize)]
pub struct ImageColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub closest_palette_color: String,
    pub percent: Option<f64>,
    pub html_code: Option<String>,
}

impl From<ImageColor> for PhotoColor {
    fn from(color: ImageColor) -> Self {
        PhotoColor::new(color.r, color.g, color.b, color.closest_palette_color)
    }
}

impl ColorsResponse {
    /// Image colors of the first result, in vendor order.
    pub fn into_colors(self) -> Result<Vec<PhotoColor>> {
        let first = self
            .results
            .into_iter()
            .next()
            .ok_or_else(|| Error::schema(COLORS_ENDPOINT, "`results` is empty"))?;
        Ok(first
            .info
            .image_colors
            .into_iter()
            .map(PhotoColor::from)
            .collect())
    }
}
