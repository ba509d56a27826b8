//! Photo tagger - uploads a photo to Imagga and collects its tags and colors
//!
//! A photo is re-encoded as JPEG, uploaded to the vendor's content endpoint,
//! and the returned content ID is used to fetch keyword tags and then the
//! dominant colors. Upload progress is reported to the caller as a fraction.

pub mod error;
pub mod image;
pub mod imagga;
pub mod models;
pub mod pipeline;
pub mod progress;

pub use error::{Error, Result};
