//! Upload-and-analyze orchestration.
//!
//! A run moves through an explicit state machine:
//!
//! ```text
//! Encoding -> Uploading -> FetchingTags -> FetchingColors -> Done
//!     \___________\______________\______________\________-> Failed
//! ```
//!
//! Each stage starts only after the previous one succeeded. The first failure
//! ends the run. The result is all-or-nothing: if the color fetch fails, the
//! tags fetched in the previous stage are dropped and the run fails.

use crate::image::{ImageService, JpegProcessor};
use crate::imagga::{
    ColorService, ContentService, ImaggaColorClient, ImaggaContentClient, ImaggaHttpClient,
    ImaggaTaggingClient, TaggingService,
};
use crate::models::{Config, ContentId, PhotoAnalysis, PhotoColor};
use crate::progress::ProgressReporter;
use crate::{Error, Result};
use std::fmt;
use tracing::{error, info, warn};

/// Observable stage of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Encoding,
    Uploading,
    FetchingTags,
    FetchingColors,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Encoding => "encoding",
            Stage::Uploading => "uploading",
            Stage::FetchingTags => "fetching tags",
            Stage::FetchingColors => "fetching colors",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// Terminal state of a run.
#[derive(Debug)]
pub enum Outcome {
    Done(PhotoAnalysis),
    Failed { stage: Stage, error: Error },
}

impl Outcome {
    pub fn into_result(self) -> Result<PhotoAnalysis> {
        match self {
            Outcome::Done(analysis) => Ok(analysis),
            Outcome::Failed { error, .. } => Err(error),
        }
    }

    /// Stage that failed, if any.
    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Outcome::Done(_) => None,
            Outcome::Failed { stage, .. } => Some(*stage),
        }
    }
}

/// Data carried between stages.
enum State {
    Encoding,
    Uploading {
        jpeg: Vec<u8>,
    },
    FetchingTags {
        content_id: ContentId,
    },
    FetchingColors {
        content_id: ContentId,
        tags: Vec<String>,
    },
    Done(PhotoAnalysis),
}

impl State {
    fn stage(&self) -> Stage {
        match self {
            State::Encoding => Stage::Encoding,
            State::Uploading { .. } => Stage::Uploading,
            State::FetchingTags { .. } => Stage::FetchingTags,
            State::FetchingColors { .. } => Stage::FetchingColors,
            State::Done(_) => Stage::Done,
        }
    }
}

pub struct Pipeline {
    image: Box<dyn ImageService>,
    content: Box<dyn ContentService>,
    tagging: Box<dyn TaggingService>,
    colors: Box<dyn ColorService>,
}

/// Injectable service bundle used to construct [`Pipeline`] in tests/harnesses.
pub struct PipelineServices {
    pub image: Box<dyn ImageService>,
    pub content: Box<dyn ContentService>,
    pub tagging: Box<dyn TaggingService>,
    pub colors: Box<dyn ColorService>,
}

impl Pipeline {
    pub fn with_services(services: PipelineServices) -> Self {
        Self {
            image: services.image,
            content: services.content,
            tagging: services.tagging,
            colors: services.colors,
        }
    }

    /// Builds the Imagga-backed pipeline described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        // One connection pool for all three endpoints.
        let http = ImaggaHttpClient::from_config(config, reqwest::Client::new());
        info!("Using Imagga API at {}", http.base_url());

        Ok(Self::with_services(PipelineServices {
            image: Box::new(JpegProcessor::new(config.jpeg_quality)?),
            content: Box::new(
                ImaggaContentClient::new(http.clone()).with_chunk_size(config.upload_chunk_size),
            ),
            tagging: Box::new(ImaggaTaggingClient::new(http.clone())),
            colors: Box::new(ImaggaColorClient::new(http)),
        }))
    }

    /// Runs the whole sequence and reports the terminal state.
    ///
    /// `progress` only receives updates while the upload is in flight.
    pub async fn run(&self, image_data: &[u8], progress: ProgressReporter) -> Outcome {
        let mut state = State::Encoding;

        loop {
            if let State::Done(analysis) = state {
                info!(
                    "Photo analysis complete: {} tags, {} colors",
                    analysis.tags.len(),
                    analysis.colors.len()
                );
                return Outcome::Done(analysis);
            }

            let stage = state.stage();
            info!("Pipeline stage: {}", stage);

            state = match self.step(state, image_data, &progress).await {
                Ok(next) => next,
                Err(error) => {
                    error!("Photo analysis failed while {}: {}", stage, error);
                    return Outcome::Failed { stage, error };
                }
            };
        }
    }

    async fn step(
        &self,
        state: State,
        image_data: &[u8],
        progress: &ProgressReporter,
    ) -> Result<State> {
        match state {
            State::Encoding => {
                let jpeg = self.image.encode_jpeg(image_data).await?;
                Ok(State::Uploading { jpeg })
            }
            State::Uploading { jpeg } => {
                let content_id = self.content.upload(jpeg, progress.clone()).await?;
                Ok(State::FetchingTags { content_id })
            }
            State::FetchingTags { content_id } => {
                let tags = self.tagging.fetch_tags(&content_id).await?;
                Ok(State::FetchingColors { content_id, tags })
            }
            State::FetchingColors { content_id, tags } => {
                match self.colors.fetch_colors(&content_id).await {
                    Ok(colors) => Ok(State::Done(PhotoAnalysis { tags, colors })),
                    Err(e) => {
                        warn!(
                            "Discarding {} tags for content {} because the color fetch failed",
                            tags.len(),
                            content_id
                        );
                        Err(e)
                    }
                }
            }
            State::Done(_) => Err(Error::Invariant(
                "pipeline stepped past the done state".to_string(),
            )),
        }
    }

    /// Typed variant of [`Pipeline::upload`].
    pub async fn analyze<F>(&self, image_data: &[u8], progress: F) -> Result<PhotoAnalysis>
    where
        F: Fn(f32) + Send + Sync + 'static,
    {
        self.run(image_data, ProgressReporter::new(progress))
            .await
            .into_result()
    }

    /// Callback interface: `completion` is called exactly once, with both
    /// values on success or `(None, None)` on any failure.
    pub async fn upload<F, C>(&self, image_data: &[u8], progress: F, completion: C)
    where
        F: Fn(f32) + Send + Sync + 'static,
        C: FnOnce(Option<Vec<String>>, Option<Vec<PhotoColor>>),
    {
        match self.run(image_data, ProgressReporter::new(progress)).await {
            Outcome::Done(PhotoAnalysis { tags, colors }) => completion(Some(tags), Some(colors)),
            Outcome::Failed { .. } => completion(None, None),
        }
    }
}
