//! Waiting for a snapshot's images to settle before it is rendered.

use crate::dom::DomNode;
use futures::future::{join_all, BoxFuture};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("image has no src")]
    MissingSource,
    #[error("invalid image url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("failed to load {url}: {reason}")]
    Load { url: String, reason: String },
}

/// Fetches and decodes one image. Implemented by the host.
pub trait ImageLoader: Sync {
    fn load<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<(), ImageError>>;
}

/// Outcome of [`load_images`]. Every image ends up in exactly one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImageLoadReport {
    pub loaded: usize,
    pub failed: usize,
}

impl ImageLoadReport {
    pub fn total(&self) -> usize {
        self.loaded + self.failed
    }
}

/// Every `img` element under `root`, in document order.
pub fn collect_images(root: &DomNode) -> Vec<&DomNode> {
    root.find_all("img")
}

/// Absolute URL for an image's `src`, resolved against `base` when relative.
pub fn resolve_source(image: &DomNode, base: Option<&Url>) -> Result<String, ImageError> {
    let src = image
        .get_attr("src")
        .map(str::trim)
        .filter(|src| !src.is_empty())
        .ok_or(ImageError::MissingSource)?;
    let invalid = |e: url::ParseError| ImageError::InvalidUrl {
        url: src.to_string(),
        reason: e.to_string(),
    };
    match Url::parse(src) {
        Ok(url) => Ok(url.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => base.join(src).map(|url| url.to_string()).map_err(invalid),
            None => Err(invalid(url::ParseError::RelativeUrlWithoutBase)),
        },
        Err(e) => Err(invalid(e)),
    }
}

/// Resolve once every image has either loaded or failed.
///
/// An empty slice returns at once without touching `loader`.
pub async fn load_images<L>(images: &[&DomNode], base: Option<&Url>, loader: &L) -> ImageLoadReport
where
    L: ImageLoader + ?Sized,
{
    if images.is_empty() {
        return ImageLoadReport::default();
    }

    let attempts = images.iter().map(|image| async move {
        let url = resolve_source(image, base)?;
        loader.load(&url).await
    });

    let mut report = ImageLoadReport::default();
    for result in join_all(attempts).await {
        match result {
            Ok(()) => report.loaded += 1,
            Err(e) => {
                warn!(error = %e, "image did not load");
                report.failed += 1;
            }
        }
    }
    debug!(loaded = report.loaded, failed = report.failed, "images settled");
    report
}
