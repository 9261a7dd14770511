//! Image sizing, format and lazy-loading checks

use super::{selector, Check, PageSnapshot};
use crate::browser::Probe;
use crate::config::AuditConfig;
use crate::error::ExtractionError;
use crate::finding::{Issue, IssueKind, IssueSink};
use crate::result::{ImageInfo, ImageMetrics, PageMetrics};
use scraper::{Html, Selector};
use serde::Deserialize;
use std::sync::OnceLock;

/// Images up to this position may load eagerly (above the fold).
pub const EAGER_IMAGE_ALLOWANCE: usize = 3;

/// Rendered size of one image as reported by the geometry probe
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageGeometry {
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

pub struct ImageCheck;

impl Check for ImageCheck {
    fn name(&self) -> &'static str {
        "images"
    }

    fn probes(&self) -> &[Probe] {
        &[Probe::ImageGeometry]
    }

    fn run(
        &self,
        snapshot: &PageSnapshot,
        config: &AuditConfig,
        metrics: &mut PageMetrics,
        issues: &mut IssueSink,
    ) -> Result<(), ExtractionError> {
        let document = snapshot.document(self.name())?;

        let geometry = match geometry(snapshot) {
            Ok(g) => Some(g),
            Err(e) => {
                tracing::debug!(page = %snapshot.url(), "using width attributes: {}", e);
                None
            }
        };

        let max_width = config.thresholds.seo.image_max_width;
        let images = extract(document, geometry.as_deref(), max_width);
        evaluate(&images, max_width, issues);
        metrics.performance.images = images;
        Ok(())
    }
}

fn geometry(snapshot: &PageSnapshot) -> Result<Vec<ImageGeometry>, ExtractionError> {
    let raw = snapshot.probe(Probe::ImageGeometry, "images")?;
    serde_json::from_value(raw.clone()).map_err(|e| ExtractionError::Malformed {
        step: "images",
        message: e.to_string(),
    })
}

/// Merge DOM attributes with probe geometry (matched by document order).
///
/// Without geometry, the `width`/`height` attributes are used.
pub fn extract(document: &Html, geometry: Option<&[ImageGeometry]>, max_width: u32) -> ImageMetrics {
    static IMG: OnceLock<Selector> = OnceLock::new();

    let mut metrics = ImageMetrics::default();
    for (index, img) in document.select(selector(&IMG, "img")).enumerate() {
        let el = img.value();
        let src = el.attr("src").unwrap_or("").trim().to_string();
        let probed = geometry.and_then(|g| g.get(index));

        let (width, height) = match probed {
            Some(g) if g.width > 0 => (Some(g.width), Some(g.height)),
            _ => (
                el.attr("width").and_then(parse_dimension),
                el.attr("height").and_then(parse_dimension),
            ),
        };

        let is_webp = src.to_ascii_lowercase().contains(".webp")
            || probed.is_some_and(|g| g.src.to_ascii_lowercase().contains(".webp"));
        let loading = el.attr("loading").map(|l| l.trim().to_ascii_lowercase());

        if is_webp {
            metrics.webp += 1;
        }
        if !is_webp && width.is_some_and(|w| w > max_width) {
            metrics.oversized += 1;
        }
        if index >= EAGER_IMAGE_ALLOWANCE && loading.as_deref() != Some("lazy") {
            metrics.not_lazy += 1;
        }

        metrics.details.push(ImageInfo {
            src,
            width,
            height,
            loading,
            is_webp,
        });
    }
    metrics.total = metrics.details.len();
    metrics
}

/// `"640"` or `"640px"`
fn parse_dimension(value: &str) -> Option<u32> {
    value.trim().trim_end_matches("px").parse().ok()
}

pub fn evaluate(images: &ImageMetrics, max_width: u32, issues: &mut IssueSink) {
    if images.oversized > 0 {
        issues.push(
            Issue::warning(
                IssueKind::OversizedImages,
                format!(
                    "{} image(s) wider than {}px are not served as WebP",
                    images.oversized, max_width
                ),
            )
            .on("img"),
        );
    }

    if images.not_lazy > 0 {
        issues.push(
            Issue::warning(
                IssueKind::MissingLazyLoading,
                format!(
                    "{} image(s) below the first {} are not lazy-loaded",
                    images.not_lazy, EAGER_IMAGE_ALLOWANCE
                ),
            )
            .on("img:not([loading=\"lazy\"])"),
        );
    }
}
