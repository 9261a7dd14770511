//! Issue types that bridge extraction results to scoring and report writers

use serde::{Deserialize, Serialize};

/// Severity level of an issue
///
/// `Critical` and `Error` entries land in a page's `issues` list, `Warning`
/// entries in its `warnings` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Error,
    Warning,
}

impl Severity {
    /// Score penalty applied once per issue of this severity
    pub fn penalty(&self) -> i32 {
        match self {
            Severity::Critical => 20,
            Severity::Error => 10,
            Severity::Warning => 2,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Stable machine-readable issue key
///
/// Serialized as the snake_case `type` field of an issue and used as the
/// grouping key for cross-page recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    PageLoadError,
    HttpErrorStatus,
    MissingTitle,
    ShortTitle,
    LongTitle,
    MissingDescription,
    ShortDescription,
    LongDescription,
    MissingCanonical,
    InsecureCanonical,
    MissingOgTitle,
    MissingOgDescription,
    MissingOgImage,
    MissingOgUrl,
    MissingH1,
    MultipleH1,
    SlowLcp,
    HighCls,
    SlowTtfb,
    MissingAltText,
    EmptyAltText,
    ShortAltText,
    LowContrast,
    MissingStructuredData,
    InvalidStructuredData,
    OversizedImages,
    MissingLazyLoading,
    UnsafeExternalLinks,
    GenericLinkText,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::PageLoadError => "page_load_error",
            IssueKind::HttpErrorStatus => "http_error_status",
            IssueKind::MissingTitle => "missing_title",
            IssueKind::ShortTitle => "short_title",
            IssueKind::LongTitle => "long_title",
            IssueKind::MissingDescription => "missing_description",
            IssueKind::ShortDescription => "short_description",
            IssueKind::LongDescription => "long_description",
            IssueKind::MissingCanonical => "missing_canonical",
            IssueKind::InsecureCanonical => "insecure_canonical",
            IssueKind::MissingOgTitle => "missing_og_title",
            IssueKind::MissingOgDescription => "missing_og_description",
            IssueKind::MissingOgImage => "missing_og_image",
            IssueKind::MissingOgUrl => "missing_og_url",
            IssueKind::MissingH1 => "missing_h1",
            IssueKind::MultipleH1 => "multiple_h1",
            IssueKind::SlowLcp => "slow_lcp",
            IssueKind::HighCls => "high_cls",
            IssueKind::SlowTtfb => "slow_ttfb",
            IssueKind::MissingAltText => "missing_alt_text",
            IssueKind::EmptyAltText => "empty_alt_text",
            IssueKind::ShortAltText => "short_alt_text",
            IssueKind::LowContrast => "low_contrast",
            IssueKind::MissingStructuredData => "missing_structured_data",
            IssueKind::InvalidStructuredData => "invalid_structured_data",
            IssueKind::OversizedImages => "oversized_images",
            IssueKind::MissingLazyLoading => "missing_lazy_loading",
            IssueKind::UnsafeExternalLinks => "unsafe_external_links",
            IssueKind::GenericLinkText => "generic_link_text",
        }
    }

    /// Canned remediation shown next to a recommendation for this kind.
    ///
    /// `None` means the kind has no mapped action and the generic
    /// "review and fix" text is used instead.
    pub fn remediation(&self) -> Option<&'static str> {
        let action = match self {
            IssueKind::MissingTitle => "Add a unique <title> of 30-60 characters to every page",
            IssueKind::ShortTitle | IssueKind::LongTitle => {
                "Rewrite page titles to 30-60 characters with the primary keyword first"
            }
            IssueKind::MissingDescription => {
                "Add a <meta name=\"description\"> summarising the page in 120-160 characters"
            }
            IssueKind::ShortDescription | IssueKind::LongDescription => {
                "Adjust meta descriptions to 120-160 characters"
            }
            IssueKind::MissingCanonical => {
                "Add a <link rel=\"canonical\"> pointing at the preferred HTTPS URL"
            }
            IssueKind::InsecureCanonical => "Point canonical links at HTTPS URLs",
            IssueKind::MissingOgTitle
            | IssueKind::MissingOgDescription
            | IssueKind::MissingOgImage
            | IssueKind::MissingOgUrl => {
                "Add the full set of Open Graph tags (og:title, og:description, og:image, og:url) to the page head"
            }
            IssueKind::MissingH1 => "Give every page exactly one <h1> describing its topic",
            IssueKind::MultipleH1 => "Demote secondary <h1> elements to <h2> or lower",
            IssueKind::SlowLcp => {
                "Preload the hero image, serve it as WebP and trim render-blocking resources"
            }
            IssueKind::HighCls => {
                "Reserve space for images and embeds with explicit width/height attributes"
            }
            IssueKind::SlowTtfb => "Cache rendered pages or move hosting closer to visitors",
            IssueKind::MissingAltText => "Add descriptive alt text to every content image",
            IssueKind::EmptyAltText => {
                "Describe content images or mark decorative ones with role=\"presentation\""
            }
            IssueKind::ShortAltText => "Expand alt text so it describes what the image shows",
            IssueKind::LowContrast => "Fix text whose colour matches its background",
            IssueKind::MissingStructuredData => {
                "Add schema.org JSON-LD (RealEstateAgent, LocalBusiness or Article) to the page"
            }
            IssueKind::InvalidStructuredData => {
                "Make sure every JSON-LD block declares both @context and @type"
            }
            IssueKind::OversizedImages => {
                "Resize images wider than 1200px and convert them to WebP"
            }
            IssueKind::MissingLazyLoading => {
                "Add loading=\"lazy\" to images below the fold"
            }
            IssueKind::UnsafeExternalLinks => {
                "Add rel=\"noopener noreferrer\" to links that leave the site"
            }
            IssueKind::GenericLinkText => {
                "Replace \"click here\"/\"read more\" with text that names the destination"
            }
            IssueKind::PageLoadError | IssueKind::HttpErrorStatus => return None,
        };
        Some(action)
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single issue or warning recorded against a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Stable key (e.g. `missing_title`)
    #[serde(rename = "type")]
    pub kind: IssueKind,

    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Element or selector the issue refers to
    #[serde(default)]
    pub element: Option<String>,
}

impl Issue {
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
            element: None,
        }
    }

    pub fn critical(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Critical, message)
    }

    pub fn error(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Error, message)
    }

    pub fn warning(kind: IssueKind, message: impl Into<String>) -> Self {
        Self::new(kind, Severity::Warning, message)
    }

    pub fn on(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }
}

/// Collects issues during a page audit, keeping them in encounter order
#[derive(Debug, Default)]
pub struct IssueSink {
    items: Vec<Issue>,
}

impl IssueSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, issue: Issue) {
        self.items.push(issue);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.items.iter()
    }

    /// Split into `(issues, warnings)` as stored on a page result
    pub fn split(self) -> (Vec<Issue>, Vec<Issue>) {
        self.items
            .into_iter()
            .partition(|i| i.severity != Severity::Warning)
    }
}
