mod content;
mod resolver;

pub use content::{ContentSource, FsContentSource};
pub use resolver::IntentResolver;

use serde::{Deserialize, Serialize};

pub const ACTION_VIEW: &str = "android.intent.action.VIEW";
pub const ACTION_SEND: &str = "android.intent.action.SEND";
pub const ACTION_SEND_MULTIPLE: &str = "android.intent.action.SEND_MULTIPLE";

pub const PDF_MIME_TYPE: &str = "application/pdf";
const PDF_EXTENSION: &str = ".pdf";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntentAction {
    View,
    Send,
    SendMultiple,
    Other(String),
}

impl IntentAction {
    pub fn from_android(action: &str) -> Self {
        match action {
            ACTION_VIEW => IntentAction::View,
            ACTION_SEND => IntentAction::Send,
            ACTION_SEND_MULTIPLE => IntentAction::SendMultiple,
            other => IntentAction::Other(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocatorKind {
    /// `file:` locator, readable with plain file APIs.
    File,
    /// `content:` locator, readable only through the content broker.
    Content,
    Unsupported,
}

/// A resource reference carried by an activation event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct ResourceLocator {
    raw: String,
}

impl ResourceLocator {
    pub fn parse(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// `file://` locator for a local path, percent-encoding each segment.
    pub fn from_file_path(path: &std::path::Path) -> Self {
        let text = path.to_string_lossy().replace('\\', "/");
        let encoded = text
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        let separator = if encoded.starts_with('/') { "" } else { "/" };
        Self::parse(format!("file://{}{}", separator, encoded))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Lowercased scheme, if the locator has one.
    pub fn scheme(&self) -> Option<String> {
        let (scheme, _) = self.raw.split_once(':')?;
        let valid = scheme
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        valid.then(|| scheme.to_ascii_lowercase())
    }

    pub fn kind(&self) -> LocatorKind {
        match self.scheme().as_deref() {
            Some("file") => LocatorKind::File,
            Some("content") => LocatorKind::Content,
            _ => LocatorKind::Unsupported,
        }
    }

    /// Authority component (`//authority/...`), if present.
    pub fn authority(&self) -> Option<&str> {
        let rest = self.hierarchical_part()?.strip_prefix("//")?;
        let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
        Some(&rest[..end])
    }

    /// Decoded path component: authority skipped, query and fragment dropped.
    pub fn path(&self) -> Option<String> {
        let mut rest = self.hierarchical_part()?;
        if let Some(after) = rest.strip_prefix("//") {
            let start = after.find(['/', '?', '#']).unwrap_or(after.len());
            rest = &after[start..];
        }
        let end = rest.find(['?', '#']).unwrap_or(rest.len());
        let encoded = &rest[..end];
        if encoded.is_empty() {
            return None;
        }
        let decoded = urlencoding::decode(encoded)
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| encoded.to_string());
        Some(decoded)
    }

    pub fn has_pdf_extension(&self) -> bool {
        let len = self.raw.len();
        len >= PDF_EXTENSION.len()
            && self
                .raw
                .get(len - PDF_EXTENSION.len()..)
                .is_some_and(|tail| tail.eq_ignore_ascii_case(PDF_EXTENSION))
    }

    fn hierarchical_part(&self) -> Option<&str> {
        self.scheme()?;
        self.raw.split_once(':').map(|(_, rest)| rest)
    }
}

impl From<String> for ResourceLocator {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<ResourceLocator> for String {
    fn from(locator: ResourceLocator) -> Self {
        locator.raw
    }
}

impl std::fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// An OS activation: "open this" or "share this" addressed to the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationEvent {
    pub action: IntentAction,
    /// Declared MIME type (`Intent.getType()`).
    pub mime_type: Option<String>,
    /// Primary data locator (`Intent.getData()`), used by view actions.
    pub data: Option<ResourceLocator>,
    /// Attached streams (`EXTRA_STREAM`), used by send actions.
    #[serde(default)]
    pub streams: Vec<ResourceLocator>,
}

impl ActivationEvent {
    pub fn view(data: impl Into<String>, mime_type: Option<&str>) -> Self {
        Self {
            action: IntentAction::View,
            mime_type: mime_type.map(str::to_string),
            data: Some(ResourceLocator::parse(data)),
            streams: Vec::new(),
        }
    }

    pub fn send(stream: impl Into<String>, mime_type: Option<&str>) -> Self {
        Self {
            action: IntentAction::Send,
            mime_type: mime_type.map(str::to_string),
            data: None,
            streams: vec![ResourceLocator::parse(stream)],
        }
    }

    pub fn send_multiple<I, S>(streams: I, mime_type: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            action: IntentAction::SendMultiple,
            mime_type: mime_type.map(str::to_string),
            data: None,
            streams: streams.into_iter().map(ResourceLocator::parse).collect(),
        }
    }

    /// Whether the declared type or the locator name marks this as a PDF.
    pub fn looks_like_pdf(&self, locator: &ResourceLocator) -> bool {
        self.mime_type.as_deref() == Some(PDF_MIME_TYPE) || locator.has_pdf_extension()
    }
}
