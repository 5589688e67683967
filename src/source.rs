use crate::dom::{Document, NodeId};
use crate::error::PolyfillError;
use crate::srcset::{parse_srcset, SrcsetEntry};

use std::collections::BTreeMap;

/// Container attribute holding the legacy JSON encoded source list
pub const LEGACY_ATTRIBUTE: &str = "data-picture";

/// One declared alternative of a picture
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CandidateSource {
    pub media: Option<String>,
    pub src: Option<String>,
    pub srcset: Vec<SrcsetEntry>,
    /// Legacy markup marks the candidate to use when no media condition matches
    pub is_default: bool,
    /// Every non-empty attribute declared on the source marker
    pub attributes: BTreeMap<String, String>,
}

impl CandidateSource {
    /// The density indexed urls of this candidate. A lone `src` counts as `1x`.
    pub fn entries(&self) -> Vec<SrcsetEntry> {
        match (&self.src, self.srcset.is_empty()) {
            (_, false) => self.srcset.clone(),
            (Some(src), true) => vec![SrcsetEntry::new(1.0, src.clone())],
            (None, true) => Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LegacySource {
    #[serde(default)]
    media: Option<String>,
    #[serde(default)]
    srcset: Vec<String>,
    #[serde(default)]
    standard: bool,
}

impl From<LegacySource> for CandidateSource {
    fn from(item: LegacySource) -> Self {
        // Legacy urls are ordered by integer pixel ratio, starting at 1x
        let srcset = item
            .srcset
            .into_iter()
            .enumerate()
            .map(|(i, url)| SrcsetEntry::new((i + 1) as f64, url))
            .collect();
        let media = item.media.filter(|media| !media.trim().is_empty());
        let mut attributes = BTreeMap::new();
        if let Some(media) = &media {
            attributes.insert("media".to_owned(), media.clone());
        }
        CandidateSource {
            media,
            src: None,
            srcset,
            is_default: item.standard,
            attributes,
        }
    }
}

/// Read the ordered candidate list from the `source` elements inside `container`
pub fn extract_sources(document: &Document, container: NodeId) -> Vec<CandidateSource> {
    document
        .elements_by_tag_name(container, "source")
        .into_iter()
        .map(|source| {
            let attributes: BTreeMap<String, String> = document
                .attributes(source)
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
                .collect();
            CandidateSource {
                media: attributes.get("media").cloned(),
                src: attributes.get("src").cloned(),
                srcset: attributes
                    .get("srcset")
                    .map(|srcset| parse_srcset(srcset))
                    .unwrap_or_default(),
                is_default: false,
                attributes,
            }
        })
        .collect()
}

/// Parse the legacy JSON form, `[{"media": "...", "srcset": ["1x.png", "2x.png"], "standard": true}]`
pub fn parse_legacy_sources(json: &str) -> Result<Vec<CandidateSource>, PolyfillError> {
    let sources: Vec<LegacySource> = serde_json::from_str(json)?;
    Ok(sources.into_iter().map(CandidateSource::from).collect())
}

/// Extract candidates from either markup form. Legacy JSON wins when present.
pub fn extract_container_sources(document: &Document, container: NodeId) -> Vec<CandidateSource> {
    match document.get_attribute(container, LEGACY_ATTRIBUTE) {
        Some(json) => parse_legacy_sources(json).unwrap_or_else(|e| {
            warn!(
                "Ignoring unreadable {} attribute on node {}: {:?}",
                LEGACY_ATTRIBUTE, container, e
            );
            Vec::new()
        }),
        None => extract_sources(document, container),
    }
}
