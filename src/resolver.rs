use crate::cache::{CacheIndex, SourceCache, CACHE_INDEX_ATTRIBUTE};
use crate::dom::{Document, NodeId};
use crate::media::MediaEnvironment;
use crate::metrics::Metrics;
use crate::resolved_image::{Resolution, ResolvedImage};
use crate::source::{extract_container_sources, CandidateSource};
use crate::srcset::{serialize_srcset, SrcsetEntry};

use std::rc::Rc;

pub const DEFAULT_CONTAINER_TAG: &str = "picture";
pub const DEFAULT_SRC_ATTRIBUTE: &str = "data-default-src";
pub const DEFAULT_SRCSET_ATTRIBUTE: &str = "data-default-srcset";
pub const ALT_ATTRIBUTE: &str = "data-alt";
pub const ORIGINAL_SRC_ATTRIBUTE: &str = "data-original-src";
pub const ORIGINAL_SRCSET_ATTRIBUTE: &str = "data-original-srcset";

/// What happened to a container's `img` during write-back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Updated,
    Unchanged,
    MissingImage,
}

/// The first candidate whose media condition matches. A candidate without a
/// condition always matches. When nothing matches, the first candidate marked
/// as the legacy default is used.
pub fn select_candidate<'a>(
    candidates: &'a [CandidateSource],
    env: &dyn MediaEnvironment,
) -> Option<(usize, &'a CandidateSource)> {
    candidates
        .iter()
        .enumerate()
        .find(|(_, candidate)| {
            candidate
                .media
                .as_deref()
                .map_or(true, |media| env.matches_media(media))
        })
        .or_else(|| {
            candidates
                .iter()
                .enumerate()
                .find(|(_, candidate)| candidate.is_default)
        })
}

/// The first entry dense enough for `pixel_ratio`, or the densest one.
/// `entries` must be sorted by ascending density.
pub fn select_density(entries: &[SrcsetEntry], pixel_ratio: f64) -> Option<&SrcsetEntry> {
    entries
        .iter()
        .find(|entry| entry.density >= pixel_ratio)
        .or_else(|| entries.last())
}

fn default_image(document: &Document, container: NodeId, alt: Option<String>) -> ResolvedImage {
    ResolvedImage::new(
        document
            .get_attribute(container, DEFAULT_SRC_ATTRIBUTE)
            .map(str::to_owned),
        document
            .get_attribute(container, DEFAULT_SRCSET_ATTRIBUTE)
            .map(str::to_owned),
        alt,
        Resolution::Default,
    )
}

/// Pick the image for `container` given its extracted candidates
pub fn resolve_container(
    document: &Document,
    container: NodeId,
    candidates: &[CandidateSource],
    env: &dyn MediaEnvironment,
) -> ResolvedImage {
    let alt = document
        .get_attribute(container, ALT_ATTRIBUTE)
        .map(str::to_owned);

    if candidates.is_empty() || !env.supports_media_queries() {
        return default_image(document, container, alt);
    }

    let (index, candidate) = match select_candidate(candidates, env) {
        Some(selected) => selected,
        None => return default_image(document, container, alt),
    };
    let entries = candidate.entries();
    match select_density(&entries, env.device_pixel_ratio()) {
        Some(entry) => ResolvedImage::new(
            Some(entry.url.clone()),
            Some(serialize_srcset(&entries)),
            alt,
            Resolution::Candidate(index),
        ),
        None => {
            debug!("Candidate {} of node {} has no urls", index, container);
            default_image(document, container, alt)
        }
    }
}

fn set_if_different(document: &mut Document, id: NodeId, name: &str, value: Option<&str>) -> bool {
    if document.get_attribute(id, name) == value {
        return false;
    }
    match value {
        Some(value) => document.set_attribute(id, name, value),
        None => {
            document.remove_attribute(id, name);
        }
    }
    true
}

/// Write a resolved image onto the first `img` inside `container`.
///
/// The first write records the author's `src` and `srcset` so that an empty
/// resolution restores them instead of clearing the image.
pub fn apply_resolved(
    document: &mut Document,
    container: NodeId,
    resolved: &ResolvedImage,
) -> WriteOutcome {
    let img = match document.first_element_by_tag_name(container, "img") {
        Some(img) => img,
        None => return WriteOutcome::MissingImage,
    };

    if !document.has_attribute(img, ORIGINAL_SRC_ATTRIBUTE) {
        let src = document.get_attribute(img, "src").unwrap_or_default().to_owned();
        let srcset = document
            .get_attribute(img, "srcset")
            .unwrap_or_default()
            .to_owned();
        document.set_attribute(img, ORIGINAL_SRC_ATTRIBUTE, &src);
        document.set_attribute(img, ORIGINAL_SRCSET_ATTRIBUTE, &srcset);
    }

    let (src, srcset) = if resolved.is_empty() {
        let original = |name| {
            document
                .get_attribute(img, name)
                .filter(|value| !value.is_empty())
                .map(str::to_owned)
        };
        (
            original(ORIGINAL_SRC_ATTRIBUTE),
            original(ORIGINAL_SRCSET_ATTRIBUTE),
        )
    } else {
        (resolved.src.clone(), resolved.srcset.clone())
    };

    let mut changed = set_if_different(document, img, "src", src.as_deref());
    changed |= set_if_different(document, img, "srcset", srcset.as_deref());
    if let Some(alt) = &resolved.alt {
        changed |= set_if_different(document, img, "alt", Some(alt));
    }

    if changed {
        WriteOutcome::Updated
    } else {
        WriteOutcome::Unchanged
    }
}

/// Resolves every picture in a document, caching extracted sources per container
#[derive(Debug)]
pub struct Resolver {
    cache: SourceCache,
    metrics: Metrics,
    container_tag: String,
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_TAG)
    }
}

impl Resolver {
    pub fn new(container_tag: &str) -> Self {
        Self {
            cache: SourceCache::new(),
            metrics: Metrics::default(),
            container_tag: container_tag.to_ascii_lowercase(),
        }
    }

    pub fn cache(&self) -> &SourceCache {
        &self.cache
    }

    pub fn metrics(&self) -> Metrics {
        self.metrics
    }

    fn sources_for(
        &mut self,
        document: &mut Document,
        container: NodeId,
        read_from_cache: bool,
    ) -> Rc<Vec<CandidateSource>> {
        if read_from_cache {
            let cached = document
                .get_attribute(container, CACHE_INDEX_ATTRIBUTE)
                .and_then(|index| index.parse::<CacheIndex>().ok())
                .and_then(|index| self.cache.lookup(index, container));
            if let Some(sources) = cached {
                self.metrics.cache_hits += 1;
                return sources;
            }
        }

        let (index, sources) = self
            .cache
            .insert(container, extract_container_sources(document, container));
        self.metrics.extracted += 1;
        document.set_attribute(container, CACHE_INDEX_ATTRIBUTE, &index.to_string());
        debug!(
            "Extracted {} sources from node {} into cache index {}",
            sources.len(),
            container,
            index
        );
        sources
    }

    /// Resolve and write back every container under `root`, returning what was resolved
    pub fn resolve_all(
        &mut self,
        document: &mut Document,
        root: NodeId,
        env: &dyn MediaEnvironment,
        read_from_cache: bool,
    ) -> Vec<(NodeId, ResolvedImage)> {
        let containers = document.elements_by_tag_name(root, &self.container_tag);
        let mut resolved_images = Vec::with_capacity(containers.len());

        for container in containers {
            let sources = self.sources_for(document, container, read_from_cache);
            let resolved = resolve_container(document, container, &sources, env);
            self.metrics.processed += 1;
            if resolved.origin == Resolution::Default {
                self.metrics.defaulted += 1;
            }

            match apply_resolved(document, container, &resolved) {
                WriteOutcome::Updated => self.metrics.written += 1,
                WriteOutcome::Unchanged => self.metrics.unchanged += 1,
                WriteOutcome::MissingImage => {
                    debug!("Node {} has no img to write to", container);
                    self.metrics.missing_image += 1
                }
            }
            resolved_images.push((container, resolved));
        }
        resolved_images
    }

    /// A full parse pass. Returns the number of containers processed.
    pub fn parse(
        &mut self,
        document: &mut Document,
        root: NodeId,
        env: &dyn MediaEnvironment,
        read_from_cache: bool,
    ) -> usize {
        let count = self
            .resolve_all(document, root, env, read_from_cache)
            .len();
        info!("Parsed {} {} elements", count, self.container_tag);
        count
    }
}
