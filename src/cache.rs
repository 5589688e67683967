use crate::dom::NodeId;
use crate::source::CandidateSource;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

/// Attribute a container's cache index is stamped into
pub const CACHE_INDEX_ATTRIBUTE: &str = "data-cache-index";

/// Identifies a container's extracted sources. Indices are handed out in
/// increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheIndex(pub usize);

impl fmt::Display for CacheIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CacheIndex {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Extracted candidate lists, kept for the lifetime of the page.
/// Entries are never evicted. Each entry remembers the container it was
/// issued to, so a stamp copied or saved onto another element never hits.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<CacheIndex, (NodeId, Rc<Vec<CandidateSource>>)>,
    next_index: usize,
    hits: usize,
    misses: usize,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The sources stored under `index`, if that index was issued to `owner`
    pub fn lookup(
        &mut self,
        index: CacheIndex,
        owner: NodeId,
    ) -> Option<Rc<Vec<CandidateSource>>> {
        match self.entries.get(&index) {
            Some((issued_to, sources)) if *issued_to == owner => {
                self.hits += 1;
                Some(Rc::clone(sources))
            }
            Some((issued_to, _)) => {
                debug!(
                    "Cache index {} belongs to node {}, not node {}",
                    index, issued_to, owner
                );
                self.misses += 1;
                None
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store a freshly extracted list for `owner` under a new index
    pub fn insert(
        &mut self,
        owner: NodeId,
        sources: Vec<CandidateSource>,
    ) -> (CacheIndex, Rc<Vec<CandidateSource>>) {
        let index = CacheIndex(self.next_index);
        self.next_index += 1;
        let sources = Rc::new(sources);
        self.entries.insert(index, (owner, Rc::clone(&sources)));
        (index, sources)
    }

    pub fn get(&self, index: CacheIndex) -> Option<&[CandidateSource]> {
        self.entries.get(&index).map(|(_, sources)| sources.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}
