/// Counters accumulated across parse passes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Metrics {
    /// Containers visited
    pub processed: usize,
    /// Containers whose sources were read from markup
    pub extracted: usize,
    /// Containers whose sources came from the cache
    pub cache_hits: usize,
    /// Containers that resolved to their declared default
    pub defaulted: usize,
    /// Images whose attributes were changed
    pub written: usize,
    /// Images that already held the resolved values
    pub unchanged: usize,
    /// Containers without an `img` to write to
    pub missing_image: usize,
}
