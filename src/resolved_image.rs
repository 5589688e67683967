/// Which declaration an image was resolved from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    /// Index of the matching candidate source
    Candidate(usize),
    /// The container's `data-default-src` / `data-default-srcset`
    Default,
}

/// The attributes to write onto a picture's `img`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedImage {
    pub src: Option<String>,
    pub srcset: Option<String>,
    pub alt: Option<String>,
    pub origin: Resolution,
}

impl ResolvedImage {
    pub fn new(
        src: Option<String>,
        srcset: Option<String>,
        alt: Option<String>,
        origin: Resolution,
    ) -> Self {
        Self {
            src: src.filter(|s| !s.is_empty()),
            srcset: srcset.filter(|s| !s.is_empty()),
            alt,
            origin,
        }
    }

    /// Nothing resolved, the image keeps the attributes its author gave it
    pub fn is_empty(&self) -> bool {
        self.src.is_none() && self.srcset.is_none()
    }
}
