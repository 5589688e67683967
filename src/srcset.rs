use crate::error::PolyfillError;

use itertools::Itertools;

lazy_static::lazy_static! {
    // A decimal pixel density with an optional `x` suffix: `2`, `1.5x`, `.75X`
    static ref DENSITY: regex::Regex =
        regex::Regex::new(r"^([+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?)[xX]?$").unwrap();
}

/// One url of a srcset and the pixel density it was declared for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrcsetEntry {
    pub density: f64,
    pub url: String,
}

impl SrcsetEntry {
    pub fn new(density: f64, url: String) -> Self {
        Self { density, url }
    }
}

/// Parse a single comma separated srcset candidate, e.g. `retina.png 2x`.
/// A candidate without a descriptor has a density of `1`.
pub fn parse_candidate(candidate: &str) -> Result<SrcsetEntry, PolyfillError> {
    let parts: Vec<&str> = candidate.split_whitespace().collect();
    let (url, descriptor) = match parts.as_slice() {
        [] => return Err(PolyfillError::EmptyCandidate),
        [url] => return Ok(SrcsetEntry::new(1.0, (*url).to_owned())),
        // The descriptor is always the last part
        [url, .., descriptor] => (*url, *descriptor),
    };

    let density = DENSITY
        .captures(descriptor)
        .and_then(|captures| captures[1].parse::<f64>().ok())
        .filter(|density| density.is_finite() && *density > 0.0)
        .ok_or_else(|| PolyfillError::InvalidDensity {
            url: url.to_owned(),
            descriptor: descriptor.to_owned(),
        })?;
    Ok(SrcsetEntry::new(density, url.to_owned()))
}

/// Parse a srcset attribute into entries sorted by ascending density.
/// The sort is stable, so the first declared url wins between equal densities.
/// A candidate with an invalid density descriptor is kept with a density of `1`.
pub fn parse_srcset(srcset: &str) -> Vec<SrcsetEntry> {
    let mut entries: Vec<SrcsetEntry> = srcset
        .split(',')
        .map(str::trim)
        .filter(|candidate| !candidate.is_empty())
        .filter_map(|candidate| match parse_candidate(candidate) {
            Ok(entry) => Some(entry),
            Err(PolyfillError::InvalidDensity { url, descriptor }) => {
                warn!(
                    "Invalid density descriptor `{}` for {}, assuming 1x",
                    descriptor, url
                );
                Some(SrcsetEntry::new(1.0, url))
            }
            Err(_) => None,
        })
        .collect();
    entries.sort_by(|a, b| a.density.total_cmp(&b.density));
    entries
}

/// Write entries back out in srcset syntax
pub fn serialize_srcset(entries: &[SrcsetEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{} {}x", entry.url, entry.density))
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn entry(density: f64, url: &str) -> SrcsetEntry {
        SrcsetEntry::new(density, url.to_owned())
    }

    #[test]
    fn test_parse_srcset_sorts_by_density() {
        let result = parse_srcset("large.png 3x, small.png, medium.png 1.5x");
        assert_eq!(
            result,
            vec![
                entry(1.0, "small.png"),
                entry(1.5, "medium.png"),
                entry(3.0, "large.png")
            ]
        );
    }

    #[test]
    fn test_parse_srcset_equal_densities_keep_declaration_order() {
        let result = parse_srcset("b.png 2x, first.png 1x, second.png, c.png 2x");
        assert_eq!(
            result,
            vec![
                entry(1.0, "first.png"),
                entry(1.0, "second.png"),
                entry(2.0, "b.png"),
                entry(2.0, "c.png")
            ]
        );
    }

    #[test]
    fn test_parse_srcset_skips_empty_candidates() {
        let result = parse_srcset(" a.png 1x ,, b.png 2x, ");
        assert_eq!(result, vec![entry(1.0, "a.png"), entry(2.0, "b.png")]);
        assert!(parse_srcset("").is_empty());
    }

    #[test]
    fn test_parse_srcset_invalid_descriptor_defaults_to_one() {
        init();
        let result = parse_srcset("wide.png 300w, retina.png 2x, odd.png abc");
        assert_eq!(
            result,
            vec![
                entry(1.0, "wide.png"),
                entry(1.0, "odd.png"),
                entry(2.0, "retina.png")
            ]
        );
    }

    #[test]
    fn test_parse_candidate_errors() {
        assert!(matches!(
            parse_candidate("   "),
            Err(PolyfillError::EmptyCandidate)
        ));
        assert!(matches!(
            parse_candidate("zero.png 0x"),
            Err(PolyfillError::InvalidDensity { .. })
        ));
        assert!(matches!(
            parse_candidate("negative.png -2x"),
            Err(PolyfillError::InvalidDensity { .. })
        ));
        match parse_candidate("wide.png 640w") {
            Err(PolyfillError::InvalidDensity { url, descriptor }) => {
                assert_eq!(url, "wide.png");
                assert_eq!(descriptor, "640w");
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_parse_candidate_descriptor_forms() {
        assert_eq!(parse_candidate("a.png 2").unwrap(), entry(2.0, "a.png"));
        assert_eq!(parse_candidate("a.png .75X").unwrap(), entry(0.75, "a.png"));
        // Only the last part is a descriptor
        assert_eq!(
            parse_candidate("a.png  extra  1.5x").unwrap(),
            entry(1.5, "a.png")
        );
    }

    #[test]
    fn test_serialize_then_parse_is_identity_for_sorted_entries() {
        let entries = vec![
            entry(1.0, "a.png"),
            entry(1.5, "b.png"),
            entry(2.0, "c.png"),
            entry(3.0, "d.png"),
        ];
        let serialized = serialize_srcset(&entries);
        assert_eq!(serialized, "a.png 1x, b.png 1.5x, c.png 2x, d.png 3x");
        assert_eq!(parse_srcset(&serialized), entries);
    }
}
