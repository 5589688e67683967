use crate::error::PolyfillError;

// Font size `em` and `rem` lengths resolve against
const BASE_FONT_SIZE: f64 = 16.0;
const EPSILON: f64 = 1e-6;

lazy_static::lazy_static! {
    static ref AND: regex::Regex = regex::Regex::new(r"\s+and\s+").unwrap();
    static ref LENGTH: regex::Regex = regex::Regex::new(r"^(-?\d*\.?\d+)\s*(px|em|rem)?$").unwrap();
    static ref RESOLUTION: regex::Regex =
        regex::Regex::new(r"^(\d*\.?\d+)\s*(dppx|x|dpi|dpcm)$").unwrap();
    static ref NUMBER: regex::Regex = regex::Regex::new(r"^\d*\.?\d+$").unwrap();
    static ref RATIO: regex::Regex = regex::Regex::new(r"^(\d*\.?\d+)\s*/\s*(\d*\.?\d+)$").unwrap();
}

/// The live display state media conditions are evaluated against
pub trait MediaEnvironment {
    /// Whether the media query list matches right now
    fn matches_media(&self, query: &str) -> bool;

    /// Environments without a media query engine resolve every picture to its default
    fn supports_media_queries(&self) -> bool {
        true
    }

    fn device_pixel_ratio(&self) -> f64 {
        1.0
    }
}

impl<F> MediaEnvironment for F
where
    F: Fn(&str) -> bool,
{
    fn matches_media(&self, query: &str) -> bool {
        self(query)
    }
}

/// A host with no media query support
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoMediaQueries {
    pub pixel_ratio: f64,
}

impl MediaEnvironment for NoMediaQueries {
    fn matches_media(&self, _query: &str) -> bool {
        false
    }

    fn supports_media_queries(&self) -> bool {
        false
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Screen,
    Print,
}

/// A display of a given size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub pixel_ratio: f64,
    pub media_type: MediaType,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            pixel_ratio: 1.0,
            media_type: MediaType::Screen,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Range {
    Min,
    Max,
    Exact,
}

impl Range {
    fn compare(self, actual: f64, expected: f64) -> bool {
        match self {
            Range::Min => actual + EPSILON >= expected,
            Range::Max => actual <= expected + EPSILON,
            Range::Exact => (actual - expected).abs() < EPSILON,
        }
    }
}

impl Viewport {
    pub fn new(width: f64, height: f64, pixel_ratio: f64) -> Result<Self, PolyfillError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(PolyfillError::InvalidViewport);
        }
        if !(pixel_ratio.is_finite() && pixel_ratio > 0.0) {
            return Err(PolyfillError::InvalidPixelRatio(pixel_ratio));
        }
        Ok(Self {
            width,
            height,
            pixel_ratio,
            media_type: MediaType::Screen,
        })
    }

    pub fn with_media_type(self, media_type: MediaType) -> Self {
        Self { media_type, ..self }
    }

    /// Same display, different size. Used when the window is resized.
    pub fn resized(self, width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..self
        }
    }

    fn evaluate_query(&self, query: &str) -> bool {
        let query = query.trim().to_ascii_lowercase();
        let (negated, query) = match query.strip_prefix("not ") {
            Some(rest) => (true, rest.trim()),
            None => (false, query.strip_prefix("only ").unwrap_or(&query).trim()),
        };
        if query.is_empty() {
            return false;
        }

        let parts: Option<Vec<bool>> = AND
            .split(query)
            .map(|part| self.evaluate_part(part.trim()))
            .collect();
        match parts {
            Some(parts) => negated != parts.into_iter().all(|matched| matched),
            // A malformed query never matches, negated or not
            None => {
                debug!("Unsupported media query `{}`", query);
                false
            }
        }
    }

    fn evaluate_part(&self, part: &str) -> Option<bool> {
        let feature = match part.strip_prefix('(').and_then(|p| p.strip_suffix(')')) {
            Some(feature) => feature.trim(),
            None => return self.evaluate_media_type(part),
        };
        match feature.split_once(':') {
            Some((name, value)) => self.evaluate_feature(name.trim(), value.trim()),
            None => self.evaluate_boolean_feature(feature),
        }
    }

    fn evaluate_media_type(&self, media_type: &str) -> Option<bool> {
        match media_type {
            "all" => Some(true),
            "screen" => Some(self.media_type == MediaType::Screen),
            "print" => Some(self.media_type == MediaType::Print),
            "speech" | "tv" | "handheld" | "projection" | "tty" | "braille" | "embossed"
            | "aural" => Some(false),
            _ => None,
        }
    }

    fn evaluate_boolean_feature(&self, name: &str) -> Option<bool> {
        match name {
            "width" | "height" | "orientation" | "resolution" | "color" => Some(true),
            "grid" | "monochrome" => Some(false),
            _ => None,
        }
    }

    fn evaluate_feature(&self, name: &str, value: &str) -> Option<bool> {
        let (range, feature) = split_range(name);
        match feature {
            "width" => Some(range.compare(self.width, parse_length(value)?)),
            "height" => Some(range.compare(self.height, parse_length(value)?)),
            "aspect-ratio" => Some(range.compare(self.width / self.height, parse_ratio(value)?)),
            "resolution" => Some(range.compare(self.pixel_ratio, parse_resolution(value)?)),
            "device-pixel-ratio" | "-moz-device-pixel-ratio" => {
                Some(range.compare(self.pixel_ratio, parse_number(value)?))
            }
            "orientation" if range == Range::Exact => match value {
                "portrait" => Some(self.height >= self.width),
                "landscape" => Some(self.width > self.height),
                _ => None,
            },
            _ => None,
        }
    }
}

impl MediaEnvironment for Viewport {
    fn matches_media(&self, query: &str) -> bool {
        // An empty query list matches everything
        if query.trim().is_empty() {
            return true;
        }
        query.split(',').any(|query| self.evaluate_query(query))
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }
}

fn split_range(name: &str) -> (Range, &str) {
    let name = name.strip_prefix("-webkit-").unwrap_or(name);
    if let Some(feature) = name.strip_prefix("min-") {
        (Range::Min, feature)
    } else if let Some(feature) = name.strip_prefix("max-") {
        (Range::Max, feature)
    } else {
        (Range::Exact, name)
    }
}

fn parse_length(value: &str) -> Option<f64> {
    let captures = LENGTH.captures(value)?;
    let number: f64 = captures[1].parse().ok()?;
    match captures.get(2).map(|unit| unit.as_str()) {
        Some("px") => Some(number),
        Some("em") | Some("rem") => Some(number * BASE_FONT_SIZE),
        // Only zero may omit its unit
        None if number == 0.0 => Some(0.0),
        _ => None,
    }
}

fn parse_resolution(value: &str) -> Option<f64> {
    let captures = RESOLUTION.captures(value)?;
    let number: f64 = captures[1].parse().ok()?;
    match &captures[2] {
        "dppx" | "x" => Some(number),
        "dpi" => Some(number / 96.0),
        "dpcm" => Some(number * 2.54 / 96.0),
        _ => None,
    }
}

fn parse_number(value: &str) -> Option<f64> {
    NUMBER.find(value)?.as_str().parse().ok()
}

fn parse_ratio(value: &str) -> Option<f64> {
    let captures = RATIO.captures(value)?;
    let numerator: f64 = captures[1].parse().ok()?;
    let denominator: f64 = captures[2].parse().ok()?;
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator)
}
