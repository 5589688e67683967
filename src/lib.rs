#![warn(clippy::all)]

#[macro_use]
extern crate log;

#[macro_use]
extern crate serde_derive;

pub mod cache;
pub mod command_line;
pub mod config;
pub mod debounce;
pub mod dom;
pub mod error;
pub mod html;
pub mod media;
mod metrics;
pub mod polyfill;
mod resolved_image;
pub mod resolver;
pub mod source;
pub mod srcset;

pub use crate::metrics::Metrics;
pub use crate::resolved_image::{Resolution, ResolvedImage};

use crate::cache::CACHE_INDEX_ATTRIBUTE;
use crate::command_line::Options;
use crate::config::Config;
use crate::dom::Document;
use crate::error::PolyfillError;
use crate::media::{MediaEnvironment, MediaType, NoMediaQueries, Viewport};
use crate::polyfill::PicturePolyfill;

use std::fs::{create_dir_all, read_to_string};
use std::path::{Path, PathBuf};

// Logical time between two simulated resize signals
const RESIZE_SIGNAL_INTERVAL_MS: u64 = 10;

/// The state of one picture's image after processing
#[derive(Debug, Serialize, PartialEq)]
pub struct PictureReport {
    pub cache_index: Option<String>,
    pub src: Option<String>,
    pub srcset: Option<String>,
    pub alt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub viewport: Viewport,
    pub metrics: Metrics,
    pub pictures: Vec<PictureReport>,
}

/// Read an HTML page from disk
pub fn read_document(path: &Path) -> Result<Document, PolyfillError> {
    let contents = read_to_string(path)?;
    Ok(html::load_document(&contents))
}

/// Build the viewport described on the command line
pub fn viewport_from_options(options: &Options) -> Result<Viewport, PolyfillError> {
    let viewport = Viewport::new(options.width, options.height, options.pixel_ratio)?;
    if options.print {
        Ok(viewport.with_media_type(MediaType::Print))
    } else {
        Ok(viewport)
    }
}

fn environment(viewport: Viewport, no_media_queries: bool) -> Box<dyn MediaEnvironment> {
    if no_media_queries {
        Box::new(NoMediaQueries {
            pixel_ratio: viewport.pixel_ratio,
        })
    } else {
        Box::new(viewport)
    }
}

/// Describe every picture in the document as it currently stands
pub fn report_pictures(document: &Document, container_tag: &str) -> Vec<PictureReport> {
    let attribute = |id, name| document.get_attribute(id, name).map(str::to_owned);
    document
        .elements_by_tag_name(document.root(), container_tag)
        .into_iter()
        .map(|picture| {
            let img = document.first_element_by_tag_name(picture, "img");
            PictureReport {
                cache_index: attribute(picture, CACHE_INDEX_ATTRIBUTE),
                src: img.and_then(|img| attribute(img, "src")),
                srcset: img.and_then(|img| attribute(img, "srcset")),
                alt: img.and_then(|img| attribute(img, "alt")),
            }
        })
        .collect()
}

/// Load the page, run the ready pass and any resizes, and render the result
pub fn process_page(options: &Options) -> Result<String, PolyfillError> {
    let mut config = match &options.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if options.no_cache {
        config.read_from_cache = false;
    }
    let container_tag = config.container_tag.clone();

    let mut viewport = viewport_from_options(options)?;
    let mut document = read_document(&options.input)?;

    let mut polyfill = PicturePolyfill::new(config, options.native_picture);
    if !polyfill.add_listeners() {
        info!("Native picture support, leaving the page untouched");
    }

    let env = environment(viewport, options.no_media_queries);
    let count = polyfill.on_ready(&mut document, env.as_ref());
    info!("Resolved {} pictures at {}px", count, viewport.width);

    if !options.resize.is_empty() {
        let mut now = 0;
        for &width in &options.resize {
            if !width.is_finite() || width <= 0.0 {
                return Err(PolyfillError::InvalidViewport);
            }
            now += RESIZE_SIGNAL_INTERVAL_MS;
            polyfill.on_resize(now);
            viewport = viewport.resized(width, viewport.height);
        }
        if let Some(deadline) = polyfill.resize_pending() {
            let env = environment(viewport, options.no_media_queries);
            if let Some(count) = polyfill.on_tick(&mut document, env.as_ref(), deadline) {
                info!("Resolved {} pictures at {}px after resize", count, viewport.width);
            }
        }
    }

    let metrics = polyfill.metrics();
    debug!("{:?}", metrics);

    if options.report {
        let report = Report {
            viewport,
            metrics,
            pictures: report_pictures(&document, &container_tag),
        };
        Ok(serde_json::to_string_pretty(&report)?)
    } else {
        Ok(html::to_html(&document))
    }
}

/// Write to the given file, creating its directory, or to stdout
pub fn write_output(contents: &str, output: &Option<PathBuf>) -> Result<(), PolyfillError> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                create_dir_all(parent)?;
            }
            std::fs::write(path, contents)?;
            info!("Output written to {}", path.to_string_lossy());
        }
        None => println!("{}", contents),
    }
    Ok(())
}
