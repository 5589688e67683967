#![warn(clippy::all, clippy::pedantic)]
extern crate env_logger;
#[macro_use]
extern crate log;

use anyhow::{Context, Result};
use env_logger::Env;
use picture_polyfill::command_line::Options;
use structopt::StructOpt;

///
/// This program applies the picture polyfill to a saved HTML page.
/// It does this in three steps:
/// 1. Parsing the page and resolving every `<picture>` for the given viewport and pixel ratio
/// 2. Replaying any `--resize` widths as a debounced window resize
/// 3. Writing out the rewritten page, or a JSON report of the resolved images
fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::new().filter_or("PICTURE_POLYFILL_LOG", "info")).init();

    let options = Options::from_args();
    debug!("{:?}", options);

    let output = picture_polyfill::process_page(&options).with_context(|| {
        format!(
            "Failed to process {}",
            options.input.to_string_lossy()
        )
    })?;
    picture_polyfill::write_output(&output, &options.output)
        .context("Failed to write output")?;
    Ok(())
}
