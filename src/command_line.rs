use structopt::StructOpt;

use std::path::PathBuf;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "Picture Polyfill",
    about = "Resolve the <picture> elements of an HTML page to a single image source for a given viewport"
)]
pub struct Options {
    /// The path to the HTML page to process
    #[structopt(parse(from_os_str))]
    pub input: PathBuf,

    /// The viewport width in CSS pixels
    #[structopt(short = "w", long = "width", default_value = "1024")]
    pub width: f64,

    /// The viewport height in CSS pixels
    #[structopt(long = "height", default_value = "768")]
    pub height: f64,

    /// The device pixel ratio, e.g. 2 for a high density display
    #[structopt(short = "r", long = "pixel-ratio", default_value = "1")]
    pub pixel_ratio: f64,

    /// Evaluate media queries for print rather than screen
    #[structopt(long = "print")]
    pub print: bool,

    /// Behave like a host without media query support
    #[structopt(long = "no-media-queries")]
    pub no_media_queries: bool,

    /// Behave like a host that supports <picture> natively and leave the page untouched
    #[structopt(long = "native-picture")]
    pub native_picture: bool,

    /// Extract sources again on every pass instead of reusing cached ones
    #[structopt(long = "no-cache")]
    pub no_cache: bool,

    /// Widths to resize the viewport to after the page is ready, as one continuous drag
    #[structopt(long = "resize")]
    pub resize: Vec<f64>,

    /// A JSON config file
    #[structopt(short = "c", long = "config", parse(from_os_str))]
    pub config: Option<PathBuf>,

    /// Where to write the result. Defaults to stdout
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    pub output: Option<PathBuf>,

    /// Print a JSON report of the resolved images instead of the page
    #[structopt(long = "report")]
    pub report: bool,
}
