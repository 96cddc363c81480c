use crate::binning::Method;
use crate::types::Attribute;
use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

const ARGUMENT_NOTES: &str = "\
num_colors: the number of colors/shades to use (1 - 100)
method: \"quantiles\" or \"values\"
attribute: one of \"Population\", \"Area\" or \"PopulationDensity\"";

/// Render a choropleth map of municipality statistics
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None, after_help = ARGUMENT_NOTES)]
pub struct Cli {
    /// Number of colors/shades to use
    pub num_colors: usize,

    /// How values are split into colors
    #[arg(value_enum)]
    pub method: Method,

    /// Statistic to color by
    #[arg(value_enum)]
    pub attribute: Attribute,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,

    /// JSON array of municipalities
    #[arg(value_name = "PLACES.json")]
    pub places: PathBuf,

    /// Municipality borders with an AGS attribute
    #[arg(value_name = "BORDERS.shp")]
    pub borders: PathBuf,

    /// Output image; the format follows the extension
    #[arg(value_name = "IMAGE.png")]
    pub image: PathBuf,

    /// Optional TOML render settings
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses the process arguments. Usage mistakes print the error and the
    /// argument notes to stderr and exit with status 1.
    pub fn parse_or_exit() -> Self {
        match Cli::try_parse() {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => {
                let _ = e.print();
                eprintln!("\n{}", ARGUMENT_NOTES);
                std::process::exit(1);
            }
        }
    }
}
