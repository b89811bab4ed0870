//! Command line tool for plotting planar slices through CHGCAR files
//!
//! ```bash
//! chgplot -i CHGCAR -o slice.png -p 0,1.8,0 -v 1,0,0 -w 0,0,1 -s 100
//! ```

// chgtools modules
use chgtools_field::{FieldReader, GridScaling};
use chgtools_plot::{render_request, write_series, Error, PaletteKind, PlotOptions, Result};
use chgtools_slice::SliceRequest;
use chgtools_utils::f;

// standard library
use std::path::PathBuf;

// external crates
use clap::Parser;
use log::{error, info, warn};

/// Plot a planar slice through a CHGCAR density grid
#[derive(Parser, Debug)]
#[command(name = "chgplot", version)]
#[command(about = "Plot a planar slice through a CHGCAR density grid")]
struct Cli {
    /// Path to the CHGCAR file
    #[arg(short, long, default_value = "CHGCAR")]
    input: PathBuf,

    /// Output PNG file
    #[arg(short, long, default_value = "slice.png")]
    output: PathBuf,

    /// Centre of the plane as x,y,z
    #[arg(short = 'p', long, default_value = "0,0,0")]
    #[arg(value_parser = parse_vector, allow_hyphen_values = true)]
    origin: [f64; 3],

    /// Image x direction as x,y,z
    #[arg(short = 'v', long, default_value = "1,0,0")]
    #[arg(value_parser = parse_vector, allow_hyphen_values = true)]
    v1: [f64; 3],

    /// Image y direction as x,y,z
    #[arg(short = 'w', long, default_value = "0,1,0")]
    #[arg(value_parser = parse_vector, allow_hyphen_values = true)]
    v2: [f64; 3],

    /// Pixels per length unit
    #[arg(short, long, default_value_t = 100.0)]
    scale: f64,

    /// Image extent along v and w as li,hi,lj,hj
    #[arg(short, long, default_value = "-5,5,-5,5")]
    #[arg(value_parser = parse_bounds, allow_hyphen_values = true)]
    bounds: [f64; 4],

    /// Values may be negative, use the signed log scale
    #[arg(short, long)]
    negative: bool,

    /// Bottom of the colour scale (display units)
    #[arg(long, default_value_t = -5.0, allow_hyphen_values = true)]
    low: f64,

    /// Top of the colour scale (display units)
    #[arg(long, default_value_t = 5.0, allow_hyphen_values = true)]
    high: f64,

    /// Number of isoline levels, 0 for none
    #[arg(long, default_value_t = 0)]
    isolines: usize,

    /// Colour palette
    #[arg(long, value_enum, default_value_t = PaletteKind::Sequential)]
    palette: PaletteKind,

    /// Keep the blank margin outside of the cell
    #[arg(long)]
    no_crop: bool,

    /// Use a periodic grid (scale by n rather than n-1)
    #[arg(long)]
    periodic: bool,

    /// Number of parallel planes to render
    #[arg(long, default_value_t = 1)]
    frames: usize,

    /// Distance between parallel planes
    #[arg(long, default_value_t = 0.1, allow_hyphen_values = true)]
    step: f64,

    /// Verbose mode, repeat for more detail
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all output
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut reader = FieldReader::new();
    if cli.quiet {
        reader.disable_progress();
    }
    if cli.periodic {
        reader.set_scaling(GridScaling::Periodic);
    }

    let field = reader.parse(&cli.input)?;
    info!("{field}");
    for warning in field.warnings() {
        warn!("{warning}");
    }

    let request = SliceRequest::builder()
        .origin(cli.origin)
        .v1(cli.v1)
        .v2(cli.v2)
        .scale(cli.scale)
        .bounds(cli.bounds)
        .allow_negative(cli.negative)
        .build();

    let options = PlotOptions {
        low: cli.low,
        high: cli.high,
        isolines: cli.isolines,
        palette: cli.palette,
        crop: !cli.no_crop,
    };

    match cli.frames {
        0 => Err(Error::InvalidArgument("at least 1 frame needed".to_string())),
        1 => {
            render_request(&field, &request, &options)?.write_png(&cli.output)?;
            info!("Image written to {}", cli.output.display());
            Ok(())
        }
        n => {
            write_series(&field, &request, &options, n, cli.step, &cli.output)?;
            Ok(())
        }
    }
}

/// Parse "x,y,z" into a vector
fn parse_vector(s: &str) -> core::result::Result<[f64; 3], String> {
    let values = parse_list(s)?;
    <[f64; 3]>::try_from(values.as_slice())
        .map_err(|_| f!("expected 3 comma separated values, found \"{s}\""))
}

/// Parse "li,hi,lj,hj" into bounds
fn parse_bounds(s: &str) -> core::result::Result<[f64; 4], String> {
    let values = parse_list(s)?;
    <[f64; 4]>::try_from(values.as_slice())
        .map_err(|_| f!("expected 4 comma separated values, found \"{s}\""))
}

fn parse_list(s: &str) -> core::result::Result<Vec<f64>, String> {
    s.split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| f!("\"{v}\" is not a number"))
        })
        .collect()
}

/// Sets up logging at runtime to allow for multiple verbosity levels
fn init_logging(cli: &Cli) {
    stderrlog::new()
        .modules([
            module_path!(),
            "chgtools_field",
            "chgtools_slice",
            "chgtools_plot",
        ])
        .quiet(cli.quiet)
        .verbosity(cli.verbose as usize + 2)
        .show_level(true)
        .init()
        .expect("Failed to initialise logger");
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_arguments() {
        let cli = Cli::try_parse_from([
            "chgplot", "-p", "-1,0.5,2", "-w", "0,0,1", "-b", "-2,2,-1,1", "--low", "-3",
            "--isolines", "8", "--palette", "diverging", "--verbose", "--verbose",
        ])
        .unwrap();

        assert_eq!(cli.origin, [-1.0, 0.5, 2.0]);
        assert_eq!(cli.v1, [1.0, 0.0, 0.0]);
        assert_eq!(cli.v2, [0.0, 0.0, 1.0]);
        assert_eq!(cli.bounds, [-2.0, 2.0, -1.0, 1.0]);
        assert_eq!(cli.low, -3.0);
        assert_eq!(cli.isolines, 8);
        assert_eq!(cli.palette, PaletteKind::Diverging);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.frames, 1);
    }

    #[test]
    fn bad_triples() {
        assert!(parse_vector("1,2").is_err());
        assert!(parse_vector("1,2,x").is_err());
        assert!(parse_bounds("1,2,3").is_err());
        assert_eq!(parse_vector(" 1, 2 ,3").unwrap(), [1.0, 2.0, 3.0]);
    }
}
