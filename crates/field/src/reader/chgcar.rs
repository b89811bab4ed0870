// crate modules
use crate::error::{Error, Result, Warning};
use crate::field::ScalarField;
use crate::lattice::{GridScaling, Lattice};
use crate::reader::parsers;

// chgtools modules
use chgtools_utils::FloatExt;

// standard library
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, info, warn};

/// A reader for VASP CHGCAR-style volumetric files
///
/// Supports both VASP4 headers (species counts directly after the lattice) and
/// VASP5 headers (a line of element symbols before the counts).
///
/// The file is read line-by-line with a buffered input stream:
///
/// - Comment, scaling factor, and lattice vectors
/// - Species names (VASP5 only) and counts
/// - Optional `Selective dynamics`, the coordinate mode, and atomic positions
/// - Grid dimensions `nx ny nz`
/// - Grid values, x fastest, until `nx*ny*nz` values, an `augmentation` block,
///   or a repeat of the grid dimension line
///
/// Notes:
///
/// - Header problems are fatal and reported as [Error::FormatError]
/// - A negative scaling factor is interpreted as the cell volume, as VASP does
/// - Grid values are read permissively, junk characters are skipped
/// - Short grids are padded with zeros and recorded as a [Warning]
/// - A repeated grid line marks a second channel (e.g. spin density), which is
///   detected but never read
///
/// Minimal Example:
/// ```rust, no_run
/// # use chgtools_field::reader::FieldReader;
/// # use std::path::Path;
/// let path = Path::new("path/to/CHGCAR");
/// let mut reader = FieldReader::new();
/// let field = reader.parse(path).unwrap();
/// ```
#[derive(Debug)]
pub struct FieldReader {
    /// Grid index convention given to the field
    scaling: GridScaling,
    /// Disable progress bar?
    disable_progress: bool,
}

impl Default for FieldReader {
    fn default() -> Self {
        Self {
            scaling: GridScaling::NodeExact,
            disable_progress: false,
        }
    }
}

/// Numbered lines of the input file
type NumberedLines = std::iter::Enumerate<Lines<BufReader<File>>>;

// ! ------------------------------------------------------------------------
// !                                Public API
// ! ------------------------------------------------------------------------

impl FieldReader {
    /// Just calls Default::default(), nothing special to be initialised
    pub fn new() -> Self {
        Default::default()
    }

    /// Parse a CHGCAR file into a [ScalarField]
    pub fn parse(&mut self, path: &Path) -> Result<ScalarField> {
        let mut lines = BufReader::new(File::open(path)?).lines().enumerate();
        debug!("Reading {}", path.display());

        let (_, comment) = Self::next_line(&mut lines, "comment")?;
        let scalar = Self::read_scalar(&mut lines)?;
        let lattice = Self::read_lattice(&mut lines, scalar)?;
        let (species_names, species_counts) = Self::read_species(&mut lines)?;
        Self::skip_positions(&mut lines, species_counts.iter().sum())?;
        let (grid_line, dimensions) = Self::read_dimensions(&mut lines)?;

        let mut field = ScalarField {
            comment,
            scalar,
            lattice,
            species_names,
            species_counts,
            dimensions,
            values: Vec::new(),
            scaling: self.scaling,
            second_channel: None,
            warnings: Vec::new(),
        };

        self.read_grid(&mut lines, &grid_line, &mut field)?;
        info!(
            "Read {}x{}x{} grid from {}",
            dimensions[0],
            dimensions[1],
            dimensions[2],
            path.display()
        );

        Ok(field)
    }

    /// Setter for the grid index convention
    pub fn set_scaling(&mut self, scaling: GridScaling) {
        self.scaling = scaling;
    }

    /// Do not print the progress indicators
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }
}

// ! ------------------------------------------------------------------------
// !                       Header: everything before the grid
// ! ------------------------------------------------------------------------

impl FieldReader {
    /// Next line of the file, where running out of lines is a format error
    fn next_line(lines: &mut NumberedLines, field: &'static str) -> Result<(usize, String)> {
        match lines.next() {
            Some((n, line)) => Ok((n + 1, line?)),
            None => Err(Error::FormatError {
                field,
                line: 0,
                content: "unexpected end of file".to_string(),
            }),
        }
    }

    /// Universal scaling factor on the second line
    fn read_scalar(lines: &mut NumberedLines) -> Result<f64> {
        let (n, line) = Self::next_line(lines, "scaling factor")?;
        let (_, scalar) = parsers::scalar(&line).map_err(|_| Error::FormatError {
            field: "scaling factor",
            line: n,
            content: line.clone(),
        })?;
        debug!("Scaling factor: {}", scalar.sci(5, 2));
        Ok(scalar)
    }

    /// Three lattice vectors, multiplied through by the scaling factor
    fn read_lattice(lines: &mut NumberedLines, scalar: f64) -> Result<Lattice> {
        let mut vectors = [[0.0; 3]; 3];
        for vector in vectors.iter_mut() {
            let (n, line) = Self::next_line(lines, "lattice vector")?;
            let (_, v) = parsers::vector3(&line).map_err(|_| Error::FormatError {
                field: "lattice vector",
                line: n,
                content: line.clone(),
            })?;
            *vector = v;
        }

        // a negative scaling factor is the target cell volume
        let factor = if scalar < 0.0 {
            let volume = Lattice::new(vectors)?.volume();
            (scalar.abs() / volume).cbrt()
        } else {
            scalar
        };

        for vector in vectors.iter_mut() {
            vector.iter_mut().for_each(|v| *v *= factor);
        }

        let lattice = Lattice::new(vectors)?;
        debug!("Lattice:\n{lattice}");
        Ok(lattice)
    }

    /// Optional species names (VASP5) followed by the species counts
    fn read_species(lines: &mut NumberedLines) -> Result<(Vec<String>, Vec<usize>)> {
        let (mut n, mut line) = Self::next_line(lines, "species counts")?;

        let mut names = Vec::new();
        if parsers::contains_alphabetic(&line) {
            info!("VASP5 header, species: {}", line.trim());
            names = line.split_whitespace().map(str::to_string).collect();
            (n, line) = Self::next_line(lines, "species counts")?;
        }

        let (_, counts) = parsers::vector_of_u32(&line).map_err(|_| Error::FormatError {
            field: "species counts",
            line: n,
            content: line.clone(),
        })?;

        let counts: Vec<usize> = counts.into_iter().map(|c| c as usize).collect();
        if !names.is_empty() && names.len() != counts.len() {
            warn!(
                "Found {} species names but {} counts",
                names.len(),
                counts.len()
            );
        }

        debug!("Species counts: {counts:?}");
        Ok((names, counts))
    }

    /// Skip the coordinate mode line and every atomic position
    fn skip_positions(lines: &mut NumberedLines, n_atoms: usize) -> Result<()> {
        let (_, line) = Self::next_line(lines, "coordinate mode")?;
        if parsers::is_selective_dynamics(&line) {
            Self::next_line(lines, "coordinate mode")?;
        }

        for _ in 0..n_atoms {
            Self::next_line(lines, "atomic position")?;
        }

        debug!("Skipped {n_atoms} atomic positions");
        Ok(())
    }

    /// First non-blank line after the positions holds `nx ny nz`
    fn read_dimensions(lines: &mut NumberedLines) -> Result<(String, [usize; 3])> {
        let (n, line) = loop {
            let (n, line) = Self::next_line(lines, "grid dimensions")?;
            if !parsers::is_blank(&line) {
                break (n, line);
            }
        };

        let dimensions = match parsers::grid_dimensions(&line) {
            Ok((_, d)) if d.iter().all(|&v| v > 0) => d,
            _ => {
                return Err(Error::FormatError {
                    field: "grid dimensions",
                    line: n,
                    content: line,
                })
            }
        };

        debug!("Grid dimensions: {dimensions:?}");
        Ok((line, dimensions))
    }
}

// ! ------------------------------------------------------------------------
// !                         Grid: the flat buffer of values
// ! ------------------------------------------------------------------------

impl FieldReader {
    /// Fill the flat grid buffer, recording any recoverable problems
    fn read_grid(
        &self,
        lines: &mut NumberedLines,
        grid_line: &str,
        field: &mut ScalarField,
    ) -> Result<()> {
        let expected: usize = field.dimensions.iter().product();
        let mut values = vec![0.0; expected];
        let mut found = 0;

        let mut progress_bar = self.init_progress_bar(expected);
        if !self.disable_progress {
            progress_bar.refresh()?;
        }

        while found < expected {
            let Some((n, line)) = lines.next() else {
                break;
            };
            let line = line?;

            if Self::is_grid_line(&line, grid_line) {
                field.second_channel = Some(n + 1);
                break;
            }

            if parsers::is_augmentation(&line) {
                debug!("Augmentation data on line {}, grid complete", n + 1);
                break;
            }

            let before = found;
            for v in parsers::numeric_tokens(&line) {
                if found == expected {
                    break;
                }
                values[found] = v;
                found += 1;
            }
            progress_bar.update(found - before)?;
        }

        // need an extra line for clean spacing if the progress bar is printed
        if !self.disable_progress {
            eprintln!()
        };

        if found < expected {
            warn!("Grid incomplete, read {found}/{expected} values, the rest are left as zero");
            field.warnings.push(Warning::IncompleteGrid { expected, found });
        }

        // look ahead for the start of a second channel if not already found
        if field.second_channel.is_none() {
            field.second_channel = Self::find_second_channel(lines, grid_line)?;
        }

        if let Some(line) = field.second_channel {
            info!("Second data channel starts on line {line}, only the first is read");
        }

        field.values = values;
        Ok(())
    }

    /// Scan the remainder of the file for a repeat of the grid line
    fn find_second_channel(lines: &mut NumberedLines, grid_line: &str) -> Result<Option<usize>> {
        for (n, line) in lines {
            if Self::is_grid_line(&line?, grid_line) {
                return Ok(Some(n + 1));
            }
        }
        Ok(None)
    }

    /// Checks for a verbatim repeat of the grid dimension line
    fn is_grid_line(line: &str, grid_line: &str) -> bool {
        line.trim() == grid_line.trim()
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self, total: usize) -> Bar {
        BarBuilder::default()
            .total(total)
            .desc("Reading grid")
            .unit(" values")
            .unit_scale(true)
            .disable(self.disable_progress)
            .build()
            .expect("Failed to initialise progress bar")
    }
}
