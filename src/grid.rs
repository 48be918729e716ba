use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info};

use crate::GridError;

// Compiled once on first use; the pattern is a constant.
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+").expect("integer pattern should compile"));

/// Pull every integer out of `line`, ignoring whatever separates them.
fn extract_integers(line: &str, line_number: usize) -> Result<Vec<i64>, GridError> {
    INTEGER
        .find_iter(line)
        .map(|m| {
            m.as_str().parse::<i64>().map_err(|_| GridError::Elevation {
                line: line_number,
                token: m.as_str().to_owned(),
            })
        })
        .collect()
}

/// A rectangular matrix of elevations stored row-major.
///
/// Cell `(x, y)` lives at index `y * width + x`, which is also the
/// index of the graph node built for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElevationGrid {
    width: usize,
    height: usize,
    elevations: Vec<i64>,
}

impl ElevationGrid {
    /// Build a grid from `height` rows of exactly `width` values each.
    pub fn from_rows<R>(width: usize, height: usize, rows: R) -> Result<Self, GridError>
    where
        R: IntoIterator<Item = Vec<i64>>,
    {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyGrid { width, height });
        }
        if width.checked_mul(height).is_none() {
            return Err(GridError::TooLarge { width, height });
        }
        // width and height may come from an untrusted header: no preallocation
        let mut elevations = vec![];
        let mut found = 0;
        for row in rows {
            if found < height && row.len() != width {
                return Err(GridError::MalformedGrid {
                    row: found,
                    expected: width,
                    found: row.len(),
                });
            }
            if found < height {
                elevations.extend(row);
            }
            found += 1;
        }
        if found != height {
            return Err(GridError::RowCount {
                expected: height,
                found,
            });
        }
        Ok(Self {
            width,
            height,
            elevations,
        })
    }

    /// Parse the text map format.
    ///
    /// The first line holds `width height`; each of the next `height`
    /// lines holds `width` integers. Separators are not significant.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut lines = text.lines().enumerate();
        let header = lines
            .next()
            .map(|(_, line)| line)
            .ok_or_else(|| GridError::Header(String::new()))?;
        let dims = extract_integers(header, 1)?;
        let (width, height) = match dims.as_slice() {
            [w, h, ..] if *w >= 0 && *h >= 0 => (*w as usize, *h as usize),
            _ => return Err(GridError::Header(header.to_owned())),
        };
        debug!(width, height, "parsed map header");

        let mut rows = vec![];
        for (i, line) in lines {
            if rows.len() == height {
                if line.trim().is_empty() {
                    continue;
                }
                return Err(GridError::RowCount {
                    expected: height,
                    found: rows.len() + 1,
                });
            }
            rows.push(extract_integers(line, i + 1)?);
        }
        Self::from_rows(width, height, rows)
    }

    /// Read and [`parse`](Self::parse) a map file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, GridError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| GridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let grid = Self::parse(&text)?;
        info!(
            path = %path.display(),
            width = grid.width,
            height = grid.height,
            "loaded elevation map"
        );
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.elevations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elevations.is_empty()
    }

    /// # Panics
    ///
    /// If `(x, y)` is outside the grid.
    pub fn elevation(&self, x: usize, y: usize) -> i64 {
        assert!(x < self.width && y < self.height);
        self.elevations[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[i64] {
        &self.elevations[y * self.width..(y + 1) * self.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[i64]> + '_ {
        self.elevations.chunks_exact(self.width)
    }

    /// The same terrain mirrored left-to-right.
    pub fn mirrored(&self) -> Self {
        let elevations = self
            .rows()
            .flat_map(|row| row.iter().rev().copied())
            .collect();
        Self {
            width: self.width,
            height: self.height,
            elevations,
        }
    }

    /// The same terrain with rows and columns swapped.
    pub fn transposed(&self) -> Self {
        let elevations = (0..self.width)
            .flat_map(|x| (0..self.height).map(move |y| (x, y)))
            .map(|(x, y)| self.elevation(x, y))
            .collect();
        Self {
            width: self.height,
            height: self.width,
            elevations,
        }
    }
}
