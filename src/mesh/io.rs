//! CSV loading of mesh point and element files.
//!
//! Point files carry `gid,position_x` rows, element files
//! `gid,p0_gid,p1_gid`. Mesh generators commonly emit integer columns as
//! reals (`3.0`); whole-valued reals are accepted, fractional ones are
//! rejected.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::mesh::domain::{Line2Element, Line2Mesh, Point};

/// One data row of a CSV file, split into fields, with its 1-based line
/// number for diagnostics.
pub(crate) struct CsvRow {
    pub line: usize,
    pub fields: Vec<f64>,
}

/// Read all data rows of a CSV file, skipping the header line and blank
/// lines, requiring `num_fields` numeric fields per row.
pub(crate) fn read_rows(path: &Path, num_fields: usize) -> Result<Vec<CsvRow>> {
    let contents = fs::read_to_string(path)?;
    let mut rows = Vec::new();

    for (index, raw) in contents.lines().enumerate() {
        let line = index + 1;
        if line == 1 || raw.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
        if fields.len() != num_fields {
            return Err(malformed(
                path,
                line,
                format!("expected {} columns, found {}", num_fields, fields.len()),
            ));
        }

        let mut values = Vec::with_capacity(num_fields);
        for field in fields {
            let value: f64 = field.parse().map_err(|_| {
                malformed(path, line, format!("non-numeric entry '{}'", field))
            })?;
            values.push(value);
        }
        rows.push(CsvRow { line, fields: values });
    }

    Ok(rows)
}

/// Interpret a CSV field as a non-negative integer id. Whole-valued reals
/// are accepted (generators write `3.0` for gid 3).
pub(crate) fn parse_index(path: &Path, line: usize, value: f64, column: &str) -> Result<usize> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 {
        return Err(malformed(
            path,
            line,
            format!("column '{}' must be a non-negative integer, got {}", column, value),
        ));
    }
    Ok(value as usize)
}

pub(crate) fn malformed(path: &Path, line: usize, reason: String) -> Error {
    Error::MalformedInput {
        path: path.to_path_buf(),
        reason: format!("line {}: {}", line, reason),
    }
}

impl Line2Mesh {
    /// Load a mesh from a point file (`gid,position_x`) and an element
    /// file (`gid,p0_gid,p1_gid`).
    pub fn from_csv<P: AsRef<Path>>(point_path: P, element_path: P) -> Result<Self> {
        let point_path = point_path.as_ref();
        let element_path = element_path.as_ref();

        let mut points = Vec::new();
        for row in read_rows(point_path, 2)? {
            let gid = parse_index(point_path, row.line, row.fields[0], "gid")?;
            points.push(Point {
                gid,
                x: row.fields[1],
            });
        }

        let mut elements = Vec::new();
        for row in read_rows(element_path, 3)? {
            let gid = parse_index(element_path, row.line, row.fields[0], "gid")?;
            let p0_gid = parse_index(element_path, row.line, row.fields[1], "p0_gid")?;
            let p1_gid = parse_index(element_path, row.line, row.fields[2], "p1_gid")?;
            elements.push(Line2Element::new(gid, p0_gid, p1_gid));
        }

        Line2Mesh::new(points, elements)
    }
}
