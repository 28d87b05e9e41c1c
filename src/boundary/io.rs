//! CSV loading of boundary element files.
//!
//! Flux and value files share the schema
//! `element_gid,pa_lid,boundaryconfig_id` with `pa_lid` one of 0, 1, or
//! -1 (entry retained but inert).

use std::path::Path;
use std::rc::Rc;

use crate::boundary::{BoundaryElement, Line2Boundary};
use crate::error::Result;
use crate::mesh::io::{malformed, parse_index, read_rows};
use crate::mesh::Line2Mesh;

fn read_boundary_elements(path: &Path) -> Result<Vec<BoundaryElement>> {
    let mut entries = Vec::new();
    for row in read_rows(path, 3)? {
        let element_gid = parse_index(path, row.line, row.fields[0], "element_gid")?;

        let lid = row.fields[1];
        let local_point = if lid == -1.0 {
            None
        } else if lid == 0.0 || lid == 1.0 {
            Some(lid as usize)
        } else {
            return Err(malformed(
                path,
                row.line,
                format!("column 'pa_lid' must be 0, 1, or -1, got {}", lid),
            ));
        };

        let config_id = parse_index(path, row.line, row.fields[2], "boundaryconfig_id")?;
        entries.push(BoundaryElement {
            element_gid,
            local_point,
            config_id,
        });
    }
    Ok(entries)
}

impl Line2Boundary {
    /// Load boundary data from a flux file and a value file sharing the
    /// `element_gid,pa_lid,boundaryconfig_id` schema.
    pub fn from_csv<P: AsRef<Path>>(
        mesh: Rc<Line2Mesh>,
        flux_path: P,
        value_path: P,
    ) -> Result<Self> {
        let flux_elements = read_boundary_elements(flux_path.as_ref())?;
        let value_elements = read_boundary_elements(value_path.as_ref())?;
        Line2Boundary::new(mesh, flux_elements, value_elements)
    }
}
