pub mod domain;
pub mod io;

pub use domain::{Line2Element, Line2Mesh, Point};
