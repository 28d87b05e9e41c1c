pub mod basis;
pub mod integrals;
pub mod quadrature;

pub use basis::Line2Basis;
pub use integrals::Line2Integrals;
pub use quadrature::GaussQuadrature;
