pub mod csv;
pub mod ofx;
