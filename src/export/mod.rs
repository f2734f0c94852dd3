pub mod pdf;
pub mod share;
