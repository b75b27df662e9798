pub mod catalog;
pub mod diagnostics;
