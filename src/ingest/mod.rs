//! Workbook ingestion: cell coercion, workbook reading and the row scanner

pub mod row;
pub mod scanner;
pub mod workbook;

pub use row::*;
pub use scanner::*;
pub use workbook::*;
