// File I/O: spreadsheet import, PDF text, result export

pub mod compare;
pub mod pdf;
pub mod xlsx;

pub use compare::{compare, compare_files, header_columns, FileOpener, XlsxResultWriter};
