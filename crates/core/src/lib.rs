pub mod docx;
mod error;
mod filler;
mod report;
mod scanner;

pub use error::{DocxError, ReportError};
pub use filler::TableFiller;
pub use report::{ReportGenerator, ReportJob};
pub use scanner::Scanner;
