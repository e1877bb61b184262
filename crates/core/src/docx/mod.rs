//! Just enough WordprocessingML to fill tables in an existing template.

#[cfg(test)]
pub(crate) mod fixtures;
mod package;
mod table;
mod xml;

pub use package::DocxPackage;
pub use table::{CellRef, Table};
pub use xml::{Element, Node, XmlDocument};
