mod catalog;
mod product;

pub use catalog::Catalog;
pub use product::{Attributes, Product, RecordKey};
