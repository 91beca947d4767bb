pub mod store;
pub mod types;

pub use store::ReferenceTables;
pub use types::{FederalDistrict, ReferenceDocument, Region};
