//! Record layer: typed field values, tuples, and the schema that lays them
//! out as fixed-width byte records.

mod desc;
mod field;

pub use desc::TupleDesc;
pub use field::{Field, Tuple};
