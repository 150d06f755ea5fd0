//! Serialization plans for resolved declarations.
//!
//! A [`SerializationPlan`] fixes, for each field in wire order, the encoding
//! [`Strategy`] and element type, and records whether the whole type has a
//! fixed encoded size and whether it starts with a header. Plans are built by
//! [`PlanTable::build`] for a root type and everything it embeds, and drive
//! the plan-based codec.

mod plan;
mod table;

pub use plan::{Element, FieldPlan, SerializationPlan, Strategy};
pub use table::PlanTable;
