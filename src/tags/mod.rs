//! # Tag Aggregation
//!
//! `#Category/Subcategory` tags → `TagRecord`s → cross-tabulations.
//!
//! ```text
//! items ─► records(items, map) ─► TagTable::aggregate     (category × subcategory)
//!                               └► ScenarioTable::pivot   (… × scenario column)
//! ```

pub mod record;
pub mod mapping;
pub mod table;

pub use record::{records_for, TagRecord};
pub use mapping::SubcategoryMap;
pub use table::{ScenarioTable, TagTable, CELL_SEPARATOR};

/// Default category holding emission/concentration scenarios.
pub const SCENARIO_CATEGORY: &str = "SCEN";
/// Default category holding period tags.
pub const PERIOD_CATEGORY: &str = "PER";
