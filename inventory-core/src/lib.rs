//! Asset records and inventory-number assignment.
//!
//! - **`record`**: the six-column asset record and its field enumeration.
//! - **`policy`**: numbering policies (sequential, year-coded).
//! - **`allocator`**: fills blank inventory numbers against an existing-set.
//! - **`table`**: CSV batch import with column validation.
//! - **`store`**: persistent record store boundary (CSV file, in-memory).

pub mod allocator;
pub mod error;
pub mod policy;
pub mod record;
pub mod store;
pub mod table;

pub use allocator::{IdentifierAllocator, assign};
pub use error::{InputError, StoreError};
pub use policy::{Decimal, NumberingPolicy};
pub use record::{AssetRecord, Field};
pub use store::{CsvStore, MemoryStore, RecordStore};
pub use table::read_table;
