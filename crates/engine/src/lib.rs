pub mod change;
pub mod compose;
pub mod grid;
pub mod header;
pub mod history;
pub mod model;
pub mod propagate;
pub mod registry;
pub mod session;
pub mod validation;

pub use compose::{compose_sku, SkuSettings};
pub use model::{Cell, CellStyle, CellValue, ColumnDef, ColumnKind, Row, Sheet, Snapshot, SpecValue, Specification};
pub use session::{Catalog, CatalogSession, EditOutcome};
pub use validation::{ValidationError, ValidationKind};
