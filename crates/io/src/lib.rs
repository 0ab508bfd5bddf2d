// File I/O operations

pub mod csv;
pub mod error;
pub mod import;
pub mod registry;

pub use error::IoError;
pub use import::{build_sheet, import_sheet, ImportOptions};
pub use registry::{load_specs, save_specs};
