//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | `validate` found stale values or duplicate SKUs    |
//! | 2    | Usage error (bad arguments, unsupported file type) |
//! | 3    | I/O error (missing file, unwritable output)        |
//! | 4    | Parse error (CSV, registry or settings contents)   |

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Validation findings. Like `diff(1)`, exit 1 means "not clean", not "crashed".
pub const EXIT_FINDINGS: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (3-4)
// =============================================================================

/// A file could not be read or written.
pub const EXIT_IO: u8 = 3;

/// A file was read but its contents are invalid.
pub const EXIT_PARSE: u8 = 4;
