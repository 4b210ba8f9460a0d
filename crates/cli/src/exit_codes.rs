//! CLI Exit Code Registry
//!
//! Exit codes are part of the shell contract — batch scripts branch on them.
//!
//! | Code | Description                                      |
//! |------|--------------------------------------------------|
//! | 0    | Success (every file converted)                   |
//! | 1    | One or more files failed to convert              |
//! | 2    | Usage error (bad arguments, missing file)        |

/// Success - every requested file converted.
pub const EXIT_SUCCESS: u8 = 0;

/// At least one file failed; the rest of the batch still ran.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;
