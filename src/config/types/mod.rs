//! Configuration utility types.
//!
//! | Module   | Purpose                                      |
//! |----------|----------------------------------------------|
//! | `error`  | Configuration error types and diagnostics    |
//! | `field`  | Dotted field paths for diagnostics           |
//! | `handle` | Global configuration handle (thread-safe)    |
//! | `path`   | Project directory layout                     |

mod error;
mod field;
pub mod handle;
mod path;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use field::FieldPath;
pub use handle::{cfg, init_config, reload_config};
pub use path::{DEFAULT_CACHE_DIR, ProjectPaths, STATIC_OUTPUT_DIR};
