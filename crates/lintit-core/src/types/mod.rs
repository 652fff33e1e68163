//! Domain types for lint results.
//!
//! - `diagnostic` - One finding and its severity
//! - `range` - Line ranges addressed by findings
//! - `map` - Findings grouped by file
//! - `event` - Document events that trigger scans
//!
//! All public types are re-exported here and at the crate root:
//!
//! ```
//! use lintit_core::{Diagnostic, DiagnosticMap, Severity};
//! ```

mod diagnostic;
mod event;
mod map;
mod range;

pub use diagnostic::{Diagnostic, Severity, SeverityKeyword};
pub use event::{DocumentEvent, DocumentEventKind};
pub use map::DiagnosticMap;
pub use range::DiagnosticRange;
