//! Pipeline stages for spreadsheet-to-JSON conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different remote parser transport) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ decode ──▶ complexity ──▶ remote? ──▶ tabular
//! (blob)   (calamine)  (heuristic)   (delegate)  (records)
//! ```
//!
//! 1. [`input`]      — resolve the source reference: existence and
//!    non-emptiness checks, then download the workbook bytes
//! 2. [`decode`]     — select the decode engine from the key suffix and
//!    open the workbook
//! 3. [`complexity`] — decide whether the workbook needs the remote
//!    layout-aware parser
//! 4. [`remote`]     — delegate complex workbooks over HTTP; the only stage
//!    with network I/O, and its failure is never fatal
//! 5. [`tabular`]    — convert each sheet's grid into ordered records

pub mod complexity;
pub mod decode;
pub mod input;
pub mod remote;
pub mod tabular;
