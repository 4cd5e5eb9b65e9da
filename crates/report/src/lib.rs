//! PDF rendering of RIPD reports.
//!
//! [`layout`] holds the page model, [`pdf`] serializes it, and
//! [`assembler`] turns a project into the nine-section report.

pub mod assembler;
pub mod error;
pub mod fonts;
pub mod layout;
pub mod pdf;

pub use assembler::{
    layout_report, render_report, render_report_to, sort_actions_for_report,
    sort_risks_for_report, ReportOptions,
};
pub use error::ReportError;
