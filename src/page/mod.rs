// src/page/mod.rs
// =============================================================================
// This module analyzes a single web page.
//
// Submodules:
// - html: Extracts doctype, title, headings, anchors and the login-form flag
// - analyze: Fetches the page and feeds its links to the checker
// =============================================================================

mod analyze;
mod html;

pub use analyze::{AnalysisReport, PageAnalyzer};
