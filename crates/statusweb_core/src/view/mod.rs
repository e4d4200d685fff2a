//! View models handed to the page template renderer.
//!
//! # Responsibility
//! - Turn store results into render-ready structs.
//! - Own pagination math and timestamp formatting for pages.

pub mod news_page;
