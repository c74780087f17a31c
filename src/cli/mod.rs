//! CLI operation handlers.
//!
//! - [`census`]: Run the census and write the CSV report
//!
//! Output formatting utilities are in [`output`].

pub mod census;
pub mod output;
