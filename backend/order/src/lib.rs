//! # Order Consolidation
//!
//! Turns the drink lines of one order into the pick-up list someone reads out at the counter.
//!
//! ## Input
//! - One [`OrderLine`] per colleague drink, in the order the items were added
//! - Names are snapshots taken when the order was written, never live menu lookups
//!
//! ## Output
//! - One [`ConsolidatedItem`] per distinct drink, with a count and a display line
//! - Sorted by count (most first), then alphabetically by display line
//!
//! ```text
//! 3x Reg Oat Latte, 2 sugars
//! 1x Sm Espresso (extra hot)
//! ```
//!
//! ## Grouping
//!
//! Two lines are the same drink when everything matches exactly, except notes which are compared
//! trimmed and lowercased. The first line of a group decides which notes text is displayed.
//!
//! Nothing is cached. Handlers call [`consolidate`] every time an order is rendered.

pub mod consolidate;
pub mod line;

pub use consolidate::{consolidate, summary_text};
pub use line::{ConsolidatedItem, OrderLine, format_line};
