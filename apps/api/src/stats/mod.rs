// Taxonomy statistics: how jobs spread across families and sub-families.
// Serves the same aggregates the exploratory charts are drawn from.

pub mod distribution;
pub mod handlers;
