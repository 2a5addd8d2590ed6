//! Cost scaling: bulk-purchase sums, affordability and cost laws.

pub mod logic;
pub mod types;

pub use logic::{cost_of_purchase, max_affordable, max_affordable_binary_search, remaining_capacity};
pub use types::CostLaw;
