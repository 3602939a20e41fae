pub mod report;
pub mod work_item;

pub use report::{BatchReport, ItemOutcome};
pub use work_item::WorkItem;
