pub mod percentages;
pub mod timestamps;

pub use percentages::{aggregate_percentages, to_percentages, BucketPercent, PercentGroup};
