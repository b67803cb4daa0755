pub mod aggregator;
pub mod descriptor;
pub mod similarity;
