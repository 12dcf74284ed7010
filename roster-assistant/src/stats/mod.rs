pub mod aggregator;
pub mod feed;
pub mod line;
pub mod projection;
