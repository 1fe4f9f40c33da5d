pub mod recommendations;
pub mod score;

pub use score::ScoreAggregator;
