pub mod heuristic;
pub mod normalize;

pub use heuristic::{heuristic_rate, HeuristicScorer, HeuristicWeights};
pub use normalize::normalize_prediction;
