use crate::{clamp, ModelFeatures, Platform};

#[derive(Debug, Clone)]
pub struct HeuristicWeights {
    pub instagram_base: f64,
    pub facebook_base: f64,
    pub twitter_base: f64,
    pub hashtag: f64,
    pub hashtag_cap: f64,
    pub creative: f64,
    pub creative_midpoint: f64,
    pub cadence_penalty: f64,
    pub cadence_allowance: f64,
    pub caption: f64,
    pub caption_min: f64,
    pub caption_max: f64,
    pub follower: f64,
    pub min_rate: f64,
    pub max_rate: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            instagram_base: 0.046,
            facebook_base: 0.039,
            twitter_base: 0.042,
            hashtag: 0.0007,
            hashtag_cap: 12.0,
            creative: 0.0018,
            creative_midpoint: 5.0,
            cadence_penalty: 0.0007,
            cadence_allowance: 10.0,
            caption: 0.003,
            caption_min: 20.0,
            caption_max: 280.0,
            follower: 0.003,
            min_rate: 0.01,
            max_rate: 0.18,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeuristicScorer {
    weights: HeuristicWeights,
}

impl HeuristicScorer {
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }

    pub fn base(&self, platform: Platform) -> f64 {
        match platform {
            Platform::Instagram => self.weights.instagram_base,
            Platform::Facebook => self.weights.facebook_base,
            Platform::Twitter => self.weights.twitter_base,
        }
    }

    /// Closed-form engagement rate, always within `[min_rate, max_rate]`.
    pub fn score(&self, features: &ModelFeatures) -> f64 {
        let w = &self.weights;

        let hashtag_boost = clamp(features.hashtags_count as f64, 0.0, w.hashtag_cap) * w.hashtag;
        let creative_boost =
            (clamp(features.creative_score, 0.0, 10.0) - w.creative_midpoint) * w.creative;
        let cadence_penalty =
            (features.posts_last_7_days as f64 - w.cadence_allowance).max(0.0) * w.cadence_penalty;
        let caption_boost = clamp(features.caption_length as f64, w.caption_min, w.caption_max)
            / w.caption_max
            * w.caption;
        let follower_boost =
            clamp((features.follower_count as f64 + 10.0).log10() - 3.0, 0.0, 3.0) * w.follower;

        let raw = self.base(features.platform)
            + hashtag_boost
            + creative_boost
            + caption_boost
            + follower_boost
            - cadence_penalty;
        clamp(raw, w.min_rate, w.max_rate)
    }
}

pub fn heuristic_rate(features: &ModelFeatures) -> f64 {
    HeuristicScorer::default().score(features)
}
