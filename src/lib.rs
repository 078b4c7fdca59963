pub mod api;
pub mod calendar;
pub mod config;
pub mod feature_order;
pub mod features;
pub mod model;
pub mod predictor;
pub mod scoring;
pub mod server;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

pub use calendar::{
    generate_calendar_draft, plan_calendar, CalendarDraftItem, CalendarRequest,
    CalendarRequirements, PlannedCalendarItem,
};
pub use feature_order::{FeatureOrder, FeatureOrderLoader};
pub use features::build_features;
pub use model::{FakeRunner, ModelError, ModelRunner, SubprocessRunner};
pub use predictor::PredictionService;

pub const MODEL_VERSION: &str = "tastehub-engagement-rate-v1";
pub const FALLBACK_MODEL_VERSION: &str = "heuristic-fallback-v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Platform {
    Instagram,
    Facebook,
    Twitter,
}

impl Platform {
    /// Anything that is not Instagram or Facebook is scored as Twitter.
    pub fn from_id(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "instagram" => Platform::Instagram,
            "facebook" => Platform::Facebook,
            _ => Platform::Twitter,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Twitter => "Twitter",
        }
    }

    pub fn default_post_hour(self) -> u8 {
        match self {
            Platform::Instagram => 19,
            Platform::Facebook => 13,
            Platform::Twitter => 12,
        }
    }

    pub fn all() -> [Platform; 3] {
        [Platform::Instagram, Platform::Facebook, Platform::Twitter]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostFormat {
    Reel,
    Carousel,
    Story,
    SingleImage,
    Tweet,
    Thread,
    FbPost,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Goal {
    Sales,
    Followers,
    Reach,
    Engagement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Campaign {
    Valentine,
    Festival,
    HealthyWeek,
    WeekendOffer,
    NewMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Funny,
    Promo,
    Informative,
    Emotional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CtaType {
    OrderNow,
    LinkClick,
    Comment,
    Share,
    Save,
    Dm,
    None,
}

/// Raw post fields as supplied by a caller. Optional and non-finite numbers
/// are replaced by defaults when features are built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostInput {
    pub platform: String,
    pub date: String,
    pub title: String,
    pub description: String,
    pub posts_last_7_days: f64,
    pub follower_count: Option<f64>,
    pub creative_score: Option<f64>,
    pub post_hour: Option<f64>,
}

/// Fixed-shape feature vector consumed by the engagement model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelFeatures {
    pub platform: Platform,
    pub format: PostFormat,
    pub goal: Goal,
    pub campaign: Campaign,
    pub tone: Tone,
    pub cta_type: CtaType,
    pub hashtags_count: u32,
    pub post_hour: u8,
    pub day_of_week: Weekday,
    pub caption_length: u32,
    pub creative_score: f64,
    pub posts_last_7_days: u64,
    pub follower_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Provider {
    #[serde(rename = "external-model")]
    ExternalModel,
    #[serde(rename = "heuristic-fallback")]
    HeuristicFallback,
}

impl Provider {
    pub fn label(self) -> &'static str {
        match self {
            Provider::ExternalModel => "external-model",
            Provider::HeuristicFallback => "heuristic-fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub prediction: f64,
    pub rate: f64,
    pub percent: f64,
    pub provider: Provider,
    pub model_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub features: ModelFeatures,
}

impl PredictionResult {
    pub fn from_model(prediction: f64, features: ModelFeatures) -> Self {
        let rate = scoring::normalize_prediction(prediction);
        Self {
            prediction,
            rate,
            percent: rate_to_percent(rate),
            provider: Provider::ExternalModel,
            model_version: MODEL_VERSION.to_string(),
            warning: None,
            features,
        }
    }

    pub fn fallback(features: ModelFeatures, warning: String) -> Self {
        let rate = scoring::heuristic_rate(&features);
        Self {
            prediction: rate,
            rate,
            percent: rate_to_percent(rate),
            provider: Provider::HeuristicFallback,
            model_version: FALLBACK_MODEL_VERSION.to_string(),
            warning: Some(warning),
            features,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self.provider, Provider::HeuristicFallback)
    }
}

/// Rate as a percentage rounded to two decimals.
pub fn rate_to_percent(rate: f64) -> f64 {
    (rate * 100.0 * 100.0).round() / 100.0
}

pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

pub fn format_float(value: f64, digits: usize) -> String {
    format!("{:.1$}", value, digits)
}
