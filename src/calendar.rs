use chrono::{Duration, Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::features::build_features;
use crate::features::rules::{compile, KeywordChain};
use crate::predictor::PredictionService;
use crate::{Goal, Platform, PostInput};

pub const DEFAULT_DAYS: i64 = 30;
pub const MAX_DAYS: i64 = 60;

const THEME_LIBRARY: [&str; 30] = [
    "Brand Story",
    "Behind the Scenes",
    "Customer Spotlight",
    "Educational Tip",
    "Product Highlight",
    "Community Question",
    "Quick Tutorial",
    "Myth vs Fact",
    "Social Proof",
    "Founder Message",
    "User Generated Content",
    "Limited Offer",
    "Value Proposition",
    "Mini Case Study",
    "How It Works",
    "Pain Point Solution",
    "Before and After",
    "Team Highlight",
    "Process Breakdown",
    "FAQ Response",
    "Trend Reaction",
    "Weekly Recap",
    "Upcoming Launch",
    "Checklist Post",
    "Poll Day",
    "Comparison Post",
    "Testimonial Highlight",
    "Expert Insight",
    "Seasonal Angle",
    "Call to Action Push",
];

const METRICS: [&str; 5] = [
    "engagement rate",
    "comment rate",
    "share rate",
    "reach growth",
    "save rate",
];

fn platform_times(platform: Platform) -> [&'static str; 3] {
    match platform {
        Platform::Instagram => ["11:00", "19:00", "20:00"],
        Platform::Facebook => ["10:00", "13:00", "18:00"],
        Platform::Twitter => ["09:00", "12:00", "17:00"],
    }
}

fn platform_ideas(platform: Platform) -> [&'static str; 3] {
    match platform {
        Platform::Instagram => [
            "Create a visual-first post with one strong hook line.",
            "Publish a Reel-style concept with quick, actionable tips.",
            "Share a carousel concept with a step-by-step breakdown.",
        ],
        Platform::Facebook => [
            "Write a story-led post that ends with a direct question.",
            "Share a value post with a practical example from your audience.",
            "Publish a community conversation starter and ask for opinions.",
        ],
        Platform::Twitter => [
            "Post a short opinion with a clear, bold first sentence.",
            "Draft a mini thread that breaks one concept into 3 short points.",
            "Share a concise insight with one focused CTA.",
        ],
    }
}

fn platform_hashtag(platform: Platform) -> &'static str {
    match platform {
        Platform::Instagram => "InstagramTips",
        Platform::Facebook => "FacebookMarketing",
        Platform::Twitter => "TwitterGrowth",
    }
}

fn goal_ctas(goal: Goal) -> [&'static str; 3] {
    match goal {
        Goal::Sales => ["Order now", "Get the offer", "Shop today"],
        Goal::Followers => ["Follow for more", "Join our community", "Turn on notifications"],
        Goal::Reach => ["Share this post", "Tag a friend", "Repost to your network"],
        Goal::Engagement => [
            "Comment your view",
            "Reply with your experience",
            "Vote in the comments",
        ],
    }
}

fn goal_theme(goal: Goal) -> &'static str {
    match goal {
        Goal::Sales => "Conversion Focus",
        Goal::Followers => "Audience Growth",
        Goal::Reach => "Reach Expansion",
        Goal::Engagement => "Community Engagement",
    }
}

static OBJECTIVE_GOALS: Lazy<KeywordChain<Goal>> = Lazy::new(|| {
    KeywordChain::new(
        &[
            ("sale|revenue|conversion|order|purchase", Goal::Sales),
            ("follower|audience growth|subscriber", Goal::Followers),
            ("reach|awareness|visibility|impression", Goal::Reach),
        ],
        Goal::Engagement,
    )
});

static NON_ALPHANUMERIC: Lazy<Regex> = Lazy::new(|| compile("[^a-zA-Z0-9]+"));

/// Objective wording uses a different vocabulary from post captions, so it
/// has its own goal table.
pub fn objective_goal(objective: &str) -> Goal {
    OBJECTIVE_GOALS.classify(&objective.to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CalendarRequirements {
    pub daily_themes: bool,
    pub platform_specific: bool,
    pub analytics: bool,
}

impl Default for CalendarRequirements {
    fn default() -> Self {
        Self {
            daily_themes: true,
            platform_specific: true,
            analytics: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CalendarRequest {
    pub company_name: String,
    pub objective: String,
    pub platforms: Vec<Platform>,
    pub days: Option<i64>,
    pub requirements: CalendarRequirements,
    pub start_date: Option<NaiveDate>,
}

impl CalendarRequest {
    pub fn new(company_name: impl Into<String>, objective: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            objective: objective.into(),
            platforms: Vec::new(),
            days: None,
            requirements: CalendarRequirements::default(),
            start_date: None,
        }
    }

    /// Missing or zero days means a 30 day plan; otherwise clamped to 1..=60.
    pub fn effective_days(&self) -> usize {
        let days = match self.days {
            None | Some(0) => DEFAULT_DAYS,
            Some(days) => days,
        };
        days.clamp(1, MAX_DAYS) as usize
    }

    pub fn effective_platforms(&self) -> Vec<Platform> {
        if self.platforms.is_empty() {
            Platform::all().to_vec()
        } else {
            self.platforms.clone()
        }
    }
}

/// Keeps known platform ids, in order; an empty result means all platforms.
pub fn parse_platforms<S: AsRef<str>>(values: &[S]) -> Vec<Platform> {
    values
        .iter()
        .filter_map(|value| match value.as_ref().trim().to_lowercase().as_str() {
            "instagram" => Some(Platform::Instagram),
            "facebook" => Some(Platform::Facebook),
            "twitter" => Some(Platform::Twitter),
            _ => None,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDraftItem {
    pub day: usize,
    pub date: String,
    pub theme: String,
    pub platform: String,
    pub post_idea: String,
    pub caption_draft: String,
    pub cta: String,
    pub hashtags: Vec<String>,
    pub recommended_time: String,
    pub metric_focus: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedCalendarItem {
    #[serde(flatten)]
    pub draft: CalendarDraftItem,
    pub predicted_engagement_rate: f64,
    pub predicted_engagement_percent: f64,
    pub model_provider: String,
    pub model_version: String,
    pub model_warning: Option<String>,
}

pub fn generate_calendar_draft(request: &CalendarRequest) -> Vec<CalendarDraftItem> {
    let goal = objective_goal(&request.objective);
    let ctas = goal_ctas(goal);
    let platforms = request.effective_platforms();
    let start = request
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());
    let requirements = request.requirements;

    (0..request.effective_days())
        .map(|index| {
            let platform = platforms[index % platforms.len()];
            let theme = if requirements.daily_themes {
                THEME_LIBRARY[index % THEME_LIBRARY.len()]
            } else {
                goal_theme(goal)
            };
            let cta = ctas[index % ctas.len()];
            let metric_focus = METRICS[index % METRICS.len()];
            let times = platform_times(platform);
            let recommended_time = times[index % times.len()];

            let post_idea = if requirements.platform_specific {
                let ideas = platform_ideas(platform);
                format!("{}: {}", theme, ideas[index % ideas.len()])
            } else {
                format!("{}: Share one clear takeaway and one audience action.", theme)
            };

            let metric_sentence = if requirements.analytics {
                format!("Primary metric to track: {}.", metric_focus)
            } else {
                String::new()
            };
            let caption_draft = format!(
                "{} | {}\n{}\nFormat for {}: deliver one practical insight and a strong hook.\n{}\nCTA: {}.",
                collapse_whitespace(&request.company_name),
                theme,
                collapse_whitespace(&request.objective),
                platform.label(),
                metric_sentence,
                cta
            );

            CalendarDraftItem {
                day: index + 1,
                date: (start + Duration::days(index as i64))
                    .format("%Y-%m-%d")
                    .to_string(),
                theme: theme.to_string(),
                platform: platform.id().to_string(),
                post_idea,
                caption_draft,
                cta: cta.to_string(),
                hashtags: build_hashtags(&request.company_name, theme, platform),
                recommended_time: recommended_time.to_string(),
                metric_focus: metric_focus.to_string(),
            }
        })
        .collect()
}

/// Drafts the plan and scores every item with one batch prediction.
pub async fn plan_calendar(
    service: &PredictionService,
    request: &CalendarRequest,
    follower_count: f64,
    recent_post_count: u64,
) -> Vec<PlannedCalendarItem> {
    let drafts = generate_calendar_draft(request);
    let company = request.company_name.trim();

    let features = drafts
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let seed = ((index * 11) % 17) as f64 / 10.0;
            build_features(&PostInput {
                platform: item.platform.clone(),
                date: item.date.clone(),
                title: format!("{} - {}", item.theme, company),
                description: format!(
                    "{}\n{}\n{}",
                    item.post_idea,
                    item.caption_draft,
                    item.hashtags.join(" ")
                ),
                posts_last_7_days: (recent_post_count + (index / 3) as u64) as f64,
                follower_count: Some(follower_count),
                creative_score: Some((6.0 + seed).min(9.5)),
                post_hour: Some(hour_of(&item.recommended_time)),
            })
        })
        .collect::<Vec<_>>();

    let predictions = service.predict_batch(&features).await;
    info!(
        items = drafts.len(),
        fallback = predictions.iter().any(|p| p.is_fallback()),
        "generated calendar plan"
    );

    drafts
        .into_iter()
        .zip(predictions)
        .map(|(draft, prediction)| PlannedCalendarItem {
            draft,
            predicted_engagement_rate: prediction.rate,
            predicted_engagement_percent: prediction.percent,
            model_provider: prediction.provider.label().to_string(),
            model_version: prediction.model_version,
            model_warning: prediction.warning,
        })
        .collect()
}

/// Hour component of an `HH:MM` slot, 12 when unparseable.
pub fn hour_of(time: &str) -> f64 {
    time.split(':')
        .next()
        .and_then(|hour| hour.trim().parse::<f64>().ok())
        .map(|hour| hour.clamp(0.0, 23.0))
        .unwrap_or(12.0)
}

fn build_hashtags(company_name: &str, theme: &str, platform: Platform) -> Vec<String> {
    vec![
        format!("#{}", to_pascal_word(company_name, "Brand")),
        format!("#{}", to_pascal_word(theme, "Brand")),
        format!("#{}", platform_hashtag(platform)),
        "#SocialMediaStrategy".to_string(),
        "#ContentCalendar".to_string(),
    ]
}

/// First two alphanumeric words, capitalized and joined.
pub fn to_pascal_word(input: &str, fallback: &str) -> String {
    let clean = NON_ALPHANUMERIC.replace_all(input, " ");
    let word: String = clean
        .split_whitespace()
        .take(2)
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect();
    if word.is_empty() {
        fallback.to_string()
    } else {
        word
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
