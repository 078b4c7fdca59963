pub mod rules;

use chrono::{DateTime, Datelike, NaiveDate, Weekday};

use crate::{clamp, ModelFeatures, Platform, PostFormat, PostInput};
use rules::{CAMPAIGN_RULES, CTA_RULES, GOAL_RULES, HASHTAG, INSTAGRAM_FORMAT_RULES, TONE_RULES};

pub const DEFAULT_CREATIVE_SCORE: f64 = 6.5;
pub const DEFAULT_FOLLOWER_COUNT: f64 = 5000.0;
pub const THREAD_LENGTH_THRESHOLD: usize = 220;

pub fn build_features(post: &PostInput) -> ModelFeatures {
    let platform = Platform::from_id(&post.platform);
    let combined = format!("{} {}", post.title, post.description);
    let combined = combined.trim();
    let lowercase = combined.to_lowercase();
    let description = post.description.to_lowercase();

    let post_hour = finite_or(post.post_hour, f64::from(platform.default_post_hour()));

    ModelFeatures {
        platform,
        format: infer_format(platform, &lowercase),
        goal: GOAL_RULES.classify(&lowercase),
        campaign: CAMPAIGN_RULES.classify(&lowercase),
        tone: TONE_RULES.classify(&lowercase),
        cta_type: CTA_RULES.classify(&description),
        hashtags_count: count_hashtags(&post.description),
        post_hour: clamp(post_hour.round(), 0.0, 23.0) as u8,
        day_of_week: weekday_of(&post.date),
        caption_length: post.description.chars().count() as u32,
        creative_score: clamp(
            finite_or(post.creative_score, DEFAULT_CREATIVE_SCORE),
            0.0,
            10.0,
        ),
        posts_last_7_days: non_negative_count(finite_or(Some(post.posts_last_7_days), 0.0)),
        follower_count: non_negative_count(finite_or(post.follower_count, DEFAULT_FOLLOWER_COUNT)),
    }
}

fn infer_format(platform: Platform, text: &str) -> PostFormat {
    match platform {
        Platform::Twitter => {
            if text.contains("thread") || text.chars().count() > THREAD_LENGTH_THRESHOLD {
                PostFormat::Thread
            } else {
                PostFormat::Tweet
            }
        }
        Platform::Facebook => PostFormat::FbPost,
        Platform::Instagram => INSTAGRAM_FORMAT_RULES.classify(text),
    }
}

pub fn count_hashtags(text: &str) -> u32 {
    HASHTAG.find_iter(text).count() as u32
}

/// English three-letter weekday for a `YYYY-MM-DD` date or RFC 3339
/// timestamp; unparseable dates count as Monday.
pub fn weekday_of(date: &str) -> Weekday {
    let date = date.trim();
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return day.weekday();
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(date) {
        return timestamp.date_naive().weekday();
    }
    date.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .map(|day| day.weekday())
        .unwrap_or(Weekday::Mon)
}

fn finite_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(default)
}

fn non_negative_count(value: f64) -> u64 {
    value.round().max(0.0) as u64
}
