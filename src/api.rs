use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::{
    parse_platforms, CalendarRequest, CalendarRequirements, PlannedCalendarItem, MAX_DAYS,
};
use crate::{PostInput, PredictionResult};

#[derive(Debug, Deserialize)]
pub struct ApiBatchRequest {
    pub posts: Vec<PostInput>,
}

#[derive(Debug, Serialize)]
pub struct ApiBatchResponse {
    pub predictions: Vec<PredictionResult>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequirements {
    pub daily_themes: Option<bool>,
    pub platform_specific: Option<bool>,
    pub analytics: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendarRequest {
    pub company_name: Option<String>,
    pub objective: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub days: Option<f64>,
    pub follower_count: Option<f64>,
    pub recent_post_count: Option<u64>,
    pub start_date: Option<String>,
    pub requirements: Option<ApiRequirements>,
}

impl ApiCalendarRequest {
    pub fn into_request(self) -> Result<(CalendarRequest, f64, u64), String> {
        let company_name = self.company_name.unwrap_or_default().trim().to_string();
        if company_name.is_empty() {
            return Err("companyName is required".to_string());
        }
        let objective = self.objective.unwrap_or_default().trim().to_string();
        if objective.is_empty() {
            return Err("objective is required".to_string());
        }

        let mut request = CalendarRequest::new(company_name, objective);
        request.platforms = parse_platforms(&self.platforms.unwrap_or_default());
        // Zero keeps the default length; anything else is clamped before rounding.
        request.days = self
            .days
            .filter(|days| days.is_finite())
            .map(|days| {
                if days == 0.0 {
                    0
                } else {
                    days.clamp(1.0, MAX_DAYS as f64).round() as i64
                }
            });

        if let Some(start) = self.start_date.as_deref() {
            let date = NaiveDate::parse_from_str(start.trim(), "%Y-%m-%d")
                .map_err(|err| format!("invalid startDate {}: {}", start, err))?;
            request.start_date = Some(date);
        }

        let requirements = self.requirements.unwrap_or_default();
        let defaults = CalendarRequirements::default();
        request.requirements = CalendarRequirements {
            daily_themes: requirements.daily_themes.unwrap_or(defaults.daily_themes),
            platform_specific: requirements
                .platform_specific
                .unwrap_or(defaults.platform_specific),
            analytics: requirements.analytics.unwrap_or(defaults.analytics),
        };

        let follower_count = self
            .follower_count
            .filter(|count| count.is_finite() && *count != 0.0)
            .unwrap_or(5000.0);
        Ok((request, follower_count, self.recent_post_count.unwrap_or(0)))
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiCalendarMeta {
    pub company_name: String,
    pub objective: String,
    pub days: usize,
    pub generated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ApiCalendarResponse {
    pub meta: ApiCalendarMeta,
    pub items: Vec<PlannedCalendarItem>,
}
