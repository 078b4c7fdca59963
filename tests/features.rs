use chrono::Weekday;
use tastehub_engine::features::rules::{
    CAMPAIGN_RULES, CTA_RULES, GOAL_RULES, INSTAGRAM_FORMAT_RULES, TONE_RULES,
};
use tastehub_engine::features::{count_hashtags, weekday_of};
use tastehub_engine::{
    build_features, Campaign, CtaType, Goal, Platform, PostFormat, PostInput, Tone,
};

fn post(platform: &str, title: &str, description: &str) -> PostInput {
    PostInput {
        platform: platform.to_string(),
        date: "2024-02-14".to_string(),
        title: title.to_string(),
        description: description.to_string(),
        posts_last_7_days: 3.0,
        ..PostInput::default()
    }
}

#[test]
fn maps_platform_ids_case_insensitively() {
    assert_eq!(Platform::from_id("instagram"), Platform::Instagram);
    assert_eq!(Platform::from_id("FaceBook"), Platform::Facebook);
    assert_eq!(Platform::from_id("twitter"), Platform::Twitter);
    assert_eq!(Platform::from_id("linkedin"), Platform::Twitter);
}

#[test]
fn applies_defaults_for_missing_inputs() {
    let features = build_features(&post("instagram", "Menu", "Fresh bowls"));

    assert_eq!(features.platform, Platform::Instagram);
    assert_eq!(features.post_hour, 19);
    assert_eq!(features.creative_score, 6.5);
    assert_eq!(features.follower_count, 5000);
    assert_eq!(features.posts_last_7_days, 3);
    assert_eq!(features.goal, Goal::Engagement);
    assert_eq!(features.campaign, Campaign::NewMenu);
    assert_eq!(features.tone, Tone::Emotional);
    assert_eq!(features.cta_type, CtaType::None);
    assert_eq!(features.format, PostFormat::SingleImage);
}

#[test]
fn platform_default_hours() {
    assert_eq!(build_features(&post("facebook", "", "hi")).post_hour, 13);
    assert_eq!(build_features(&post("twitter", "", "hi")).post_hour, 12);
}

#[test]
fn numeric_inputs_are_rounded_and_clamped() {
    let mut input = post("facebook", "Title", "Body");
    input.post_hour = Some(27.4);
    input.creative_score = Some(14.0);
    input.posts_last_7_days = -4.0;
    input.follower_count = Some(1234.6);
    let features = build_features(&input);

    assert_eq!(features.post_hour, 23);
    assert_eq!(features.creative_score, 10.0);
    assert_eq!(features.posts_last_7_days, 0);
    assert_eq!(features.follower_count, 1235);

    input.post_hour = Some(-3.0);
    input.creative_score = Some(-1.0);
    input.follower_count = Some(-50.0);
    let features = build_features(&input);
    assert_eq!(features.post_hour, 0);
    assert_eq!(features.creative_score, 0.0);
    assert_eq!(features.follower_count, 0);
}

#[test]
fn non_finite_inputs_fall_back_to_defaults() {
    let mut input = post("instagram", "Title", "Body");
    input.post_hour = Some(f64::NAN);
    input.creative_score = Some(f64::INFINITY);
    input.posts_last_7_days = f64::NAN;
    input.follower_count = Some(f64::NEG_INFINITY);
    let features = build_features(&input);

    assert_eq!(features.post_hour, 19);
    assert_eq!(features.creative_score, 6.5);
    assert_eq!(features.posts_last_7_days, 0);
    assert_eq!(features.follower_count, 5000);
}

#[test]
fn counts_hashtags_in_description_only() {
    assert_eq!(count_hashtags("Great tips #foodie #summer2024"), 2);
    assert_eq!(count_hashtags("#Upper #MiXeD_case # lonely"), 2);

    let features = build_features(&post("instagram", "#ignored #title", "Great tips #foodie #summer2024"));
    assert_eq!(features.hashtags_count, 2);
}

#[test]
fn caption_length_counts_characters() {
    let features = build_features(&post("instagram", "", "Crème brûlée"));
    assert_eq!(features.caption_length, 12);
}

#[test]
fn cta_priority_prefers_order_now() {
    let features = build_features(&post(
        "instagram",
        "Lunch",
        "Order now while it lasts, link in bio",
    ));
    assert_eq!(features.cta_type, CtaType::OrderNow);
}

#[test]
fn cta_ignores_the_title() {
    let features = build_features(&post("instagram", "Comment below", "Fresh salads today"));
    assert_eq!(features.cta_type, CtaType::None);

    let features = build_features(&post("instagram", "Salads", "DM us for catering"));
    assert_eq!(features.cta_type, CtaType::Dm);
}

#[test]
fn goal_campaign_and_tone_scan_the_title_too() {
    let features = build_features(&post(
        "facebook",
        "Valentine discount",
        "Learn our tips for the weekend",
    ));
    assert_eq!(features.goal, Goal::Sales);
    assert_eq!(features.campaign, Campaign::Valentine);
    assert_eq!(features.tone, Tone::Promo);
}

#[test]
fn keyword_chains_follow_priority_order() {
    assert_eq!(GOAL_RULES.classify("follow us for the sale"), Goal::Sales);
    assert_eq!(GOAL_RULES.classify("subscribe and discover"), Goal::Followers);
    assert_eq!(GOAL_RULES.classify("boost awareness"), Goal::Reach);
    assert_eq!(GOAL_RULES.classify("just vibes"), Goal::Engagement);

    assert_eq!(CAMPAIGN_RULES.classify("christmas love"), Campaign::Valentine);
    assert_eq!(CAMPAIGN_RULES.classify("happy new year"), Campaign::Festival);
    assert_eq!(CAMPAIGN_RULES.classify("wellness sunday"), Campaign::HealthyWeek);
    assert_eq!(CAMPAIGN_RULES.classify("saturday brunch"), Campaign::WeekendOffer);

    assert_eq!(TONE_RULES.classify("funny deal"), Tone::Funny);
    assert_eq!(TONE_RULES.classify("how to plate"), Tone::Informative);

    assert_eq!(CTA_RULES.classify("share this and bookmark"), CtaType::Share);
    assert_eq!(CTA_RULES.classify("save this recipe"), CtaType::Save);
    assert_eq!(CTA_RULES.classify("tap link for menu"), CtaType::LinkClick);
    assert_eq!(CTA_RULES.classify("checkout today"), CtaType::OrderNow);
}

#[test]
fn keyword_chain_tables_are_ordered() {
    assert_eq!(
        CTA_RULES.labels(),
        vec![
            CtaType::OrderNow,
            CtaType::LinkClick,
            CtaType::Comment,
            CtaType::Share,
            CtaType::Save,
            CtaType::Dm
        ]
    );
    assert_eq!(CTA_RULES.default_label(), CtaType::None);
    assert_eq!(GOAL_RULES.labels(), vec![Goal::Sales, Goal::Followers, Goal::Reach]);
    assert_eq!(INSTAGRAM_FORMAT_RULES.default_label(), PostFormat::SingleImage);
}

#[test]
fn instagram_formats() {
    let format = |text: &str| build_features(&post("instagram", "", text)).format;
    assert_eq!(format("New video drop"), PostFormat::Reel);
    assert_eq!(format("Swipe the carousel, watch the reel"), PostFormat::Reel);
    assert_eq!(format("Swipe the carousel"), PostFormat::Carousel);
    assert_eq!(format("Our story"), PostFormat::Story);
    assert_eq!(format("A photo"), PostFormat::SingleImage);
}

#[test]
fn twitter_and_facebook_formats() {
    assert_eq!(build_features(&post("twitter", "", "short take")).format, PostFormat::Tweet);
    assert_eq!(
        build_features(&post("twitter", "A Thread", "on pasta")).format,
        PostFormat::Thread
    );
    let long = "a".repeat(221);
    assert_eq!(build_features(&post("twitter", "", &long)).format, PostFormat::Thread);
    let exact = "a".repeat(220);
    assert_eq!(build_features(&post("twitter", "", &exact)).format, PostFormat::Tweet);
    assert_eq!(
        build_features(&post("facebook", "", "live video")).format,
        PostFormat::FbPost
    );
}

#[test]
fn weekday_from_date() {
    assert_eq!(weekday_of("2024-02-14"), Weekday::Wed);
    assert_eq!(weekday_of("2024-02-18T09:30:00Z"), Weekday::Sun);
    assert_eq!(weekday_of("2024-02-17T09:30:00"), Weekday::Sat);
    assert_eq!(weekday_of("not a date"), Weekday::Mon);
    assert_eq!(weekday_of(""), Weekday::Mon);

    let features = build_features(&post("instagram", "", "hi"));
    let value = serde_json::to_value(&features).unwrap();
    assert_eq!(value["day_of_week"], "Wed");
}

#[test]
fn serializes_model_field_names() {
    let features = build_features(&post("twitter", "", "Order now! Share with friends"));
    let value = serde_json::to_value(&features).unwrap();

    assert_eq!(value["platform"], "Twitter");
    assert_eq!(value["format"], "tweet");
    assert_eq!(value["cta_type"], "order_now");
    assert_eq!(value["campaign"], "NewMenu");
    assert_eq!(value.as_object().unwrap().len(), 13);
}

#[test]
fn extraction_is_deterministic() {
    let input = post("instagram", "Healthy week", "Tell us your favourite bowl #healthy");
    assert_eq!(build_features(&input), build_features(&input));
}

#[test]
fn mapped_platform_drives_format_and_default_hour() {
    let unknown = build_features(&post("LinkedIn", "New reel", "Watch the video"));
    assert_eq!(unknown.platform, Platform::Twitter);
    assert_eq!(unknown.format, PostFormat::Tweet);
    assert_eq!(unknown.post_hour, 12);

    let capitalized = build_features(&post(" Instagram ", "New reel", "Watch the video"));
    assert_eq!(capitalized.platform, Platform::Instagram);
    assert_eq!(capitalized.format, PostFormat::Reel);
    assert_eq!(capitalized.post_hour, 19);
}
