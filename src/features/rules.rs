use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Campaign, CtaType, Goal, PostFormat, Tone};

/// Ordered `(pattern, label)` table. The first matching pattern wins, so the
/// row order is the tie-break between overlapping keyword groups.
pub struct KeywordChain<T: Copy + 'static> {
    rules: Vec<(Regex, T)>,
    default: T,
}

impl<T: Copy + 'static> KeywordChain<T> {
    pub fn new(rules: &[(&str, T)], default: T) -> Self {
        let rules = rules
            .iter()
            .map(|(pattern, label)| (compile(pattern), *label))
            .collect();
        Self { rules, default }
    }

    /// `text` is expected to be lowercased already.
    pub fn classify(&self, text: &str) -> T {
        self.rules
            .iter()
            .find(|(pattern, _)| pattern.is_match(text))
            .map(|(_, label)| *label)
            .unwrap_or(self.default)
    }

    pub fn labels(&self) -> Vec<T> {
        self.rules.iter().map(|(_, label)| *label).collect()
    }

    pub fn default_label(&self) -> T {
        self.default
    }
}

// Patterns are string literals checked by the test suite.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid keyword pattern {pattern}: {err}"))
}

pub static GOAL_RULES: Lazy<KeywordChain<Goal>> = Lazy::new(|| {
    KeywordChain::new(
        &[
            ("sale|discount|offer|buy|order|shop", Goal::Sales),
            ("follow|follower|subscribe", Goal::Followers),
            ("reach|awareness|discover|exposure", Goal::Reach),
        ],
        Goal::Engagement,
    )
});

pub static CAMPAIGN_RULES: Lazy<KeywordChain<Campaign>> = Lazy::new(|| {
    KeywordChain::new(
        &[
            ("valentine|love", Campaign::Valentine),
            ("festival|holiday|christmas|diwali|new year", Campaign::Festival),
            ("healthy|fitness|diet|wellness", Campaign::HealthyWeek),
            ("weekend|saturday|sunday", Campaign::WeekendOffer),
        ],
        Campaign::NewMenu,
    )
});

pub static TONE_RULES: Lazy<KeywordChain<Tone>> = Lazy::new(|| {
    KeywordChain::new(
        &[
            ("lol|meme|funny|joke|haha", Tone::Funny),
            ("save|order|limited|offer|discount|deal", Tone::Promo),
            ("learn|tips|guide|how to|steps", Tone::Informative),
        ],
        Tone::Emotional,
    )
});

pub static CTA_RULES: Lazy<KeywordChain<CtaType>> = Lazy::new(|| {
    KeywordChain::new(
        &[
            ("order now|buy now|shop now|checkout", CtaType::OrderNow),
            ("link in bio|click link|tap link|visit link", CtaType::LinkClick),
            ("comment|tell us|drop|reply", CtaType::Comment),
            ("share|retweet", CtaType::Share),
            ("save this|bookmark", CtaType::Save),
            ("dm us|message us|inbox", CtaType::Dm),
        ],
        CtaType::None,
    )
});

pub static INSTAGRAM_FORMAT_RULES: Lazy<KeywordChain<PostFormat>> = Lazy::new(|| {
    KeywordChain::new(
        &[
            ("reel|video", PostFormat::Reel),
            ("carousel", PostFormat::Carousel),
            ("story", PostFormat::Story),
        ],
        PostFormat::SingleImage,
    )
});

pub static HASHTAG: Lazy<Regex> = Lazy::new(|| compile("(?i)#[a-z0-9_]+"));
