//! Sample headline shown briefly after an answer changes.
//!
//! The preview is cosmetic. It is modelled as a deadline pair owned by the
//! wizard: nothing runs in the background, so dropping the wizard cancels it.

use std::time::{Duration, Instant};

use newsly_sdk::UserProfile;

use super::catalog::StepId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewCard {
    pub title: String,
    pub description: String,
}

impl PreviewCard {
    fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Headline matching the answer just given on `step`.
#[must_use]
pub fn preview_content(step: StepId, profile: &UserProfile) -> PreviewCard {
    match step {
        StepId::Education => {
            if profile.education_level.as_deref() == Some("Undergraduate") {
                PreviewCard::new(
                    "College tuition rates increase 3.2% nationwide",
                    "How rising costs affect undergraduate financial planning",
                )
            } else {
                PreviewCard::new(
                    "Graduate school funding opportunities expand",
                    "New fellowship programs target advanced degree students",
                )
            }
        }
        StepId::Field => match profile.field_of_study.as_deref() {
            Some("Finance") => PreviewCard::new(
                "Federal Reserve signals interest rate changes",
                "What finance students need to know about monetary policy",
            ),
            Some("Computer Science") => PreviewCard::new(
                "Tech sector hiring surges for new graduates",
                "Major companies expand entry-level programming positions",
            ),
            Some(field) if !field.trim().is_empty() => PreviewCard::new(
                format!("{} industry outlook improves", field.trim()),
                "Career prospects brighten for recent graduates",
            ),
            _ => default_card(),
        },
        StepId::Location => match profile.location.as_ref().map(|l| l.country.as_str()) {
            Some("Argentina") => PreviewCard::new(
                "Argentina's peso stabilizes against dollar",
                "Currency changes affect international student finances",
            ),
            Some(country) if !country.is_empty() => PreviewCard::new(
                format!("Local news from {country}"),
                "Stay connected with developments back home",
            ),
            _ => default_card(),
        },
        StepId::Region => match profile.location.as_ref().and_then(|l| l.region.as_deref()) {
            Some(region) if !region.is_empty() => PreviewCard::new(
                format!("{region} sees economic growth"),
                "Regional developments that could affect your opportunities",
            ),
            _ => default_card(),
        },
        StepId::Age => {
            if is_young(profile.age_range.as_deref()) {
                PreviewCard::new(
                    "Gen Z financial habits reshape banking",
                    "How young adults are changing money management",
                )
            } else {
                PreviewCard::new(
                    "Young professional investment trends",
                    "Financial strategies for your age group",
                )
            }
        }
        _ => default_card(),
    }
}

fn default_card() -> PreviewCard {
    PreviewCard::new(
        "Personalized news coming your way",
        "We're building your custom news feed",
    )
}

/// Ranges whose lower bound is under 22.
fn is_young(age_range: Option<&str>) -> bool {
    age_range
        .and_then(|range| range.split(['-', '+']).next())
        .and_then(|low| low.trim().parse::<u32>().ok())
        .is_some_and(|low| low < 22)
}

/// Show window of the preview card.
#[derive(Debug, Clone)]
pub struct PreviewTimer {
    delay: Duration,
    duration: Duration,
    armed: Option<(Instant, StepId)>,
}

impl PreviewTimer {
    #[must_use]
    pub fn new(delay: Duration, duration: Duration) -> Self {
        Self {
            delay,
            duration,
            armed: None,
        }
    }

    /// Start a new window at `now`, replacing any pending one.
    pub fn arm(&mut self, now: Instant, step: StepId) {
        self.armed = Some((now, step));
    }

    pub fn cancel(&mut self) {
        self.armed = None;
    }

    /// Step whose preview is on screen at `now`.
    #[must_use]
    pub fn visible_at(&self, now: Instant) -> Option<StepId> {
        let (armed_at, step) = self.armed?;
        let elapsed = now.checked_duration_since(armed_at)?;
        (elapsed >= self.delay && elapsed < self.delay + self.duration).then_some(step)
    }

    /// Total lifetime of one window.
    #[must_use]
    pub fn lifetime(&self) -> Duration {
        self.delay + self.duration
    }
}
