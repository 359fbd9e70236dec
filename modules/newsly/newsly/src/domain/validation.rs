use newsly_sdk::UserProfile;

use super::catalog::StepId;
use super::options::{MAX_PRIMARY_INTERESTS, MIN_PRIMARY_INTERESTS};

/// Whether the answer for `step` is acceptable.
///
/// Only the required steps carry a rule; every other step is always valid.
/// The wizard uses this both to gate forward navigation and to pick the
/// resume step, so the two can never disagree.
#[must_use]
pub fn step_is_valid(step: StepId, profile: &UserProfile) -> bool {
    match step {
        StepId::Name => profile.name.as_deref().is_some_and(|n| !n.trim().is_empty()),
        StepId::Email => profile.email.as_deref().is_some_and(|e| e.contains('@')),
        StepId::Age => is_answered(profile.age_range.as_deref()),
        StepId::Interests => {
            (MIN_PRIMARY_INTERESTS..=MAX_PRIMARY_INTERESTS).contains(&profile.primary_interests.len())
        }
        StepId::Education => is_answered(profile.education_level.as_deref()),
        _ => true,
    }
}

fn is_answered(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn interests(n: usize) -> Vec<String> {
        ["Technology", "Health", "Finance", "Science", "Sports", "Politics"]
            .iter()
            .take(n)
            .map(|s| (*s).to_owned())
            .collect()
    }

    #[test]
    fn name_must_have_visible_characters() {
        let mut profile = UserProfile::default();
        assert!(!step_is_valid(StepId::Name, &profile));
        profile.name = Some("   ".to_owned());
        assert!(!step_is_valid(StepId::Name, &profile));
        profile.name = Some(" Ada ".to_owned());
        assert!(step_is_valid(StepId::Name, &profile));
    }

    #[test]
    fn email_needs_at_sign() {
        let mut profile = UserProfile {
            email: Some("not-an-email".to_owned()),
            ..UserProfile::default()
        };
        assert!(!step_is_valid(StepId::Email, &profile));
        profile.email = Some("a@b.com".to_owned());
        assert!(step_is_valid(StepId::Email, &profile));
    }

    #[test]
    fn interests_between_three_and_five() {
        let mut profile = UserProfile::default();
        for n in 0..=6 {
            profile.primary_interests = interests(n);
            assert_eq!(step_is_valid(StepId::Interests, &profile), (3..=5).contains(&n), "n = {n}");
        }
    }

    #[test]
    fn choice_steps_need_an_answer() {
        let mut profile = UserProfile::default();
        assert!(!step_is_valid(StepId::Age, &profile));
        assert!(!step_is_valid(StepId::Education, &profile));
        profile.age_range = Some("19-22".to_owned());
        profile.education_level = Some("Graduate".to_owned());
        assert!(step_is_valid(StepId::Age, &profile));
        assert!(step_is_valid(StepId::Education, &profile));
    }

    #[test]
    fn optional_steps_are_always_valid() {
        let profile = UserProfile::default();
        for step in [StepId::Hobbies, StepId::Region, StepId::NewsFocus, StepId::YearInProgram] {
            assert!(step_is_valid(step, &profile));
        }
    }
}
