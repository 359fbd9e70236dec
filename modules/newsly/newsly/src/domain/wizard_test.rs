#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::{Duration, Instant};

    use newsly_sdk::{ApiOperation, Location, UserProfile};

    use crate::config::{OnboardingConfig, ResumePolicy};
    use crate::domain::Route;
    use crate::domain::catalog::StepId;
    use crate::domain::error::WizardError;
    use crate::domain::fields::{FieldValue, ProfileField};
    use crate::domain::store::{self, KeyValueStore};
    use crate::domain::test_support::{MockApi, Stores};
    use crate::domain::wizard::{Wizard, WizardMode, progress, resume_index};

    fn open(stores: &Stores) -> Wizard {
        Wizard::open(
            stores.profiles.clone(),
            stores.session.clone(),
            &OnboardingConfig::default(),
        )
        .unwrap()
    }

    fn owned(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    fn complete_required() -> UserProfile {
        UserProfile {
            name: Some("Ada".to_owned()),
            email: Some("ada@example.com".to_owned()),
            age_range: Some("23-25".to_owned()),
            primary_interests: owned(&["Technology", "Health", "Finance"]),
            education_level: Some("Graduate".to_owned()),
            ..UserProfile::default()
        }
    }

    #[test]
    fn fresh_wizard_starts_at_first_step() {
        let stores = Stores::new();
        let wizard = open(&stores);
        assert_eq!(wizard.mode(), WizardMode::Fresh);
        assert_eq!(wizard.current_index(), 0);
        assert_eq!(wizard.current_step().id, StepId::Name);
        assert!(wizard.progress().abs() < f64::EPSILON);
    }

    #[test]
    fn every_update_is_written_through() {
        let stores = Stores::new();
        let mut wizard = open(&stores);

        let updates = [
            (ProfileField::Name, FieldValue::from("Ada")),
            (ProfileField::Email, FieldValue::from("ada@example.com")),
            (ProfileField::Hobbies, FieldValue::List(owned(&["Yoga"]))),
            (ProfileField::LocalFocus, FieldValue::Flag(true)),
            (ProfileField::YearInProgram, FieldValue::Number(2)),
            (ProfileField::Name, FieldValue::Clear),
        ];
        for (field, value) in updates {
            wizard.update_field(field, value).unwrap();
            assert_eq!(stores.profiles.load().unwrap().as_ref(), Some(wizard.profile()));
        }
    }

    #[test]
    fn rejected_update_leaves_profile_and_store_alone() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        wizard.update_field(ProfileField::Name, "Ada".into()).unwrap();

        let err = wizard
            .update_field(ProfileField::PrimaryInterests, FieldValue::Flag(true))
            .unwrap_err();
        assert!(matches!(err, WizardError::TypeMismatch { .. }));
        assert_eq!(stores.profiles.load().unwrap().as_ref(), Some(wizard.profile()));
        assert!(wizard.profile().primary_interests.is_empty());
    }

    #[test]
    fn interests_step_gates_until_three_selected() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        wizard.jump_to(3);
        assert_eq!(wizard.current_step().id, StepId::Interests);
        assert!(!wizard.can_advance());
        assert!(matches!(
            wizard.advance(),
            Err(WizardError::StepIncomplete {
                step: StepId::Interests
            })
        ));

        wizard
            .update_field(
                ProfileField::PrimaryInterests,
                FieldValue::List(owned(&["Technology", "Health", "Finance"])),
            )
            .unwrap();
        assert!(wizard.can_advance());
        wizard.advance().unwrap();
        assert_eq!(wizard.current_step().id, StepId::Education);
    }

    #[test]
    fn email_step_requires_at_sign() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        wizard.jump_to(1);
        wizard
            .update_field(ProfileField::Email, "not-an-email".into())
            .unwrap();
        assert!(!wizard.can_advance());
        wizard.update_field(ProfileField::Email, "a@b.com".into()).unwrap();
        assert!(wizard.can_advance());
    }

    #[test]
    fn optional_steps_always_allow_advance() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        let count = wizard.visible_steps().len();
        for index in 0..count {
            wizard.jump_to(index);
            if !wizard.current_step().required {
                assert!(wizard.can_advance(), "step {}", wizard.current_step().id);
            }
        }
    }

    #[test]
    fn sixth_primary_interest_is_a_no_op() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        for interest in ["Technology", "Health", "Finance", "Science", "Sports"] {
            assert!(
                wizard
                    .toggle_option(ProfileField::PrimaryInterests, interest)
                    .unwrap()
            );
        }
        let before = wizard.profile().clone();

        assert!(
            !wizard
                .toggle_option(ProfileField::PrimaryInterests, "Politics")
                .unwrap()
        );
        assert_eq!(wizard.profile(), &before);
        assert_eq!(stores.profiles.load().unwrap(), Some(before));

        assert!(
            wizard
                .toggle_option(ProfileField::PrimaryInterests, "Health")
                .unwrap()
        );
        assert_eq!(wizard.profile().primary_interests.len(), 4);
    }

    #[test]
    fn toggle_option_rejects_non_list_fields() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        assert!(matches!(
            wizard.toggle_option(ProfileField::Name, "Ada"),
            Err(WizardError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn navigation_is_clamped() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        wizard.retreat();
        assert_eq!(wizard.current_index(), 0);

        wizard.jump_to(1000);
        let last = wizard.visible_steps().len() - 1;
        assert_eq!(wizard.current_index(), last);
        assert!(wizard.is_last_step());

        wizard.advance().unwrap();
        assert_eq!(wizard.current_index(), last);
        wizard.skip().unwrap();
        assert_eq!(wizard.current_index(), last);
    }

    #[test]
    fn skip_refused_on_required_step() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        assert!(matches!(
            wizard.skip(),
            Err(WizardError::RequiredStep { step: StepId::Name })
        ));

        wizard.jump_to(7);
        let before = wizard.current_index();
        wizard.skip().unwrap();
        assert_eq!(wizard.current_index(), before + 1);
    }

    #[test]
    fn region_step_follows_country() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        let base = wizard.visible_steps().len();

        wizard
            .update_field(
                ProfileField::Location,
                FieldValue::Location(Location {
                    country: "Germany".to_owned(),
                    region: None,
                }),
            )
            .unwrap();
        assert_eq!(wizard.visible_steps().len(), base + 1);

        wizard.jump_to(base);
        assert_eq!(wizard.current_index(), base);

        wizard
            .update_field(
                ProfileField::Location,
                FieldValue::Location(Location {
                    country: "Argentina".to_owned(),
                    region: None,
                }),
            )
            .unwrap();
        assert!(wizard.visible_steps().iter().all(|s| s.id != StepId::Region));
        assert_eq!(wizard.current_index(), base - 1);
    }

    #[test]
    fn progress_tracks_completeness_not_position() {
        let mut profile = UserProfile::default();
        assert!(progress(&profile).abs() < f64::EPSILON);

        profile.name = Some("Ada".to_owned());
        profile.age_range = Some("19-22".to_owned());
        assert!((progress(&profile) - 0.4).abs() < 1e-9);

        let stores = Stores::new();
        stores.profiles.save(&profile).unwrap();
        let mut wizard = open(&stores);
        let at_start = wizard.progress();
        wizard.jump_to(20);
        assert!((wizard.progress() - at_start).abs() < f64::EPSILON);

        assert!((progress(&complete_required()) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn returning_user_resumes_at_first_invalid_required_step() {
        let stores = Stores::new();
        let profile = UserProfile {
            name: Some("Ada".to_owned()),
            email: Some("ada@example.com".to_owned()),
            age_range: Some("23-25".to_owned()),
            primary_interests: owned(&["Technology"]),
            ..UserProfile::default()
        };
        stores.profiles.save(&profile).unwrap();

        let wizard = open(&stores);
        assert_eq!(wizard.mode(), WizardMode::Returning);
        assert_eq!(wizard.current_step().id, StepId::Interests);
    }

    #[test]
    fn resume_with_all_required_valid_starts_at_zero() {
        assert_eq!(resume_index(&complete_required(), ResumePolicy::FirstIncomplete), 0);
        let partial = UserProfile {
            name: Some("Ada".to_owned()),
            ..UserProfile::default()
        };
        assert_eq!(resume_index(&partial, ResumePolicy::FirstIncomplete), 1);
        assert_eq!(resume_index(&partial, ResumePolicy::FirstStep), 0);
    }

    #[test]
    fn completed_profile_opens_for_editing() {
        let stores = Stores::new();
        stores.profiles.save(&complete_required()).unwrap();
        stores.profiles.mark_complete().unwrap();

        let wizard = open(&stores);
        assert_eq!(wizard.mode(), WizardMode::Editing);
        assert_eq!(wizard.current_index(), 0);
        assert_eq!(wizard.profile(), &complete_required());
    }

    #[test]
    fn unreadable_profile_starts_fresh() {
        let stores = Stores::new();
        stores.local.set(store::keys::PROFILE, "{oops").unwrap();
        let wizard = open(&stores);
        assert_eq!(wizard.mode(), WizardMode::Fresh);
    }

    #[test]
    fn access_gate_blocks_until_granted() {
        let stores = Stores::new();
        let config = OnboardingConfig {
            access_gate: true,
            ..OnboardingConfig::default()
        };
        let denied = Wizard::open(stores.profiles.clone(), stores.session.clone(), &config);
        assert!(matches!(denied, Err(WizardError::AccessDenied)));

        stores.session.grant_onboarding_access().unwrap();
        assert!(Wizard::open(stores.profiles.clone(), stores.session.clone(), &config).is_ok());
    }

    #[test]
    fn preview_follows_last_update() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        wizard.jump_to(4);
        let t0 = Instant::now();
        wizard
            .update_field_at(ProfileField::EducationLevel, "Undergraduate".into(), t0)
            .unwrap();

        assert!(wizard.preview_at(t0).is_none());
        let card = wizard.preview_at(t0 + Duration::from_secs(1)).unwrap();
        assert_eq!(card.title, "College tuition rates increase 3.2% nationwide");
        assert!(wizard.preview_at(t0 + Duration::from_secs(4)).is_none());
    }

    #[tokio::test]
    async fn finish_without_token_stays_local() {
        let stores = Stores::new();
        let api = MockApi::new();
        let mut wizard = open(&stores);
        wizard.update_field(ProfileField::Name, "Ada".into()).unwrap();

        let route = wizard.finish(&api).await.unwrap();

        assert_eq!(route, Route::Home);
        assert!(stores.profiles.is_complete().unwrap());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn finish_with_token_syncs_then_generates() {
        let stores = Stores::new().signed_in();
        let api = MockApi::new();
        stores.profiles.save(&complete_required()).unwrap();
        let mut wizard = open(&stores);

        let route = wizard.finish(&api).await.unwrap();

        assert_eq!(route, Route::Home);
        assert_eq!(
            api.calls(),
            [ApiOperation::UpdateProfile, ApiOperation::GenerateRecommendations]
        );
        let synced = api.synced_profiles.lock().clone();
        assert_eq!(synced[0].name.as_deref(), Some("Ada"));
        assert_eq!(
            synced[0].primary_interests.as_deref(),
            Some(&owned(&["Technology", "Health", "Finance"])[..])
        );
        assert_eq!(api.tokens_seen.lock()[0], "tok-123");
    }

    #[tokio::test]
    async fn finish_swallows_sync_failures() {
        let stores = Stores::new().signed_in();
        let api = MockApi::new().unreachable(ApiOperation::UpdateProfile);
        let mut wizard = open(&stores);

        let route = wizard.finish(&api).await.unwrap();

        assert_eq!(route, Route::Home);
        assert!(stores.profiles.is_complete().unwrap());
        assert_eq!(api.calls(), [ApiOperation::UpdateProfile]);
    }

    #[tokio::test]
    async fn finish_swallows_generation_failure() {
        let stores = Stores::new().signed_in();
        let api = MockApi::new().rejecting(ApiOperation::GenerateRecommendations, 500, None);
        let mut wizard = open(&stores);

        assert_eq!(wizard.finish(&api).await.unwrap(), Route::Home);
        assert_eq!(api.calls().len(), 2);
    }

    #[test]
    fn skip_questionnaire_marks_complete() {
        let stores = Stores::new();
        let mut wizard = open(&stores);
        wizard.update_field(ProfileField::Name, "Ada".into()).unwrap();

        assert_eq!(wizard.skip_questionnaire().unwrap(), Route::Home);
        assert!(stores.profiles.is_complete().unwrap());
        assert_eq!(
            stores.profiles.load().unwrap().and_then(|p| p.name).as_deref(),
            Some("Ada")
        );
    }
}
