use std::time::Instant;

use newsly_sdk::{NewslyApi, ProfileUpdate, UserProfile};
use tracing::{debug, info, instrument, warn};

use super::Route;
use super::catalog::{StepDescriptor, StepId, visible_steps};
use super::error::{StorageError, WizardError};
use super::fields::{FieldKind, FieldValue, ProfileField};
use super::preview::{PreviewCard, PreviewTimer, preview_content};
use super::render::{MultiSelectState, StepView, render_step};
use super::session::Session;
use super::store::ProfileStore;
use super::validation::step_is_valid;
use crate::config::{OnboardingConfig, ResumePolicy};

/// How the wizard was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardMode {
    /// No stored profile.
    Fresh,
    /// A stored profile without the completion flag.
    Returning,
    /// A completed profile opened again for changes.
    Editing,
}

/// Onboarding state machine.
///
/// Holds the step index and the in-progress profile. Every change to the
/// profile is written to the profile store before it becomes visible here, so
/// the stored record always equals [`profile`](Self::profile).
pub struct Wizard {
    profiles: ProfileStore,
    session: Session,
    profile: UserProfile,
    current: usize,
    mode: WizardMode,
    preview: PreviewTimer,
}

impl Wizard {
    /// Open the wizard over the stored profile.
    ///
    /// # Errors
    /// `WizardError::AccessDenied` when the access gate is on and has not been
    /// passed in this session, or a storage failure.
    pub fn open(
        profiles: ProfileStore,
        session: Session,
        config: &OnboardingConfig,
    ) -> Result<Self, WizardError> {
        if config.access_gate && !session.has_onboarding_access()? {
            return Err(WizardError::AccessDenied);
        }

        let stored = match profiles.load() {
            Ok(stored) => stored,
            Err(e @ StorageError::Decode { .. }) => {
                warn!(error = %e, "stored profile is unreadable, starting over");
                None
            }
            Err(e) => return Err(e.into()),
        };

        let (profile, mode) = match stored {
            None => (UserProfile::default(), WizardMode::Fresh),
            Some(profile) if profiles.is_complete()? => (profile, WizardMode::Editing),
            Some(profile) => (profile, WizardMode::Returning),
        };

        let current = match mode {
            WizardMode::Returning => resume_index(&profile, config.resume_policy),
            WizardMode::Fresh | WizardMode::Editing => 0,
        };
        debug!(?mode, current, "onboarding wizard opened");

        Ok(Self {
            profiles,
            session,
            profile,
            current,
            mode,
            preview: PreviewTimer::new(config.preview_delay, config.preview_duration),
        })
    }

    #[must_use]
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    #[must_use]
    pub fn mode(&self) -> WizardMode {
        self.mode
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn visible_steps(&self) -> Vec<&'static StepDescriptor> {
        visible_steps(&self.profile)
    }

    #[must_use]
    pub fn current_step(&self) -> &'static StepDescriptor {
        let steps = self.visible_steps();
        let last = steps.len().saturating_sub(1);
        steps[self.current.min(last)]
    }

    #[must_use]
    pub fn is_last_step(&self) -> bool {
        self.current + 1 >= self.visible_steps().len()
    }

    #[must_use]
    pub fn view(&self) -> StepView {
        render_step(self.current_step(), &self.profile)
    }

    /// Merge one answer into the profile and write the profile through.
    ///
    /// # Errors
    /// `TypeMismatch` when the value does not fit the field, or a storage
    /// failure. In both cases the profile is left unchanged.
    pub fn update_field(
        &mut self,
        field: ProfileField,
        value: FieldValue,
    ) -> Result<(), WizardError> {
        self.update_field_at(field, value, Instant::now())
    }

    /// [`update_field`](Self::update_field) with an explicit clock.
    ///
    /// # Errors
    /// As [`update_field`](Self::update_field).
    pub fn update_field_at(
        &mut self,
        field: ProfileField,
        value: FieldValue,
        now: Instant,
    ) -> Result<(), WizardError> {
        let mut next = self.profile.clone();
        field.apply(&mut next, value)?;
        self.profiles.save(&next)?;
        self.profile = next;
        debug!(%field, "profile field updated");

        let step = self.current_step().id;
        self.preview.arm(now, step);
        self.clamp_index();
        Ok(())
    }

    /// Click on `option` of a list field. Returns `false` when the click was
    /// refused because the field is at its cap.
    ///
    /// # Errors
    /// `TypeMismatch` for a field that is not a list, or a storage failure.
    pub fn toggle_option(&mut self, field: ProfileField, option: &str) -> Result<bool, WizardError> {
        if field.kind() != FieldKind::List {
            return Err(WizardError::TypeMismatch {
                field,
                expected: "a list of options",
            });
        }
        let mut staging = MultiSelectState::mirror(field, &self.profile);
        match staging.toggle(option) {
            Some(selection) => {
                self.update_field(field, FieldValue::List(selection))?;
                Ok(true)
            }
            None => {
                debug!(%field, option, "selection cap reached");
                Ok(false)
            }
        }
    }

    #[must_use]
    pub fn can_advance(&self) -> bool {
        let step = self.current_step();
        !step.required || step_is_valid(step.id, &self.profile)
    }

    /// # Errors
    /// `StepIncomplete` when the current required step is not valid.
    pub fn advance(&mut self) -> Result<(), WizardError> {
        if !self.can_advance() {
            return Err(WizardError::StepIncomplete {
                step: self.current_step().id,
            });
        }
        self.move_to(self.current + 1);
        Ok(())
    }

    pub fn retreat(&mut self) {
        self.move_to(self.current.saturating_sub(1));
    }

    /// Move past an optional step without answering it.
    ///
    /// # Errors
    /// `RequiredStep` on a required step.
    pub fn skip(&mut self) -> Result<(), WizardError> {
        let step = self.current_step();
        if step.required {
            return Err(WizardError::RequiredStep { step: step.id });
        }
        self.move_to(self.current + 1);
        Ok(())
    }

    /// Select a step from the step list directly.
    pub fn jump_to(&mut self, index: usize) {
        self.move_to(index);
    }

    /// Share of required visible steps whose answer is valid, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        progress(&self.profile)
    }

    /// Preview card on screen at `now`, if any.
    #[must_use]
    pub fn preview_at(&self, now: Instant) -> Option<PreviewCard> {
        self.preview
            .visible_at(now)
            .map(|step| preview_content(step, &self.profile))
    }

    /// Persist, mark onboarding complete and, when signed in, sync the profile
    /// and ask for fresh recommendations. Sync failures are logged only.
    ///
    /// # Errors
    /// Local storage failures. Remote failures never surface.
    #[instrument(skip_all, fields(mode = ?self.mode))]
    pub async fn finish(&mut self, api: &dyn NewslyApi) -> Result<Route, WizardError> {
        self.persist_complete()?;

        let token = match self.session.token() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "could not read session token, skipping profile sync");
                None
            }
        };
        let Some(token) = token else {
            info!("onboarding finished without an account, profile kept locally");
            return Ok(Route::Home);
        };

        let update = ProfileUpdate::from(&self.profile);
        match api.update_profile(&token, &update).await {
            Ok(()) => match api.generate_recommendations(&token).await {
                Ok(generated) => {
                    info!(count = generated.count, "recommendations generated");
                }
                Err(e) => warn!(error = %e, "failed to generate recommendations"),
            },
            Err(e) => warn!(error = %e, "failed to sync profile"),
        }
        Ok(Route::Home)
    }

    /// Leave the questionnaire early, keeping what was answered.
    ///
    /// # Errors
    /// Local storage failures.
    pub fn skip_questionnaire(&mut self) -> Result<Route, WizardError> {
        self.persist_complete()?;
        info!("questionnaire skipped");
        Ok(Route::Home)
    }

    fn persist_complete(&mut self) -> Result<(), WizardError> {
        self.preview.cancel();
        self.profiles.save(&self.profile)?;
        self.profiles.mark_complete()?;
        Ok(())
    }

    fn move_to(&mut self, index: usize) {
        let last = self.visible_steps().len().saturating_sub(1);
        self.current = index.min(last);
    }

    fn clamp_index(&mut self) {
        self.move_to(self.current);
    }
}

/// Resume position for a stored, unfinished profile.
#[must_use]
pub fn resume_index(profile: &UserProfile, policy: ResumePolicy) -> usize {
    match policy {
        ResumePolicy::FirstStep => 0,
        ResumePolicy::FirstIncomplete => visible_steps(profile)
            .iter()
            .position(|step| step.required && !step_is_valid(step.id, profile))
            .unwrap_or(0),
    }
}

/// Completeness of the required visible steps. Independent of position.
#[must_use]
pub fn progress(profile: &UserProfile) -> f64 {
    let required: Vec<StepId> = visible_steps(profile)
        .iter()
        .filter(|step| step.required)
        .map(|step| step.id)
        .collect();
    if required.is_empty() {
        return 1.0;
    }
    let valid = required.iter().filter(|id| step_is_valid(**id, profile)).count();
    ratio(valid, required.len())
}

fn ratio(part: usize, whole: usize) -> f64 {
    let to_f64 = |n: usize| f64::from(u32::try_from(n).unwrap_or(u32::MAX));
    to_f64(part) / to_f64(whole)
}
