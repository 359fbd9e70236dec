//! Line-based front end for the onboarding wizard.
//!
//! Each step is printed with its options; the user types an answer or one of
//! the `:` commands. Single-value answers move on by themselves, list and
//! toggle steps stay open until an empty line.

use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Args;
use newsly::domain::error::{AccessGateError, WizardError};
use newsly::domain::fields::{FieldValue, ProfileField};
use newsly::domain::render::{StepForm, StepView};
use newsly::domain::wizard::{Wizard, WizardMode};
use newsly_sdk::Location;
use newsly_utils::SecretString;

use super::read_line;
use crate::app::App;

const HELP: &str = "Enter an answer, an empty line for next, or one of \
:back :skip :jump N :clear :finish :skip-all :quit";

#[derive(Args)]
pub struct OnboardArgs {
    /// Leave the questionnaire right away, keeping any saved answers
    #[arg(long)]
    skip: bool,
}

impl OnboardArgs {
    /// # Errors
    /// Storage failures, a closed input before the access gate opened, or
    /// broken output.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        app: &App,
        input: &mut R,
        out: &mut W,
    ) -> Result<()> {
        if app.config().onboarding.access_gate && !unlock(app, input, out).await? {
            anyhow::bail!("onboarding needs the access password");
        }

        let mut wizard = app.wizard()?;
        if self.skip {
            let route = wizard.skip_questionnaire()?;
            writeln!(out, "Questionnaire skipped. Continue at {route}")?;
            return Ok(());
        }

        match wizard.mode() {
            WizardMode::Returning => writeln!(out, "Welcome back! Picking up where you left off.")?,
            WizardMode::Editing => writeln!(out, "Editing your saved profile.")?,
            WizardMode::Fresh => writeln!(out, "Let's personalize your news feed.")?,
        }
        writeln!(out, "{HELP}")?;

        Prompt {
            app,
            wizard,
            input,
            out,
        }
        .run()
        .await
    }
}

/// Ask for the access password until it is accepted. `false` when the input
/// ends first.
async fn unlock<R: BufRead, W: Write>(app: &App, input: &mut R, out: &mut W) -> Result<bool> {
    let gate = app.access_gate();
    while !gate.is_open()? {
        write!(out, "Access password: ")?;
        out.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(false);
        };
        match gate.unlock(&SecretString::from(line)).await {
            Ok(_) => writeln!(out, "Access granted.")?,
            Err(e @ (AccessGateError::Incorrect | AccessGateError::Connection(_))) => {
                writeln!(out, "{e}")?;
            }
            Err(e) => return Err(e).context("failed to record onboarding access"),
        }
    }
    Ok(true)
}

/// One line typed at the step prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Next,
    Back,
    Skip,
    /// 1-based step number.
    Jump(usize),
    Clear,
    Finish,
    SkipAll,
    Quit,
    Answer(String),
}

impl Input {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let Some(command) = line.strip_prefix(':') else {
            return Ok(if line.is_empty() {
                Self::Next
            } else {
                Self::Answer(line.to_owned())
            });
        };
        let (name, arg) = command
            .split_once(char::is_whitespace)
            .map_or((command, ""), |(name, arg)| (name, arg.trim()));
        match name {
            "back" => Ok(Self::Back),
            "skip" => Ok(Self::Skip),
            "jump" => arg
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .map(Self::Jump)
                .ok_or_else(|| format!("':jump' needs a step number, got '{arg}'")),
            "clear" => Ok(Self::Clear),
            "finish" => Ok(Self::Finish),
            "skip-all" => Ok(Self::SkipAll),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command ':{other}'")),
        }
    }
}

/// What an answer did to the step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answered {
    /// A single value was set; move on when the step allows it.
    Settled,
    /// A list or toggle changed; stay on the step.
    Changed,
    /// Some options were refused because the list is at this cap.
    CapReached(usize),
}

struct Prompt<'a, R, W> {
    app: &'a App,
    wizard: Wizard,
    input: &'a mut R,
    out: &'a mut W,
}

impl<R: BufRead, W: Write> Prompt<'_, R, W> {
    async fn run(mut self) -> Result<()> {
        loop {
            let view = self.wizard.view();
            self.render(&view)?;
            let Some(line) = read_line(self.input)? else {
                return self.pause();
            };
            let input = match Input::parse(&line) {
                Ok(input) => input,
                Err(message) => {
                    writeln!(self.out, "{message}")?;
                    continue;
                }
            };

            match input {
                Input::Next => {
                    if self.next().await? {
                        return Ok(());
                    }
                }
                Input::Back => self.wizard.retreat(),
                Input::Skip => {
                    let skipped = self.wizard.skip();
                    self.report(skipped)?;
                }
                Input::Jump(n) => self.wizard.jump_to(n - 1),
                Input::Clear => self.clear(&view)?,
                Input::Finish => return self.finish().await,
                Input::SkipAll => {
                    let route = self.wizard.skip_questionnaire()?;
                    writeln!(self.out, "Questionnaire skipped. Continue at {route}")?;
                    return Ok(());
                }
                Input::Quit => return self.pause(),
                Input::Answer(text) => match self.answer(&view.form, &text) {
                    Ok(Answered::Settled) if self.wizard.can_advance() => {
                        self.preview()?;
                        if self.next().await? {
                            return Ok(());
                        }
                    }
                    Ok(Answered::Settled | Answered::Changed) => self.preview()?,
                    Ok(Answered::CapReached(max)) => {
                        writeln!(self.out, "You can select up to {max} options.")?;
                    }
                    Err(WizardError::Storage(e)) => return Err(e.into()),
                    Err(e) => writeln!(self.out, "{e}")?,
                },
            }
        }
    }

    /// Advance, finishing after the last step. `true` once finished.
    async fn next(&mut self) -> Result<bool> {
        if self.wizard.is_last_step() && self.wizard.can_advance() {
            self.finish().await?;
            return Ok(true);
        }
        let advanced = self.wizard.advance();
        self.report(advanced)?;
        Ok(false)
    }

    async fn finish(&mut self) -> Result<()> {
        let route = self.wizard.finish(self.app.api()).await?;
        writeln!(self.out, "Profile saved. Continue at {route}")?;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        writeln!(self.out, "Progress saved. Run `newsly onboard` to continue.")?;
        Ok(())
    }

    fn report(&mut self, result: Result<(), WizardError>) -> Result<()> {
        match result {
            Ok(()) => Ok(()),
            Err(WizardError::Storage(e)) => Err(e.into()),
            Err(e) => Ok(writeln!(self.out, "{e}")?),
        }
    }

    fn clear(&mut self, view: &StepView) -> Result<()> {
        for field in view.id.fields() {
            let result = self.wizard.update_field(*field, FieldValue::Clear);
            self.report(result)?;
        }
        Ok(())
    }

    fn answer(&mut self, form: &StepForm, text: &str) -> Result<Answered, WizardError> {
        match form {
            StepForm::Text { field, .. } => {
                self.wizard.update_field(*field, FieldValue::Text(text.to_owned()))?;
                Ok(Answered::Settled)
            }
            StepForm::SingleChoice { field, options, .. } => {
                let Some(choice) = resolve_choice(options, text) else {
                    return Err(not_an_option(*field, "one of the listed options"));
                };
                self.wizard.update_field(*field, FieldValue::Text(choice.to_owned()))?;
                Ok(Answered::Settled)
            }
            StepForm::MultiChoice {
                field,
                options,
                selection,
            } => {
                let mut answered = Answered::Changed;
                for item in text.split(',').filter(|s| !s.trim().is_empty()) {
                    let Some(choice) = resolve_choice(options, item) else {
                        return Err(not_an_option(*field, "options from the list"));
                    };
                    if !self.wizard.toggle_option(*field, choice)? {
                        answered = Answered::CapReached(selection.max().unwrap_or_default());
                    }
                }
                Ok(answered)
            }
            StepForm::Number { field, .. } => {
                let n = text
                    .parse::<u32>()
                    .map_err(|_| not_an_option(*field, "a whole number"))?;
                self.wizard.update_field(*field, FieldValue::Number(n))?;
                Ok(Answered::Settled)
            }
            StepForm::Toggles(toggles) => {
                let Some(first) = toggles.first() else {
                    return Ok(Answered::Changed);
                };
                for item in text.split(',').filter(|s| !s.trim().is_empty()) {
                    let toggle = item
                        .trim()
                        .parse::<usize>()
                        .ok()
                        .and_then(|n| toggles.get(n.checked_sub(1)?));
                    let Some(toggle) = toggle else {
                        return Err(not_an_option(first.field, "toggle numbers from the list"));
                    };
                    let value = toggle.field.flag(self.wizard.profile()).unwrap_or(false);
                    self.wizard.update_field(toggle.field, FieldValue::Flag(!value))?;
                }
                Ok(Answered::Changed)
            }
            StepForm::Location { .. } => {
                let region = self
                    .wizard
                    .profile()
                    .location
                    .as_ref()
                    .and_then(|l| l.region.clone());
                let location = Location {
                    country: text.to_owned(),
                    region,
                };
                self.wizard
                    .update_field(ProfileField::Location, FieldValue::Location(location))?;
                Ok(Answered::Settled)
            }
        }
    }

    fn preview(&mut self) -> Result<()> {
        let at = Instant::now() + self.app.config().onboarding.preview_delay;
        if let Some(card) = self.wizard.preview_at(at) {
            writeln!(self.out, "  Preview: {} - {}", card.title, card.description)?;
        }
        Ok(())
    }

    fn render(&mut self, view: &StepView) -> Result<()> {
        let total = self.wizard.visible_steps().len();
        let progress = self.wizard.progress() * 100.0;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Step {} of {total}: {} ({progress:.0}% complete)",
            self.wizard.current_index() + 1,
            view.title,
        )?;
        let required = if view.required { "required" } else { "optional, :skip to skip" };
        writeln!(self.out, "{} [{required}]", view.prompt)?;
        if !view.description.is_empty() {
            writeln!(self.out, "{}", view.description)?;
        }
        render_form(self.out, &view.form)?;
        write!(self.out, "> ")?;
        self.out.flush()?;
        Ok(())
    }
}

fn render_form<W: Write>(out: &mut W, form: &StepForm) -> Result<()> {
    match form {
        StepForm::Text {
            placeholder, value, ..
        } => {
            if value.is_empty() {
                writeln!(out, "  ({placeholder})")?;
            } else {
                writeln!(out, "  Current: {value}")?;
            }
        }
        StepForm::SingleChoice {
            options, selected, ..
        } => {
            for (n, option) in (1..).zip(options.iter()) {
                let mark = if selected.as_deref() == Some(*option) { "*" } else { " " };
                writeln!(out, " {mark}{n:>2}. {option}")?;
            }
        }
        StepForm::MultiChoice {
            options, selection, ..
        } => {
            for (n, option) in (1..).zip(options.iter()) {
                let mark = if selection.selected().iter().any(|s| s == option) {
                    "[x]"
                } else if selection.is_enabled(option) {
                    "[ ]"
                } else {
                    "[-]"
                };
                writeln!(out, "  {mark} {n:>2}. {option}")?;
            }
            let count = selection.selected().len();
            if let Some(max) = selection.max() {
                writeln!(out, "  {count} of {max} selected; numbers separated by commas toggle")?;
            } else {
                writeln!(out, "  {count} selected; numbers separated by commas toggle")?;
            }
        }
        StepForm::Number { max, value, .. } => {
            if let Some(value) = value {
                writeln!(out, "  Current: {value} (1 to {max})")?;
            } else {
                writeln!(out, "  Enter a number from 1 to {max}")?;
            }
        }
        StepForm::Toggles(toggles) => {
            for (n, toggle) in (1..).zip(toggles.iter()) {
                let mark = if toggle.value { "[x]" } else { "[ ]" };
                writeln!(out, "  {mark} {n}. {}", toggle.label)?;
            }
        }
        StepForm::Location { country } => {
            if country.is_empty() {
                writeln!(out, "  (country)")?;
            } else {
                writeln!(out, "  Current: {country}")?;
            }
        }
    }
    Ok(())
}

/// Option named by its 1-based number or, ignoring case, its text.
fn resolve_choice(options: &'static [&'static str], answer: &str) -> Option<&'static str> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return options.get(n.checked_sub(1)?).copied();
    }
    options
        .iter()
        .copied()
        .find(|option| option.eq_ignore_ascii_case(answer))
}

fn not_an_option(field: ProfileField, expected: &'static str) -> WizardError {
    WizardError::TypeMismatch { field, expected }
}
