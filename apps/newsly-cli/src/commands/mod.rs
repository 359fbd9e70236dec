use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Subcommand;

use crate::app::App;

mod account;
mod auth;
mod feed;
mod onboard;

pub use feed::FeedArgs;

#[derive(Subcommand)]
pub enum Commands {
    /// Show your recommendations (default)
    Feed(FeedArgs),
    /// Answer the onboarding questionnaire
    Onboard(onboard::OnboardArgs),
    /// Create an account; reads the password and its confirmation from stdin
    Signup(auth::SignUpArgs),
    /// Sign in; reads the password from stdin
    Signin(auth::SignInArgs),
    /// Print the Google sign-in address
    GoogleUrl,
    /// Complete Google sign-in with the callback query string
    Callback(auth::CallbackArgs),
    /// Show the signed-in user
    Whoami,
    /// Forget the session token
    Logout,
    /// Account settings
    Account(account::AccountArgs),
    /// Save or unsave a feed article by its position
    Save(feed::SaveArgs),
    /// Report an interaction with an article
    Interact(feed::InteractArgs),
    /// Mark a category as interesting or not
    Interest(feed::InterestArgs),
    /// Check that the API is up
    Health,
}

impl Commands {
    /// # Errors
    /// Whatever the command reports.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        app: &App,
        input: &mut R,
        out: &mut W,
    ) -> Result<()> {
        match self {
            Self::Feed(args) => args.run(app, out).await,
            Self::Onboard(args) => args.run(app, input, out).await,
            Self::Signup(args) => args.run(app, input, out).await,
            Self::Signin(args) => args.run(app, input, out).await,
            Self::GoogleUrl => auth::google_url(app, out),
            Self::Callback(args) => args.run(app, out),
            Self::Whoami => auth::whoami(app, out).await,
            Self::Logout => auth::logout(app, out),
            Self::Account(args) => args.run(app, out).await,
            Self::Save(args) => args.run(app, out).await,
            Self::Interact(args) => args.run(app, out).await,
            Self::Interest(args) => args.run(app, out),
            Self::Health => health(app, out).await,
        }
    }
}

async fn health<W: Write>(app: &App, out: &mut W) -> Result<()> {
    let health = app.api().health().await.context("API is not healthy")?;
    write!(out, "{}", health.status)?;
    if let Some(version) = &health.version {
        write!(out, " (version {version})")?;
    }
    writeln!(out, " at {}", health.timestamp)?;
    Ok(())
}

/// Next line without its line ending, or `None` at end of input.
///
/// # Errors
/// Read failure.
pub fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line).context("failed to read input")? == 0 {
        return Ok(None);
    }
    let trimmed = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(trimmed);
    Ok(Some(line))
}
