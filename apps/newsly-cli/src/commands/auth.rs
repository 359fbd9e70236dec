use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;
use newsly::domain::auth::{CallbackParams, CallbackStatus, SignInForm, SignUpForm};
use newsly_utils::SecretString;

use super::read_line;
use crate::app::App;

#[derive(Args)]
pub struct SignUpArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
}

impl SignUpArgs {
    /// # Errors
    /// A form error, the server's rejection, or closed input.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        app: &App,
        input: &mut R,
        out: &mut W,
    ) -> Result<()> {
        let password = prompt_secret(input, out, "Password: ")?;
        let confirm_password = prompt_secret(input, out, "Confirm password: ")?;
        let form = SignUpForm {
            name: self.name.clone(),
            email: self.email.clone(),
            password,
            confirm_password,
        };

        let route = app.auth().sign_up(&form).await?;
        writeln!(out, "Account created. Continue at {route} with `newsly onboard`.")?;
        Ok(())
    }
}

#[derive(Args)]
pub struct SignInArgs {
    #[arg(long)]
    email: String,
}

impl SignInArgs {
    /// # Errors
    /// A form error, the server's rejection, or closed input.
    pub async fn run<R: BufRead, W: Write>(
        &self,
        app: &App,
        input: &mut R,
        out: &mut W,
    ) -> Result<()> {
        let form = SignInForm {
            email: self.email.clone(),
            password: prompt_secret(input, out, "Password: ")?,
        };

        let route = app.auth().sign_in(&form).await?;
        writeln!(out, "Signed in. Continue at {route}")?;
        Ok(())
    }
}

#[derive(Args)]
pub struct CallbackArgs {
    /// Query string of the callback address, e.g. `token=...` or `error=access_denied`
    query: String,
}

impl CallbackArgs {
    /// # Errors
    /// The sign-in failed, or the token could not be stored.
    pub fn run<W: Write>(&self, app: &App, out: &mut W) -> Result<()> {
        let outcome = app
            .auth()
            .handle_callback(&CallbackParams::from_query(&self.query))?;
        match outcome.status {
            CallbackStatus::Success => {
                writeln!(out, "{}", outcome.message)?;
                writeln!(out, "Continue at {}", outcome.redirect)?;
                Ok(())
            }
            CallbackStatus::Error => {
                anyhow::bail!("{} Continue at {}", outcome.message, outcome.redirect)
            }
        }
    }
}

/// # Errors
/// Broken output.
pub fn google_url<W: Write>(app: &App, out: &mut W) -> Result<()> {
    writeln!(out, "{}", app.auth().google_url())?;
    Ok(())
}

/// # Errors
/// Storage failure or broken output.
pub async fn whoami<W: Write>(app: &App, out: &mut W) -> Result<()> {
    if let Some(user) = app.auth().refresh_user().await? {
        writeln!(out, "{} <{}>", user.name, user.email)?;
    } else {
        writeln!(out, "Not signed in")?;
    }
    Ok(())
}

/// # Errors
/// Storage failure or broken output.
pub fn logout<W: Write>(app: &App, out: &mut W) -> Result<()> {
    let route = app.auth().logout()?;
    writeln!(out, "Signed out. Continue at {route}")?;
    Ok(())
}

fn prompt_secret<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    prompt: &str,
) -> Result<SecretString> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let line = read_line(input)?.context("input closed before the password was entered")?;
    writeln!(out)?;
    Ok(SecretString::from(line))
}
