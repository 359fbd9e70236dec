use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use newsly::domain::account::{AccountOverview, AccountService};
use newsly::domain::preferences::InterestFlag;

use crate::app::App;

#[derive(Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    action: Option<AccountAction>,
}

#[derive(Subcommand)]
enum AccountAction {
    /// Show account details, stats and preferences (default)
    Show,
    /// Change the name and email kept on this device
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// Sign out, keeping your profile
    SignOut,
    /// Delete everything stored on this device
    Delete {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
    /// Switch dark mode on or off
    DarkMode,
    /// Reopen the questionnaire to change your answers
    EditProfile,
}

impl AccountArgs {
    /// # Errors
    /// No account on this device, a form error, or a storage failure.
    pub async fn run<W: Write>(&self, app: &App, out: &mut W) -> Result<()> {
        let account = app.account();
        match self.action.as_ref().unwrap_or(&AccountAction::Show) {
            AccountAction::Show => print_overview(out, &account.overview().await?)?,
            AccountAction::Update { name, email } => {
                let updated = account.update_account(name, email)?;
                writeln!(out, "Account updated: {} <{}>", updated.name, updated.email)?;
            }
            AccountAction::SignOut => {
                let route = account.sign_out()?;
                writeln!(out, "Signed out. Continue at {route}")?;
            }
            AccountAction::Delete { yes } => {
                if !yes {
                    anyhow::bail!("this deletes all local data; pass --yes to confirm");
                }
                let route = account.delete_account()?;
                writeln!(out, "Local account data deleted. Continue at {route}")?;
            }
            AccountAction::DarkMode => {
                let state = if account.toggle_dark_mode()? { "on" } else { "off" };
                writeln!(out, "Dark mode {state}")?;
            }
            AccountAction::EditProfile => {
                let route = AccountService::edit_profile();
                writeln!(out, "Run `newsly onboard` to edit your profile ({route}).")?;
            }
        }
        Ok(())
    }
}

fn print_overview<W: Write>(out: &mut W, overview: &AccountOverview) -> Result<()> {
    writeln!(out, "Name:   {}", overview.account.name)?;
    writeln!(out, "Email:  {}", overview.account.email)?;
    if let Some(user) = &overview.user {
        let verified = if user.email_verified { "verified" } else { "not verified" };
        writeln!(out, "Status: signed in, email {verified}")?;
    } else {
        writeln!(out, "Status: signed out")?;
    }
    if let Some(stats) = &overview.stats {
        writeln!(
            out,
            "Stats:  {} recommendations, {} clicked ({:.1}% click-through)",
            stats.total_recommendations, stats.clicked_count, stats.click_through_rate
        )?;
    }
    let dark = if overview.dark_mode { "on" } else { "off" };
    writeln!(out, "Dark mode: {dark}")?;

    if !overview.interests.is_empty() {
        writeln!(out, "Interests:")?;
        for (category, flag) in &overview.interests {
            let label = match flag {
                InterestFlag::Interested => "interested",
                InterestFlag::NotInterested => "not interested",
            };
            writeln!(out, "  {category}: {label}")?;
        }
    }
    if !overview.saved_articles.is_empty() {
        writeln!(out, "Saved articles:")?;
        for article in &overview.saved_articles {
            writeln!(out, "  {article}")?;
        }
    }
    Ok(())
}
