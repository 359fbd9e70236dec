use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use newsly::domain::feed::{FeedCard, FeedView};
use newsly::domain::preferences::InterestFlag;
use newsly_sdk::{Interaction, InteractionKind};

use crate::app::App;

#[derive(Args, Default)]
pub struct FeedArgs {
    /// Page to fetch, overriding `feed.page`
    #[arg(long)]
    page: Option<u32>,
    /// Articles per page, overriding `feed.limit`
    #[arg(long)]
    limit: Option<u32>,
}

impl FeedArgs {
    /// # Errors
    /// Local storage failure or broken output.
    pub async fn run<W: Write>(&self, app: &App, out: &mut W) -> Result<()> {
        let mut config = app.config().feed.clone();
        config.page = self.page.unwrap_or(config.page);
        config.limit = self.limit.unwrap_or(config.limit);

        match app.feed_with(config).load().await? {
            FeedView::Recommendations(cards) => {
                writeln!(out, "Your feed")?;
                for card in &cards {
                    print_card(out, card)?;
                }
            }
            FeedView::NoRecommendations => writeln!(
                out,
                "No recommendations yet. Finish onboarding or check back later."
            )?,
            FeedView::SignedOut => writeln!(
                out,
                "You are signed out. Run `newsly signin` to see your feed."
            )?,
            FeedView::NoProfile => writeln!(
                out,
                "Welcome to Newsly. Run `newsly onboard` to personalize your feed."
            )?,
            FeedView::ProfileNotSynced => writeln!(
                out,
                "Your interests are saved on this device. Run `newsly signup` to get recommendations."
            )?,
        }
        Ok(())
    }
}

fn print_card<W: Write>(out: &mut W, card: &FeedCard) -> Result<()> {
    let saved = if card.saved { " [saved]" } else { "" };
    let rec = &card.recommendation;
    writeln!(out, "{:>3}. {}{saved}", card.position, card.title())?;
    if let Some(source) = &rec.article_source {
        writeln!(out, "     {source} (article {})", rec.article_id)?;
    } else {
        writeln!(out, "     article {}", rec.article_id)?;
    }
    if let Some(description) = &rec.article_description {
        writeln!(out, "     {description}")?;
    }
    if let Some(reason) = &rec.recommendation_reason {
        writeln!(out, "     Why: {reason}")?;
    }
    if let Some(url) = &rec.article_url {
        writeln!(out, "     {url}")?;
    }
    Ok(())
}

#[derive(Args)]
pub struct SaveArgs {
    /// Position of the article in the feed, starting at 1
    position: u32,
}

impl SaveArgs {
    /// # Errors
    /// No feed to pick from, no article at that position, or a storage failure.
    pub async fn run<W: Write>(&self, app: &App, out: &mut W) -> Result<()> {
        let feed = app.feed();
        let FeedView::Recommendations(mut cards) = feed.load().await? else {
            anyhow::bail!("no recommendations to save from");
        };
        let card = cards
            .iter_mut()
            .find(|card| card.position == self.position)
            .with_context(|| format!("no article at position {}", self.position))?;

        if feed.toggle_saved(card)? {
            writeln!(out, "Saved: {}", card.title())?;
        } else {
            writeln!(out, "Removed from saved: {}", card.title())?;
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct InteractArgs {
    article_id: i64,
    /// view, click, like, share, hide or bookmark
    kind: InteractionKind,
    /// Position of the article in the feed
    #[arg(long)]
    position: Option<u32>,
    /// Seconds spent on the article
    #[arg(long, default_value_t = 0)]
    time_spent: u32,
}

impl InteractArgs {
    /// # Errors
    /// Storage failure or broken output. A refused interaction is reported,
    /// not an error.
    pub async fn run<W: Write>(&self, app: &App, out: &mut W) -> Result<()> {
        let mut interaction =
            Interaction::new(self.article_id, self.kind).with_time_spent(self.time_spent);
        if let Some(position) = self.position {
            interaction = interaction.at_position(position);
        }

        if app.feed().record_interaction(&interaction).await? {
            writeln!(out, "Recorded {} on article {}", self.kind.as_str(), self.article_id)?;
        } else {
            writeln!(out, "Interaction not recorded")?;
        }
        Ok(())
    }
}

#[derive(Args)]
pub struct InterestArgs {
    category: String,
    /// Flag the category as not interesting instead
    #[arg(long)]
    not: bool,
}

impl InterestArgs {
    /// # Errors
    /// Storage failure or broken output.
    pub fn run<W: Write>(&self, app: &App, out: &mut W) -> Result<()> {
        let flag = if self.not {
            InterestFlag::NotInterested
        } else {
            InterestFlag::Interested
        };
        let label = match app.feed().flag_interest(&self.category, flag)? {
            Some(InterestFlag::Interested) => "interested",
            Some(InterestFlag::NotInterested) => "not interested",
            None => "no preference",
        };
        writeln!(out, "{}: {label}", self.category)?;
        Ok(())
    }
}
