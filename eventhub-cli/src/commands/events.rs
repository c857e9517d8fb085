//! Event lookup commands (list, show, similar)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use eventhub_server::db::{Connector, EventStore};
use eventhub_server::{Event, EventRepository, Slug};

use crate::config::{Backend, BackendArgs};

#[derive(Parser, Debug)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommands,

    #[command(flatten)]
    pub backend: BackendArgs,

    /// Output JSON instead of a table
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum EventsCommands {
    /// List every event, newest first
    List,
    /// Show one event by slug (case-insensitive)
    Show(SlugArgs),
    /// List events sharing at least one tag with the given event
    Similar(SlugArgs),
}

#[derive(Parser, Debug)]
pub struct SlugArgs {
    /// Event slug
    pub slug: String,
}

pub async fn run_events(args: EventsArgs) -> Result<()> {
    match args.backend.backend()? {
        Backend::Postgres(manager) => run_with(EventRepository::new(manager), args).await,
        Backend::Fixture(manager) => run_with(EventRepository::new(manager), args).await,
    }
}

async fn run_with<C>(repo: EventRepository<C>, args: EventsArgs) -> Result<()>
where
    C: Connector,
    C::Handle: EventStore,
{
    match args.command {
        EventsCommands::List => {
            let events = repo.list_events().await.context("Failed to fetch events")?;
            print_list(&events, args.json)
        }
        EventsCommands::Show(SlugArgs { slug }) => {
            let slug = Slug::parse(&slug)?;
            let event = repo
                .try_get_by_slug(slug.as_str())
                .await
                .context("Failed to fetch event")?;
            match event {
                Some(event) => print_event(&event, args.json),
                None => bail!("Event with slug '{}' not found", slug),
            }
        }
        EventsCommands::Similar(SlugArgs { slug }) => {
            let slug = Slug::parse(&slug)?;
            let events = repo
                .get_similar_by_slug(slug.as_str())
                .await
                .context("Failed to fetch similar events")?;
            print_list(&events, args.json)
        }
    }
}

fn print_list(events: &[Event], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(events)?);
        return Ok(());
    }

    if events.is_empty() {
        println!("No events found");
        return Ok(());
    }

    for event in events {
        println!("{}", summary_line(event));
    }
    Ok(())
}

fn print_event(event: &Event, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(event)?);
        return Ok(());
    }

    println!("{}", event.title);
    println!("  slug:      {}", event.slug);
    println!("  when:      {} {}", event.date, event.time);
    println!("  where:     {} ({})", event.venue, event.location);
    println!("  mode:      {}", event.mode);
    println!("  organizer: {}", event.organizer);
    println!("  tags:      {}", event.tags.join(", "));
    if !event.description.is_empty() {
        println!();
        println!("{}", event.description);
    }
    Ok(())
}

fn summary_line(event: &Event) -> String {
    format!(
        "{}  {:<32} {} [{}]",
        event.created_at.format("%Y-%m-%d %H:%M"),
        event.slug,
        event.title,
        event.tags.join(", ")
    )
}
