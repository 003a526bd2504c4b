use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{config::load_settings_from, Dispatcher};
use page_ui::{ApplicationRoot, Document, MessageOutbox, Page, UiEvent};
use tokio::sync::mpsc;
use tracing::info;

/// Mounts the slot filter page against a server and prints the rendered page.
#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = client_core::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    language: Option<String>,
    /// User key to pick in the filter dropdown before searching.
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    from: Option<String>,
    #[arg(long)]
    to: Option<String>,
    /// Click the search trigger even when no filter was given.
    #[arg(long)]
    search: bool,
}

impl Args {
    fn events(&self) -> Vec<UiEvent> {
        let mut events = vec![UiEvent::Mount];
        if let Some(user) = &self.user {
            events.push(UiEvent::UserFilterChanged(user.clone()));
        }
        if let Some(from) = &self.from {
            events.push(UiEvent::FromChanged(from.clone()));
        }
        if let Some(to) = &self.to {
            events.push(UiEvent::ToChanged(to.clone()));
        }
        if self.search || self.user.is_some() || self.from.is_some() || self.to.is_some() {
            events.push(UiEvent::SearchClicked);
        }
        events
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info")
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings_from(&args.config);
    if let Some(server_url) = &args.server_url {
        settings.server_url = server_url.clone();
    }
    if let Some(language) = &args.language {
        settings.language = language.clone();
    }
    info!(server_url = %settings.server_url, "slot client starting");

    let outbox = Arc::new(MessageOutbox::default());
    let dispatcher = Dispatcher::from_settings(&settings, outbox.clone())
        .context("failed to build request dispatcher")?;
    let root = ApplicationRoot::with_language(Document::host_page(), settings.language.as_str())
        .context("host page is missing an anchor")?;
    let mut page = Page::new(root, Arc::new(dispatcher), outbox);

    let events = args.events();
    let (tx, rx) = mpsc::channel(events.len().max(1));
    for event in events {
        tx.send(event).await.context("page event queue closed")?;
    }
    drop(tx);
    page.run(rx).await;

    let state = page.view().state().snapshot().await;
    info!(
        users = state.users.len(),
        slots = state.slots.len(),
        status = %state.error_message,
        "page settled"
    );
    println!("{}", page.root().to_html());
    Ok(())
}
