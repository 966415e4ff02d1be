use std::sync::Arc;

use anyhow::Context;

use libraryfront_catalog::client::LibraryApiClient;
use libraryfront_catalog::featured::recommendations;
use libraryfront_catalog::session::InMemorySessionStore;
use libraryfront_catalog::static_catalog::static_books;
use libraryfront_views::app_config::AppConfig;
use libraryfront_views::catalog_view::CatalogView;
use libraryfront_views::dashboard_view::DashboardView;
use libraryfront_views::landing::resolve_entry;

fn init_telemetry() {
    use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::{EnvFilter, Registry};

    let app_name = "libraryfront";

    // Tunable via `RUST_LOG` env variable
    let env_filter = EnvFilter::try_from_default_env().unwrap_or(EnvFilter::new("info"));
    let formatting_layer = BunyanFormattingLayer::new(app_name.into(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to install `tracing` subscriber.")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_telemetry();

    let config = AppConfig::load()?;
    tracing::info!("Using catalog at {}", config.api_url);

    let session = Arc::new(InMemorySessionStore::default());
    let entry = resolve_entry(session.as_ref());
    let client = Arc::new(
        LibraryApiClient::new(&config.api_url, config.timeout(), session)
            .context("Failed to create catalog client")?,
    );

    let mut catalog = CatalogView::with_projection(client.clone(), config.projection());
    catalog.load().await;
    let mut dashboard = DashboardView::new(client);
    dashboard.load().await;

    println!("Entry: {}", entry);
    if let Some(error) = catalog.error() {
        println!("Catalog unavailable, showing bundled books: {}", error);
    }
    println!("{}", catalog.summary());
    for book in catalog.visible() {
        println!(
            "  {} | {} | {} | {}",
            book.title,
            book.author.as_deref().unwrap_or("-"),
            book.status.as_deref().unwrap_or("-"),
            book.rating_label()
        );
    }

    let cards = dashboard.cards();
    println!(
        "Unique titles: {}, copies: {}, available: {}, on loan: {}",
        cards.unique_titles, cards.total_copies, cards.available, cards.on_loan
    );

    println!("Recommended:");
    for ranked in recommendations(static_books()) {
        println!("  #{} {} ({})", ranked.rank, ranked.book.title, ranked.score_label());
    }
    Ok(())
}
