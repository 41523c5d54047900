use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Text};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use skycast_core::{
    Config, IpApiLocator, LocationQuery, Notice, OllamaSummarizer, OpenWeatherProvider, SharedApp,
    Summarizer, WeatherProvider, fetch_flow, new_shared, resolve_initial_location, search_query,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Weather in your terminal, summarized by AI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and summarizer settings.
    Configure,

    /// Show current weather once, for a city or the detected location.
    Show {
        /// City name; when absent, the location is auto-detected.
        city: Option<String>,
    },

    /// Detect the location, then search for cities interactively.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city }) => show(city).await,
            Some(Command::Interactive) | None => interactive().await,
        }
    }
}

/// Interactive credential and settings entry.
fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Text::new("OpenWeather API key:")
        .with_help_message("Create one at https://openweathermap.org/api, blank keeps the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_openweather_api_key(api_key.trim().to_string());
    }

    let base_url = Text::new("Summarizer base URL:")
        .with_default(&config.summarizer.base_url)
        .prompt()?;
    config.summarizer.base_url = base_url.trim().to_string();

    let model = Text::new("Summarizer model:")
        .with_default(&config.summarizer.model)
        .prompt()?;
    config.summarizer.model = model.trim().to_string();

    config.geolocation = Confirm::new("Detect your location via IP geolocation?")
        .with_default(config.geolocation)
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Everything one run of the app needs: shared state, the two external
/// capabilities, and the advisory channel.
struct Session {
    app: SharedApp,
    provider: Arc<dyn WeatherProvider>,
    summarizer: Arc<dyn Summarizer>,
    notices_tx: mpsc::UnboundedSender<Notice>,
    notices_rx: mpsc::UnboundedReceiver<Notice>,
    config: Config,
}

impl Session {
    fn new() -> Result<Self> {
        let config = Config::load()?;
        let provider: Arc<dyn WeatherProvider> =
            Arc::new(OpenWeatherProvider::new(config.openweather_api_key()));
        let summarizer: Arc<dyn Summarizer> =
            Arc::new(OllamaSummarizer::new(config.summarizer.clone())?);
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();

        Ok(Self {
            app: new_shared(),
            provider,
            summarizer,
            notices_tx,
            notices_rx,
            config,
        })
    }

    /// Run one fetch; the returned handle resolves when the summary lands.
    async fn fetch(&mut self, query: LocationQuery) -> Option<JoinHandle<()>> {
        let handle = fetch_flow(
            self.app.clone(),
            self.provider.clone(),
            self.summarizer.clone(),
            self.notices_tx.clone(),
            query,
        )
        .await;
        self.drain_notices();
        handle
    }

    fn drain_notices(&mut self) {
        while let Ok(notice) = self.notices_rx.try_recv() {
            render::print_notice(&notice);
        }
    }

    fn render_card(&self) {
        let app = self.app.lock();
        render::print_card(app.state());
    }
}

/// One-shot mode: fetch, wait for the summary, print the card.
async fn show(city: Option<String>) -> Result<()> {
    let mut session = Session::new()?;

    let query = match city {
        Some(city) => match search_query(&city) {
            Some(query) => query,
            None => {
                render::print_notice(&Notice::EmptySearch);
                return Ok(());
            }
        },
        None => {
            let locator = IpApiLocator::new(session.config.geolocation);
            let resolution = resolve_initial_location(&locator).await;
            render::print_notice(&resolution.notice);
            resolution.query
        }
    };

    if let Some(summary_task) = session.fetch(query).await {
        let _ = summary_task.await;
    }
    session.drain_notices();
    session.render_card();
    Ok(())
}

/// Startup fetch for the detected location, then a search loop.
async fn interactive() -> Result<()> {
    let mut session = Session::new()?;

    let locator = IpApiLocator::new(session.config.geolocation);
    let resolution = resolve_initial_location(&locator).await;
    render::print_notice(&resolution.notice);

    let mut summary_task = session.fetch(resolution.query).await;

    loop {
        // Settle the pending summary so the card prints complete.
        if let Some(handle) = summary_task.take() {
            let _ = handle.await;
        }
        session.drain_notices();
        session.render_card();

        let text = match Text::new("Search for a city:")
            .with_help_message("Esc to quit")
            .prompt()
        {
            Ok(text) => text,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        let query = {
            let mut app = session.app.lock();
            app.set_search_text(text);
            app.submit_search()
        };

        match query {
            Ok(query) => summary_task = session.fetch(query).await,
            Err(notice) => render::print_notice(&notice),
        }
    }

    Ok(())
}
