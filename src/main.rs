use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use skycast::cli::{Cli, ClientCommand, Commands, HELP};
use skycast::client::{
    FixedPosition, Geolocator, NoGeolocation, Position, ProxyClient, Session, SessionSettings,
    TerminalRenderer, UiEvent,
};
use skycast::{Locator, SkycastConfig, telemetry, web};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = SkycastConfig::load_from_path(cli.config.clone())?;
    telemetry::init(&config.logging, cli.verbose)?;

    match cli.command {
        Commands::Serve { bind_address } => {
            if let Some(bind_address) = bind_address {
                config.server.bind_address = bind_address;
            }
            web::run(&config).await
        }
        Commands::Client {
            proxy_url,
            lat,
            lon,
            cities,
        } => {
            if let Some(proxy_url) = proxy_url {
                config.client.proxy_url = proxy_url;
                config.validate()?;
            }
            let position = lat.zip(lon).map(|(latitude, longitude)| Position {
                latitude,
                longitude,
            });
            run_client(&config, position, cities).await
        }
    }
}

async fn run_client(
    config: &SkycastConfig,
    position: Option<Position>,
    cities: Vec<String>,
) -> Result<()> {
    let source = ProxyClient::new(&config.client.proxy_url)
        .context("Failed to create proxy client")?;
    let geolocator: Arc<dyn Geolocator> = match position {
        Some(position) => Arc::new(FixedPosition(position)),
        None => Arc::new(NoGeolocation),
    };
    let session = Session::new(
        Arc::new(source),
        geolocator,
        Arc::new(TerminalRenderer::stdout()),
        SessionSettings::from(&config.client),
    );

    // Failures are already shown in the status line.
    let _ = session.start().await;
    for city in cities {
        let _ = session.add_location(Locator::city(city)).await;
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let command = match ClientCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e.user_message());
                continue;
            }
        };

        match command {
            ClientCommand::Search(city) => {
                let session = session.clone();
                tokio::spawn(async move { session.dispatch(UiEvent::Search(city)).await });
            }
            ClientCommand::Locate => {
                let session = session.clone();
                tokio::spawn(async move { session.dispatch(UiEvent::UseLocation).await });
            }
            ClientCommand::Detail(n) => match session.id_at(n - 1).await {
                Some(id) => session.dispatch(UiEvent::ShowDetail(id)).await,
                None => println!("No entry {n}"),
            },
            ClientCommand::Back => {
                session.dispatch(UiEvent::HideDetail).await;
                session.render_list().await;
            }
            ClientCommand::List => session.render_list().await,
            ClientCommand::Help => println!("{HELP}"),
            ClientCommand::Quit => break,
        }
    }

    Ok(())
}
