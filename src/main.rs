use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use painting_studio::app::App;
use painting_studio::models::{
    Config, ImageQuality, ImageSize, ImageStyle, PaintingParameters, Theme,
};
use painting_studio::studio::{PaintingApi, Studio, StudioClient};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "painting-studio")]
#[command(about = "Generate painting descriptions and images with OpenAI")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the studio page and its JSON routes.
    Serve {
        /// Listen address; defaults to BIND_ADDR.
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Register the painting assistant and print its identifier.
    Provision,
    /// Generate a description and a painting for one theme.
    Paint {
        #[arg(long, value_enum)]
        theme: Theme,
        #[arg(long, value_enum, default_value_t = ImageSize::default())]
        size: ImageSize,
        #[arg(long, value_enum, default_value_t = ImageQuality::default())]
        quality: ImageQuality,
        #[arg(long, value_enum, default_value_t = ImageStyle::default())]
        style: ImageStyle,
        /// Paint this text instead of the generated description.
        #[arg(long)]
        description: Option<String>,
        /// Studio server URL; without it the provider is called directly.
        #[arg(long)]
        server: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "painting_studio=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    match args.command {
        Command::Serve { bind } => {
            let addr = bind.unwrap_or(config.bind_addr);
            let app = Arc::new(App::from_config(&config));
            painting_studio::server::serve(app, addr).await?;
        }
        Command::Provision => {
            let app = App::from_config(&config);
            let id = app
                .provision_assistant()
                .await
                .context("Failed to provision assistant")?;
            println!("{}", id);
        }
        Command::Paint {
            theme,
            size,
            quality,
            style,
            description,
            server,
        } => {
            let api: Box<dyn PaintingApi> = match server {
                Some(url) => {
                    info!("Using studio server at {}", url);
                    Box::new(StudioClient::new(url))
                }
                None => Box::new(App::from_config(&config)),
            };

            let mut studio = Studio::new();
            studio.select_theme(Some(theme));
            studio.set_params(PaintingParameters {
                size,
                quality,
                style,
            });

            match description {
                Some(text) => {
                    studio.edit_description(text);
                }
                None => {
                    studio
                        .generate_description(api.as_ref())
                        .await
                        .context("Failed to generate description")?;
                }
            }
            if !studio.can_generate_painting() {
                bail!("Description is empty; nothing to paint");
            }
            println!("{}\n", studio.description());

            studio
                .generate_painting(api.as_ref())
                .await
                .context("Failed to generate painting")?;
            if let Some(url) = studio.image_url() {
                println!("{}", url);
            }
        }
    }

    Ok(())
}
