use anyhow::Context;
use clap::Parser;
use std::sync::Arc;

use ideagen::cli::{Cli, Command, FavoritesAction, GenerateArgs};
use ideagen::config::Config;
use ideagen::favorites::{FavoriteStore, FileFavorites};
use ideagen::merge::merge_favorites;
use ideagen::server::{run_serve, AppState};
use ideagen::wire::Envelope;
use ideagen::{prefs, provider, ux, GenerationOptions, GenerationRequest, IdeaGenerator};

fn build_request(g: &GenerateArgs) -> anyhow::Result<GenerationRequest> {
    if let Some(path) = &g.prefs {
        let prefs = prefs::load(path)?;
        return Ok(GenerationRequest::Prefs { prefs });
    }
    let prompt = g.prompt.clone().context("--prompt or --prefs is required")?;
    Ok(GenerationRequest::Prompt {
        prompt,
        options: GenerationOptions {
            categorized: g.categorized,
            platform: g.platform.clone(),
            format: g.format.clone(),
            tone: g.tone.clone(),
            audience: g.audience.clone(),
            count: g.count,
        },
    })
}

fn make_generator(cfg: &Config) -> anyhow::Result<IdeaGenerator> {
    let prov = provider::make_provider(cfg)?;
    let generator = IdeaGenerator::new(prov);
    Ok(if cfg.save_transcripts { generator.with_transcripts(&cfg.root) } else { generator })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let mut cfg = Config::load(args.config.as_deref())?;
    if let Some(p) = args.provider {
        cfg.provider = p;
    }
    if let Some(m) = &args.model {
        cfg.model = m.clone();
    }
    if let Some(b) = &args.api_base {
        cfg.api_base = Some(b.clone());
    }
    if let Some(r) = &args.root {
        cfg.root = r.clone();
    }
    cfg.save_transcripts |= args.save_transcript;

    let favorites = Arc::new(FileFavorites::new(cfg.favorites_file()));

    match args.command {
        Command::Serve { bind, port } => {
            let bind = bind.unwrap_or_else(|| cfg.bind.clone());
            let port = port.unwrap_or(cfg.port);
            let state = AppState { generator: make_generator(&cfg)?, favorites };
            run_serve(state, &bind, port).await?;
        }
        Command::Generate(g) => {
            let req = build_request(&g)?;
            let generator = make_generator(&cfg)?;

            let pb = (!g.json).then(|| ux::spinner("generating ideas..."));
            let outcome = generator.generate(&req).await;
            if let Some(pb) = pb {
                pb.finish_and_clear();
            }
            let result = outcome.context("generation failed; try again")?;
            let merged = merge_favorites(&result, &favorites.snapshot()?);

            if g.json {
                println!("{}", serde_json::to_string_pretty(&Envelope::ok(&merged))?);
            } else {
                ux::print_result(&merged);
            }
        }
        Command::Favorites { action } => match action {
            FavoritesAction::List => {
                for id in favorites.list()? {
                    println!("{id}");
                }
            }
            FavoritesAction::Toggle { id } => {
                if favorites.contains(&id)? {
                    favorites.remove(&id)?;
                    println!("removed {id}");
                } else {
                    favorites.add(&id)?;
                    println!("added {id}");
                }
            }
        },
    }

    Ok(())
}
