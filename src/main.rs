use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;

use folio::cli::{Cli, Commands, ConfigAction};
use folio::commands::{BrowseOptions, cmd_browse, cmd_config_show, cmd_delete, cmd_tags};

fn init_tracing() {
    let env = std::env::var("FOLIO_LOG").unwrap_or_else(|_| "warn".to_string());
    let filter = tracing_subscriber::EnvFilter::from_str(&env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Browse {
            view,
            sort,
            desc,
            page,
            page_size,
            scroll,
            json,
        } => {
            cmd_browse(BrowseOptions {
                view,
                sort,
                desc,
                page,
                page_size,
                scroll,
                json,
            })
            .await
        }
        Commands::Tags { view, json } => cmd_tags(view, json).await,
        Commands::Delete {
            fixture,
            id,
            kind,
            yes,
        } => cmd_delete(&fixture, id, kind, yes).await,
        Commands::Config { action } => match action {
            ConfigAction::Show { kind, json } => cmd_config_show(kind, json),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
