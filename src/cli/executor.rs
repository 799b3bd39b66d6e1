//! Command executor for dispatching CLI commands

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;

/// Dispatch the parsed command. A missing subcommand means `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    warn_about_risky_args(cli);

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(())
        }
    }
}

fn warn_about_risky_args(cli: &Cli) {
    match &cli.command {
        Some(Commands::Serve {
            port: Some(port), ..
        }) if *port < 1024 => {
            tracing::warn!(port, "Binding to a privileged port may require root privileges");
        }
        Some(Commands::Migrate {
            rollback: Some(steps),
            ..
        }) if *steps > 50 => {
            tracing::warn!(
                steps,
                "Rolling back many migrations at once; consider smaller steps"
            );
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServiceRole;
    use clap::Parser;

    #[tokio::test]
    async fn test_execute_serve_dry_run() {
        let cli = Cli::try_parse_from(["product-services", "serve", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, Settings::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_serve_dry_run_surfaces_invalid_settings() {
        let cli = Cli::try_parse_from(["product-services", "serve", "--dry-run"]).unwrap();
        let mut settings = Settings::default();
        settings.service.role = ServiceRole::Recommendation;

        assert!(execute_command(&cli, settings).await.is_err());
    }

    #[tokio::test]
    async fn test_execute_migrate_without_database() {
        let cli = Cli::try_parse_from(["product-services", "migrate", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, Settings::default()).await.is_err());
    }
}
