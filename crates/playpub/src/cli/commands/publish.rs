//! Publish command

use clap::Args;
use console::style;
use tracing::info;

use playpub_core::ConfigError;
use playpub_publisher::google_play::{Credentials, GooglePlayClient, GooglePlayConfig};
use playpub_publisher::{PublishOrchestrator, PublishSummary};

use super::args::PublishArgs;
use crate::cli::output;
use crate::cli::{Cli, OutputFormat};

/// Upload artifacts to Google Play and release them on a track
#[derive(Debug, Args)]
pub struct PublishCommand {
    #[command(flatten)]
    pub args: PublishArgs,

    /// OAuth2 access token, used instead of a service account key
    #[arg(long, env = "PLAYPUB_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Validate the edit instead of committing it
    #[arg(long, env = "PLAYPUB_DRY_RUN")]
    pub dry_run: bool,
}

impl PublishCommand {
    /// Execute the publish command
    pub fn execute(&self, cli: &Cli) -> anyhow::Result<()> {
        // Steps run one after another; a single thread is enough
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.execute_async(cli))
    }

    async fn execute_async(&self, cli: &Cli) -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        let (mut config, config_path) = self.args.resolve(&cwd)?;
        config.dry_run |= self.dry_run;
        info!(
            package = %config.package_name,
            track = %config.track,
            artifacts = config.app_paths.len(),
            dry_run = config.dry_run,
            "executing publish command"
        );

        let credentials = self.credentials(&config)?;
        let client = GooglePlayClient::new(GooglePlayConfig::new(credentials))?;

        if !cli.quiet && cli.format == OutputFormat::Text {
            if let Some(path) = &config_path {
                output::info(&format!(
                    "Using config {}",
                    output::path_style().apply_to(path.display())
                ));
            }
            println!(
                "{} {} artifact(s) of {} to track {}",
                if config.dry_run {
                    style("Validating").yellow()
                } else {
                    style("Publishing").cyan()
                },
                config.app_paths.len(),
                style(&config.package_name).bold(),
                style(&config.track).bold()
            );
        }

        let summary = PublishOrchestrator::new(&client, &config).publish().await?;

        match cli.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            }
            OutputFormat::Text => {
                if !cli.quiet {
                    print_summary(&summary);
                }
            }
        }

        Ok(())
    }

    fn credentials(&self, config: &playpub_core::PublishConfig) -> anyhow::Result<Credentials> {
        if let Some(token) = self.access_token.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            return Ok(Credentials::AccessToken(token.to_string()));
        }

        match &config.service_account_key {
            Some(key) => Ok(Credentials::ServiceAccountKey(key.clone())),
            None => Err(playpub_core::PublishError::from(ConfigError::MissingField(
                "service_account_key (or PLAYPUB_ACCESS_TOKEN)".to_string(),
            ))
            .into()),
        }
    }
}

fn print_summary(summary: &PublishSummary) {
    if summary.committed {
        output::success("Release published");
    } else {
        output::success("Edit validated (dry run, nothing committed)");
    }

    let codes: Vec<String> = summary.version_codes.iter().map(|c| c.to_string()).collect();
    println!("{}", output::key_value("Edit", &summary.edit_id));
    println!("{}", output::key_value("Track", &summary.track));
    println!("{}", output::key_value("Version codes", &codes.join(", ")));
    println!("{}", output::key_value("Status", summary.status.as_str()));
    if let Some(fraction) = summary.user_fraction {
        println!("{}", output::key_value("Rollout", &format_rollout(fraction)));
    }
    if summary.committed && !summary.sent_for_review {
        output::warning("Changes were committed without being sent for review");
    }
    println!(
        "{}",
        output::key_value("Console", &style(&summary.console_url).dim().to_string())
    );
}

/// Rollout fraction as a percentage, e.g. `0.07` -> `7.0%`
fn format_rollout(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use playpub_core::PublishConfig;
    use std::path::PathBuf;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        cmd: PublishCommand,
    }

    fn command(args: &[&str]) -> PublishCommand {
        let mut argv = vec!["playpub"];
        argv.extend_from_slice(args);
        TestCli::try_parse_from(argv).unwrap().cmd
    }

    #[test]
    fn test_rollout_has_fixed_precision() {
        assert_eq!(format_rollout(0.07), "7.0%");
        assert_eq!(format_rollout(0.125), "12.5%");
        assert_eq!(format_rollout(1.0), "100.0%");
    }

    #[test]
    fn test_access_token_wins_over_key() {
        let cmd = command(&["--access-token", "ya29.abc"]);
        let config = PublishConfig {
            service_account_key: Some(PathBuf::from("key.json")),
            ..Default::default()
        };

        match cmd.credentials(&config).unwrap() {
            Credentials::AccessToken(token) => assert_eq!(token, "ya29.abc"),
            other => panic!("expected access token, got {:?}", other),
        }
    }

    #[test]
    fn test_service_account_key_from_config() {
        let cmd = command(&["--access-token", " "]);
        let config = PublishConfig {
            service_account_key: Some(PathBuf::from("key.json")),
            ..Default::default()
        };

        assert!(matches!(
            cmd.credentials(&config).unwrap(),
            Credentials::ServiceAccountKey(_)
        ));
    }

    #[test]
    fn test_missing_credentials_is_config_error() {
        let cmd = command(&["--access-token", ""]);
        let err = cmd.credentials(&PublishConfig::default()).unwrap_err();
        assert_eq!(crate::exit_codes::for_error(&err), crate::exit_codes::CONFIG_ERROR);
    }
}
