use log::{error, info};
use std::env;
use std::process::ExitCode;

use nutrition_label_import::{import_image_file, server, AppConfig, LabelImporter};

const USAGE: &str = "Usage:
  nutrition-label-import serve
  nutrition-label-import <image> [output.xlsx]";

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Help,
    Serve,
    Import { image: String, output: String },
}

/// Decide what to do from the arguments alone; config is loaded afterwards
fn parse_args(args: &[String]) -> Result<Command, &'static str> {
    let command = args.get(1).ok_or(USAGE)?;
    Ok(match command.as_str() {
        "-h" | "--help" => Command::Help,
        "serve" => Command::Serve,
        image => Command::Import {
            image: image.to_string(),
            output: args
                .get(2)
                .cloned()
                .unwrap_or_else(|| "output.xlsx".to_string()),
        },
    })
}

async fn run() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args: Vec<String> = env::args().collect();
    let command = parse_args(&args)?;

    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = AppConfig::load()?;

    match command {
        Command::Help => Ok(()),
        Command::Serve => {
            let importer = LabelImporter::from_config(&config)?;
            server::serve(
                &config.server.bind,
                importer,
                config.server.max_request_bytes,
            )
            .await
        }
        Command::Import { image, output } => {
            let result = import_image_file(&config, &image).await?;
            tokio::fs::write(&output, &result.workbook).await?;

            info!(
                "Wrote {} ({} nutrients, {} lines)",
                output,
                result.record.nutrients.len(),
                result.lines.len()
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_help_is_parsed_without_config() {
        assert_eq!(parse_args(&args(&["bin", "--help"])), Ok(Command::Help));
        assert_eq!(parse_args(&args(&["bin", "-h"])), Ok(Command::Help));
    }

    #[test]
    fn test_import_defaults_output_name() {
        assert_eq!(
            parse_args(&args(&["bin", "label.png"])),
            Ok(Command::Import {
                image: "label.png".to_string(),
                output: "output.xlsx".to_string(),
            })
        );
        assert_eq!(parse_args(&args(&["bin", "serve"])), Ok(Command::Serve));
    }

    #[test]
    fn test_missing_command_shows_usage() {
        assert_eq!(parse_args(&args(&["bin"])), Err(USAGE));
    }
}
