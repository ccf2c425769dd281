#![allow(non_snake_case)]

use std::env;
use std::path::Path;
use std::sync::Arc;

use log::{error, warn};
use wochenplanBot::cli;
use wochenplanBot::config::{AppConfig, RunMode, Settings};
use wochenplanBot::logging;
use wochenplanBot::runtime;
use wochenplanBot::service::openai_service::{OpenAIService, VisionClient};
use wochenplanBot::service::pipeline::PipelineContext;

const DEFAULT_CONFIG_FILE: &str = "secrets.env";

#[tokio::main]
async fn main() {
    logging::init_logging();

    let config = load_config();
    let settings = match Settings::from_config(&config) {
        Ok(settings) => settings,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return;
        }
    };

    let pipeline = Arc::new(PipelineContext::from_settings(&settings));
    let vision: Option<Arc<dyn VisionClient>> = settings.openai_api_key.clone().map(|key| {
        Arc::new(OpenAIService::new(key, settings.model.clone())) as Arc<dyn VisionClient>
    });

    match settings.run_mode {
        RunMode::Api => {
            let Some(discord_token) = settings.discord_token.clone() else {
                error!("DISCORD_TOKEN must be set for bot mode");
                return;
            };
            let Some(vision) = vision else {
                error!("OPENAI_API_KEY must be set for bot mode");
                return;
            };
            runtime::run_api(discord_token, pipeline, vision).await;
        }
        RunMode::Cli => cli::cli(pipeline, vision).await,
    }
}

fn load_config() -> AppConfig {
    let path = env::var("CONFIG_FILE").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
    if !Path::new(&path).exists() {
        return AppConfig::default();
    }
    AppConfig::from_file(&path).unwrap_or_else(|e| {
        warn!("Ignoring config file: {}", e);
        AppConfig::default()
    })
}
