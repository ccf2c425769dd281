use std::sync::Arc;

use log::error;
use serenity::model::gateway::GatewayIntents;

use crate::handlers::discord::BotHandler;
use crate::service::openai_service::VisionClient;
use crate::service::pipeline::PipelineContext;

pub async fn run_api(
    discord_token: String,
    pipeline: Arc<PipelineContext>,
    vision: Arc<dyn VisionClient>,
) {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;
    let mut client = match serenity::Client::builder(&discord_token, intents)
        .event_handler(BotHandler::new(pipeline, vision))
        .await
    {
        Ok(client) => client,
        Err(why) => {
            error!("Error creating Serenity client: {:?}", why);
            return;
        }
    };

    if let Err(why) = client.start().await {
        error!("Client error: {:?}", why);
    }
}
