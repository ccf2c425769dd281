use std::sync::Arc;

use log::{error, info, warn};
use serenity::all::{Command, Interaction as DiscordInteraction, Message};
use serenity::async_trait;
use serenity::builder::{CreateCommand, CreateInteractionResponse, CreateInteractionResponseMessage};
use serenity::model::gateway::Ready;
use serenity::prelude::*;

use crate::error::PipelineError;
use crate::handlers::discord_responder::{ChatResponder, SerenityResponder};
use crate::models::image::{self, ImageInput};
use crate::service::openai_service::VisionClient;
use crate::service::pipeline::{PipelineContext, PipelineOutput};

pub const CALENDAR_FILENAME: &str = "wochenplan.ics";
pub const START_TEXT: &str =
    "Hallo! Sende mir ein Bild von deinem Wochenplan und ich erstelle daraus einen Kalender.";
pub const HELP_TEXT: &str = "Sende mir einfach ein Foto deines Wochenplans. Ich lese die Einträge aus und schicke dir eine .ics-Datei, die du in deinen Kalender importieren kannst.";
pub const TEXT_ONLY_TEXT: &str = "Bitte sende mir ein Bild zur Analyse.";
pub const PROCESSING_TEXT: &str = "Verarbeite dein Bild...";
pub const UNREADABLE_TEXT: &str =
    "Entschuldigung, ich konnte aus dem Bild keinen Wochenplan auslesen. Versuche es bitte mit einem schärferen Foto.";
pub const FAILURE_TEXT: &str =
    "Entschuldigung, es gab einen Fehler bei der Verarbeitung deines Bildes.";

pub struct BotHandler {
    pipeline: Arc<PipelineContext>,
    vision: Arc<dyn VisionClient>,
}

impl BotHandler {
    pub fn new(pipeline: Arc<PipelineContext>, vision: Arc<dyn VisionClient>) -> Self {
        BotHandler { pipeline, vision }
    }

    pub fn command_reply(name: &str) -> Option<&'static str> {
        match name {
            "start" => Some(START_TEXT),
            "help" => Some(HELP_TEXT),
            _ => None,
        }
    }

    pub fn calendar_message(output: &PipelineOutput) -> String {
        match output.event_count {
            0 => "Ich konnte keine Termine erkennen. Der Kalender ist leer.".to_string(),
            1 => "Hier ist dein Kalender mit 1 Eintrag.".to_string(),
            n => format!("Hier ist dein Kalender mit {} Einträgen.", n),
        }
    }

    pub async fn handle_text_with(&self, responder: &dyn ChatResponder) {
        responder.reply(TEXT_ONLY_TEXT).await;
    }

    pub async fn handle_image_with(
        &self,
        responder: &dyn ChatResponder,
        image: &ImageInput,
    ) -> Result<usize, PipelineError> {
        responder.reply(PROCESSING_TEXT).await;

        match self.pipeline.process_image(self.vision.as_ref(), image).await {
            Ok(output) => {
                let message = Self::calendar_message(&output);
                let events = output.event_count;
                responder
                    .send_calendar(&message, CALENDAR_FILENAME, output.calendar)
                    .await;
                Ok(events)
            }
            Err(err) => {
                let reply = if err.is_transcription_parse() {
                    UNREADABLE_TEXT
                } else {
                    FAILURE_TEXT
                };
                responder.reply(reply).await;
                Err(err)
            }
        }
    }

    fn is_addressed(ctx: &Context, msg: &Message) -> bool {
        if msg.guild_id.is_none() {
            return true;
        }
        let me = ctx.cache.current_user().id;
        msg.mentions_user_id(me)
    }
}

#[async_trait]
impl EventHandler for BotHandler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);

        let commands = vec![
            CreateCommand::new("start").description("Begrüßung und Kurzanleitung"),
            CreateCommand::new("help").description("So wird aus einem Foto ein Kalender"),
        ];
        if let Err(why) = Command::set_global_commands(&ctx.http, commands).await {
            warn!("Failed to register slash commands: {:?}", why);
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: DiscordInteraction) {
        let DiscordInteraction::Command(command) = interaction else {
            return;
        };
        let Some(reply) = Self::command_reply(command.data.name.as_str()) else {
            return;
        };
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new().content(reply),
        );
        if let Err(why) = command.create_response(&ctx.http, response).await {
            warn!("Failed to answer /{}: {:?}", command.data.name, why);
        }
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot || !Self::is_addressed(&ctx, &msg) {
            return;
        }
        let responder = SerenityResponder::new(&ctx, &msg);

        let images: Vec<_> = msg
            .attachments
            .iter()
            .filter(|a| image::is_image(a.content_type.as_deref(), &a.filename))
            .collect();
        if images.is_empty() {
            self.handle_text_with(&responder).await;
            return;
        }

        // Each image is its own request; one failure does not stop the others.
        for attachment in images {
            let bytes = match attachment.download().await {
                Ok(bytes) => bytes,
                Err(why) => {
                    let err = PipelineError::Download(why.to_string());
                    error!("{} ({})", err, attachment.filename);
                    responder.reply(FAILURE_TEXT).await;
                    continue;
                }
            };
            let input = ImageInput::detect(bytes, attachment.content_type.as_deref(), &attachment.filename);
            match self.handle_image_with(&responder, &input).await {
                Ok(events) => info!(
                    "Sent calendar with {} event(s) for {} to {}",
                    events, attachment.filename, msg.author.name
                ),
                Err(err) => warn!("No calendar for {}: {}", attachment.filename, err),
            }
        }
    }
}
