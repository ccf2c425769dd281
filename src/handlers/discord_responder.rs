use log::warn;
use serenity::all::Message;
use serenity::async_trait;
use serenity::builder::{CreateAttachment, CreateMessage};
use serenity::prelude::Context;

#[async_trait]
pub trait ChatResponder: Send + Sync {
    async fn reply(&self, content: &str);
    async fn send_calendar(&self, content: &str, filename: &str, calendar: Vec<u8>);
}

/// Answers in the channel of the message that triggered the request.
pub struct SerenityResponder<'a> {
    ctx: &'a Context,
    message: &'a Message,
}

impl<'a> SerenityResponder<'a> {
    pub fn new(ctx: &'a Context, message: &'a Message) -> Self {
        Self { ctx, message }
    }
}

#[async_trait]
impl ChatResponder for SerenityResponder<'_> {
    async fn reply(&self, content: &str) {
        if let Err(why) = self.message.reply(&self.ctx.http, content).await {
            warn!("Failed to reply in channel {}: {:?}", self.message.channel_id, why);
        }
    }

    async fn send_calendar(&self, content: &str, filename: &str, calendar: Vec<u8>) {
        let attachment = CreateAttachment::bytes(calendar, filename);
        let message = CreateMessage::new()
            .content(content)
            .reference_message(self.message)
            .add_file(attachment);
        if let Err(why) = self
            .message
            .channel_id
            .send_message(&self.ctx.http, message)
            .await
        {
            warn!(
                "Failed to send calendar to channel {}: {:?}",
                self.message.channel_id, why
            );
        }
    }
}
