//! Response chunking and interaction reply helpers
//!
//! - **Version**: 2.0.0
//! - **Since**: 1.0.0
//!
//! ## Changelog
//! - 2.0.0: Ephemeral defer/follow-up helpers that swallow expired reply windows
//! - 1.0.0: Message chunking for the Discord content limit

use log::{debug, warn};
use serenity::http::Http;
use serenity::model::application::interaction::application_command::ApplicationCommandInteraction;
use serenity::model::application::interaction::InteractionResponseType;

/// Discord message content limit
pub const MESSAGE_LIMIT: usize = 2000;

/// Chunk text into pieces that fit Discord limits (UTF-8 safe, line-aware)
///
/// Splits at newlines when possible and falls back to character splitting for
/// lines longer than `max_size`. Sizes are measured in bytes, which is always
/// at or above Discord's character count.
pub fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        let line_with_newline = format!("{line}\n");
        if current.len() + line_with_newline.len() > max_size {
            if !current.is_empty() {
                chunks.push(current.trim_end().to_string());
                current = String::new();
            }
            if line_with_newline.len() > max_size {
                chunks.extend(chunk_long_line(line, max_size));
            } else {
                current = line_with_newline;
            }
        } else {
            current.push_str(&line_with_newline);
        }
    }
    if !current.is_empty() {
        chunks.push(current.trim_end().to_string());
    }
    chunks
}

fn chunk_long_line(line: &str, max_size: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for ch in line.chars() {
        if current.len() + ch.len_utf8() > max_size && !current.is_empty() {
            result.push(std::mem::take(&mut current));
        }
        current.push(ch);
    }

    if !current.is_empty() {
        result.push(current);
    }

    result
}

/// Chunk text for message content (2000 character limit)
pub fn chunk_for_message(text: &str) -> Vec<String> {
    chunk_text(text, MESSAGE_LIMIT)
}

/// Truncate text to fit message limit, adding ellipsis if needed
pub fn truncate_for_message(text: &str) -> String {
    if text.len() <= MESSAGE_LIMIT {
        text.to_string()
    } else {
        let mut end = MESSAGE_LIMIT - 3;
        while !text.is_char_boundary(end) && end > 0 {
            end -= 1;
        }
        format!("{}...", &text[..end])
    }
}

/// Acknowledge a slash command with an ephemeral "thinking" state.
///
/// Discord closes the reply window three seconds after the interaction is
/// created. When the defer is rejected the window is gone and there is no one
/// left to answer, so this returns `false` and the caller should stop quietly.
pub async fn defer_ephemeral(http: &Http, command: &ApplicationCommandInteraction) -> bool {
    let result = command
        .create_interaction_response(http, |response| {
            response
                .kind(InteractionResponseType::DeferredChannelMessageWithSource)
                .interaction_response_data(|data| data.ephemeral(true))
        })
        .await;

    match result {
        Ok(()) => true,
        Err(e) => {
            debug!(
                "Reply window for '{}' already closed, dropping response: {e}",
                command.data.name
            );
            false
        }
    }
}

/// Send an ephemeral follow-up to a deferred command, chunked to the message
/// limit. Failures are logged and never propagated.
pub async fn send_followup(http: &Http, command: &ApplicationCommandInteraction, text: &str) {
    for chunk in chunk_for_message(text) {
        if let Err(e) = command
            .create_followup_message(http, |message| message.content(&chunk).ephemeral(true))
            .await
        {
            warn!(
                "Failed to send follow-up for '{}' (user {}): {e}",
                command.data.name, command.user.id
            );
            return;
        }
    }
}
