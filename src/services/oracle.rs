// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Completion-provider client for fortune generation.
//!
//! Draws a card, asks an OpenAI-compatible chat-completions API for a
//! short reading, and maps the card to its image tag. Provider failures
//! are never retried; they surface as a single generation error and
//! nothing is persisted.

use crate::error::AppError;
use crate::models::Card;
use crate::services::deck::TarotDeck;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Output budget for a single reading.
const MAX_COMPLETION_TOKENS: u32 = 300;

/// A hung provider call would otherwise hang the owning request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Substituted when the provider returns an empty completion.
const SILENT_SPIRITS: &str = "The spirits remain silent... try again.";

/// A generated reading, ready to return and persist.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FortuneReading {
    pub card_name: String,
    pub fortune_text: String,
    pub card_image: String,
}

/// Chat-completions client.
#[derive(Clone)]
pub struct OracleClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OracleClient {
    pub fn new(base_url: String, api_key: String, model: String) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("HTTP client init failed: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            api_key,
            model,
        })
    }

    /// Draw a random card and generate its reading.
    pub async fn draw_fortune(&self, deck: &TarotDeck) -> Result<FortuneReading, AppError> {
        self.fortune_for_card(deck.draw()).await
    }

    /// Generate a reading for a specific card.
    pub async fn fortune_for_card(&self, card: &Card) -> Result<FortuneReading, AppError> {
        let completion = self.complete(&reading_prompt(card)).await?;

        let fortune_text = match completion {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                tracing::warn!(card = card.name, "Provider returned an empty completion");
                SILENT_SPIRITS.to_string()
            }
        };

        Ok(FortuneReading {
            card_name: card.name.to_string(),
            fortune_text,
            card_image: TarotDeck::image_tag(card.name).to_string(),
        })
    }

    /// Submit a prompt and return the first choice's content, if any.
    async fn complete(&self, prompt: &str) -> Result<Option<String>, AppError> {
        let url = format!("{}/chat/completions", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "max_completion_tokens": MAX_COMPLETION_TOKENS,
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Oracle(format!("Completion request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Oracle(format!("HTTP {}: {}", status, body)));
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| AppError::Oracle(format!("Malformed completion response: {}", e)))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content))
    }
}

/// The reading prompt names the card and its theme and forbids generic
/// filler.
fn reading_prompt(card: &Card) -> String {
    format!(
        "You are a mystical fortune teller conducting a tarot reading on Halloween night. \n\
         The card drawn is \"{}\", which represents {}.\n\
         \n\
         Generate a haunting, atmospheric fortune reading that:\n\
         - Is 3-4 sentences long\n\
         - Has a mysterious, slightly ominous tone fitting for Halloween\n\
         - Incorporates the card's themes in a creative way\n\
         - Feels personal and prophetic\n\
         - Uses evocative, poetic language\n\
         - Could apply to anyone's life but feels specific\n\
         \n\
         Do not use generic phrases. Make it feel like the spirits are truly speaking through you.\n\
         Only return the fortune text itself, nothing else.",
        card.name, card.theme
    )
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}
