// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::validation::{ResourceKind, Schema};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A message posted to a chat thread. Without `chatId` a new thread starts.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[validate(required, length(min = 1, message = "Must have a message"))]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(equal = 24))]
    pub chat_id: Option<String>,
}

impl Schema for ChatMessage {
    const KIND: ResourceKind = ResourceKind::ChatMessage;
}

/// Stored chat message.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    pub chat_id: String,
    pub user_id: String,
    pub message: String,
}
