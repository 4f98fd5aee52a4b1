//! Block Kit types used by the home tab.

use serde::{Deserialize, Serialize};

/// A Slack surface view (only `home` is published by this app).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct View {
    #[serde(rename = "type")]
    pub view_type: String,
    pub blocks: Vec<Block>,
}

impl View {
    pub fn home(blocks: Vec<Block>) -> Self {
        Self {
            view_type: "home".to_string(),
            blocks,
        }
    }
}

/// Layout block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { text: Text },
    Divider,
    Context { elements: Vec<Text> },
}

/// Composition text object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Text {
    Mrkdwn { text: String },
    PlainText { text: String },
}

impl Block {
    pub fn markdown_section(text: impl Into<String>) -> Self {
        Block::Section {
            text: Text::Mrkdwn { text: text.into() },
        }
    }

    pub fn plain_context(text: impl Into<String>) -> Self {
        Block::Context {
            elements: vec![Text::PlainText { text: text.into() }],
        }
    }
}
