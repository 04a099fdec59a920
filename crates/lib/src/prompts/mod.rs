//! # Prompt Templates
//!
//! Default, hardcoded prompt templates for the generation stages, plus the
//! stage-keyed library that resolves them. Deployments override individual
//! stages through configuration.

pub mod content;
pub mod research;

use crate::generation::types::Stage;
use std::collections::HashMap;

/// A system/message template pair for one stage. Placeholders use `{key}`
/// syntax and are substituted from the stage request's fields.
#[derive(Debug, Clone)]
pub struct StagePrompts {
    pub system: String,
    pub message: String,
}

impl StagePrompts {
    fn new(system: &str, message: &str) -> Self {
        Self {
            system: system.to_string(),
            message: message.to_string(),
        }
    }
}

/// Stage-keyed prompt storage with built-in defaults.
#[derive(Debug, Clone)]
pub struct PromptLibrary {
    prompts: HashMap<Stage, StagePrompts>,
}

impl Default for PromptLibrary {
    fn default() -> Self {
        let prompts = HashMap::from([
            (
                Stage::ResearchQuestions,
                StagePrompts::new(
                    research::RESEARCH_QUESTIONS_SYSTEM_PROMPT,
                    research::RESEARCH_QUESTIONS_MESSAGE_PROMPT,
                ),
            ),
            (
                Stage::Headlines,
                StagePrompts::new(
                    content::HEADLINES_SYSTEM_PROMPT,
                    content::HEADLINES_MESSAGE_PROMPT,
                ),
            ),
            (
                Stage::Draft,
                StagePrompts::new(content::DRAFT_SYSTEM_PROMPT, content::DRAFT_MESSAGE_PROMPT),
            ),
            (
                Stage::TopicSentences,
                StagePrompts::new(
                    content::TOPIC_SENTENCES_SYSTEM_PROMPT,
                    content::TOPIC_SENTENCES_MESSAGE_PROMPT,
                ),
            ),
            (
                Stage::FullContent,
                StagePrompts::new(
                    content::FULL_CONTENT_SYSTEM_PROMPT,
                    content::FULL_CONTENT_MESSAGE_PROMPT,
                ),
            ),
            (
                Stage::EditContent,
                StagePrompts::new(
                    content::EDIT_CONTENT_SYSTEM_PROMPT,
                    content::EDIT_CONTENT_MESSAGE_PROMPT,
                ),
            ),
        ]);
        Self { prompts }
    }
}

impl PromptLibrary {
    pub fn get(&self, stage: Stage) -> Option<&StagePrompts> {
        self.prompts.get(&stage)
    }

    /// Replaces the templates for one stage, e.g. from a config override.
    pub fn set(&mut self, stage: Stage, prompts: StagePrompts) {
        self.prompts.insert(stage, prompts);
    }
}
