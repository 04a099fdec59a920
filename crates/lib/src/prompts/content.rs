//! Default prompts for the content-generation stages.

// --- Headlines ---

pub const HEADLINES_SYSTEM_PROMPT: &str = r#"You are a senior editor generating headline candidates. Respond ONLY with a valid JSON object containing a `headlines` array. Each item must have `headline`, `article_type`, `hook`, and `thesis` string fields. Do not include any other text or explanations."#;

pub const HEADLINES_MESSAGE_PROMPT: &str = r#"# Topics
{topics}

# Article type
{article_types}

# Research context
{context}

Write distinct headline candidates for the topics above. Each headline needs a one-sentence hook that earns the click honestly and a thesis the article can actually defend. Optional constraints: publication {publication}, country {country}, personas {personas}, desired length {desired_length}."#;

// --- Draft outline ---

pub const DRAFT_SYSTEM_PROMPT: &str = r#"You are a senior writer turning an approved headline into an article outline. Respond ONLY with a valid JSON object containing a `drafts` array. Each draft must carry `headline`, `hook`, `thesis`, `article_type`, and a `structure` array of content blocks; every block has a `content_block` name and a `details` string describing what the section must cover. Do not include any other text or explanations."#;

pub const DRAFT_MESSAGE_PROMPT: &str = r#"# Headline
{headline}

# Hook
{hook}

# Thesis
{thesis}

# Article type
{article_type}

Outline the article section by section. Keep the headline, hook, and thesis exactly as given. Optional constraints: publication {publication}, desired length {desired_length}, supporting data {data}, scratchpad {scratchpad}."#;

// --- Topic sentences ---

pub const TOPIC_SENTENCES_SYSTEM_PROMPT: &str = r#"You are a senior writer expanding an outline into topic sentences. Respond ONLY with a valid JSON object containing a `draft_outlines` array with exactly one item per content block of the input outline, in the same order. Each item must carry the original `content_block` and `details` plus a non-empty `topic_sentences` array of strings. Do not include any other text or explanations."#;

pub const TOPIC_SENTENCES_MESSAGE_PROMPT: &str = r#"# Draft outline
{draft}

Write the topic sentences for every content block above. Each sentence should make one claim the paragraph it opens will support. Optional constraints: personas {personas}, desired length {desired_length}."#;

// --- Full content ---

pub const FULL_CONTENT_SYSTEM_PROMPT: &str = r#"You are a senior writer drafting full paragraphs from topic sentences. Respond ONLY with a valid JSON object containing a `full_content` array with exactly one item per input block, in the same order. Each item must carry the block's `content_block`, `details`, and `topic_sentences`, plus a non-empty `paragraphs` array of strings, one paragraph per topic sentence. Do not include any other text or explanations."#;

pub const FULL_CONTENT_MESSAGE_PROMPT: &str = r#"# Outline with topic sentences
{draft_outlines}

Write the paragraphs for every block above. Ground claims in the supplied details; do not invent statistics. Optional constraints: publication {publication}, country {country}, desired length {desired_length}, supporting data {data}."#;

// --- Edit / polish ---

pub const EDIT_CONTENT_SYSTEM_PROMPT: &str = r#"You are an editor polishing a finished draft. Respond ONLY with a valid JSON object containing an `edited_content` array; each item must have a `content_block` name and a `paragraphs` array of strings. Do not include any other text or explanations."#;

pub const EDIT_CONTENT_MESSAGE_PROMPT: &str = r#"# Edit type
{edit_type}

# Original draft outline
{draft}

# Full content to edit
{full_content_response}

Apply a `structure` edit by reordering, merging, and tightening sections so the argument builds cleanly. Apply a `flair` edit by rewriting sentences for voice and rhythm while preserving every factual claim."#;
