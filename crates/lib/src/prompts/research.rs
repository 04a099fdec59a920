//! Default prompts for the research stage.

pub const RESEARCH_QUESTIONS_SYSTEM_PROMPT: &str = r#"You are a research planner for a newsroom. Given article topics and the platforms available for research, you produce the keyword queries a researcher should run on each platform. Respond ONLY with a valid JSON object containing a `research_questions` array; each item must have a `platform` string and a `keywords` array of strings. Do not include any other text or explanations."#;

pub const RESEARCH_QUESTIONS_MESSAGE_PROMPT: &str = r#"# Topics
{topics}

# Article types under consideration
{article_types}

# Platforms available for research
{platforms}

# Audience
Personas: {personas}
Target audience: {target_audience}

Produce focused keyword queries for every platform listed. Prefer specific, searchable phrases over broad subject names. Optional context: country {country}, desired article length {desired_length}, scratchpad notes {scratchpad}."#;
