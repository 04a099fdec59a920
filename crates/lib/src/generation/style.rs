//! # Style Examples
//!
//! Exemplar passages grouped by style category, sampled into the prompt
//! for flair edits.

use serde::Deserialize;
use std::collections::BTreeMap;

/// Named collections of exemplar passages, keyed by style category.
/// Loaded from a JSON document supplied through configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StyleBank {
    pub categories: BTreeMap<String, Vec<String>>,
}

impl StyleBank {
    /// Samples up to `per_category` examples (without replacement) from
    /// every category and concatenates them into one instructions block.
    pub fn sample_instructions(&self, per_category: usize) -> String {
        let mut sections = Vec::new();
        for (category, examples) in &self.categories {
            if examples.is_empty() {
                continue;
            }
            let mut remaining: Vec<usize> = (0..examples.len()).collect();
            let mut picked = Vec::new();
            for _ in 0..per_category.min(examples.len()) {
                let index = remaining.swap_remove(fastrand::usize(..remaining.len()));
                picked.push(format!("- {}", examples[index]));
            }
            sections.push(format!("## {category}\n{}", picked.join("\n")));
        }

        format!(
            "# Style examples\nMatch the voice and rhythm of the examples below.\n\n{}",
            sections.join("\n\n")
        )
    }
}
