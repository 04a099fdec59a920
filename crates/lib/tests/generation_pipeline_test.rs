//! # Generation Stage Pipeline Tests
//!
//! Drives the six stages through a `StageClient` backed by the mock AI
//! provider, checking the stage chaining contract: each stage's output
//! validates as the next stage's input, block-for-block and in order.

use ragwright::generation::types::{
    EditContentRequest, EditType, GenerateDraftRequest, GenerateFullContentRequest,
    GenerateHeadlinesRequest, GenerateResearchQuestionsRequest, GenerateTopicSentencesRequest,
};
use ragwright::generation::{GenerationError, StageClient, StyleBank};
use ragwright::prompts::PromptLibrary;
use ragwright_test_utils::MockAiProvider;
use std::collections::BTreeMap;

fn stage_client(provider: &MockAiProvider) -> StageClient {
    StageClient::new(Box::new(provider.clone()), PromptLibrary::default())
}

fn style_bank() -> StyleBank {
    StyleBank {
        categories: BTreeMap::from([(
            "voice".to_string(),
            vec![
                "Short sentences carry the point.".to_string(),
                "Verbs over adjectives.".to_string(),
                "Read it aloud before shipping.".to_string(),
            ],
        )]),
    }
}

#[tokio::test]
async fn test_research_questions_stage_parses_platform_keywords() {
    let provider = MockAiProvider::new();
    provider.add_response(
        "research planner",
        r#"{"research_questions":[
            {"platform":"you_snippets","keywords":["remote work burnout","four day week"]},
            {"platform":"wikipedia","keywords":["telecommuting"]}
        ]}"#,
    );
    let client = stage_client(&provider);

    let response = client
        .generate_research_questions(&GenerateResearchQuestionsRequest {
            topics: vec!["remote work".to_string()],
            article_types: vec!["explainer".to_string()],
            platforms: vec!["you_snippets".to_string(), "wikipedia".to_string()],
            personas: None,
            target_audience: Some("founders".to_string()),
            optional_params: None,
        })
        .await
        .unwrap();

    assert_eq!(response.research_questions.len(), 2);
    assert_eq!(response.research_questions[0].platform, "you_snippets");
    assert_eq!(response.research_questions[1].keywords, vec!["telecommuting"]);
    assert!(response.token_count.unwrap() > 0);
}

#[tokio::test]
async fn test_headline_feeds_draft_and_draft_feeds_topic_sentences() {
    let provider = MockAiProvider::new();
    provider.add_response(
        "headline candidates",
        r#"{"headlines":[{
            "headline":"The Four Day Week Works",
            "article_type":"benefits",
            "hook":"The pilot data is in",
            "thesis":"Output holds while hours drop"
        }]}"#,
    );
    provider.add_response(
        "article outline",
        r#"{"drafts":[{
            "headline":"The Four Day Week Works",
            "hook":"The pilot data is in",
            "thesis":"Output holds while hours drop",
            "article_type":"benefits",
            "structure":[
                {"content_block":"Introduction","details":"frame the debate"},
                {"content_block":"Evidence","details":"pilot study results"}
            ]
        }]}"#,
    );
    provider.add_response(
        "topic sentences",
        r#"{"draft_outlines":[
            {"content_block":"Introduction","details":"frame the debate",
             "topic_sentences":["The four day week moved from fringe to pilot."]},
            {"content_block":"Evidence","details":"pilot study results",
             "topic_sentences":["Across pilots, output held steady.","Attrition fell."]}
        ]}"#,
    );
    let client = stage_client(&provider);

    let headlines = client
        .generate_headlines(&GenerateHeadlinesRequest {
            article_types: "benefits".to_string(),
            topics: vec!["four day week".to_string()],
            context: None,
            optional_params: None,
        })
        .await
        .unwrap();
    let headline = &headlines.headlines[0];

    let drafts = client
        .generate_draft(&GenerateDraftRequest {
            headline: headline.headline.clone(),
            hook: headline.hook.clone(),
            thesis: headline.thesis.clone(),
            article_type: headline.article_type.clone(),
            optional_params: None,
        })
        .await
        .unwrap();
    let draft = drafts.drafts[0].clone();
    assert_eq!(draft.structure.len(), 2);

    let topic_sentences = client
        .generate_topic_sentences(&GenerateTopicSentencesRequest {
            draft: draft.clone(),
            optional_params: None,
        })
        .await
        .unwrap();

    // Two outline blocks in, two enriched blocks out, same order, each
    // with a non-empty sentence list.
    assert_eq!(topic_sentences.draft_outlines.len(), 2);
    assert_eq!(
        topic_sentences.draft_outlines[0].content_block,
        "Introduction"
    );
    assert_eq!(topic_sentences.draft_outlines[1].content_block, "Evidence");
    assert!(!topic_sentences.draft_outlines[1].topic_sentences.is_empty());
}

#[tokio::test]
async fn test_full_content_and_edit_close_the_chain() {
    let provider = MockAiProvider::new();
    provider.add_response(
        "full paragraphs",
        r#"{"full_content":[
            {"content_block":"Introduction","details":"frame the debate",
             "topic_sentences":["Opening claim."],
             "paragraphs":["Opening claim. And its support."]}
        ]}"#,
    );
    provider.add_response(
        "polishing a finished draft",
        r#"{"edited_content":[
            {"content_block":"Introduction","paragraphs":["Tightened opening."]}
        ]}"#,
    );
    let client = stage_client(&provider).with_styles(style_bank());

    let topic_blocks = vec![ragwright::generation::types::TopicSentenceBlock {
        content_block: "Introduction".to_string(),
        details: "frame the debate".to_string(),
        topic_sentences: vec!["Opening claim.".to_string()],
    }];

    let full = client
        .generate_full_content(&GenerateFullContentRequest {
            draft_outlines: topic_blocks.clone(),
            optional_params: None,
        })
        .await
        .unwrap();
    assert_eq!(full.full_content.len(), 1);
    assert_eq!(full.full_content[0].paragraphs.len(), 1);

    let draft = ragwright::generation::types::Draft {
        headline: "H".to_string(),
        hook: "K".to_string(),
        thesis: "T".to_string(),
        article_type: "benefits".to_string(),
        structure: vec![ragwright::generation::types::ContentBlock {
            content_block: "Introduction".to_string(),
            details: "frame the debate".to_string(),
        }],
        optional_params: None,
    };

    let edited = client
        .edit_content(&EditContentRequest {
            draft,
            full_content_response: full,
            edit_type: EditType::Structure,
            optional_params: None,
        })
        .await
        .unwrap();
    assert_eq!(edited.edited_content[0].paragraphs, vec!["Tightened opening."]);
}

#[tokio::test]
async fn test_flair_edit_samples_style_examples_into_the_prompt() {
    let provider = MockAiProvider::new();
    provider.add_response(
        "polishing a finished draft",
        r#"{"edited_content":[{"content_block":"Intro","paragraphs":["P."]}]}"#,
    );
    let client = stage_client(&provider).with_styles(style_bank());

    let request = edit_request(EditType::Flair);
    client.edit_content(&request).await.unwrap();

    let calls = provider.get_calls();
    let (_, user_prompt) = calls.last().unwrap();
    assert!(user_prompt.contains("# Style examples"));
    assert!(user_prompt.contains("## voice"));
    // All three examples fit under the per-category sample cap.
    assert_eq!(user_prompt.matches("\n- ").count(), 3);
}

#[tokio::test]
async fn test_structure_edit_omits_style_examples() {
    let provider = MockAiProvider::new();
    provider.add_response(
        "polishing a finished draft",
        r#"{"edited_content":[{"content_block":"Intro","paragraphs":["P."]}]}"#,
    );
    let client = stage_client(&provider).with_styles(style_bank());

    client.edit_content(&edit_request(EditType::Structure)).await.unwrap();

    let calls = provider.get_calls();
    let (_, user_prompt) = calls.last().unwrap();
    assert!(!user_prompt.contains("# Style examples"));
}

#[tokio::test]
async fn test_flair_edit_without_a_style_bank_is_a_configuration_error() {
    let provider = MockAiProvider::new();
    let client = stage_client(&provider);

    let err = client
        .edit_content(&edit_request(EditType::Flair))
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::MissingStyles));
    assert!(provider.get_calls().is_empty(), "no provider call is made");
}

#[tokio::test]
async fn test_malformed_stage_output_is_fatal_to_the_stage() {
    let provider = MockAiProvider::new();
    provider.add_response("headline candidates", "I would rather chat about the weather.");
    let client = stage_client(&provider);

    let err = client
        .generate_headlines(&GenerateHeadlinesRequest {
            article_types: "benefits".to_string(),
            topics: vec!["anything".to_string()],
            context: None,
            optional_params: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Data(_)));
    // Exactly one provider call: the stage does not retry on its own.
    assert_eq!(provider.get_calls().len(), 1);
}

fn edit_request(edit_type: EditType) -> EditContentRequest {
    use ragwright::generation::types::{
        ContentBlock, Draft, FullContentBlock, GenerateFullContentResponse,
    };

    EditContentRequest {
        draft: Draft {
            headline: "H".to_string(),
            hook: "K".to_string(),
            thesis: "T".to_string(),
            article_type: "benefits".to_string(),
            structure: vec![ContentBlock {
                content_block: "Intro".to_string(),
                details: "d".to_string(),
            }],
            optional_params: None,
        },
        full_content_response: GenerateFullContentResponse {
            full_content: vec![FullContentBlock {
                content_block: "Intro".to_string(),
                details: "d".to_string(),
                topic_sentences: vec!["One.".to_string()],
                paragraphs: vec!["P.".to_string()],
            }],
            token_count: None,
        },
        edit_type,
        optional_params: None,
    }
}
