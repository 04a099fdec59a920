//! # Server API Tests
//!
//! End-to-end tests for the generation-stage endpoints: happy paths, the
//! client/server error split, and the opaque-error policy for upstream
//! failures.

mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_check_works() {
    let app = TestApp::spawn("http://127.0.0.1:1").await.unwrap();

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_generate_headlines_endpoint() {
    let app = TestApp::spawn("http://127.0.0.1:1").await.unwrap();
    app.ai_provider.add_response(
        "headline candidates",
        r#"{"headlines":[{"headline":"Rust at the Edge","article_type":"explainer",
            "hook":"Why the edge is rewriting its stack","thesis":"Edge compute favors Rust"}]}"#,
    );

    let response = app
        .client
        .post(format!("{}/gen/headlines", app.address))
        .json(&json!({
            "article_types": "explainer",
            "topics": ["rust", "edge compute"]
        }))
        .send()
        .await
        .unwrap();

    assert!(
        response.status().is_success(),
        "unexpected status: {}",
        response.status()
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["result"]["headlines"][0]["headline"],
        "Rust at the Edge"
    );
    assert!(body.get("debug").is_none(), "debug is opt-in");
}

#[tokio::test]
async fn test_debug_param_includes_debug_info() {
    let app = TestApp::spawn("http://127.0.0.1:1").await.unwrap();
    app.ai_provider.add_response(
        "headline candidates",
        r#"{"headlines":[{"headline":"H","article_type":"t","hook":"k","thesis":"t"}]}"#,
    );

    let response = app
        .client
        .post(format!("{}/gen/headlines?debug=true", app.address))
        .json(&json!({"article_types": "t", "topics": ["a"]}))
        .send()
        .await
        .unwrap();

    let body: Value = response.json().await.unwrap();
    assert!(body["debug"]["token_count"].is_number());
}

#[tokio::test]
async fn test_draft_endpoint_synthesizes_missing_wrapper() {
    let app = TestApp::spawn("http://127.0.0.1:1").await.unwrap();
    // The model answers with a bare `structure`; the parser must rebuild
    // the drafts wrapper from the request context.
    app.ai_provider.add_response(
        "article outline",
        r#"{"structure":[{"content_block":"Intro","details":["set the scene","name the stakes"]}]}"#,
    );

    let response = app
        .client
        .post(format!("{}/gen/draft", app.address))
        .json(&json!({
            "headline": "Rust at the Edge",
            "hook": "Why the edge is rewriting its stack",
            "thesis": "Edge compute favors Rust",
            "article_type": "explainer"
        }))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    let draft = &body["result"]["drafts"][0];
    assert_eq!(draft["headline"], "Rust at the Edge");
    assert_eq!(
        draft["structure"][0]["details"],
        "set the scene name the stakes"
    );
}

#[tokio::test]
async fn test_malformed_payload_is_a_client_error() {
    let app = TestApp::spawn("http://127.0.0.1:1").await.unwrap();

    // `topics` is required for the headlines stage.
    let response = app
        .client
        .post(format!("{}/gen/headlines", app.address))
        .json(&json!({"article_types": "explainer"}))
        .send()
        .await
        .unwrap();

    assert!(
        response.status().is_client_error(),
        "expected 4xx, got {}",
        response.status()
    );
}

#[tokio::test]
async fn test_unparseable_model_output_is_an_opaque_server_error() {
    let app = TestApp::spawn("http://127.0.0.1:1").await.unwrap();
    app.ai_provider
        .add_response("headline candidates", "Sorry, I cannot answer that.");

    let response = app
        .client
        .post(format!("{}/gen/headlines", app.address))
        .json(&json!({"article_types": "t", "topics": ["a"]}))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_server_error());
    let body: Value = response.json().await.unwrap();
    let message = body["error"].as_str().unwrap();
    // The response names the stage but never leaks the raw model output.
    assert!(message.contains("generate_headlines"));
    assert!(!message.contains("Sorry, I cannot answer that."));
}

#[tokio::test]
async fn test_edit_flair_endpoint_uses_style_examples() {
    let app = TestApp::spawn("http://127.0.0.1:1").await.unwrap();
    app.ai_provider.add_response(
        "polishing a finished draft",
        r#"{"edited_content":[{"content_block":"Intro","paragraphs":["Polished."]}]}"#,
    );

    let draft = json!({
        "headline": "H",
        "hook": "K",
        "thesis": "T",
        "article_type": "explainer",
        "structure": [{"content_block": "Intro", "details": "d"}]
    });
    let full_content = json!({
        "full_content": [{
            "content_block": "Intro",
            "details": "d",
            "topic_sentences": ["One."],
            "paragraphs": ["P."]
        }]
    });

    let response = app
        .client
        .post(format!("{}/gen/edit", app.address))
        .json(&json!({
            "draft": draft,
            "full_content_response": full_content,
            "edit_type": "flair"
        }))
        .send()
        .await
        .unwrap();

    assert!(response.status().is_success());
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["result"]["edited_content"][0]["paragraphs"][0],
        "Polished."
    );

    // The flair pass augments the user prompt with sampled style examples.
    let calls = app.ai_provider.get_calls();
    let (_, user_prompt) = calls.last().unwrap();
    assert!(user_prompt.contains("# Style examples"));
    assert!(user_prompt.contains("## openers"));
}
