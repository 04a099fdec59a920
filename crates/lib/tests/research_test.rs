//! # Research Fetching Tests
//!
//! Covers the snippet/news search client envelopes, the Wikipedia
//! search+parse pair, platform dispatch in `do_research`, and the
//! stability of derived item ids across runs.

use ragwright::generation::types::ResearchQuestion;
use ragwright::research::{
    do_research, stable_item_id, ResearchSource, SearchClient, SearchMode, WikipediaClient,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_snippet_search_normalizes_hits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(header("X-API-Key", "key-123"))
        .and(query_param("query", "four day week"))
        .and(query_param("count", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{
                "title": "Pilot results",
                "url": "https://example.com/pilot",
                "snippets": ["Output held.", "Attrition fell."]
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = SearchClient::new(
        format!("{}/search", server.uri()),
        "key-123",
        "you_snippets",
        SearchMode::Snippets,
    )
    .unwrap();

    let items = client.fetch("four day week", 2).await.unwrap();

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.title, "Pilot results");
    assert_eq!(item.raw_content, "Output held. Attrition fell.");
    assert_eq!(item.source, "you_snippets");
    assert_eq!(item.author, "N/A");
    assert_eq!(item.id, stable_item_id("you_snippets", "https://example.com/pilot"));
}

#[tokio::test]
async fn test_news_search_uses_the_news_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .and(query_param("q", "four day week"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "news": {
                "results": [{
                    "title": "Week shrinks",
                    "url": "https://example.com/news",
                    "description": "A short description.",
                    "author": "Reporter"
                }]
            }
        })))
        .mount(&server)
        .await;

    let client = SearchClient::new(
        format!("{}/news", server.uri()),
        "key-123",
        "you_news",
        SearchMode::News,
    )
    .unwrap();

    let items = client.fetch("four day week", 5).await.unwrap();

    assert_eq!(items[0].raw_content, "A short description.");
    assert_eq!(items[0].author, "Reporter");
}

#[tokio::test]
async fn test_missing_envelope_field_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": []})))
        .mount(&server)
        .await;

    let client = SearchClient::new(
        format!("{}/search", server.uri()),
        "key-123",
        "you_snippets",
        SearchMode::Snippets,
    )
    .unwrap();

    let err = client.fetch("anything", 1).await.unwrap_err();
    assert!(err.to_string().contains("hits"));
}

#[tokio::test]
async fn test_wikipedia_search_then_parse() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("list", "search"))
        .and(query_param("srsearch", "telecommuting"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"search": [{"title": "Remote work"}]}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/w/api.php"))
        .and(query_param("action", "parse"))
        .and(query_param("page", "Remote work"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "parse": {"text": {"*": "chrome From Wikipedia, the free encyclopedia The article body."}}
        })))
        .mount(&server)
        .await;

    let client = WikipediaClient::new(format!("{}/w/api.php", server.uri())).unwrap();
    let items = client.fetch("telecommuting", 3).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Remote work");
    assert_eq!(items[0].raw_content, "The article body.");
    assert_eq!(items[0].url, "https://en.wikipedia.org/wiki/Remote_work");
    assert_eq!(items[0].source, "wikipedia");
}

#[tokio::test]
async fn test_do_research_dispatches_by_platform_and_skips_unknown() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hits": [{
                "title": "Hit",
                "url": "https://example.com/hit",
                "snippets": ["text"]
            }]
        })))
        .expect(2)
        .mount(&server)
        .await;

    let sources: Vec<Box<dyn ResearchSource>> = vec![Box::new(
        SearchClient::new(
            format!("{}/search", server.uri()),
            "key-123",
            "you_snippets",
            SearchMode::Snippets,
        )
        .unwrap(),
    )];
    let questions = vec![
        ResearchQuestion {
            platform: "you_snippets".to_string(),
            keywords: vec!["first".to_string(), "second".to_string()],
        },
        ResearchQuestion {
            platform: "linkedin".to_string(),
            keywords: vec!["ignored".to_string()],
        },
    ];

    let fetched = do_research(&sources, &questions, 3).await.unwrap();

    assert_eq!(fetched.len(), 1, "unknown platform is skipped, not an error");
    assert_eq!(fetched["you_snippets"].len(), 2);
}

#[test]
fn test_item_ids_are_stable_across_runs_and_distinct_across_sources() {
    let a = stable_item_id("you_snippets", "https://example.com/pilot");
    let b = stable_item_id("you_snippets", "https://example.com/pilot");
    let c = stable_item_id("you_news", "https://example.com/pilot");

    assert_eq!(a, b);
    assert_ne!(a, c);
}
