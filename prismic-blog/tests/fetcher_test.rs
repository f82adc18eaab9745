mod common;

use common::init_tracing;
use httpmock::MockServer;
use prismic_blog::{
    BlogError, ContentFetcher, DocumentFilter, FetchConfig, Ordering, PrismicFetcher, QueryOptions, SortDirection,
};

const API_ROOT: &str = r#"{
    "refs": [
        { "id": "preview", "ref": "release-ref", "label": "Release", "isMasterRef": false },
        { "id": "master", "ref": "master-ref", "label": "Master", "isMasterRef": true }
    ],
    "types": { "posts": "Posts" }
}"#;

fn test_config() -> FetchConfig {
    FetchConfig {
        user_agent: "Prismic-Blog-Test/1.0".to_string(),
        timeout_seconds: 5,
        max_retries: 0,
        retry_delay_ms: 1,
        max_redirects: 0,
    }
}

fn fetcher(server: &MockServer, token: Option<&str>, config: FetchConfig) -> PrismicFetcher {
    PrismicFetcher::new(&server.url("/api/v2"), token.map(str::to_string), config).unwrap()
}

#[tokio::test]
async fn query_resolves_master_ref_and_builds_search_params() {
    init_tracing();

    let server = MockServer::start_async().await;
    let root = server
        .mock_async(|when, then| {
            when.method("GET").path("/api/v2/");
            then.status(200).header("content-type", "application/json").body(API_ROOT);
        })
        .await;
    let search = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/v2/documents/search")
                .query_param("ref", "master-ref")
                .query_param("q", "[[at(document.type,\"posts\")]]")
                .query_param("pageSize", "1")
                .query_param("orderings", "[document.first_publication_date desc]")
                .query_param("after", "id-b")
                .query_param("fetch", "posts.title");
            then.status(200).header("content-type", "application/json").body(
                r#"{ "page": 1, "results": [ { "id": "id-a", "uid": "first", "data": { "title": "First" } } ], "next_page": null }"#,
            );
        })
        .await;

    let fetcher = fetcher(&server, None, test_config());
    let options = QueryOptions::new()
        .page_size(1)
        .order_by(Ordering::first_publication(SortDirection::Desc))
        .after("id-b")
        .fetch_fields(["posts.title"]);

    let page = fetcher.query(&DocumentFilter::of_type("posts"), &options).await.unwrap();
    let again = fetcher.query(&DocumentFilter::of_type("posts"), &options).await.unwrap();

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].uid.as_deref(), Some("first"));
    assert_eq!(page.cursor(), None);
    assert_eq!(again, page);

    root.assert_async().await;
    search.assert_hits_async(2).await;
}

#[tokio::test]
async fn explicit_reference_skips_the_api_root() {
    let server = MockServer::start_async().await;
    let root = server
        .mock_async(|when, then| {
            when.method("GET").path("/api/v2/");
            then.status(200).body(API_ROOT);
        })
        .await;
    let search = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/v2/documents/search")
                .query_param("ref", "release-ref");
            then.status(200).body(r#"{ "results": [] }"#);
        })
        .await;

    let fetcher = fetcher(&server, None, test_config());
    let options = QueryOptions::new().with_reference(Some("release-ref".to_string()));

    let page = fetcher.query(&DocumentFilter::of_type("posts"), &options).await.unwrap();

    assert!(page.results.is_empty());
    search.assert_async().await;
    root.assert_hits_async(0).await;
}

#[tokio::test]
async fn access_token_is_sent_with_every_request() {
    let server = MockServer::start_async().await;
    let root = server
        .mock_async(|when, then| {
            when.method("GET").path("/api/v2/").query_param("access_token", "secret");
            then.status(200).body(API_ROOT);
        })
        .await;
    let search = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/v2/documents/search")
                .query_param("access_token", "secret");
            then.status(200).body(r#"{ "results": [], "next_page": null }"#);
        })
        .await;

    let fetcher = fetcher(&server, Some("secret"), test_config());
    fetcher
        .query(&DocumentFilter::of_type("posts"), &QueryOptions::new())
        .await
        .unwrap();

    root.assert_async().await;
    search.assert_async().await;
}

#[tokio::test]
async fn fetch_page_follows_the_cursor_url() {
    let server = MockServer::start_async().await;
    let page_two = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/v2/documents/search")
                .query_param("page", "2");
            then.status(200).body(
                r#"{ "results": [ { "id": "3", "uid": "third" } ], "next_page": "https://example.invalid/next" }"#,
            );
        })
        .await;

    let fetcher = fetcher(&server, None, test_config());
    let cursor = server.url("/api/v2/documents/search?ref=master-ref&page=2");

    let page = fetcher.fetch_page(&cursor).await.unwrap();

    assert_eq!(page.results[0].uid.as_deref(), Some("third"));
    assert_eq!(page.cursor(), Some("https://example.invalid/next"));
    page_two.assert_async().await;
}

#[tokio::test]
async fn get_by_uid_reports_missing_documents() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path("/api/v2/");
            then.status(200).body(API_ROOT);
        })
        .await;
    let lookup = server
        .mock_async(|when, then| {
            when.method("GET")
                .path("/api/v2/documents/search")
                .query_param("q", "[[at(my.posts.uid,\"missing\")]]");
            then.status(200).body(r#"{ "results": [] }"#);
        })
        .await;

    let fetcher = fetcher(&server, None, test_config());
    let err = fetcher.get_by_uid("posts", "missing", None).await.unwrap_err();

    match err {
        BlogError::NotFound { document_type, uid } => {
            assert_eq!(document_type, "posts");
            assert_eq!(uid, "missing");
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    lookup.assert_async().await;
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method("GET").path("/api/v2/documents/search");
            then.status(404);
        })
        .await;

    let config = FetchConfig {
        max_retries: 3,
        ..test_config()
    };
    let fetcher = fetcher(&server, None, config);
    let options = QueryOptions::new().with_reference(Some("master-ref".to_string()));

    let err = fetcher
        .query(&DocumentFilter::of_type("posts"), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, BlogError::Api { status: 404, .. }));
    search.assert_hits_async(1).await;
}

#[tokio::test]
async fn server_errors_are_retried_then_surfaced() {
    init_tracing();

    let server = MockServer::start_async().await;
    let search = server
        .mock_async(|when, then| {
            when.method("GET").path("/api/v2/documents/search");
            then.status(503);
        })
        .await;

    let config = FetchConfig {
        max_retries: 2,
        ..test_config()
    };
    let fetcher = fetcher(&server, Some("secret"), config);
    let options = QueryOptions::new().with_reference(Some("master-ref".to_string()));

    let err = fetcher
        .query(&DocumentFilter::of_type("posts"), &options)
        .await
        .unwrap_err();

    assert!(err.is_fetch_error());
    match err {
        BlogError::Api { status, url } => {
            assert_eq!(status, 503);
            assert!(!url.contains("secret"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    search.assert_hits_async(3).await;
}

#[tokio::test]
async fn transport_errors_do_not_reveal_the_access_token() {
    init_tracing();

    let closed = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let endpoint = format!("http://{}/api/v2", closed.local_addr().unwrap());
    drop(closed);

    let config = FetchConfig {
        max_retries: 1,
        ..test_config()
    };
    let fetcher = PrismicFetcher::new(&endpoint, Some("secret-token".to_string()), config).unwrap();
    let options = QueryOptions::new().with_reference(Some("master-ref".to_string()));

    let err = fetcher
        .query(&DocumentFilter::of_type("posts"), &options)
        .await
        .unwrap_err();

    assert!(matches!(err, BlogError::Http(_)));
    assert!(!err.to_string().contains("secret-token"));
    assert!(!format!("{err:?}").contains("secret-token"));
}
