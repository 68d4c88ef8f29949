mod common;

use std::fs;

use chrono::NaiveDate;
use httpmock::prelude::*;
use serde_json::{Value, json};
use thai_fee_scraper::{ResearchScraper, ScrapeError, research_scraper::OUTPUT_FILE};

const SEARCH_PATH: &str = "/api/cms/v1/research-settrade/search";

fn scraper() -> ResearchScraper {
    ResearchScraper::new(
        NaiveDate::from_ymd_opt(2024, 8, 2).unwrap(),
        NaiveDate::from_ymd_opt(2024, 8, 9).unwrap(),
    )
}

fn listing(page_index: u32, total_pages: u32, urls: &[&str]) -> Value {
    let items: Vec<Value> = urls
        .iter()
        .enumerate()
        .map(|(i, url)| {
            json!({
                "title": format!("รายงาน {page_index}-{i}"),
                "url": url,
                "cateName": "Strategy",
                "subCateName": "Daily",
                "startDate": "2024-08-05T00:00:00",
                "source": "KS",
                "views": 12
            })
        })
        .collect();
    json!({
        "researchItems": {
            "indexFrom": page_index * 20,
            "pageIndex": page_index,
            "pageSize": 20,
            "totalCount": 3,
            "totalPages": total_pages,
            "items": items
        }
    })
}

#[tokio::test]
async fn follows_pages_and_attaches_pdf_links() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(SEARCH_PATH)
                .query_param("startDate", "02/08/2024")
                .query_param("endDate", "09/08/2024")
                .query_param("pageIndex", "0");
            then.status(200)
                .json_body(listing(0, 2, &["/th/research/1", "/th/research/2"]));
        })
        .await;
    let second = server
        .mock_async(|when, then| {
            when.method(GET).path(SEARCH_PATH).query_param("pageIndex", "1");
            then.status(200).json_body(listing(1, 2, &["/th/research/3"]));
        })
        .await;
    let past_the_end = server
        .mock_async(|when, then| {
            when.method(GET).path(SEARCH_PATH).query_param("pageIndex", "2");
            then.status(200).json_body(listing(2, 2, &[]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/th/research/1");
            then.status(200).body(concat!(
                r#"<script>window.__NUXT__={data:[{"fileUrl":"#,
                r#""https://media.example/ks-strategy.pdf"}]}</script>"#
            ));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/th/research/2");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/th/research/3");
            then.status(200)
                .body(r#"<a href="https://media.example/daily.pdf">download</a>"#);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ctx = common::context(&server.base_url(), dir.path());
    let path = scraper().scrape_to_file(&ctx).await.unwrap();

    first.assert_async().await;
    second.assert_async().await;
    past_the_end.assert_hits_async(0).await;
    assert_eq!(path, dir.path().join(OUTPUT_FILE));

    let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written.as_array().unwrap().len(), 2);
    let first_items = &written[0]["researchItems"]["items"];
    assert_eq!(first_items[0]["fileUrl"], "https://media.example/ks-strategy.pdf");
    assert!(first_items[1].get("fileUrl").is_none());
    assert_eq!(first_items[1]["title"], "รายงาน 0-1");
    assert_eq!(
        written[1]["researchItems"]["items"][0]["fileUrl"],
        "https://media.example/daily.pdf"
    );
}

#[tokio::test]
async fn later_listing_failure_keeps_earlier_pages() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(SEARCH_PATH).query_param("pageIndex", "0");
            then.status(200).json_body(listing(0, 3, &[""]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(SEARCH_PATH).query_param("pageIndex", "1");
            then.status(502);
        })
        .await;
    let after_failure = server
        .mock_async(|when, then| {
            when.method(GET).path(SEARCH_PATH).query_param("pageIndex", "2");
            then.status(200).json_body(listing(2, 3, &[]));
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ctx = common::context(&server.base_url(), dir.path());
    let pages = scraper().scrape(&ctx).await.unwrap();

    after_failure.assert_hits_async(0).await;
    assert_eq!(pages.len(), 1);
    assert!(pages[0].research_items.items[0].file_url.is_none());
}

#[tokio::test]
async fn first_listing_failure_is_fatal() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(SEARCH_PATH);
            then.status(200).body("not json");
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ctx = common::context(&server.base_url(), dir.path());
    let result = scraper().scrape_to_file(&ctx).await;

    assert!(matches!(result, Err(ScrapeError::Json(_))));
    assert!(!dir.path().join(OUTPUT_FILE).exists());
}

#[tokio::test]
async fn null_fields_do_not_drop_the_page() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(SEARCH_PATH).query_param("pageIndex", "0");
            then.status(200).json_body(json!({
                "researchItems": {
                    "indexFrom": 0,
                    "pageIndex": 0,
                    "pageSize": 20,
                    "totalCount": 2,
                    "totalPages": 1,
                    "items": [
                        {
                            "uuid": "a1",
                            "title": "PTT flash note",
                            "url": null,
                            "symbol": "PTT",
                            "market": "SET",
                            "cateName": "Company",
                            "source": null,
                            "views": 7,
                            "thumbnail": "/img/ptt.png"
                        },
                        {
                            "uuid": "a2",
                            "title": "Market daily",
                            "url": "/th/research/9",
                            "source": "KS"
                        }
                    ]
                }
            }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/th/research/9");
            then.status(200)
                .body(r#"<a href="https://media.example/daily-9.pdf">pdf</a>"#);
        })
        .await;

    let dir = tempfile::tempdir().unwrap();
    let ctx = common::context(&server.base_url(), dir.path());
    let path = scraper().scrape_to_file(&ctx).await.unwrap();

    let written: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    let items = &written[0]["researchItems"]["items"];
    assert!(items[0]["source"].is_null());
    assert_eq!(items[0]["symbol"], "PTT");
    assert_eq!(items[0]["market"], "SET");
    assert_eq!(items[0]["views"], 7);
    assert_eq!(items[0]["thumbnail"], "/img/ptt.png");
    assert!(items[0].get("fileUrl").is_none());
    assert_eq!(items[1]["fileUrl"], "https://media.example/daily-9.pdf");
}
