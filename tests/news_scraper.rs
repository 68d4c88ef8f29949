mod common;

use std::fs;

use httpmock::prelude::*;
use thai_fee_scraper::{
    ScrapeError,
    news_scraper::{NewsItem, NewsScraper, OUTPUT_FILE},
};

const NEWS_PATH: &str = "/api/cms/v1/news/all";

fn news_page(page_index: u32, items: &[(&str, &str)], has_next_page: bool) -> String {
    let items: Vec<String> = items
        .iter()
        .map(|(title, url)| format!(r#"{{"title":"{title}","url":"{url}"}}"#))
        .collect();
    format!(
        r#"{{"pageIndex":{page_index},"pageSize":20,"totalcount":3,"totalpages":2,
        "items":[{}],"hasNextPage":{has_next_page},"hasPreviousPage":false}}"#,
        items.join(",")
    )
}

#[tokio::test]
async fn follows_next_pages_and_reads_articles() {
    let server = MockServer::start_async().await;
    let first = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(NEWS_PATH)
                .query_param("pageIndex", "0")
                .query_param("orderBy", "date")
                .header("x-channel", "WEB_SETTRADE");
            then.status(200).body(news_page(
                0,
                &[("SET ปิดบวก", "/articles/1"), ("ไม่มีเนื้อหา", "/articles/missing")],
                true,
            ));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(NEWS_PATH).query_param("pageIndex", "1");
            then.status(200)
                .body(news_page(1, &[("ทองคำ", "/articles/2")], false));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/articles/1");
            then.status(200).body(
                r#"<html><body><nav>เมนู</nav>
                <article><p>ดัชนีปิดบวก 10 จุด</p></article></body></html>"#,
            );
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/articles/missing");
            then.status(404);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/articles/2");
            then.status(200)
                .body(r#"<div class="post-body">ราคาทองคำขึ้น</div>"#);
        })
        .await;

    let output = tempfile::tempdir().unwrap();
    let ctx = common::context(&server.base_url(), output.path());
    let path = NewsScraper::last_days(7)
        .unwrap()
        .scrape_to_file(&ctx)
        .await
        .unwrap();

    first.assert_async().await;
    assert_eq!(path, output.path().join(OUTPUT_FILE));
    let saved: Vec<NewsItem> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let titles: Vec<&str> = saved.iter().filter_map(|i| i.title.as_deref()).collect();
    assert_eq!(titles, vec!["SET ปิดบวก", "ไม่มีเนื้อหา", "ทองคำ"]);
    assert_eq!(saved[0].article_content.as_deref(), Some("ดัชนีปิดบวก 10 จุด"));
    assert_eq!(saved[0].source.as_deref(), Some("other"));
    assert!(saved[1].article_content.is_none());
    assert_eq!(saved[2].article_content.as_deref(), Some("ราคาทองคำขึ้น"));
}

#[tokio::test]
async fn html_listing_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(NEWS_PATH);
            then.status(200).body("<html><body>Please enable cookies</body></html>");
        })
        .await;

    let output = tempfile::tempdir().unwrap();
    let ctx = common::context(&server.base_url(), output.path());
    let err = NewsScraper::last_days(7)
        .unwrap()
        .scrape(&ctx)
        .await
        .unwrap_err();

    assert!(matches!(err, ScrapeError::HtmlInsteadOfJson { .. }));
    assert!(!output.path().join(OUTPUT_FILE).exists());
}
