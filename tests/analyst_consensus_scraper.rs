use std::fs;

use httpmock::prelude::*;
use serde_json::json;
use thai_fee_scraper::{
    ScrapingConfig, ScrapingContext,
    analyst_consensus_scraper::{AnalystConsensusScraper, ConsensusOverview, OUTPUT_FILE},
};

fn consensus_page(symbol: &str, analysts: &[&str]) -> String {
    let rows: Vec<String> = analysts
        .iter()
        .enumerate()
        .map(|(i, name)| {
            format!(concat!(
                r#"{{id:"{i}",symbol:"{symbol}",brokerName:"Broker {i}","#,
                r#"analystName:"{name}",targetPrice:4{i}.5,recommend:"BUY"}}"#
            ), i = i, symbol = symbol, name = name)
        })
        .collect();
    format!(
        "<html><script>window.__NUXT__=(function(a){{return {{data:[{{analystData:[{}]}}]}}}}\
         (null))</script></html>",
        rows.join(",")
    )
}

fn context(base_url: &str, output_dir: &std::path::Path) -> ScrapingContext {
    let overview = json!({
        "marketTime": "2024-10-01T16:30:00",
        "overall": [
            { "symbol": "PTT", "lastPrice": 34.25, "buy": 12 },
            { "symbol": "AOT", "lastPrice": 61.0, "buy": 15 },
            { "symbol": "KBANK", "lastPrice": 140.5, "buy": 20 },
            { "symbol": "SCB", "lastPrice": 110.0, "buy": 8 }
        ]
    });
    let consensus_file = output_dir.join("response.json");
    fs::write(&consensus_file, overview.to_string()).unwrap();

    let mut config = ScrapingConfig::for_base_url(base_url).unwrap();
    config.set_output_dir(output_dir.to_path_buf());
    config.set_consensus_file(consensus_file);
    ScrapingContext::with_config(config).unwrap()
}

#[tokio::test]
async fn fills_analysts_for_the_first_symbols_only() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/th/equities/quote/PTT/analyst-consensus");
            then.status(200).body(consensus_page("PTT", &["Somchai", "Suda"]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/th/equities/quote/AOT/analyst-consensus");
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/th/equities/quote/KBANK/analyst-consensus");
            then.status(200).body(consensus_page("KBANK", &["Wichai"]));
        })
        .await;
    let beyond_the_limit = server
        .mock_async(|when, then| {
            when.method(GET).path("/th/equities/quote/SCB/analyst-consensus");
            then.status(200).body(consensus_page("SCB", &["Anan"]));
        })
        .await;

    let output = tempfile::tempdir().unwrap();
    let ctx = context(&server.base_url(), output.path());
    let path = AnalystConsensusScraper::new()
        .scrape_to_file(&ctx)
        .await
        .unwrap();

    assert_eq!(path, output.path().join(OUTPUT_FILE));
    assert_eq!(beyond_the_limit.hits_async().await, 0);

    let saved: ConsensusOverview =
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(saved.market_time.as_deref(), Some("2024-10-01T16:30:00"));
    assert_eq!(saved.overall.len(), 4);

    let ptt = &saved.overall[0].analyst_data;
    assert_eq!(ptt.len(), 2);
    assert_eq!(ptt[1].analyst_name.as_deref(), Some("Suda"));
    assert_eq!(ptt[1].target_price, Some(41.5));
    assert!(saved.overall[1].analyst_data.is_empty());
    assert_eq!(saved.overall[2].analyst_data.len(), 1);
    assert!(saved.overall[3].analyst_data.is_empty());
}

#[tokio::test]
async fn missing_overview_is_an_error() {
    let output = tempfile::tempdir().unwrap();
    let mut config = ScrapingConfig::for_base_url("http://127.0.0.1:9").unwrap();
    config.set_output_dir(output.path().to_path_buf());
    config.set_consensus_file(output.path().join("missing.json"));
    let ctx = ScrapingContext::with_config(config).unwrap();

    assert!(AnalystConsensusScraper::new().scrape(&ctx).await.is_err());
}
