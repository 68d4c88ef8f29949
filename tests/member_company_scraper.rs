mod common;

use std::fs;

use httpmock::prelude::*;
use thai_fee_scraper::{
    ScrapeError,
    member_company_scraper::{MemberCompany, MemberCompanyScraper, OUTPUT_FILE},
};

const TH_LIST: &str = "/th/market/information/member-list/main";
const EN_LIST: &str = "/en/market/information/member-list/main";

fn member_list(paths: &[&str]) -> String {
    let cards: String = paths
        .iter()
        .map(|path| {
            format!(r#"<div class="card market-related-info"><a href="{path}">x</a></div>"#)
        })
        .collect();
    format!(r#"<div class="py-3">{cards}</div>"#)
}

const PROFILE: &str = r#"<html><body>
    <div class="title-member"><span class="text-primary">หมายเลขสมาชิก 2</span></div>
    <h2 data-element="element_heading">บริษัทหลักทรัพย์ ทดสอบ จำกัด</h2>
    <table role="table"><tbody>
        <tr><td>1</td><td>บริษัท แม่ จำกัด</td><td>99.98%</td></tr>
    </tbody></table>
    <div data-element="element_button_image"><a href="/branches/2">สาขา</a></div>
</body></html>"#;

const BRANCHES: &str = r#"<table class="rgMasterTable"><tbody>
    <tr><td>1</td><td>สำนักงานใหญ่</td><td>ถนนรัชดาภิเษก</td><td>02-000-0000</td><td></td></tr>
</tbody></table>"#;

#[tokio::test]
async fn collects_profiles_with_their_branches() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(TH_LIST);
            then.status(200)
                .body(member_list(&["/th/member/2", "/th/member/5"]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(EN_LIST);
            then.status(500);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/th/member/2");
            then.status(200).body(PROFILE);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/th/member/5");
            then.status(404);
        })
        .await;
    let branches = server
        .mock_async(|when, then| {
            when.method(GET).path("/branches/2");
            then.status(200).body(BRANCHES);
        })
        .await;

    let output = tempfile::tempdir().unwrap();
    let ctx = common::context(&server.base_url(), output.path());
    let path = MemberCompanyScraper::new().scrape_to_file(&ctx).await.unwrap();

    branches.assert_async().await;
    assert_eq!(path, output.path().join(OUTPUT_FILE));
    let saved: Vec<MemberCompany> =
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(saved.len(), 1);

    let company = &saved[0];
    assert_eq!(company.no, Some(2));
    assert_eq!(company.name, "บริษัทหลักทรัพย์ ทดสอบ จำกัด");
    assert_eq!(company.shareholders[0].percent, Some(99.98));
    assert!(company.board_of_directors.is_empty());
    assert_eq!(company.branches.len(), 1);
    assert_eq!(company.branches[0].branch_name, "สำนักงานใหญ่");
    assert!(company.branches[0].fax_number.is_empty());
}

#[tokio::test]
async fn no_listed_companies_is_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).body("<html><body>ปิดปรับปรุง</body></html>");
        })
        .await;

    let output = tempfile::tempdir().unwrap();
    let ctx = common::context(&server.base_url(), output.path());
    let result = MemberCompanyScraper::new().scrape(&ctx).await;

    assert!(matches!(result, Err(ScrapeError::NotFound { .. })));
}
