#![allow(dead_code)]

use std::path::Path;

use thai_fee_scraper::{ScrapingConfig, ScrapingContext};

/// A context pointing every site at `base_url` and writing into `output_dir`.
pub fn context(base_url: &str, output_dir: &Path) -> ScrapingContext {
    let mut config = ScrapingConfig::for_base_url(base_url).unwrap();
    config.set_output_dir(output_dir.to_path_buf());
    ScrapingContext::with_config(config).unwrap()
}

/// A safe box compare page holding one column per provider.
pub fn safe_box_page(providers: &[&str], total_pages: u32) -> String {
    let mut html = String::from("<table><thead><tr><th></th>");
    for (i, provider) in providers.iter().enumerate() {
        let n = i + 1;
        html.push_str(&format!(
            r#"<th class="col-s col-s-{n}"><span><img/></span><span>{provider}</span></th>"#
        ));
    }
    html.push_str(r#"</tr></thead><tbody><tr class="attr-DepositFeeForSafeBoxKey"><td>key</td>"#);
    for i in 1..=providers.len() {
        html.push_str(&format!(r#"<td class="cmpr-col col{i}"><span>{i},000 บาท</span></td>"#));
    }
    html.push_str("</tr></tbody></table>");
    if total_pages > 1 {
        html.push_str(r#"<ul class="pagination">"#);
        for page in 1..=total_pages {
            html.push_str(&format!(r##"<li><a href="#" data-page="{page}">{page}</a></li>"##));
        }
        html.push_str("</ul>");
    }
    html
}
