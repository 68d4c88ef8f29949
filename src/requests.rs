use reqwest::{Client, ClientBuilder, RequestBuilder, Response, header};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    config::ScrapingConfig,
    error::{Result, ScrapeError},
    ratelimit::RateLimiter,
};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/plain, */*; q=0.01";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9,th-TH;q=0.8,th;q=0.7";

pub struct RequestClient {
    client: Client,
    rate_limiter: RateLimiter,
    origin: String,
    cookie: Option<String>,
    verification_token: Option<String>,
}

impl RequestClient {
    pub fn new(config: &ScrapingConfig) -> anyhow::Result<Self> {
        let client = ClientBuilder::new().user_agent(USER_AGENT).build()?;
        let rate_limiter = RateLimiter::new(config.req_per_sec(), config.ms_between_req());
        Ok(Self {
            client,
            rate_limiter,
            origin: config.bot_origin(),
            cookie: config.bot_cookie().map(str::to_string),
            verification_token: config.bot_verification_token().map(str::to_string),
        })
    }

    /// POST a JSON payload the way the BOT compare page's XHR does and return
    /// the HTML fragment it answers with.
    pub async fn post_json_body<P: Serialize + ?Sized>(
        &self,
        url: &str,
        referer: &str,
        payload: &P,
    ) -> Result<String> {
        let request = self
            .client
            .post(url)
            .header(header::ACCEPT, ACCEPT)
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(header::ORIGIN, &self.origin)
            .header(header::REFERER, referer)
            .header("X-Requested-With", "XMLHttpRequest")
            .json(payload);
        let response = self.send(self.with_session(request), url).await?;
        Ok(response.text().await?)
    }

    pub async fn get_body(&self, url: &str) -> Result<String> {
        let response = self.send(self.client.get(url), url).await?;
        Ok(response.text().await?)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json");
        let response = self.send(request, url).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// GET a settrade CMS endpoint. Without `x-channel` the CMS answers with
    /// its html shell, which is reported instead of a json parse failure.
    pub async fn get_cms_json<T: DeserializeOwned>(&self, url: &str, referer: &str) -> Result<T> {
        let request = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json, text/plain, */*")
            .header(header::ACCEPT_LANGUAGE, ACCEPT_LANGUAGE)
            .header(header::REFERER, referer)
            .header("x-channel", "WEB_SETTRADE");
        let body = self.send(request, url).await?.text().await?;
        if body.contains("<html") {
            return Err(ScrapeError::HtmlInsteadOfJson {
                url: url.to_string(),
            });
        }
        Ok(serde_json::from_str(&body)?)
    }

    /// POST a JSON payload to a public API and decode its JSON answer. No BOT
    /// session is attached.
    pub async fn post_json<P, T>(&self, url: &str, payload: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json")
            .json(payload);
        let body = self.send(request, url).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    fn with_session(&self, mut request: RequestBuilder) -> RequestBuilder {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        if let Some(token) = &self.verification_token {
            request = request.header("VerificationToken", token);
        }
        request
    }

    async fn send(&self, request: RequestBuilder, url: &str) -> Result<Response> {
        // Wait (non-blocking) until we're allowed to make a request according
        // to our self-imposed rate-limiting policy.
        self.rate_limiter.wait_until_ready().await;

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::Status {
                url: url.to_string(),
                status,
            });
        }
        Ok(response)
    }
}
