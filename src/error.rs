use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid selector `{selector}`: {reason}")]
    Selector { selector: String, reason: String },

    #[error("{url} answered with an html page instead of json")]
    HtmlInsteadOfJson { url: String },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("a window of {days} days does not fit the calendar")]
    DateWindow { days: i64 },
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
