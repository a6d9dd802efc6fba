use reqwest::header::{ACCEPT_LANGUAGE, USER_AGENT};
use tracing::debug;

use crate::error::{Error, Result};

// acmicpc.net rejects requests without a browser-like agent.
const BROWSER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// Download a problem page.
pub async fn fetch_page(url: &str) -> Result<String> {
    debug!(%url, "fetching page");
    let res = reqwest::Client::new()
        .get(url)
        .header(USER_AGENT, BROWSER_AGENT)
        .header(ACCEPT_LANGUAGE, "ko-KR,ko;q=0.9,en;q=0.8")
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        return Err(Error::Transport(format!("GET {url} returned {status}")));
    }
    Ok(res.text().await?)
}
