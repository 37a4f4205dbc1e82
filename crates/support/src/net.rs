use std::{str::FromStr, time::Duration};

use reqwest::{Method, Request, StatusCode, Url};
use tracing::trace;

use crate::constants::THIS_IS_A_BUG;

#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("Invalid endpoint url '{0}': {1}")]
    InvalidUrl(String, url::ParseError),
    #[error("Can not derive an http url from '{0}' {}", THIS_IS_A_BUG)]
    Scheme(String),
    #[error("Endpoint '{0}' not ready after {1} secs")]
    Timeout(String, u64),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Map a websocket endpoint to the http url served on the same port.
pub fn http_url_for(ws_url: &str) -> Result<Url, NetError> {
    let mut parsed =
        Url::from_str(ws_url).map_err(|e| NetError::InvalidUrl(ws_url.to_string(), e))?;
    let scheme = match parsed.scheme() {
        "wss" | "https" => "https",
        _ => "http",
    };
    parsed
        .set_scheme(scheme)
        .map_err(|_| NetError::Scheme(ws_url.to_string()))?;

    Ok(parsed)
}

/// Poll the node until its rpc server answers, the node may still be starting.
pub async fn wait_ws_ready(url: &str) -> Result<(), NetError> {
    let parsed = http_url_for(url)?;

    let http_client = reqwest::Client::new();
    loop {
        let req = Request::new(Method::OPTIONS, parsed.clone());
        let res = http_client.execute(req).await;
        match res {
            Ok(res) => {
                if res.status() == StatusCode::OK {
                    // ready to go!
                    break;
                }

                trace!("http_client status: {}, continuing...", res.status());
            },
            Err(e) => {
                if !skip_err_while_waiting(&e) {
                    return Err(e.into());
                }

                trace!("http_client err: {}, continuing... ", e.to_string());
            },
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    Ok(())
}

pub async fn wait_ws_ready_with_timeout(url: &str, timeout_secs: u64) -> Result<(), NetError> {
    tokio::time::timeout(Duration::from_secs(timeout_secs), wait_ws_ready(url))
        .await
        .map_err(|_| NetError::Timeout(url.to_string(), timeout_secs))?
}

pub fn skip_err_while_waiting(e: &reqwest::Error) -> bool {
    // connection refused/reset while the node is booting
    e.is_connect() || e.is_request()
}
