// OCS Share API client: list and create public link shares, plus the
// download URL builder. Responses arrive in the OCS JSON envelope;
// only the fields this tool reads are modeled.

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Share kinds the server distinguishes. Only public links are created
/// here; the others appear when scanning a path's existing shares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "i64")]
pub enum ShareType {
    User,
    Group,
    PublicLink,
    Email,
    Other(i64),
}

impl From<i64> for ShareType {
    fn from(v: i64) -> Self {
        match v {
            0 => ShareType::User,
            1 => ShareType::Group,
            3 => ShareType::PublicLink,
            4 => ShareType::Email,
            other => ShareType::Other(other),
        }
    }
}

impl ShareType {
    /// Numeric code used on the wire.
    pub fn code(self) -> i64 {
        match self {
            ShareType::User => 0,
            ShareType::Group => 1,
            ShareType::PublicLink => 3,
            ShareType::Email => 4,
            ShareType::Other(v) => v,
        }
    }
}

/// One share record as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Share {
    pub id: String,
    pub share_type: ShareType,
    /// Server-side path of the shared file, rooted at the user's tree.
    pub path: String,
    /// Public link, present on link shares once the server assigned one.
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OcsEnvelope<T> {
    ocs: OcsBody<T>,
}

#[derive(Debug, Deserialize)]
struct OcsBody<T> {
    meta: OcsMeta,
    data: T,
}

#[derive(Debug, Deserialize)]
struct OcsMeta {
    status: String,
    statuscode: i64,
    message: Option<String>,
}

/// Called with every outbound API request before it is sent. The
/// default logs the URL; tests substitute a recording implementation.
pub trait RequestObserver {
    fn on_request(&self, method: &Method, url: &Url);
}

/// Logs each outgoing request URL.
pub struct LogObserver;

impl RequestObserver for LogObserver {
    fn on_request(&self, method: &Method, url: &Url) {
        info!("{} {}", method, url);
    }
}

/// Path of the share endpoint relative to the base URL.
const SHARES_ENDPOINT: &str = "ocs/v2.php/apps/files_sharing/api/v1/shares";

/// Blocking client for the share API. Credentials are carried as a
/// pre-built Basic Authorization header on every call.
pub struct OcsClient {
    client: Client,
    base_url: Url,
    auth_header: HeaderValue,
    observer: Box<dyn RequestObserver>,
}

impl OcsClient {
    pub fn new(base_url: Url, username: &str, password: &str) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(OcsClient {
            client,
            base_url,
            auth_header: basic_auth_value(username, password)?,
            observer: Box::new(LogObserver),
        })
    }

    /// Replace the default request observer.
    pub fn with_observer(mut self, observer: Box<dyn RequestObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// First public link share on `path`, in the order the server
    /// returned the list, or `None` when the path has no link share.
    pub fn get_public_share(&self, path: &str) -> Result<Option<Share>> {
        let mut url = self.shares_url()?;
        url.query_pairs_mut()
            .append_pair("path", path)
            .append_pair("format", "json");
        self.observer.on_request(&Method::GET, &url);

        let res = self
            .client
            .get(url)
            .headers(self.headers())
            .send()
            .context("Failed to send get-shares request")?;
        let status = res.status();
        let body = res.text().context("Failed to read get-shares response")?;
        let shares: Vec<Share> = decode_envelope(status, &body)
            .with_context(|| format!("get-shares failed for {}", path))?;
        debug!("{} existing share(s) on {}", shares.len(), path);
        Ok(find_public_share(&shares).cloned())
    }

    /// Create a public link share on `path` and return the new record.
    pub fn create_public_share(&self, path: &str) -> Result<Share> {
        let mut url = self.shares_url()?;
        url.query_pairs_mut().append_pair("format", "json");
        self.observer.on_request(&Method::POST, &url);

        let share_type = ShareType::PublicLink.code().to_string();
        let res = self
            .client
            .post(url)
            .headers(self.headers())
            .form(&[("path", path), ("shareType", share_type.as_str())])
            .send()
            .context("Failed to send create-share request")?;
        let status = res.status();
        let body = res.text().context("Failed to read create-share response")?;
        decode_envelope(status, &body).with_context(|| format!("create-share failed for {}", path))
    }

    fn shares_url(&self) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("base URL cannot carry a path: {}", self.base_url))?;
            segments.pop_if_empty();
            segments.extend(SHARES_ENDPOINT.split('/'));
        }
        Ok(url)
    }

    fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, self.auth_header.clone());
        headers.insert("OCS-APIRequest", HeaderValue::from_static("true"));
        headers
    }
}

/// `Authorization` header value for HTTP Basic auth.
pub fn basic_auth_value(username: &str, password: &str) -> Result<HeaderValue> {
    let encoded = BASE64.encode(format!("{}:{}", username, password));
    let mut value = HeaderValue::from_str(&format!("Basic {}", encoded))
        .context("credentials do not form a valid header value")?;
    value.set_sensitive(true);
    Ok(value)
}

/// HTTP status plus the OCS meta block both gate the payload: the
/// server reports API failures inside the envelope on HTTP 200.
fn decode_envelope<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if !status.is_success() {
        bail!("server returned {}: {}", status, body);
    }
    let envelope: OcsEnvelope<T> =
        serde_json::from_str(body).context("undecodable OCS response body")?;
    let meta = envelope.ocs.meta;
    if meta.status != "ok" {
        bail!(
            "OCS error {}: {}",
            meta.statuscode,
            meta.message.unwrap_or_default()
        );
    }
    Ok(envelope.ocs.data)
}

/// First share of the public link kind, by server-returned order.
pub fn find_public_share(shares: &[Share]) -> Option<&Share> {
    shares.iter().find(|s| s.share_type == ShareType::PublicLink)
}

/// Public download URL for a share:
/// `<share url>/download/<basename of the share path>`.
/// `None` when the server did not hand back a link.
pub fn download_url(share: &Share) -> Option<String> {
    let url = share.url.as_deref().filter(|u| !u.is_empty())?;
    let name = Path::new(&share.path).file_name()?.to_str()?;
    Some(format!("{}/download/{}", url, name))
}
