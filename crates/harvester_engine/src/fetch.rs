use std::num::NonZeroUsize;
use std::time::Duration;

use futures_util::StreamExt;
use harvest_logging::harvest_debug;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use url::form_urlencoded;

use crate::decode::decode_records;
use crate::{FailureKind, FetchError, Record};

pub const DEFAULT_ENDPOINT: &str = "https://mocat.gov.bd/api/datatable/go_ultimate_view.php?domain_id=6490&categoryName=%E0%A6%AC%E0%A6%BF%E0%A6%A6%E0%A7%87%E0%A6%B6***%E0%A6%B8%E0%A6%AB%E0%A6%B0***%E0%A6%93***%E0%A6%9F%E0%A7%8D%E0%A6%B0%E0%A7%87%E0%A6%A8%E0%A6%BF%E0%A6%82***%E0%A6%B8%E0%A6%82%E0%A6%95%E0%A7%8D%E0%A6%B0%E0%A6%BE%E0%A6%A8%E0%A7%8D%E0%A6%A4***%E0%A6%9C%E0%A6%BF%E0%A6%93&lang=bn&subdomain=mocat.portal.gov.bd&content_type=go_ultimate";

pub const DEFAULT_PAGE_LENGTH: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(length) => length,
    None => unreachable!(),
};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=UTF-8";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/140.0.0.0 Safari/537.36";

/// Everything the page fetcher needs to talk to one list endpoint.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub endpoint: String,
    pub page_length: NonZeroUsize,
    /// Value of the `sEcho` sequence token.
    pub echo: String,
    pub column_count: usize,
    /// Static headers sent with every request.
    pub headers: Vec<(String, String)>,
    /// `None` waits forever.
    pub connect_timeout: Option<Duration>,
    /// `None` waits forever.
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
    pub accept_invalid_certs: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_length: DEFAULT_PAGE_LENGTH,
            echo: "2".to_string(),
            column_count: 6,
            headers: default_headers(),
            connect_timeout: None,
            request_timeout: None,
            max_bytes: 64 * 1024 * 1024,
            accept_invalid_certs: false,
        }
    }
}

pub fn default_headers() -> Vec<(String, String)> {
    [
        ("Accept", "application/json, text/javascript, */*; q=0.01"),
        ("X-Requested-With", "XMLHttpRequest"),
        ("User-Agent", DEFAULT_USER_AGENT),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}

/// Issues one page request and returns its decoded records.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Page length the harvest loop requests with.
    fn page_length(&self) -> NonZeroUsize;

    async fn fetch_page(
        &self,
        offset: usize,
        page_length: NonZeroUsize,
    ) -> Result<Vec<Record>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestPageFetcher {
    settings: FetchSettings,
    endpoint: reqwest::Url,
    client: reqwest::Client,
}

impl ReqwestPageFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let endpoint = reqwest::Url::parse(&settings.endpoint)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = build_client(&settings)?;
        Ok(Self {
            settings,
            endpoint,
            client,
        })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }
}

fn build_client(settings: &FetchSettings) -> Result<reqwest::Client, FetchError> {
    let mut builder = reqwest::Client::builder()
        .default_headers(build_headers(&settings.headers)?)
        .danger_accept_invalid_certs(settings.accept_invalid_certs);
    if let Some(timeout) = settings.connect_timeout {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = settings.request_timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
}

fn build_headers(pairs: &[(String, String)]) -> Result<HeaderMap, FetchError> {
    let mut headers = HeaderMap::new();
    for (raw_name, raw_value) in pairs {
        let name = HeaderName::from_bytes(raw_name.as_bytes()).map_err(|err| {
            FetchError::new(FailureKind::InvalidHeader, format!("{raw_name}: {err}"))
        })?;
        let value = HeaderValue::from_str(raw_value).map_err(|err| {
            FetchError::new(FailureKind::InvalidHeader, format!("{raw_name}: {err}"))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// URL-encoded body of one DataTables page request.
pub fn page_form(echo: &str, column_count: usize, offset: usize, page_length: NonZeroUsize) -> String {
    let mut form = form_urlencoded::Serializer::new(String::new());
    form.append_pair("sEcho", echo)
        .append_pair("iColumns", &column_count.to_string())
        .append_pair("sColumns", &",".repeat(column_count.saturating_sub(1)))
        .append_pair("iDisplayStart", &offset.to_string())
        .append_pair("iDisplayLength", &page_length.to_string());
    for column in 0..column_count {
        let index = column.to_string();
        form.append_pair(&format!("mDataProp_{index}"), &index)
            .append_pair(&format!("bSearchable_{index}"), "true");
    }
    form.append_pair("sSearch", "").append_pair("bRegex", "false");
    form.finish()
}

#[async_trait::async_trait]
impl PageFetcher for ReqwestPageFetcher {
    fn page_length(&self) -> NonZeroUsize {
        self.settings.page_length
    }

    async fn fetch_page(
        &self,
        offset: usize,
        page_length: NonZeroUsize,
    ) -> Result<Vec<Record>, FetchError> {
        let body = page_form(
            &self.settings.echo,
            self.settings.column_count,
            offset,
            page_length,
        );
        harvest_debug!(
            "POST {} iDisplayStart={} iDisplayLength={}",
            self.endpoint,
            offset,
            page_length
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let records = decode_records(&bytes)?;
        harvest_debug!("offset {} returned {} records", offset, records.len());
        Ok(records)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
