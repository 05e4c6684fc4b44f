use std::time::Duration;

use engine_logging::{engine_debug, engine_info};
use scraper::{Html, Selector};
use url::Url;

use crate::PageLoadError;

/// Loads a page until its content stops growing and returns every anchor href.
///
/// Missing `href` attributes are reported as `None` so the extractor decides
/// what to skip.
#[async_trait::async_trait]
pub trait PageLoader: Send + Sync {
    async fn load_fully_scrolled(&self, url: &str) -> Result<Vec<Option<String>>, PageLoadError>;
}

/// Low-level page control used by [`ScrollingPageLoader`].
#[async_trait::async_trait]
pub trait ScrollDriver: Send {
    async fn open(&mut self, url: &str) -> Result<(), PageLoadError>;
    async fn scroll_to_end(&mut self) -> Result<(), PageLoadError>;
    /// Any measure that grows while more content loads.
    async fn content_height(&mut self) -> Result<u64, PageLoadError>;
    async fn anchor_hrefs(&mut self) -> Result<Vec<Option<String>>, PageLoadError>;
    async fn close(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollSettings {
    /// Wait after opening the page before the first measurement.
    pub settle_delay: Duration,
    /// Wait after each scroll before measuring again.
    pub scroll_delay: Duration,
    pub max_scrolls: u32,
    /// Bound on the whole load, scrolling included; `None` for no bound.
    pub page_load_timeout: Option<Duration>,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            settle_delay: Duration::from_secs(5),
            scroll_delay: Duration::from_secs(2),
            max_scrolls: 30,
            page_load_timeout: Some(Duration::from_secs(5 * 60)),
        }
    }
}

/// Scrolls to the end until the height stops changing or `max_scrolls` is hit.
/// A fresh driver is made for every load.
pub struct ScrollingPageLoader<F> {
    new_driver: F,
    settings: ScrollSettings,
}

impl<F, D> ScrollingPageLoader<F>
where
    F: Fn() -> D + Send + Sync,
    D: ScrollDriver,
{
    pub fn new(new_driver: F, settings: ScrollSettings) -> Self {
        Self {
            new_driver,
            settings,
        }
    }

    async fn drive(&self, driver: &mut D, url: &str) -> Result<Vec<Option<String>>, PageLoadError> {
        driver.open(url).await?;
        tokio::time::sleep(self.settings.settle_delay).await;

        let mut last_height = driver.content_height().await?;
        let mut scrolls = 0;
        while scrolls < self.settings.max_scrolls {
            driver.scroll_to_end().await?;
            scrolls += 1;
            tokio::time::sleep(self.settings.scroll_delay).await;
            let height = driver.content_height().await?;
            if height == last_height {
                break;
            }
            last_height = height;
        }
        engine_debug!("Page settled after {} scrolls at height {}", scrolls, last_height);

        driver.anchor_hrefs().await
    }
}

#[async_trait::async_trait]
impl<F, D> PageLoader for ScrollingPageLoader<F>
where
    F: Fn() -> D + Send + Sync,
    D: ScrollDriver,
{
    async fn load_fully_scrolled(&self, url: &str) -> Result<Vec<Option<String>>, PageLoadError> {
        let mut driver = (self.new_driver)();
        let result = match self.settings.page_load_timeout {
            Some(limit) => tokio::time::timeout(limit, self.drive(&mut driver, url))
                .await
                .map_err(|_| PageLoadError::Timeout(limit)),
            None => Ok(self.drive(&mut driver, url).await),
        };
        driver.close().await;
        let hrefs = result??;
        engine_info!("Loaded {} anchors from {}", hrefs.len(), url);
        Ok(hrefs)
    }
}

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Some(Duration::from_secs(30)),
            user_agent: concat!("likes/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Driver for server-rendered pages: every "scroll" re-fetches the document and
/// height is the anchor count, so a static page settles after one scroll.
pub struct HttpScrollDriver {
    client: reqwest::Client,
    page_url: Option<Url>,
    html: String,
}

impl HttpScrollDriver {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            page_url: None,
            html: String::new(),
        }
    }

    pub fn build_client(settings: &HttpSettings) -> Result<reqwest::Client, PageLoadError> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .user_agent(settings.user_agent.clone());
        if let Some(limit) = settings.request_timeout {
            builder = builder.timeout(limit);
        }
        builder
            .build()
            .map_err(|err| PageLoadError::Driver(err.to_string()))
    }

    async fn fetch_document(&mut self) -> Result<(), PageLoadError> {
        let Some(url) = self.page_url.clone() else {
            return Err(PageLoadError::Driver("no page open".to_string()));
        };
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(PageLoadError::HttpStatus {
                status: status.as_u16(),
            });
        }
        self.html = response.text().await.map_err(map_reqwest_error)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ScrollDriver for HttpScrollDriver {
    async fn open(&mut self, url: &str) -> Result<(), PageLoadError> {
        let parsed = Url::parse(url).map_err(|err| PageLoadError::InvalidUrl {
            url: url.to_string(),
            message: err.to_string(),
        })?;
        self.page_url = Some(parsed);
        self.fetch_document().await
    }

    async fn scroll_to_end(&mut self) -> Result<(), PageLoadError> {
        self.fetch_document().await
    }

    async fn content_height(&mut self) -> Result<u64, PageLoadError> {
        Ok(collect_hrefs(&self.html, self.page_url.as_ref()).len() as u64)
    }

    async fn anchor_hrefs(&mut self) -> Result<Vec<Option<String>>, PageLoadError> {
        Ok(collect_hrefs(&self.html, self.page_url.as_ref()))
    }
}

/// Every `<a>` in document order; relative hrefs are resolved against `base`.
fn collect_hrefs(html: &str, base: Option<&Url>) -> Vec<Option<String>> {
    let document = Html::parse_document(html);
    let Ok(anchor) = Selector::parse("a") else {
        return Vec::new();
    };
    document
        .select(&anchor)
        .map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            match Url::parse(href) {
                Ok(url) => Some(url.to_string()),
                Err(_) => base.and_then(|b| b.join(href).ok()).map(String::from),
            }
        })
        .collect()
}

fn map_reqwest_error(err: reqwest::Error) -> PageLoadError {
    if err.is_timeout() {
        return PageLoadError::Network(format!("request timed out: {err}"));
    }
    PageLoadError::Network(err.to_string())
}
