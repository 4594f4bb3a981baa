use crate::parser::{ExtractionRules, ParseError, parse_menu_page};
use crate::types::{DayConfig, DayResult};

use chrono::Local;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "canteenbot/0.2";
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error for {url}: {source}")]
    ParseError { url: String, source: ParseError },
}

/// Outcome of scraping one configured day.
#[derive(Debug)]
pub struct DayScrape {
    pub config: DayConfig,
    pub result: Result<DayResult, ScraperError>,
}

/// Builds the stored record for `config` from its downloaded page.
pub fn day_result_from_html(
    config: &DayConfig,
    html: &str,
    rules: &ExtractionRules,
) -> Result<DayResult, ScraperError> {
    let timestamp = Local::now().format("%c").to_string();
    let locations = parse_menu_page(html, rules).map_err(|source| ScraperError::ParseError {
        url: config.url.clone(),
        source,
    })?;

    Ok(DayResult {
        day: config.day.name().to_string(),
        url: config.url.clone(),
        timestamp,
        locations,
    })
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    rules: ExtractionRules,
    request_delay: Duration,
}

impl WebScraper {
    pub fn new(user_agent: &str, request_delay: Duration) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            rules: ExtractionRules::default(),
            request_delay,
        })
    }

    pub async fn fetch_day(&self, config: &DayConfig) -> Result<DayResult, ScraperError> {
        log::info!("Fetching {} menu: {}", config.day, config.url);
        let html = self.get_html(&config.url).await?;
        let result = day_result_from_html(config, &html, &self.rules)?;
        log::info!(
            "Parsed {} location(s) for {}",
            result.locations.len(),
            config.day
        );
        Ok(result)
    }

    /// Scrapes `days` one after another, pausing between requests. A failed
    /// day does not stop the others; every outcome is returned in order.
    pub async fn scrape_week(&self, days: &[DayConfig]) -> Vec<DayScrape> {
        let mut scrapes = Vec::with_capacity(days.len());

        for (i, config) in days.iter().enumerate() {
            if i > 0 && !self.request_delay.is_zero() {
                tokio::time::sleep(self.request_delay).await;
            }

            let result = self.fetch_day(config).await;
            if let Err(e) = &result {
                log::error!("Failed to scrape {}: {}", config.day, e);
            }
            scrapes.push(DayScrape {
                config: config.clone(),
                result,
            });
        }

        scrapes
    }

    async fn get_html(&self, url: &str) -> Result<String, ScraperError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .inspect_err(|e| log::error!("HTTP error: {e:?}"))?;
        log::info!("{} {}", url, response.status());

        Ok(response
            .error_for_status()?
            .text()
            .await
            .inspect_err(|e| log::error!("Decode error: {e:?}"))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Day;
    use std::fs;
    use std::time::Instant;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    #[test]
    fn test_day_result_from_fixture() {
        let html = fs::read_to_string("fixtures/canteen_grill_deli.html")
            .expect("Failed to read fixture");
        let config = &DayConfig::week("http://canteen.example")[0];

        let result = day_result_from_html(config, &html, &ExtractionRules::default())
            .expect("Failed to build day result");

        assert_eq!(result.day, Day::Monday.name());
        assert_eq!(result.url, "http://canteen.example/canteen-monday");
        assert!(!result.timestamp.is_empty());
        assert_eq!(result.locations.len(), 2);
        assert_eq!(result.locations[0].location, "Grill");
        assert_eq!(
            result.locations[0].menu,
            "Cheeseburger with smoked cheddar\nSweet potato fries"
        );
        assert_eq!(result.locations[1].location, "Deli");
        assert_eq!(result.locations[1].menu, "Pastrami on rye");
    }

    #[test]
    fn test_day_result_reports_page_url_on_parse_failure() {
        let config = &DayConfig::week("http://canteen.example")[3];

        let html = "<html><body></body></html>";
        let err = day_result_from_html(config, html, &ExtractionRules::default()).unwrap_err();

        match err {
            ScraperError::ParseError { url, .. } => {
                assert_eq!(url, "http://canteen.example/canteen-thursday")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Answers every request with `html`, reporting each request's path and
    /// User-Agent header.
    async fn serve_menu_pages(
        listener: TcpListener,
        html: String,
        requests: mpsc::UnboundedSender<(String, Option<String>)>,
    ) {
        while let Ok((mut stream, _)) = listener.accept().await {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let request = String::from_utf8_lossy(&request).to_string();
            let path = request
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            let user_agent = request.lines().find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.eq_ignore_ascii_case("user-agent")
                    .then(|| value.trim().to_string())
            });
            let _ = requests.send((path, user_agent));

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                html.len(),
                html
            );
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    }

    #[tokio::test]
    async fn test_scrape_week_sends_user_agent_and_waits_between_days() {
        let html = fs::read_to_string("fixtures/canteen_grill_deli.html")
            .expect("Failed to read fixture");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let server = tokio::spawn(serve_menu_pages(listener, html, tx));

        let delay = Duration::from_millis(200);
        let scraper = WebScraper::new("canteenbot-test/1.0", delay).unwrap();
        let days = DayConfig::week(&base_url);

        let started = Instant::now();
        let scrapes = scraper.scrape_week(&days[..2]).await;
        let elapsed = started.elapsed();
        server.abort();

        assert!(elapsed >= delay, "only {elapsed:?} between two days");
        assert_eq!(scrapes.len(), 2);
        for scrape in &scrapes {
            let result = scrape.result.as_ref().expect("day should parse");
            assert_eq!(result.day, scrape.config.day.name());
            assert_eq!(result.locations.len(), 2);
            assert_eq!(result.locations[0].location, "Grill");
        }

        let user_agent = Some("canteenbot-test/1.0".to_string());
        assert_eq!(
            rx.recv().await,
            Some(("/canteen-monday".to_string(), user_agent.clone()))
        );
        assert_eq!(
            rx.recv().await,
            Some(("/canteen-tuesday".to_string(), user_agent))
        );
    }

    #[tokio::test]
    async fn test_failed_day_does_not_stop_the_week() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let scraper = WebScraper::new(DEFAULT_USER_AGENT, Duration::ZERO).unwrap();
        let days = DayConfig::week(&base_url);

        let scrapes = scraper.scrape_week(&days[..2]).await;

        assert_eq!(scrapes.len(), 2);
        assert_eq!(scrapes[0].config, days[0]);
        assert_eq!(scrapes[1].config, days[1]);
        assert!(scrapes.iter().all(|s| matches!(s.result, Err(ScraperError::HttpError(_)))));
    }
}
