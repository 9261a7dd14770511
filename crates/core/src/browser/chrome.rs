//! Headless Chromium driven over the DevTools protocol

use super::{BrowserLauncher, LaunchOptions, PageSession, Probe};
use crate::error::BrowserError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::handler::viewport::Viewport as CdpViewport;
use chromiumoxide::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Launches one headless Chromium process per call
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeLauncher;

impl ChromeLauncher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self, options: &LaunchOptions) -> Result<Box<dyn PageSession>, BrowserError> {
        let viewport = CdpViewport {
            width: options.viewport.width,
            height: options.viewport.height,
            ..Default::default()
        };

        let mut builder = BrowserConfig::builder()
            .window_size(options.viewport.width, options.viewport.height)
            .viewport(viewport);
        if let Some(ref exe) = options.executable {
            builder = builder.chrome_executable(exe);
        }
        let config = builder.build().map_err(BrowserError::Launch)?;

        let (mut browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        // The CDP handler must be polled for the browser to make progress.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = match open_page(&browser, &options.user_agent).await {
            Ok(page) => page,
            Err(e) => {
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler_task.abort();
                return Err(e);
            }
        };

        tracing::debug!("launched headless browser");
        Ok(Box::new(ChromeSession {
            browser,
            page,
            handler_task,
        }))
    }
}

async fn open_page(browser: &Browser, user_agent: &str) -> Result<Page, BrowserError> {
    let page = browser
        .new_page("about:blank")
        .await
        .map_err(|e| BrowserError::Launch(e.to_string()))?;
    page.set_user_agent(user_agent.to_string())
        .await
        .map_err(|e| BrowserError::Launch(e.to_string()))?;
    Ok(page)
}

struct ChromeSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
}

#[async_trait]
impl PageSession for ChromeSession {
    // `goto` resolves on the load event; network idle is approximated by the
    // settle time the auditor sleeps afterwards.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<(), BrowserError> {
        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            }),
            Err(_) => Err(BrowserError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.page
            .content()
            .await
            .map_err(|e| BrowserError::Content(e.to_string()))
    }

    async fn evaluate(&mut self, probe: Probe) -> Result<serde_json::Value, BrowserError> {
        let params = EvaluateParams::builder()
            .expression(probe.script())
            .await_promise(true)
            .return_by_value(true)
            .build()
            .map_err(BrowserError::Evaluation)?;

        let result = self
            .page
            .evaluate_expression(params)
            .await
            .map_err(|e| BrowserError::Evaluation(format!("{}: {}", probe.name(), e)))?;

        result
            .into_value::<serde_json::Value>()
            .map_err(|e| BrowserError::Evaluation(format!("{}: {}", probe.name(), e)))
    }

    async fn close(mut self: Box<Self>) -> Result<(), BrowserError> {
        let closed = self
            .browser
            .close()
            .await
            .map(|_| ())
            .map_err(|e| BrowserError::Close(e.to_string()));
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        closed
    }
}
