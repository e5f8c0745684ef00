//! Headless Chrome session
//!
//! Drives one Chrome page over the DevTools protocol.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{DispatchKeyEventParams, DispatchKeyEventType};
use chromiumoxide::cdp::browser_protocol::network;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::js_protocol::runtime::{self, EvaluateParams};
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Element, Page};
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::browser::bridge;
use crate::browser::observers;
use crate::browser::session::{release, Session};
use crate::browser::wait::WaitPolicy;
use crate::core::{Config, Result, ShotError};
use crate::stubs::StubCatalog;

/// Evaluation parameters for an expression whose promise, if any, is awaited
pub(crate) fn expression(script: String) -> Result<EvaluateParams> {
    EvaluateParams::builder()
        .expression(script)
        .await_promise(true)
        .build()
        .map_err(ShotError::browser)
}

/// Windows virtual key code for the keys scenarios press
fn virtual_key_code(key: &str) -> Option<i64> {
    match key {
        "Escape" => Some(27),
        "Enter" => Some(13),
        "Tab" => Some(9),
        "Backspace" => Some(8),
        " " | "Space" => Some(32),
        _ => None,
    }
}

/// A browser process with one page
pub struct ChromeSession {
    browser: Option<Browser>,
    page: Option<Page>,
    handler: Option<JoinHandle<()>>,
    tasks: Vec<JoinHandle<()>>,
    output_dir: PathBuf,
    store_expression: String,
    wait: WaitPolicy,
}

impl ChromeSession {
    /// Start the browser with the configured viewport and open a blank page
    pub async fn launch(config: &Config) -> Result<Self> {
        let settings = &config.browser;
        let viewport = Viewport {
            width: settings.viewport_width,
            height: settings.viewport_height,
            ..Viewport::default()
        };

        let mut builder = BrowserConfig::builder()
            .window_size(settings.viewport_width, settings.viewport_height)
            .viewport(viewport);
        if settings.headed {
            builder = builder.with_head();
        }
        if settings.no_sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(executable) = &settings.executable {
            builder = builder.chrome_executable(executable);
        }
        let browser_config = builder.build().map_err(ShotError::launch)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| ShotError::launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler: {}", e);
                }
            }
        });

        info!(
            "Browser started ({}x{})",
            settings.viewport_width, settings.viewport_height
        );

        let mut session = Self {
            browser: Some(browser),
            page: None,
            handler: Some(handler),
            tasks: Vec::new(),
            output_dir: config.capture.output_dir.clone(),
            store_expression: config.ui.store_expression.clone(),
            wait: WaitPolicy::new(config.wait_timeout(), config.poll_interval()),
        };

        // A half-built session still owns the browser process
        if let Err(e) = session.open_page().await {
            release(&mut session).await;
            return Err(e);
        }

        Ok(session)
    }

    async fn open_page(&mut self) -> Result<()> {
        let browser = self
            .browser
            .as_ref()
            .ok_or_else(|| ShotError::browser("Browser is not running"))?;
        let page = browser.new_page("about:blank").await?;

        page.execute(runtime::EnableParams::default()).await?;
        page.execute(network::EnableParams::default()).await?;
        self.tasks
            .extend(observers::spawn_page_observers(&page).await?);

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page> {
        self.page
            .as_ref()
            .ok_or_else(|| ShotError::browser("Page is closed"))
    }

    async fn evaluate(&self, script: String) -> Result<()> {
        self.page()?.evaluate_expression(expression(script)?).await?;
        Ok(())
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<Element> {
        let page = self.page()?;
        let target = format!("element '{}'", selector);
        let selector = selector.to_string();
        self.wait
            .until(&target, move || page.find_element(selector.clone()))
            .await
    }

    async fn wait_for_button(&self, text: &str) -> Result<Element> {
        let page = self.page()?;
        let target = format!("button '{}'", text);
        let xpath = bridge::button_xpath(text);
        self.wait
            .until(&target, move || page.find_xpath(xpath.clone()))
            .await
    }

    async fn key_event(&self, kind: DispatchKeyEventType, key: &str) -> Result<()> {
        let mut builder = DispatchKeyEventParams::builder()
            .r#type(kind)
            .key(key)
            .code(key);
        if let Some(code) = virtual_key_code(key) {
            builder = builder
                .windows_virtual_key_code(code)
                .native_virtual_key_code(code);
        }
        let params = builder.build().map_err(ShotError::browser)?;
        self.page()?.execute(params).await?;
        Ok(())
    }
}

#[async_trait]
impl Session for ChromeSession {
    async fn install_stubs(&mut self, catalog: Arc<StubCatalog>) -> Result<()> {
        let count = catalog.len();
        let task = observers::spawn_stub_dispatcher(self.page()?, catalog).await?;
        self.tasks.push(task);
        debug!("Registered {} stubs", count);
        Ok(())
    }

    async fn navigate(&mut self, entry: &Path) -> Result<()> {
        let entry = tokio::fs::canonicalize(entry)
            .await
            .map_err(|_| ShotError::BundleNotFound(entry.to_path_buf()))?;
        let url = Url::from_file_path(&entry).map_err(|_| {
            ShotError::browser(format!("Cannot form a file URL from {}", entry.display()))
        })?;

        info!("Loading {}", url);
        let page = self.page()?;
        page.goto(url.as_str()).await?;
        page.wait_for_navigation().await?;
        Ok(())
    }

    async fn add_style(&mut self, css: &str) -> Result<()> {
        self.evaluate(bridge::style_script(css)).await
    }

    async fn click_button(&mut self, text: &str) -> Result<()> {
        let button = self.wait_for_button(text).await?;
        button.click().await?;
        Ok(())
    }

    async fn type_into(&mut self, selector: &str, text: &str) -> Result<()> {
        let field = self.wait_for_selector(selector).await?;
        field.click().await?;
        field.type_str(text).await?;
        Ok(())
    }

    async fn press_key(&mut self, key: &str) -> Result<()> {
        self.key_event(DispatchKeyEventType::KeyDown, key).await?;
        self.key_event(DispatchKeyEventType::KeyUp, key).await
    }

    async fn pause(&mut self, duration: Duration) -> Result<()> {
        tokio::time::sleep(duration).await;
        Ok(())
    }

    async fn capture(&mut self, name: &str, region: Option<&str>) -> Result<PathBuf> {
        let bytes = match region {
            None => {
                let params = ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .build();
                self.page()?.screenshot(params).await?
            }
            Some(selector) => {
                let element = self.wait_for_selector(selector).await?;
                element.screenshot(CaptureScreenshotFormat::Png).await?
            }
        };

        let path = self.output_dir.join(format!("{}.png", name));
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            ShotError::with_context(format!("Failed to write {}", path.display()), e)
        })?;
        Ok(path)
    }

    async fn dispatch(&mut self, action: &str, args: &[Value]) -> Result<()> {
        self.evaluate(bridge::commit_script(&self.store_expression, action, args))
            .await
    }

    async fn shutdown(&mut self) -> Result<()> {
        for task in self.tasks.drain(..) {
            task.abort();
        }

        let mut first_error: Option<ShotError> = None;

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                warn!("Failed to close page: {}", e);
                first_error.get_or_insert(e.into());
            }
        }

        if let Some(mut browser) = self.browser.take() {
            if let Err(e) = browser.close().await {
                warn!("Failed to close browser: {}", e);
                first_error.get_or_insert(e.into());
            }
            if let Err(e) = browser.wait().await {
                warn!("Failed to reap browser process: {}", e);
                first_error.get_or_insert(e.into());
            }
            debug!("Browser closed");
        }

        if let Some(handler) = self.handler.take() {
            handler.abort();
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for ChromeSession {
    fn drop(&mut self) {
        for task in self.tasks.drain(..) {
            task.abort();
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}
