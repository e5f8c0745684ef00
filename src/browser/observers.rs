//! Page event forwarding
//!
//! Console output, uncaught errors and failed requests go to the log; stub
//! calls arriving through the binding are answered from the catalog. None of
//! these tasks can stop a run.

use std::collections::HashMap;
use std::sync::Arc;

use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
};
use chromiumoxide::cdp::browser_protocol::page::AddScriptToEvaluateOnNewDocumentParams;
use chromiumoxide::cdp::js_protocol::runtime::{
    AddBindingParams, ConsoleApiCalledType, EventBindingCalled, EventConsoleApiCalled,
    EventExceptionThrown, ExceptionDetails,
};
use chromiumoxide::Page;
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::browser::bridge::{self, StubCall};
use crate::browser::chrome::expression;
use crate::core::logging::PAGE_TARGET;
use crate::core::Result;
use crate::stubs::StubCatalog;

/// Spawn the console, exception and network observers
pub(crate) async fn spawn_page_observers(page: &Page) -> Result<Vec<JoinHandle<()>>> {
    let mut console = page.event_listener::<EventConsoleApiCalled>().await?;
    let mut exceptions = page.event_listener::<EventExceptionThrown>().await?;
    let mut requests = page.event_listener::<EventRequestWillBeSent>().await?;
    let mut finished = page.event_listener::<EventLoadingFinished>().await?;
    let mut failures = page.event_listener::<EventLoadingFailed>().await?;

    let console_task = tokio::spawn(async move {
        while let Some(event) = console.next().await {
            let text = event
                .args
                .iter()
                .map(|arg| render_value(arg.value.as_ref(), arg.description.as_deref()))
                .collect::<Vec<_>>()
                .join(" ");

            match event.r#type {
                ConsoleApiCalledType::Error | ConsoleApiCalledType::Assert => {
                    error!(target: PAGE_TARGET, "{}", text)
                }
                ConsoleApiCalledType::Warning => warn!(target: PAGE_TARGET, "{}", text),
                ConsoleApiCalledType::Debug => debug!(target: PAGE_TARGET, "{}", text),
                _ => info!(target: PAGE_TARGET, "{}", text),
            }
        }
    });

    let exception_task = tokio::spawn(async move {
        while let Some(event) = exceptions.next().await {
            error!(target: PAGE_TARGET, "{}", exception_text(&event.exception_details));
        }
    });

    // Requests are drained first so a failure queued alongside its request
    // still finds the URL
    let network_task = tokio::spawn(async move {
        let mut inflight = InFlightRequests::default();
        loop {
            tokio::select! {
                biased;
                Some(sent) = requests.next() => {
                    inflight.sent(sent.request_id.inner(), &sent.request.url);
                }
                Some(done) = finished.next() => {
                    inflight.finished(done.request_id.inner());
                }
                Some(failed) = failures.next() => {
                    let line = inflight.failed(failed.request_id.inner(), &failed.error_text);
                    error!(target: PAGE_TARGET, "{}", line);
                }
                else => break,
            }
        }
    });

    Ok(vec![console_task, exception_task, network_task])
}

/// Register the binding and page globals for `catalog`, then answer calls
/// until the page goes away
pub(crate) async fn spawn_stub_dispatcher(
    page: &Page,
    catalog: Arc<StubCatalog>,
) -> Result<JoinHandle<()>> {
    page.execute(AddBindingParams::new(bridge::BINDING_NAME))
        .await?;
    let mut calls = page.event_listener::<EventBindingCalled>().await?;
    page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
        bridge::stub_bootstrap(catalog.names())?,
    ))
    .await?;

    let page = page.clone();
    Ok(tokio::spawn(async move {
        while let Some(event) = calls.next().await {
            if event.name != bridge::BINDING_NAME {
                continue;
            }

            let call: StubCall = match serde_json::from_str(&event.payload) {
                Ok(call) => call,
                Err(e) => {
                    warn!(target: PAGE_TARGET, "Malformed stub call {}: {}", event.payload, e);
                    continue;
                }
            };

            let outcome = catalog.call(&call.name, &call.args);
            match &outcome {
                Ok(_) => debug!("Stub {} answered call #{}", call.name, call.id),
                Err(e) => warn!(target: PAGE_TARGET, "Stub {} rejected: {}", call.name, e),
            }

            let settle = match expression(bridge::resolve_script(call.id, &outcome)) {
                Ok(params) => page.evaluate_expression(params).await.map(|_| ()),
                Err(e) => {
                    warn!("Could not build reply for {}: {}", call.name, e);
                    continue;
                }
            };
            if let Err(e) = settle {
                warn!("Could not deliver {} reply: {}", call.name, e);
            }
        }
    }))
}

/// URLs of requests still in flight, keyed by request id. Failure events
/// carry no URL, so it is remembered from the request.
#[derive(Debug, Default)]
pub(crate) struct InFlightRequests {
    urls: HashMap<String, String>,
}

impl InFlightRequests {
    pub(crate) fn sent(&mut self, id: &str, url: &str) {
        self.urls.insert(id.to_string(), url.to_string());
    }

    pub(crate) fn finished(&mut self, id: &str) {
        self.urls.remove(id);
    }

    /// Log line for a failed request: the reason, then the URL
    pub(crate) fn failed(&mut self, id: &str, reason: &str) -> String {
        let url = self
            .urls
            .remove(id)
            .unwrap_or_else(|| "<unknown url>".to_string());
        format!("{} {}", reason, url)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.urls.len()
    }
}

/// Console text for one argument: strings bare, other values as JSON, and
/// objects by their description
pub(crate) fn render_value(value: Option<&Value>, description: Option<&str>) -> String {
    match (value, description) {
        (Some(Value::String(s)), _) => s.clone(),
        (Some(v), _) => v.to_string(),
        (None, Some(d)) => d.to_string(),
        (None, None) => "undefined".to_string(),
    }
}

fn exception_text(details: &ExceptionDetails) -> String {
    details
        .exception
        .as_ref()
        .and_then(|e| e.description.clone())
        .unwrap_or_else(|| details.text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failed_request_names_its_url() {
        let mut inflight = InFlightRequests::default();
        inflight.sent("7", "file:///bundle/fonts/missing.woff2");
        inflight.sent("8", "file:///bundle/app.js");

        assert_eq!(
            inflight.failed("7", "net::ERR_FILE_NOT_FOUND"),
            "net::ERR_FILE_NOT_FOUND file:///bundle/fonts/missing.woff2"
        );
        assert_eq!(
            inflight.failed("99", "net::ERR_ABORTED"),
            "net::ERR_ABORTED <unknown url>"
        );
    }

    #[test]
    fn test_finished_requests_are_forgotten() {
        let mut inflight = InFlightRequests::default();
        inflight.sent("1", "file:///bundle/index.html");
        inflight.sent("2", "file:///bundle/app.js");
        inflight.finished("1");
        assert_eq!(inflight.len(), 1);

        inflight.failed("2", "net::ERR_FAILED");
        assert_eq!(inflight.len(), 0);
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(Some(&json!("ready")), None), "ready");
        assert_eq!(render_value(Some(&json!(3)), None), "3");
        assert_eq!(render_value(Some(&json!({"a": 1})), None), r#"{"a":1}"#);
        assert_eq!(render_value(None, Some("HTMLDivElement")), "HTMLDivElement");
        assert_eq!(render_value(None, None), "undefined");
    }
}
