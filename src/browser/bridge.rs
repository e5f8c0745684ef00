//! Page-side scripts
//!
//! Everything evaluated inside the page is built here, so the controller
//! never hands raw page state to the driver. Values cross the boundary as
//! JSON literals.

use serde::Deserialize;
use serde_json::Value;

use crate::core::Result;

/// Name of the DevTools binding that carries stub calls out of the page
pub const BINDING_NAME: &str = "__uishotsBridge";

/// Page function settling a pending stub call
pub const RESOLVER_NAME: &str = "__uishotsResolve";

/// Style rule freezing transitions, animations and the caret
pub const DISABLE_ANIMATIONS_CSS: &str = "*,
*::after,
*::before {
    transition-delay: 0s !important;
    transition-duration: 0s !important;
    animation-delay: -0.0001s !important;
    animation-duration: 0s !important;
    animation-play-state: paused !important;
    caret-color: transparent !important;
    color-adjust: exact !important;
}";

/// A stub call as sent through the binding
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StubCall {
    pub name: String,
    pub id: u64,
    #[serde(default)]
    pub args: Vec<Value>,
}

/// Script defining one promise-returning global per stub name. Installed
/// before any page script runs.
pub fn stub_bootstrap<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<String> {
    let names: Vec<&str> = names.into_iter().collect();
    let names = serde_json::to_string(&names)?;

    Ok(format!(
        r#"(() => {{
  const pending = new Map();
  let seq = 0;
  Object.defineProperty(window, '{resolver}', {{
    value: (id, ok, payload) => {{
      const call = pending.get(id);
      if (!call) return;
      pending.delete(id);
      if (ok) call.resolve(payload); else call.reject(new Error(payload));
    }},
  }});
  for (const name of {names}) {{
    window[name] = (...args) => new Promise((resolve, reject) => {{
      const id = ++seq;
      pending.set(id, {{ resolve, reject }});
      window['{binding}'](JSON.stringify({{ name, id, args }}));
    }});
  }}
}})();"#,
        resolver = RESOLVER_NAME,
        binding = BINDING_NAME,
        names = names,
    ))
}

/// Script settling stub call `id` with the catalog's answer
pub fn resolve_script(id: u64, outcome: &Result<Value>) -> String {
    let (ok, payload) = match outcome {
        Ok(value) => (true, value.to_string()),
        Err(e) => (false, Value::String(e.to_string()).to_string()),
    };
    format!("window.{}({}, {}, {})", RESOLVER_NAME, id, ok, payload)
}

/// Script applying one named mutation to the UI's state store
pub fn commit_script(store_expression: &str, action: &str, args: &[Value]) -> String {
    let action = Value::String(action.to_string());
    let args = Value::Array(args.to_vec());
    format!(
        r#"(() => {{
  const store = {store};
  if (!store || typeof store.commit !== 'function') {{
    throw new Error('state store is not reachable');
  }}
  store.commit({action}, ...{args});
}})()"#,
        store = store_expression,
        action = action,
        args = args,
    )
}

/// Script appending a style element to the document head
pub fn style_script(css: &str) -> String {
    let css = Value::String(css.to_string());
    format!(
        r#"(() => {{
  const style = document.createElement('style');
  style.textContent = {css};
  document.head.appendChild(style);
}})()"#,
        css = css,
    )
}

/// XPath of a button whose label span contains `text`
pub fn button_xpath(text: &str) -> String {
    format!("//button[contains(span, {})]", xpath_literal(text))
}

/// Quote `text` as an XPath string literal. XPath 1.0 has no escapes, so
/// text holding both quote kinds is split with `concat()`.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }

    let parts: Vec<String> = text
        .split('\'')
        .map(|part| format!("'{}'", part))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ShotError;
    use serde_json::json;

    #[test]
    fn test_bootstrap_lists_every_name() {
        let script = stub_bootstrap(["getTabs", "playSound"]).unwrap();
        assert!(script.contains(r#"["getTabs","playSound"]"#));
        assert!(script.contains(BINDING_NAME));
        assert!(script.contains(RESOLVER_NAME));
    }

    #[test]
    fn test_resolve_script() {
        let ok = resolve_script(3, &Ok(json!({"id": 1})));
        assert_eq!(ok, r#"window.__uishotsResolve(3, true, {"id":1})"#);

        let err = resolve_script(4, &Err(ShotError::UnknownStub("nope".into())));
        assert_eq!(
            err,
            r#"window.__uishotsResolve(4, false, "Unknown stub 'nope'")"#
        );
    }

    #[test]
    fn test_commit_script_spreads_args() {
        let script = commit_script("window.store", "setDarkTheme", &[json!(false)]);
        assert!(script.contains("const store = window.store;"));
        assert!(script.contains(r#"store.commit("setDarkTheme", ...[false]);"#));
    }

    #[test]
    fn test_style_script_escapes_css() {
        let script = style_script("a { content: \"x\" }");
        assert!(script.contains(r#"style.textContent = "a { content: \"x\" }";"#));
    }

    #[test]
    fn test_xpath_literals() {
        assert_eq!(xpath_literal("Settings"), "'Settings'");
        assert_eq!(xpath_literal("Don't"), "\"Don't\"");
        assert_eq!(
            xpath_literal(r#"a'b"c"#),
            r#"concat('a', "'", 'b"c')"#
        );
        assert_eq!(
            button_xpath("Help"),
            "//button[contains(span, 'Help')]"
        );
    }
}
