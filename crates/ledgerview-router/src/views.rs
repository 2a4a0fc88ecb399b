//! Page views and the loaders that produce them
//!
//! A view is an HTML fragment with `{{param}}` placeholders. Eager views are
//! built when the route table is declared; deferred views come from a
//! [`ViewFactory`] the first time their route is visited.

use crate::Params;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// A renderable page view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    /// Component name, e.g. `LedgerView`
    pub name: String,
    /// Page title
    pub title: String,
    /// HTML fragment with `{{param}}` placeholders
    pub template: String,
}

impl View {
    pub fn new(name: impl Into<String>, title: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            template: template.into(),
        }
    }

    /// Render the template with HTML-escaped parameter values
    ///
    /// Placeholders are substituted in a single pass over the template, so
    /// substituted values are never scanned again. Unknown placeholders are
    /// left in place.
    pub fn render(&self, params: &Params) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();

        while let Some(start) = rest.find("{{") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find("}}") else {
                out.push_str(&rest[start..]);
                rest = "";
                break;
            };

            let key = &after[..end];
            match params.get(key) {
                Some(value) => out.push_str(&escape_html(value)),
                None => out.push_str(&rest[start..start + end + 4]),
            }
            rest = &after[end + 2..];
        }

        out.push_str(rest);
        out
    }
}

/// Escape text for inclusion in HTML
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Factory for deferred views
#[async_trait]
pub trait ViewFactory: Send + Sync {
    /// Produce the view; errors become `RouterError::ViewLoad`
    async fn load(&self) -> Result<View, String>;
}

/// How a route slot obtains its view
#[derive(Clone)]
pub enum ViewLoader {
    /// View available at declaration time
    Eager(Arc<View>),
    /// View produced on first navigation, then cached
    Deferred(Arc<dyn ViewFactory>),
}

impl ViewLoader {
    pub fn eager(view: View) -> Self {
        ViewLoader::Eager(Arc::new(view))
    }

    pub fn deferred(factory: impl ViewFactory + 'static) -> Self {
        ViewLoader::Deferred(Arc::new(factory))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, ViewLoader::Deferred(_))
    }

    /// Load mode label
    pub fn mode(&self) -> &'static str {
        match self {
            ViewLoader::Eager(_) => "eager",
            ViewLoader::Deferred(_) => "deferred",
        }
    }
}

impl std::fmt::Debug for ViewLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewLoader::Eager(view) => f.debug_tuple("Eager").field(&view.name).finish(),
            ViewLoader::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

// ==================== Built-in Views ====================

pub fn home_view() -> View {
    View::new(
        "HomeView",
        "Ledgers",
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Ledgers</h2></div>
<div class='bg-white rounded-xl shadow-sm p-6'>
    <p class='text-gray-600'>Select a ledger to browse its accounts.</p>
</div>"#,
    )
}

pub fn ledger_view() -> View {
    View::new(
        "LedgerView",
        "Ledger",
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Ledger {{ledger_id}}</h2></div>
<div class='bg-white rounded-xl shadow-sm p-6' data-ledger='{{ledger_id}}'>
    <p class='text-gray-600'>Accounts in ledger {{ledger_id}}.</p>
</div>"#,
    )
}

pub fn account_view() -> View {
    View::new(
        "AccountView",
        "Account register",
        r#"<div class='mb-6'><h2 class='text-2xl font-bold'>Account {{account_id}}</h2>
    <p class='text-sm text-gray-500'>Ledger {{ledger_id}}</p></div>
<div class='bg-white rounded-xl shadow-sm p-6' data-ledger='{{ledger_id}}' data-account='{{account_id}}'>
    <p class='text-gray-600'>Register entries for account {{account_id}}.</p>
</div>"#,
    )
}

/// Deferred factory that hands out a compiled-in view
pub struct BuiltinViewFactory {
    build: fn() -> View,
}

impl BuiltinViewFactory {
    pub fn new(build: fn() -> View) -> Self {
        Self { build }
    }
}

#[async_trait]
impl ViewFactory for BuiltinViewFactory {
    async fn load(&self) -> Result<View, String> {
        Ok((self.build)())
    }
}

/// Deferred factory reading `<dir>/<name>.html` from disk
#[derive(Debug, Clone)]
pub struct FileViewFactory {
    name: String,
    title: String,
    path: PathBuf,
}

impl FileViewFactory {
    pub fn new(dir: impl Into<PathBuf>, name: &str, title: &str) -> Self {
        let path = dir.into().join(format!("{}.html", name));
        Self {
            name: name.to_string(),
            title: title.to_string(),
            path,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl ViewFactory for FileViewFactory {
    async fn load(&self) -> Result<View, String> {
        log::debug!("Reading view template {}", self.path.display());
        let template = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| format!("{}: {}", self.path.display(), e))?;
        Ok(View::new(self.name.clone(), self.title.clone(), template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_render_substitutes_params() {
        let html = account_view().render(&params(&[("ledger_id", "42"), ("account_id", "7")]));
        assert!(html.contains("Account 7"));
        assert!(html.contains("Ledger 42"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn test_render_escapes_values() {
        let html = ledger_view().render(&params(&[("ledger_id", "<b>&")]));
        assert!(html.contains("Ledger &lt;b&gt;&amp;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_render_does_not_expand_substituted_values() {
        let html = account_view().render(&params(&[("ledger_id", "42"), ("account_id", "{{ledger_id}}")]));
        assert!(html.contains("Account {{ledger_id}}"));
        assert!(html.contains("Ledger 42"));
        assert!(!html.contains("Account 42"));
    }

    #[test]
    fn test_render_keeps_unknown_and_unclosed_placeholders() {
        let view = View::new("Sample", "Sample", "<p>{{ledger_id}} {{other}} {{open</p>");
        assert_eq!(
            view.render(&params(&[("ledger_id", "3")])),
            "<p>3 {{other}} {{open</p>"
        );
    }

    #[test]
    fn test_loader_mode() {
        assert_eq!(ViewLoader::eager(home_view()).mode(), "eager");
        let deferred = ViewLoader::deferred(BuiltinViewFactory::new(ledger_view));
        assert!(deferred.is_deferred());
        assert_eq!(format!("{:?}", deferred), "Deferred(..)");
    }

    #[tokio::test]
    async fn test_file_factory_reads_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("LedgerView.html"), "<p>{{ledger_id}}</p>").unwrap();

        let factory = FileViewFactory::new(dir.path(), "LedgerView", "Ledger");
        let view = factory.load().await.unwrap();
        assert_eq!(view.name, "LedgerView");
        assert_eq!(view.render(&params(&[("ledger_id", "9")])), "<p>9</p>");
    }

    #[tokio::test]
    async fn test_file_factory_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let factory = FileViewFactory::new(dir.path(), "AccountView", "Account register");
        let err = factory.load().await.unwrap_err();
        assert!(err.contains("AccountView.html"));
    }
}
