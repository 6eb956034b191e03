#![forbid(unsafe_code)]

//! WASM front end for the portfolio page.
//!
//! Binds `folio-core` to the live document: scans the markup into a
//! `PageInventory`, forwards DOM events as `PageEvent`s, measures layout
//! through `LayoutProbe`, and applies the returned effects with `web-sys`.
//! Deferred reactions run on a single `setTimeout` re-armed at the page's
//! next deadline; scroll tracking rides `requestAnimationFrame`.

pub mod logging;
pub mod options;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::PortfolioWeb;

pub use options::{OptionsError, Selectors, WebOptions};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PortfolioWeb {
    options: Option<WebOptions>,
}

#[cfg(not(target_arch = "wasm32"))]
impl PortfolioWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { options: None }
    }

    /// Validate options without a document to bind to.
    pub fn init(&mut self, options_json: Option<&str>) -> Result<(), OptionsError> {
        self.options = Some(WebOptions::from_json_str(options_json.unwrap_or_default())?);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.options.is_some()
    }

    pub fn destroy(&mut self) {
        self.options = None;
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn stub_validates_options() {
        let mut web = PortfolioWeb::new();
        assert!(web.init(Some(r#"{"typography":{"debounce_ms":0}}"#)).is_err());
        assert!(!web.is_initialized());
        web.init(None).unwrap();
        assert!(web.is_initialized());
        web.destroy();
        assert!(!web.is_initialized());
    }
}
