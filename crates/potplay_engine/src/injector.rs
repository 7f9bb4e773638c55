use potplay_core::ControlLabel;
use potplay_logging::{potplay_debug, potplay_info, potplay_warn};
use scraper::Selector;
use thiserror::Error;

use crate::page::PageDom;

/// Toolbar that holds the play button on movie and episode pages.
pub const CONTAINER_SELECTOR: &str = r"div.relative.flex.h-\[54px\].shrink-0.items-center.gap-2";
/// Elements whose title attribute may carry a NAS path.
pub const CANDIDATE_SELECTOR: &str = ".select-text[title]";
pub const CANDIDATE_ATTRIBUTE: &str = "title";
pub const MARKER_ATTRIBUTE: &str = "data-tm-potplay-btn";
pub const MARKER_SELECTOR: &str = r#"[data-tm-potplay-btn="1"]"#;

const CONTROL_STYLE: &str = "height:54px;min-width:120px;padding:0 16px;\
border-radius:9999px;border:1px solid rgba(0,0,0,0.12);\
background:var(--semi-color-primary, #1677ff);color:#fff;font-size:18px;\
line-height:54px;cursor:pointer;display:inline-flex;align-items:center;\
justify-content:center;gap:8px;user-select:none";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectorError {
    #[error("invalid selector {selector}: {reason}")]
    InvalidSelector {
        selector: &'static str,
        reason: String,
    },
}

/// Keeps exactly one marker-bearing control inside the toolbar container.
#[derive(Debug, Clone)]
pub struct ControlInjector {
    container: Selector,
    marker: Selector,
    candidates: Selector,
    markup: String,
}

impl ControlInjector {
    pub fn new() -> Result<Self, InjectorError> {
        Ok(Self {
            container: parse_selector(CONTAINER_SELECTOR)?,
            marker: parse_selector(MARKER_SELECTOR)?,
            candidates: parse_selector(CANDIDATE_SELECTOR)?,
            markup: format!(
                r#"<button type="button" {MARKER_ATTRIBUTE}="1" style="{CONTROL_STYLE}">{}</button>"#,
                ControlLabel::Idle.text()
            ),
        })
    }

    /// Makes sure the control exists. Returns false only when the container
    /// has not been rendered yet.
    pub fn ensure<P: PageDom>(&self, page: &mut P) -> bool {
        let Some(container) = page.query_first(&self.container) else {
            return false;
        };
        if page.contains(container, &self.marker) {
            return true;
        }

        match page.insert_after_first_child(container, &self.markup) {
            Some(_) => {
                potplay_info!("Inserted potplay control");
                true
            }
            None => {
                potplay_warn!("Container found but control insertion failed");
                false
            }
        }
    }

    pub fn is_present<P: PageDom>(&self, page: &P) -> bool {
        page.query_first(&self.marker).is_some()
    }

    /// Title attributes of all candidate elements, in document order.
    pub fn gather_candidates<P: PageDom>(&self, page: &P) -> Vec<String> {
        let titles = page.attribute_values(&self.candidates, CANDIDATE_ATTRIBUTE);
        potplay_debug!("Scanned {} candidate titles", titles.len());
        titles
    }

    pub fn set_label<P: PageDom>(&self, page: &mut P, label: ControlLabel) -> usize {
        page.set_text(&self.marker, label.text())
    }
}

fn parse_selector(selector: &'static str) -> Result<Selector, InjectorError> {
    Selector::parse(selector).map_err(|err| InjectorError::InvalidSelector {
        selector,
        reason: err.to_string(),
    })
}
