use serde_json::Value;
use url::Url;

use crate::window_host::EventResponse;

pub const REFERRER_PARAM: &str = "ref";
pub const REFERRER_VALUE: &str = "bks-app";
pub const SET_WINDOW_TITLE_CHANNEL: &str = "setWindowTitle";

/// Schemes the OS default handler may be asked to open.
pub const EXTERNAL_SCHEMES: [&str; 3] = ["http", "https", "mailto"];

pub fn is_external_scheme(url: &Url) -> bool {
    EXTERNAL_SCHEMES.contains(&url.scheme())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    /// Block in-place navigation and hand the URL to the OS default handler.
    OpenExternally(Url),
    /// Block in-place navigation; the scheme is not handed to the OS.
    Deny,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IpcRequest {
    SetWindowTitle(String),
}

impl IpcRequest {
    pub fn parse(channel: &str, args: &[Value]) -> Option<Self> {
        match channel {
            SET_WINDOW_TITLE_CHANNEL => {
                let title = match args.first() {
                    Some(Value::String(title)) => title.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                Some(IpcRequest::SetWindowTitle(title))
            }
            _ => None,
        }
    }
}

/// Keeps a window pinned to the page it was opened with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationGuard {
    app_url: Url,
}

impl NavigationGuard {
    pub fn new(app_url: Url) -> Self {
        Self { app_url }
    }

    pub fn app_url(&self) -> &Url {
        &self.app_url
    }

    pub fn decide_navigation(&self, target: &Url) -> NavigationDecision {
        if target == &self.app_url {
            return NavigationDecision::Allow;
        }
        if !is_external_scheme(target) {
            return NavigationDecision::Deny;
        }
        NavigationDecision::OpenExternally(with_referrer(target))
    }

    pub fn decide_new_window(&self, target: &Url) -> EventResponse {
        if target == &self.app_url {
            EventResponse::Proceed
        } else {
            EventResponse::Prevent
        }
    }
}

pub fn with_referrer(target: &Url) -> Url {
    let mut marked = target.clone();
    marked
        .query_pairs_mut()
        .append_pair(REFERRER_PARAM, REFERRER_VALUE);
    marked
}
