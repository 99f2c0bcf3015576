pub(crate) const WINDOW_TITLE: &str = "Studio";
pub(crate) const WINDOW_LABEL_PREFIX: &str = "window-";
pub(crate) const BLANK_PAGE_URL: &str = "about:blank";
pub(crate) const DEFAULT_RELATIVE_TIME_LOCALE: &str = "en";
pub(crate) const URL_ARG: &str = "--url";
