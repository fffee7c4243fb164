/// Navigation interception: show info pages instead of following short links
use crate::endpoint::ServiceEndpoint;
use crate::preferences::Preferences;
use std::collections::HashSet;

/// Browser tab identifier
pub type TabId = i32;

/// Tabs currently showing an info page
///
/// A tab in the set gets its next service navigation through untouched, so
/// links on the info page itself are not intercepted again.
#[derive(Debug, Clone, Default)]
pub struct InterceptedTabSet {
    tabs: HashSet<TabId>,
}

impl InterceptedTabSet {
    pub fn new() -> Self {
        InterceptedTabSet::default()
    }

    pub fn insert(&mut self, tab: TabId) -> bool {
        self.tabs.insert(tab)
    }

    pub fn remove(&mut self, tab: TabId) -> bool {
        self.tabs.remove(&tab)
    }

    pub fn contains(&self, tab: TabId) -> bool {
        self.tabs.contains(&tab)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }
}

/// Outcome of checking a navigation to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Redirect(String),
    Allow(AllowReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    InfoDisabled,
    ServiceRoot,
    ReservedPath,
    AlreadyIntercepted,
    /// Target is not on the service at all
    Foreign,
}

impl NavigationDecision {
    pub fn redirect_url(self) -> Option<String> {
        match self {
            NavigationDecision::Redirect(url) => Some(url),
            NavigationDecision::Allow(_) => None,
        }
    }
}

/// Decide whether a navigation in `tab` to `target` goes to the info page
///
/// Consumes the tab's entry in `intercepted` when it is the reason to allow.
pub fn decide(
    prefs: &Preferences,
    endpoint: &ServiceEndpoint,
    intercepted: &mut InterceptedTabSet,
    tab: TabId,
    target: &str,
) -> NavigationDecision {
    if !prefs.show_info {
        return NavigationDecision::Allow(AllowReason::InfoDisabled);
    }
    if endpoint.is_root(target) {
        return NavigationDecision::Allow(AllowReason::ServiceRoot);
    }
    if endpoint.is_reserved(target) {
        return NavigationDecision::Allow(AllowReason::ReservedPath);
    }
    if intercepted.remove(tab) {
        return NavigationDecision::Allow(AllowReason::AlreadyIntercepted);
    }

    match endpoint.info_url(target) {
        Some(url) => NavigationDecision::Redirect(url),
        None => NavigationDecision::Allow(AllowReason::Foreign),
    }
}

/// Remember tabs that finished loading an info page
pub fn observe_tab_url(
    endpoint: &ServiceEndpoint,
    intercepted: &mut InterceptedTabSet,
    tab: TabId,
    url: &str,
) -> bool {
    endpoint.is_info_page(url) && intercepted.insert(tab)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHORT: &str = "http://urly.fi/abc123";

    fn setup() -> (Preferences, ServiceEndpoint, InterceptedTabSet) {
        (
            Preferences::default(),
            ServiceEndpoint::urly().unwrap(),
            InterceptedTabSet::new(),
        )
    }

    #[test]
    fn test_redirects_short_link_to_info_page() {
        let (prefs, endpoint, mut tabs) = setup();

        assert_eq!(
            decide(&prefs, &endpoint, &mut tabs, 1, SHORT),
            NavigationDecision::Redirect("http://urly.fi/info/abc123".to_string())
        );
    }

    #[test]
    fn test_info_disabled_allows() {
        let (mut prefs, endpoint, mut tabs) = setup();
        prefs.show_info = false;

        assert_eq!(
            decide(&prefs, &endpoint, &mut tabs, 1, SHORT),
            NavigationDecision::Allow(AllowReason::InfoDisabled)
        );
    }

    #[test]
    fn test_service_root_allows() {
        let (prefs, endpoint, mut tabs) = setup();

        assert_eq!(
            decide(&prefs, &endpoint, &mut tabs, 1, "http://urly.fi/"),
            NavigationDecision::Allow(AllowReason::ServiceRoot)
        );
    }

    #[test]
    fn test_reserved_paths_allow() {
        let (prefs, endpoint, mut tabs) = setup();

        for target in ["http://urly.fi/info/abc123", "http://urly.fi/static/logo.png"] {
            assert_eq!(
                decide(&prefs, &endpoint, &mut tabs, 1, target),
                NavigationDecision::Allow(AllowReason::ReservedPath),
                "{}",
                target
            );
        }
    }

    #[test]
    fn test_intercepted_tab_is_allowed_once() {
        let (prefs, endpoint, mut tabs) = setup();
        tabs.insert(7);

        assert_eq!(
            decide(&prefs, &endpoint, &mut tabs, 7, SHORT),
            NavigationDecision::Allow(AllowReason::AlreadyIntercepted)
        );
        assert!(!tabs.contains(7));
        assert!(!tabs.remove(7));

        assert_eq!(
            decide(&prefs, &endpoint, &mut tabs, 7, SHORT),
            NavigationDecision::Redirect("http://urly.fi/info/abc123".to_string())
        );
    }

    #[test]
    fn test_other_tabs_keep_their_entry() {
        let (prefs, endpoint, mut tabs) = setup();
        tabs.insert(7);

        assert!(matches!(
            decide(&prefs, &endpoint, &mut tabs, 8, SHORT),
            NavigationDecision::Redirect(_)
        ));
        assert!(tabs.contains(7));
    }

    #[test]
    fn test_earlier_conditions_do_not_consume_entry() {
        let (mut prefs, endpoint, mut tabs) = setup();
        prefs.show_info = false;
        tabs.insert(7);

        decide(&prefs, &endpoint, &mut tabs, 7, SHORT);

        assert!(tabs.contains(7));
    }

    #[test]
    fn test_observe_tab_url_registers_info_pages_once() {
        let (_, endpoint, mut tabs) = setup();

        assert!(observe_tab_url(&endpoint, &mut tabs, 3, "http://urly.fi/info/abc123"));
        assert!(!observe_tab_url(&endpoint, &mut tabs, 3, "http://urly.fi/info/abc123"));
        assert!(!observe_tab_url(&endpoint, &mut tabs, 4, "http://example.com/"));

        assert_eq!(tabs.len(), 1);
        assert!(tabs.contains(3));
    }
}
