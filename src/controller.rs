//! Interaction controller: pure state machine behind the background page.
//!
//! Platform triggers and completed work come in as [`Msg`]s; everything the
//! browser should do comes out as [`Effect`]s. The background runtime is the
//! only place effects are executed.
use crate::endpoint::ServiceEndpoint;
use crate::interception::{self, InterceptedTabSet, NavigationDecision, TabId};
use crate::menu::MenuContext;
use crate::preferences::Preferences;
use crate::shorten::{FailureKind, ShortenRequest, ShortenResult};
use std::time::Duration;

/// How long the error icon and notification stay up
pub const ERROR_REVERT_DELAY: Duration = Duration::from_secs(10);

/// Extension message sent by the options page after a permission grant
pub const MSG_CAN_BLOCK: &str = "canBlock";

/// Page action icon state of a tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconState {
    Idle,
    Loading,
    Error,
}

impl IconState {
    pub fn icon_path(self) -> &'static str {
        match self {
            IconState::Idle => "graphics/16.png",
            IconState::Loading => "graphics/loading.png",
            IconState::Error => "graphics/stop.png",
        }
    }

    /// Locale message key of the icon title
    pub fn title_key(self) -> &'static str {
        match self {
            IconState::Idle => "UrlyShorten",
            IconState::Loading => "UrlyProcessing",
            IconState::Error => "UrlyFailed",
        }
    }
}

/// Where a shorten request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    PageAction,
    ContextMenu(MenuContext),
    Omnibox,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationContent {
    Shortened {
        code: String,
        original: String,
        link: String,
    },
    Failed(FailureKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub content: NotificationContent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Background page loaded.
    Started,
    /// User asked to shorten a URL.
    Triggered {
        trigger: Trigger,
        url: String,
        tab: Option<TabId>,
    },
    /// The request client answered.
    ShortenCompleted {
        tab: Option<TabId>,
        original: String,
        result: ShortenResult,
    },
    /// The error display delay ran out.
    ErrorExpired {
        tab: Option<TabId>,
        notification: String,
    },
    /// A success notification's timeout ran out.
    NotificationExpired { notification: String },
    TabUpdated { tab: TabId, url: Option<String> },
    PermissionChecked(bool),
    /// Message from another part of the extension.
    ExtensionMessage(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RegisterMenu(MenuContext),
    CheckPermission,
    EnableInterception,
    ShowPageAction(TabId),
    SetIcon { tab: TabId, icon: IconState },
    Shorten {
        tab: Option<TabId>,
        request: ShortenRequest,
    },
    CopyToClipboard(String),
    ShowNotification(Notification),
    CancelNotification(String),
    /// Deliver `msg` back to the controller after `delay`.
    After { delay: Duration, msg: Box<Msg> },
}

pub struct Controller {
    endpoint: ServiceEndpoint,
    intercepted: InterceptedTabSet,
    intercepting: bool,
    next_notification: u64,
}

impl Controller {
    pub fn new(endpoint: ServiceEndpoint) -> Self {
        Controller {
            endpoint,
            intercepted: InterceptedTabSet::new(),
            intercepting: false,
            next_notification: 0,
        }
    }

    pub fn endpoint(&self) -> &ServiceEndpoint {
        &self.endpoint
    }

    pub fn is_intercepting(&self) -> bool {
        self.intercepting
    }

    pub fn intercepted(&self) -> &InterceptedTabSet {
        &self.intercepted
    }

    /// Apply a message and return the effects it causes
    pub fn update(&mut self, msg: Msg, prefs: &Preferences) -> Vec<Effect> {
        match msg {
            Msg::Started => {
                let mut effects: Vec<Effect> =
                    MenuContext::ALL.into_iter().map(Effect::RegisterMenu).collect();
                effects.push(Effect::CheckPermission);
                effects
            }
            Msg::Triggered { trigger, url, tab } => {
                let url = url.trim();
                if url.is_empty() {
                    log::debug!("Ignoring {:?} trigger without a URL", trigger);
                    return Vec::new();
                }
                log::debug!("{:?} trigger for {}", trigger, url);

                let mut effects = Vec::with_capacity(2);
                if let Some(tab) = tab {
                    effects.push(Effect::SetIcon {
                        tab,
                        icon: IconState::Loading,
                    });
                }
                effects.push(Effect::Shorten {
                    tab,
                    request: ShortenRequest::new(url),
                });
                effects
            }
            Msg::ShortenCompleted {
                tab,
                original,
                result,
            } => match result {
                ShortenResult::Success { code } => self.on_success(tab, original, code, prefs),
                ShortenResult::Failure(kind) => self.on_failure(tab, kind),
            },
            Msg::ErrorExpired { tab, notification } => {
                let mut effects = Vec::with_capacity(2);
                if let Some(tab) = tab {
                    effects.push(Effect::SetIcon {
                        tab,
                        icon: IconState::Idle,
                    });
                }
                effects.push(Effect::CancelNotification(notification));
                effects
            }
            Msg::NotificationExpired { notification } => {
                vec![Effect::CancelNotification(notification)]
            }
            Msg::TabUpdated { tab, url } => {
                if let Some(url) = url {
                    if interception::observe_tab_url(&self.endpoint, &mut self.intercepted, tab, &url) {
                        log::debug!("Tab {} is showing an info page", tab);
                    }
                }
                vec![Effect::ShowPageAction(tab)]
            }
            Msg::PermissionChecked(granted) => {
                if granted && !self.intercepting {
                    log::info!("Navigation interception enabled");
                    self.intercepting = true;
                    vec![Effect::EnableInterception]
                } else {
                    Vec::new()
                }
            }
            Msg::ExtensionMessage(message) => {
                if message == MSG_CAN_BLOCK && !self.intercepting {
                    vec![Effect::CheckPermission]
                } else {
                    Vec::new()
                }
            }
        }
    }

    /// Decide a navigation to the service; `Some` is the redirect target
    pub fn check_navigation(&mut self, prefs: &Preferences, tab: TabId, url: &str) -> Option<String> {
        let decision = interception::decide(prefs, &self.endpoint, &mut self.intercepted, tab, url);
        log::debug!("Navigation to {} in tab {}: {:?}", url, tab, decision);
        decision.redirect_url()
    }

    fn on_success(
        &mut self,
        tab: Option<TabId>,
        original: String,
        code: String,
        prefs: &Preferences,
    ) -> Vec<Effect> {
        let link = self.endpoint.short_link(&code);
        let id = self.notification_id();

        let mut effects = Vec::with_capacity(4);
        if let Some(tab) = tab {
            effects.push(Effect::SetIcon {
                tab,
                icon: IconState::Idle,
            });
        }
        effects.push(Effect::CopyToClipboard(link.clone()));
        effects.push(Effect::ShowNotification(Notification {
            id: id.clone(),
            content: NotificationContent::Shortened {
                code,
                original,
                link,
            },
        }));
        if let Some(delay) = prefs.notification_timeout() {
            effects.push(Effect::After {
                delay,
                msg: Box::new(Msg::NotificationExpired { notification: id }),
            });
        }
        effects
    }

    fn on_failure(&mut self, tab: Option<TabId>, kind: FailureKind) -> Vec<Effect> {
        let id = self.notification_id();

        let mut effects = Vec::with_capacity(3);
        if let Some(tab) = tab {
            effects.push(Effect::SetIcon {
                tab,
                icon: IconState::Error,
            });
        }
        effects.push(Effect::ShowNotification(Notification {
            id: id.clone(),
            content: NotificationContent::Failed(kind),
        }));
        effects.push(Effect::After {
            delay: ERROR_REVERT_DELAY,
            msg: Box::new(Msg::ErrorExpired {
                tab,
                notification: id,
            }),
        });
        effects
    }

    fn notification_id(&mut self) -> String {
        self.next_notification += 1;
        format!("urly-{}", self.next_notification)
    }
}
