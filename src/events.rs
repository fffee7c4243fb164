/// Browser events delivered to the background page
///
/// The JavaScript bridge forwards every listener callback as one payload
/// tagged by `type`; this module turns those payloads into controller messages.
use crate::controller::{Msg, Trigger};
use crate::interception::TabId;
use crate::menu::{ClickInfo, MenuContext};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed event payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("malformed event value: {0}")]
    Js(String),
}

/// The parts of a browser tab the extension looks at
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Tab {
    pub id: TabId,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PlatformEvent {
    Started,
    #[serde(rename_all = "camelCase")]
    TabUpdated {
        tab_id: TabId,
        #[serde(default)]
        url: Option<String>,
    },
    PageActionClicked {
        tab: Tab,
    },
    #[serde(rename_all = "camelCase")]
    ContextMenuClicked {
        menu_item_id: MenuContext,
        #[serde(default)]
        info: ClickInfo,
        #[serde(default)]
        tab: Option<Tab>,
    },
    OmniboxEntered {
        text: String,
        #[serde(default)]
        tab: Option<Tab>,
    },
    Message {
        msg: String,
    },
}

impl PlatformEvent {
    pub fn from_json(payload: &str) -> Result<PlatformEvent, EventError> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Controller message for this event, if it carries anything to act on
    pub fn into_msg(self) -> Option<Msg> {
        match self {
            PlatformEvent::Started => Some(Msg::Started),
            PlatformEvent::TabUpdated { tab_id, url } => Some(Msg::TabUpdated { tab: tab_id, url }),
            PlatformEvent::PageActionClicked { tab } => tab.url.map(|url| Msg::Triggered {
                trigger: Trigger::PageAction,
                url,
                tab: Some(tab.id),
            }),
            PlatformEvent::ContextMenuClicked {
                menu_item_id,
                info,
                tab,
            } => menu_item_id.source_url(&info).map(|url| Msg::Triggered {
                trigger: Trigger::ContextMenu(menu_item_id),
                url,
                tab: tab.map(|t| t.id),
            }),
            PlatformEvent::OmniboxEntered { text, tab } => Some(Msg::Triggered {
                trigger: Trigger::Omnibox,
                url: text,
                tab: tab.map(|t| t.id),
            }),
            PlatformEvent::Message { msg } => Some(Msg::ExtensionMessage(msg)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(payload: &str) -> Option<Msg> {
        PlatformEvent::from_json(payload).unwrap().into_msg()
    }

    #[test]
    fn test_started() {
        assert_eq!(msg(r#"{"type":"started"}"#), Some(Msg::Started));
    }

    #[test]
    fn test_tab_updated() {
        assert_eq!(
            msg(r#"{"type":"tabUpdated","tabId":3,"url":"http://urly.fi/info/x"}"#),
            Some(Msg::TabUpdated {
                tab: 3,
                url: Some("http://urly.fi/info/x".to_string()),
            })
        );
        assert_eq!(
            msg(r#"{"type":"tabUpdated","tabId":3}"#),
            Some(Msg::TabUpdated { tab: 3, url: None })
        );
    }

    #[test]
    fn test_page_action_uses_tab_url() {
        assert_eq!(
            msg(r#"{"type":"pageActionClicked","tab":{"id":5,"url":"http://example.com/"}}"#),
            Some(Msg::Triggered {
                trigger: Trigger::PageAction,
                url: "http://example.com/".to_string(),
                tab: Some(5),
            })
        );
        assert_eq!(msg(r#"{"type":"pageActionClicked","tab":{"id":5}}"#), None);
    }

    #[test]
    fn test_context_menu_link() {
        let payload = r#"{
            "type": "contextMenuClicked",
            "menuItemId": "link",
            "info": {"pageUrl": "http://page.example.com/", "linkUrl": "http://link.example.com/"},
            "tab": {"id": 2, "url": "http://page.example.com/"}
        }"#;

        assert_eq!(
            msg(payload),
            Some(Msg::Triggered {
                trigger: Trigger::ContextMenu(MenuContext::Link),
                url: "http://link.example.com/".to_string(),
                tab: Some(2),
            })
        );
    }

    #[test]
    fn test_context_menu_without_source_is_dropped() {
        let payload = r#"{"type":"contextMenuClicked","menuItemId":"video","info":{}}"#;
        assert_eq!(msg(payload), None);
    }

    #[test]
    fn test_omnibox_without_tab() {
        assert_eq!(
            msg(r#"{"type":"omniboxEntered","text":"example.com"}"#),
            Some(Msg::Triggered {
                trigger: Trigger::Omnibox,
                url: "example.com".to_string(),
                tab: None,
            })
        );
    }

    #[test]
    fn test_message() {
        assert_eq!(
            msg(r#"{"type":"message","msg":"canBlock"}"#),
            Some(Msg::ExtensionMessage("canBlock".to_string()))
        );
    }

    #[test]
    fn test_unknown_event_is_an_error() {
        assert!(matches!(
            PlatformEvent::from_json(r#"{"type":"tabRemoved","tabId":1}"#),
            Err(EventError::Json(_))
        ));
        assert!(PlatformEvent::from_json(r#"{"type":"contextMenuClicked","menuItemId":"frame"}"#).is_err());
    }
}
