/// Context menu entries and the URL each one shortens
use serde::{Deserialize, Serialize};

/// Browser context a menu entry is registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuContext {
    Selection,
    Page,
    Link,
    Image,
    Video,
    Audio,
}

impl MenuContext {
    pub const ALL: [MenuContext; 6] = [
        MenuContext::Selection,
        MenuContext::Page,
        MenuContext::Link,
        MenuContext::Image,
        MenuContext::Video,
        MenuContext::Audio,
    ];

    /// Context name as the browser spells it; also used as the menu item id
    pub fn name(self) -> &'static str {
        match self {
            MenuContext::Selection => "selection",
            MenuContext::Page => "page",
            MenuContext::Link => "link",
            MenuContext::Image => "image",
            MenuContext::Video => "video",
            MenuContext::Audio => "audio",
        }
    }

    /// Locale message key of the menu label
    pub fn label_key(self) -> &'static str {
        match self {
            MenuContext::Selection => "ContextSelection",
            MenuContext::Page => "ContextPage",
            MenuContext::Link => "ContextLink",
            MenuContext::Image => "ContextImage",
            MenuContext::Video => "ContextVideo",
            MenuContext::Audio => "ContextAudio",
        }
    }

    pub fn source_url(self, info: &ClickInfo) -> Option<String> {
        let field = match self {
            MenuContext::Selection => &info.selection_text,
            MenuContext::Page => &info.page_url,
            MenuContext::Link => &info.link_url,
            MenuContext::Image | MenuContext::Video | MenuContext::Audio => &info.src_url,
        };
        field
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ToOwned::to_owned)
    }
}

/// What the browser reports about a context menu click
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClickInfo {
    #[serde(default)]
    pub selection_text: Option<String>,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub src_url: Option<String>,
}
