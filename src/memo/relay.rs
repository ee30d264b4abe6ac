//! # Relay
//!
//! Three contexts cooperate to capture a note:
//!
//! ```text
//!   context menu ──EMIT_SELECTION──▶ BackgroundRouter ──▶ active tab
//!                                                          │
//!   composer ──get-model / set-cached-model──▶ TabAgent ───┘
//!      ▲                                          │
//!      └── metadata-ready / cached-model-ready ◀──┘ (via BackgroundRouter)
//! ```
//!
//! Commands are a tagged enum whose JSON shape matches the browser message
//! format (`{"command": "get-model"}` ...). The router keeps no state: each
//! message goes to whatever tab is active at dispatch time, or is dropped when
//! there is none. Delivery failures are logged and swallowed; ordering holds
//! per sender/receiver pair only.

use crate::cache::SessionCache;
use crate::error::{MemoError, Result};
use crate::metadata::{self, PageSnapshot};
use crate::model::CacheableModel;
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

pub type TabId = u32;

/// Context menu entry that triggers a capture.
pub const SAVE_MENU_ID: &str = "osmos-save";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum Command {
    /// The user asked to capture the current selection.
    #[serde(rename = "EMIT_SELECTION")]
    EmitSelection {
        #[serde(rename = "selectText")]
        select_text: String,
    },
    /// Composer → tab: send me the model for this page.
    #[serde(rename = "get-model")]
    GetModel,
    /// Composer → tab: remember this state for the page.
    #[serde(rename = "set-cached-model")]
    SetCachedModel { data: CacheableModel },
    /// Tab → composer: freshly extracted page data.
    #[serde(rename = "metadata-ready")]
    MetadataReady {
        data: CacheableModel,
        #[serde(rename = "toIframe")]
        to_iframe: bool,
    },
    /// Tab → composer: previously cached state for this page.
    #[serde(rename = "cached-model-ready")]
    CachedModelReady {
        data: CacheableModel,
        #[serde(rename = "toIframe")]
        to_iframe: bool,
    },
}

/// Browser tab access: who is active, and a way to post a message to a tab.
pub trait Tabs {
    fn active_tab(&self) -> Option<TabId>;

    fn send(&self, tab: TabId, command: Command) -> Result<()>;

    /// Send to the active tab. Returns `Ok(false)` when there is none.
    fn send_to_active(&self, command: Command) -> Result<bool> {
        match self.active_tab() {
            Some(tab) => self.send(tab, command).map(|_| true),
            None => Ok(false),
        }
    }
}

impl<T: Tabs + ?Sized> Tabs for Rc<T> {
    fn active_tab(&self) -> Option<TabId> {
        (**self).active_tab()
    }

    fn send(&self, tab: TabId, command: Command) -> Result<()> {
        (**self).send(tab, command)
    }
}

/// Stateless forwarder running in the background context.
pub struct BackgroundRouter<T: Tabs> {
    tabs: T,
}

impl<T: Tabs> BackgroundRouter<T> {
    pub fn new(tabs: T) -> Self {
        Self { tabs }
    }

    /// Context menu click on a selection.
    pub fn on_context_menu(&self, menu_item_id: &str, selection: Option<&str>) {
        if menu_item_id != SAVE_MENU_ID {
            tracing::debug!(menu_item_id, "ignoring unknown menu item");
            return;
        }
        self.forward(Command::EmitSelection {
            select_text: selection.unwrap_or_default().to_string(),
        });
    }

    /// Message posted to the background by a tab agent.
    pub fn on_runtime_message(&self, command: Command) {
        match command {
            Command::MetadataReady { to_iframe: true, .. }
            | Command::CachedModelReady { to_iframe: true, .. } => self.forward(command),
            Command::MetadataReady { .. } | Command::CachedModelReady { .. } => {
                tracing::debug!("no composer open, dropping model reply");
            }
            Command::EmitSelection { .. } | Command::GetModel | Command::SetCachedModel { .. } => {}
        }
    }

    fn forward(&self, command: Command) {
        let Some(tab) = self.tabs.active_tab() else {
            tracing::debug!(?command, "no active tab, message dropped");
            return;
        };
        if let Err(e) = self.tabs.send(tab, command) {
            tracing::warn!(tab, error = %e, "failed to deliver message to tab");
        }
    }
}

/// The per-tab side: knows the page, the selection and the session cache.
#[derive(Debug)]
pub struct TabAgent {
    page: PageSnapshot,
    selection: Option<String>,
    composer_open: bool,
    cache: SessionCache,
}

impl TabAgent {
    pub fn new(page: PageSnapshot) -> Self {
        Self {
            page,
            selection: None,
            composer_open: false,
            cache: SessionCache::new(),
        }
    }

    pub fn is_composer_open(&self) -> bool {
        self.composer_open
    }

    /// The tab navigated. The session cache stays; its key check does the rest.
    pub fn navigate(&mut self, page: PageSnapshot) {
        self.page = page;
    }

    /// Click outside the composer: close it and forget the selection.
    pub fn dismiss(&mut self) {
        if self.composer_open {
            tracing::debug!("composer dismissed");
        }
        self.composer_open = false;
        self.selection = None;
    }

    /// Handle a message addressed to this tab. Returns the reply to post to the
    /// background router, if any.
    pub fn handle(&mut self, command: Command) -> Option<Command> {
        match command {
            Command::EmitSelection { select_text } => {
                self.selection = Some(select_text);
                self.composer_open = true;
                None
            }
            Command::SetCachedModel { data } => {
                tracing::debug!(cache_key = ?data.cache_key, "set cached model");
                self.cache.set(data);
                None
            }
            Command::GetModel => Some(self.model_reply()),
            Command::MetadataReady { .. } | Command::CachedModelReady { .. } => None,
        }
    }

    fn model_reply(&self) -> Command {
        let to_iframe = self.composer_open;
        match self.cache.get(&self.page.location) {
            Ok(data) => {
                tracing::debug!("serving cached model");
                Command::CachedModelReady { data, to_iframe }
            }
            Err(e) => {
                tracing::debug!(reason = %e, "extracting page metadata");
                let data = metadata::capture(&self.page, self.selection.as_deref());
                Command::MetadataReady { data, to_iframe }
            }
        }
    }
}

/// In-process tabs: one unbounded channel per tab, FIFO per tab.
#[derive(Default)]
pub struct ChannelTabs {
    senders: RefCell<HashMap<TabId, UnboundedSender<Command>>>,
    active: Cell<Option<TabId>>,
}

impl ChannelTabs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tab and make it active. The receiver is the tab's inbox.
    pub fn open_tab(&self, tab: TabId) -> UnboundedReceiver<Command> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.senders.borrow_mut().insert(tab, tx);
        self.active.set(Some(tab));
        rx
    }

    pub fn close_tab(&self, tab: TabId) {
        self.senders.borrow_mut().remove(&tab);
        if self.active.get() == Some(tab) {
            self.active.set(None);
        }
    }
}

impl Tabs for ChannelTabs {
    fn active_tab(&self) -> Option<TabId> {
        self.active.get()
    }

    fn send(&self, tab: TabId, command: Command) -> Result<()> {
        let senders = self.senders.borrow();
        let sender = senders
            .get(&tab)
            .ok_or_else(|| MemoError::Delivery(format!("No such tab: {}", tab)))?;
        sender
            .send(command)
            .map_err(|_| MemoError::Delivery(format!("Tab {} is gone", tab)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PAGE_HTML: &str = r#"<head>
        <link rel="canonical" href="https://example.com/canonical-x">
        <title>Example</title></head>"#;

    fn agent() -> TabAgent {
        TabAgent::new(PageSnapshot::new("https://example.com/x", PAGE_HTML))
    }

    #[test]
    fn commands_use_browser_message_shapes() {
        let emit = serde_json::to_value(Command::EmitSelection {
            select_text: "hi".into(),
        })
        .unwrap();
        assert_eq!(emit, json!({"command": "EMIT_SELECTION", "selectText": "hi"}));

        let get = serde_json::to_value(Command::GetModel).unwrap();
        assert_eq!(get, json!({"command": "get-model"}));

        let parsed: Command = serde_json::from_value(json!({
            "command": "cached-model-ready",
            "data": {"cacheKey": "k"},
            "toIframe": true
        }))
        .unwrap();
        assert_eq!(
            parsed,
            Command::CachedModelReady {
                data: CacheableModel {
                    cache_key: Some("k".into()),
                    ..Default::default()
                },
                to_iframe: true
            }
        );
    }

    #[test]
    fn get_model_extracts_on_cache_miss() {
        let mut agent = agent();
        agent.handle(Command::EmitSelection {
            select_text: "Hello World".into(),
        });

        let reply = agent.handle(Command::GetModel).unwrap();
        let Command::MetadataReady { data, to_iframe } = reply else {
            panic!("expected metadata-ready, got {:?}", reply);
        };
        assert!(to_iframe);
        assert_eq!(
            data,
            CacheableModel {
                title: Some("Example".into()),
                href: Some("https://example.com/canonical-x".into()),
                cache_key: Some("https://example.com/x".into()),
                description: Some("Hello World".into()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn get_model_serves_cache_for_same_page_only() {
        let mut agent = agent();
        let cached = CacheableModel {
            title: Some("Edited".into()),
            cache_key: Some("https://example.com/x".into()),
            ..Default::default()
        };
        agent.handle(Command::SetCachedModel {
            data: cached.clone(),
        });

        assert!(matches!(
            agent.handle(Command::GetModel),
            Some(Command::CachedModelReady { ref data, to_iframe: false }) if *data == cached
        ));

        agent.navigate(PageSnapshot::new("https://example.com/y", PAGE_HTML));
        assert!(matches!(
            agent.handle(Command::GetModel),
            Some(Command::MetadataReady { .. })
        ));
    }

    #[test]
    fn dismiss_closes_composer() {
        let mut agent = agent();
        agent.handle(Command::EmitSelection {
            select_text: "x".into(),
        });
        assert!(agent.is_composer_open());
        agent.dismiss();
        assert!(!agent.is_composer_open());

        let Some(Command::MetadataReady { data, to_iframe }) = agent.handle(Command::GetModel) else {
            panic!("expected metadata-ready");
        };
        assert!(!to_iframe);
        assert_eq!(data.description, None);
    }

    #[test]
    fn router_drops_without_active_tab() {
        let tabs = Rc::new(ChannelTabs::new());
        let mut inbox = tabs.open_tab(1);
        tabs.close_tab(1);
        let router = BackgroundRouter::new(tabs.clone());

        router.on_context_menu(SAVE_MENU_ID, Some("text"));
        assert!(inbox.try_recv().is_err());
    }

    #[test]
    fn router_sends_selection_to_active_tab() {
        let tabs = Rc::new(ChannelTabs::new());
        let mut first = tabs.open_tab(1);
        let mut second = tabs.open_tab(2);
        let router = BackgroundRouter::new(tabs.clone());

        router.on_context_menu(SAVE_MENU_ID, Some("picked"));
        router.on_context_menu("something-else", Some("ignored"));

        assert!(first.try_recv().is_err());
        assert_eq!(
            second.try_recv().unwrap(),
            Command::EmitSelection {
                select_text: "picked".into()
            }
        );
        assert!(second.try_recv().is_err());
    }

    #[test]
    fn router_forwards_only_composer_bound_replies() {
        let tabs = Rc::new(ChannelTabs::new());
        let mut inbox = tabs.open_tab(7);
        let router = BackgroundRouter::new(tabs.clone());

        router.on_runtime_message(Command::MetadataReady {
            data: CacheableModel::default(),
            to_iframe: false,
        });
        router.on_runtime_message(Command::GetModel);
        assert!(inbox.try_recv().is_err());

        router.on_runtime_message(Command::CachedModelReady {
            data: CacheableModel::default(),
            to_iframe: true,
        });
        assert!(matches!(
            inbox.try_recv(),
            Ok(Command::CachedModelReady { .. })
        ));
    }

    #[test]
    fn messages_arrive_in_send_order() {
        let tabs = ChannelTabs::new();
        let mut inbox = tabs.open_tab(1);
        for i in 0..5 {
            tabs.send(
                1,
                Command::EmitSelection {
                    select_text: i.to_string(),
                },
            )
            .unwrap();
        }
        for i in 0..5 {
            assert_eq!(
                inbox.try_recv().unwrap(),
                Command::EmitSelection {
                    select_text: i.to_string()
                }
            );
        }
    }

    #[test]
    fn sending_to_closed_tab_fails() {
        let tabs = ChannelTabs::new();
        let inbox = tabs.open_tab(1);
        drop(inbox);
        assert!(matches!(
            tabs.send(1, Command::GetModel),
            Err(MemoError::Delivery(_))
        ));
        assert!(matches!(
            tabs.send(2, Command::GetModel),
            Err(MemoError::Delivery(_))
        ));
    }
}
