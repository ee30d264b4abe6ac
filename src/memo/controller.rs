//! # Composer Controller
//!
//! Drives one composer instance: it owns the [`NoteModel`], talks to the tab
//! through [`Tabs`] and to the screen through an injected [`ComposerView`].
//! The controller never touches concrete UI elements.
//!
//! Every model change renders the view; changes made by the user are also
//! pushed to the tab's session cache with `set-cached-model`, so reopening the
//! composer on the same page restores the draft.
//!
//! A composer can be closed while a remote call is in flight. The
//! [`ComposerHandle`] carries that fact; results that arrive after the close
//! are logged and dropped.

use crate::commands::{save, stage};
use crate::config::MemoConfig;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::model::{CacheableModel, ConnectionStatus, FullModel, SaveStatus};
use crate::note::{ModelDelta, NoteModel};
use crate::options::get_user_options;
use crate::relay::{Command, Tabs};
use crate::store::KeyValueStore;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub use crate::commands::stage::StageOutcome;

/// Path the library link points to.
const LIBRARY_ENTRY_PATH: &str = "README.md";

/// What the controller needs from a UI.
pub trait ComposerView {
    /// Show `state`. `previous` is the state shown before, for diffing.
    fn render(&mut self, state: &FullModel, previous: &FullModel);

    /// The UI's own form check, consulted before staging.
    fn validate_form(&self, state: &FullModel) -> bool {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        filled(&state.title) && filled(&state.href) && !state.filename.is_empty()
    }
}

/// Shared liveness flag of a composer.
#[derive(Debug, Clone)]
pub struct ComposerHandle {
    open: Rc<Cell<bool>>,
}

impl ComposerHandle {
    fn new() -> Self {
        Self {
            open: Rc::new(Cell::new(true)),
        }
    }

    pub fn close(&self) {
        self.open.set(false);
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }
}

pub struct Controller<S: KeyValueStore, T: Tabs, V: ComposerView> {
    model: NoteModel,
    view: Rc<RefCell<V>>,
    store: S,
    tabs: Rc<T>,
    config: MemoConfig,
    handle: ComposerHandle,
}

impl<S, T, V> Controller<S, T, V>
where
    S: KeyValueStore,
    T: Tabs + 'static,
    V: ComposerView + 'static,
{
    pub fn new(store: S, tabs: Rc<T>, view: Rc<RefCell<V>>, config: MemoConfig) -> Self {
        let mut model = NoteModel::new();
        let observer_view = Rc::clone(&view);
        let observer_tabs = Rc::clone(&tabs);
        model.subscribe(move |update| {
            observer_view
                .borrow_mut()
                .render(update.state, update.previous_state);
            if update.should_cache {
                let command = Command::SetCachedModel {
                    data: update.state.cacheable(),
                };
                match observer_tabs.send_to_active(command) {
                    Ok(true) => {}
                    Ok(false) => tracing::error!("no active tab to cache the note in"),
                    Err(e) => tracing::error!(error = %e, "failed to cache the note"),
                }
            }
        });

        Self {
            model,
            view,
            store,
            tabs,
            config,
            handle: ComposerHandle::new(),
        }
    }

    pub fn state(&self) -> &FullModel {
        self.model.state()
    }

    pub fn handle(&self) -> ComposerHandle {
        self.handle.clone()
    }

    pub fn view(&self) -> &Rc<RefCell<V>> {
        &self.view
    }

    /// Connect to the repository and load tag/file suggestions.
    ///
    /// Failures leave the composer usable in disconnected mode: suggestions
    /// stay empty and `connection_status` becomes `error`.
    pub async fn init(&mut self) -> ConnectionStatus {
        let loaded = self.load_suggestions().await;
        if !self.handle.is_open() {
            tracing::debug!("composer closed before suggestions arrived");
            return self.state().connection_status;
        }

        let delta = match loaded {
            Ok((tags, files, library_url)) => ModelDelta {
                tag_options: Some(tags),
                file_options: Some(files),
                library_url,
                connection_status: Some(ConnectionStatus::Valid),
                ..Default::default()
            },
            Err(e) => {
                tracing::warn!(error = %e, "working without repository suggestions");
                ModelDelta::connection_status(ConnectionStatus::Error)
            }
        };
        self.model.update(delta, false);
        self.state().connection_status
    }

    async fn load_suggestions(&self) -> Result<(Vec<String>, Vec<String>, Option<String>)> {
        let options = get_user_options(&self.store)?;
        let client = GitHubClient::new(&self.config, &options)?;
        let (manifest, library_url) = futures::future::try_join(
            client.load_manifest(&options.manifest),
            client.library_url(LIBRARY_ENTRY_PATH),
        )
        .await?;
        Ok((manifest.tags, manifest.files, library_url))
    }

    /// Ask the active tab for this page's model.
    pub fn request_model(&self) {
        match self.tabs.send_to_active(Command::GetModel) {
            Ok(true) => {}
            Ok(false) => tracing::warn!("no active tab to ask for a model"),
            Err(e) => tracing::warn!(error = %e, "failed to request the model"),
        }
    }

    /// Handle a message delivered to the composer.
    pub fn handle_message(&mut self, command: Command) {
        if !self.handle.is_open() {
            return;
        }
        match command {
            Command::MetadataReady { data, .. } => self.on_data(data),
            Command::CachedModelReady { data, .. } => self.on_cache(data),
            Command::EmitSelection { .. } | Command::GetModel | Command::SetCachedModel { .. } => {}
        }
    }

    /// Fresh page data: a new note.
    pub fn on_data(&mut self, data: CacheableModel) {
        self.model.update(
            ModelDelta {
                title: Some(data.title.unwrap_or_default()),
                href: data.href,
                cache_key: data.cache_key,
                description: Some(data.description.unwrap_or_default()),
                save_status: Some(SaveStatus::New),
                ..Default::default()
            },
            false,
        );
    }

    /// A draft restored from the session cache.
    pub fn on_cache(&mut self, data: CacheableModel) {
        let mut delta = ModelDelta::from(data);
        delta.save_status = Some(SaveStatus::New);
        self.model.update(delta, false);
    }

    pub fn set_title(&mut self, title: &str) {
        self.model.update_and_cache(ModelDelta {
            title: Some(title.to_string()),
            ..Default::default()
        });
    }

    pub fn set_href(&mut self, href: &str) {
        self.model.update_and_cache(ModelDelta {
            href: Some(href.to_string()),
            ..Default::default()
        });
    }

    pub fn set_description(&mut self, description: &str) {
        self.model.update_and_cache(ModelDelta {
            description: Some(description.to_string()),
            ..Default::default()
        });
    }

    pub fn set_filename(&mut self, filename: &str) {
        let filename = filename.trim();
        if filename.is_empty() {
            return;
        }
        self.model.update_new_file_option(filename);
        self.model.update_and_cache(ModelDelta {
            filename: Some(filename.to_string()),
            ..Default::default()
        });
    }

    /// Add a tag to the note. Blank and already present tags are ignored.
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() || self.state().tags.iter().any(|t| t == tag) {
            return;
        }
        self.model.update_new_tag_option(tag);
        let mut tags = self.state().tags.clone();
        tags.push(tag.to_string());
        self.model.update_and_cache(ModelDelta {
            tags: Some(tags),
            ..Default::default()
        });
    }

    pub fn remove_tag(&mut self, index: usize) {
        if index >= self.state().tags.len() {
            return;
        }
        let mut tags = self.state().tags.clone();
        tags.remove(index);
        self.model.update_and_cache(ModelDelta {
            tags: Some(tags),
            ..Default::default()
        });
    }

    /// Stage the note. On success the novel tags and files become known
    /// options, so staging again does not report them a second time.
    pub fn stage(&mut self) -> StageOutcome {
        let valid = self.view.borrow().validate_form(self.state());
        let outcome = stage::run(&self.store, self.state(), valid);
        tracing::debug!(?outcome, "stage");

        if outcome == StageOutcome::Success {
            let state = self.state();
            let tag_options = merge_known(&state.tag_options, &state.new_tag_options);
            let file_options = merge_known(&state.file_options, &state.new_file_options);
            self.model.update(
                ModelDelta {
                    tag_options: Some(tag_options),
                    file_options: Some(file_options),
                    new_tag_options: Some(Vec::new()),
                    new_file_options: Some(Vec::new()),
                    ..Default::default()
                },
                false,
            );
        }
        outcome
    }

    /// Commit everything staged. The composer shows `saving` while in flight.
    pub async fn save(&mut self) -> SaveStatus {
        self.model
            .update(ModelDelta::save_status(SaveStatus::Saving), false);

        let result = self.run_save().await;
        let status = match result {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                tracing::error!(error = %e, "save failed");
                SaveStatus::Error
            }
        };
        if !self.handle.is_open() {
            tracing::debug!(?status, "composer closed before save finished");
            return status;
        }
        self.model.update(ModelDelta::save_status(status), false);
        status
    }

    async fn run_save(&self) -> Result<()> {
        let options = get_user_options(&self.store)?;
        save::run(&self.store, &self.config, &options).await?;
        Ok(())
    }
}

fn merge_known(known: &[String], novel: &[String]) -> Vec<String> {
    let mut merged = known.to_vec();
    for value in novel {
        if !merged.contains(value) {
            merged.push(value.clone());
        }
    }
    merged
}
