//! The note being composed, with synchronous change notification.
//!
//! Every change goes through [`NoteModel::update`], which swaps in a new
//! snapshot and then calls each observer in subscription order with both the
//! new and the previous state. Observers only get shared references, so they
//! cannot write back into the model while it is notifying.

use crate::model::{CacheableModel, ConnectionStatus, FullModel, SaveStatus};

/// A partial update of [`FullModel`]. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelDelta {
    pub title: Option<String>,
    pub href: Option<String>,
    pub cache_key: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub filename: Option<String>,
    pub tag_options: Option<Vec<String>>,
    pub file_options: Option<Vec<String>>,
    pub new_tag_options: Option<Vec<String>>,
    pub new_file_options: Option<Vec<String>>,
    pub library_url: Option<String>,
    pub save_status: Option<SaveStatus>,
    pub connection_status: Option<ConnectionStatus>,
}

impl ModelDelta {
    pub fn save_status(status: SaveStatus) -> Self {
        Self {
            save_status: Some(status),
            ..Default::default()
        }
    }

    pub fn connection_status(status: ConnectionStatus) -> Self {
        Self {
            connection_status: Some(status),
            ..Default::default()
        }
    }

    fn apply(self, state: &mut FullModel) {
        if self.title.is_some() {
            state.title = self.title;
        }
        if self.href.is_some() {
            state.href = self.href;
        }
        if self.cache_key.is_some() {
            state.cache_key = self.cache_key;
        }
        if self.library_url.is_some() {
            state.library_url = self.library_url;
        }
        if let Some(description) = self.description {
            state.description = description;
        }
        if let Some(tags) = self.tags {
            state.tags = tags;
        }
        if let Some(filename) = self.filename {
            state.filename = filename;
        }
        if let Some(options) = self.tag_options {
            state.tag_options = options;
        }
        if let Some(options) = self.file_options {
            state.file_options = options;
        }
        if let Some(options) = self.new_tag_options {
            state.new_tag_options = options;
        }
        if let Some(options) = self.new_file_options {
            state.new_file_options = options;
        }
        if let Some(status) = self.save_status {
            state.save_status = status;
        }
        if let Some(status) = self.connection_status {
            state.connection_status = status;
        }
    }
}

impl From<CacheableModel> for ModelDelta {
    fn from(model: CacheableModel) -> Self {
        Self {
            title: model.title,
            href: model.href,
            cache_key: model.cache_key,
            description: model.description,
            tags: model.tags,
            filename: model.filename,
            ..Default::default()
        }
    }
}

/// What observers receive on every update.
#[derive(Debug)]
pub struct ModelUpdate<'a> {
    pub state: &'a FullModel,
    pub previous_state: &'a FullModel,
    pub should_cache: bool,
}

pub type Observer = Box<dyn FnMut(&ModelUpdate<'_>)>;

#[derive(Default)]
pub struct NoteModel {
    state: FullModel,
    observers: Vec<Observer>,
}

impl NoteModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FullModel {
        &self.state
    }

    pub fn cacheable_state(&self) -> CacheableModel {
        self.state.cacheable()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&ModelUpdate<'_>) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Merge `delta` into a new snapshot and notify observers.
    pub fn update(&mut self, delta: ModelDelta, should_cache: bool) {
        let mut next = self.state.clone();
        delta.apply(&mut next);
        let previous = std::mem::replace(&mut self.state, next);

        let update = ModelUpdate {
            state: &self.state,
            previous_state: &previous,
            should_cache,
        };
        for observer in self.observers.iter_mut() {
            observer(&update);
        }
    }

    pub fn update_and_cache(&mut self, delta: ModelDelta) {
        self.update(delta, true);
    }

    /// Record a tag the manifest does not know yet. Known tags are ignored;
    /// repeated unknown tags are recorded again.
    pub fn update_new_tag_option(&mut self, tag: &str) {
        if !self.state.tag_options.iter().any(|t| t == tag) {
            self.state.new_tag_options.push(tag.to_string());
        }
    }

    /// Same as [`Self::update_new_tag_option`] for target files.
    pub fn update_new_file_option(&mut self, filename: &str) {
        if !self.state.file_options.iter().any(|f| f == filename) {
            self.state.new_file_options.push(filename.to_string());
        }
    }
}
