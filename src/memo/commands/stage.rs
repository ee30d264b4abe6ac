use super::helpers::{load_new_tag_files, load_working_area, save_new_tag_files, save_working_area};
use crate::entry::format_entry;
use crate::error::Result;
use crate::model::FullModel;
use crate::options::get_user_options;
use crate::store::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// The entry is in the working area.
    Success,
    /// Required fields are missing; nothing was written.
    Fail,
    /// The store could not be read or written.
    Error,
}

/// Stage the composed note into the working area of its target file.
///
/// `form_valid` is the UI's own form check. Title, link and target file must
/// be non-empty regardless of what the UI says, and the target file cannot be
/// the manifest.
pub fn run<S: KeyValueStore + ?Sized>(store: &S, model: &FullModel, form_valid: bool) -> StageOutcome {
    if !form_valid {
        return StageOutcome::Fail;
    }
    let (Some(title), Some(href)) = (non_empty(&model.title), non_empty(&model.href)) else {
        return StageOutcome::Fail;
    };
    if model.filename.is_empty() {
        return StageOutcome::Fail;
    }
    match get_user_options(store) {
        Ok(options) if options.manifest == model.filename => {
            tracing::debug!(filename = %model.filename, "refusing to stage into the manifest");
            return StageOutcome::Fail;
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!(error = %e, "could not read settings");
            return StageOutcome::Error;
        }
    }

    let entry = format_entry(title, href, &model.description, &model.tags);
    match stage_entry(store, model, entry) {
        Ok(()) => StageOutcome::Success,
        Err(e) => {
            tracing::error!(error = %e, filename = %model.filename, "staging failed");
            StageOutcome::Error
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn stage_entry<S: KeyValueStore + ?Sized>(store: &S, model: &FullModel, entry: String) -> Result<()> {
    let mut area = load_working_area(store)?;
    area.entry(model.filename.clone()).or_default().insert(0, entry);
    save_working_area(store, &area)?;

    if !model.new_tag_options.is_empty() || !model.new_file_options.is_empty() {
        let mut pending = load_new_tag_files(store)?;
        pending.extend(&model.new_tag_options, &model.new_file_options);
        save_new_tag_files(store, &pending)?;
    }
    Ok(())
}
