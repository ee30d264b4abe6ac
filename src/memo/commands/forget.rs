use super::helpers::{load_new_tag_files, save_new_tag_files};
use super::{CmdMessage, CmdResult, NEW_TAGFILES_KEY};
use crate::error::{MemoError, Result};
use crate::store::{KeyValueStore, Scope};

/// Which list of pending manifest additions to edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingKind {
    Tag,
    File,
}

impl PendingKind {
    fn label(&self) -> &'static str {
        match self {
            PendingKind::Tag => "new tags",
            PendingKind::File => "new files",
        }
    }
}

/// Drop one pending tag or file so the next save does not add it to the
/// manifest. Staged notes are left alone. The key goes away once both lists
/// are empty.
pub fn run<S: KeyValueStore + ?Sized>(
    store: &S,
    kind: PendingKind,
    index: usize,
) -> Result<CmdResult> {
    let mut pending = load_new_tag_files(store)?;
    let list = match kind {
        PendingKind::Tag => &mut pending.tags,
        PendingKind::File => &mut pending.files,
    };
    if index >= list.len() {
        return Err(MemoError::NotStaged {
            filename: kind.label().to_string(),
            index,
        });
    }
    let removed = list.remove(index);

    if pending.is_empty() {
        store.remove(Scope::Local, NEW_TAGFILES_KEY)?;
    } else {
        save_new_tag_files(store, &pending)?;
    }

    let mut result = CmdResult::default().with_new_tag_files(pending);
    result.add_message(CmdMessage::success(format!(
        "Removed {} from {}",
        removed,
        kind.label()
    )));
    Ok(result)
}
