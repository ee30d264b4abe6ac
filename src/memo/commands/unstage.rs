use super::helpers::{load_working_area, save_working_area};
use super::{CmdMessage, CmdResult};
use crate::error::{MemoError, Result};
use crate::store::KeyValueStore;

/// Remove entry `index` (0 = most recent) of `filename` from the working area.
/// A file whose last entry is removed disappears from the working area.
pub fn run<S: KeyValueStore + ?Sized>(store: &S, filename: &str, index: usize) -> Result<CmdResult> {
    let mut area = load_working_area(store)?;
    let not_staged = || MemoError::NotStaged {
        filename: filename.to_string(),
        index,
    };

    let entries = area.get_mut(filename).ok_or_else(not_staged)?;
    if index >= entries.len() {
        return Err(not_staged());
    }
    let removed = entries.remove(index);
    if entries.is_empty() {
        area.remove(filename);
    }
    save_working_area(store, &area)?;

    let mut result = CmdResult::default().with_working_area(area);
    let first_line = removed.lines().next().unwrap_or_default().to_string();
    result.add_message(CmdMessage::success(format!(
        "Unstaged from {}: {}",
        filename, first_line
    )));
    Ok(result)
}
