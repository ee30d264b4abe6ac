use super::helpers::{load_new_tag_files, load_working_area};
use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::KeyValueStore;

pub fn run<S: KeyValueStore + ?Sized>(store: &S) -> Result<CmdResult> {
    let area = load_working_area(store)?;
    let pending = load_new_tag_files(store)?;

    let mut result = CmdResult::default();
    if area.is_empty() && pending.is_empty() {
        result.add_message(CmdMessage::info("Nothing staged."));
    }
    Ok(result.with_working_area(area).with_new_tag_files(pending))
}
