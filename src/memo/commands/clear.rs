use super::helpers::{clear_staged, load_working_area};
use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::store::KeyValueStore;

pub fn run<S: KeyValueStore + ?Sized>(store: &S) -> Result<CmdResult> {
    let count: usize = load_working_area(store)?.values().map(Vec::len).sum();
    clear_staged(store)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Discarded {} staged entr{}.",
        count,
        if count == 1 { "y" } else { "ies" }
    )));
    Ok(result)
}
