use super::{NEW_TAGFILES_KEY, WORKING_AREA_KEY};
use crate::error::Result;
use crate::model::{NewTagFileOptions, WorkingArea};
use crate::store::{read_or_default, write_value, KeyValueStore, Scope};

pub fn load_working_area<S: KeyValueStore + ?Sized>(store: &S) -> Result<WorkingArea> {
    read_or_default(store, Scope::Local, WORKING_AREA_KEY)
}

pub fn save_working_area<S: KeyValueStore + ?Sized>(store: &S, area: &WorkingArea) -> Result<()> {
    write_value(store, Scope::Local, WORKING_AREA_KEY, area)
}

pub fn load_new_tag_files<S: KeyValueStore + ?Sized>(store: &S) -> Result<NewTagFileOptions> {
    read_or_default(store, Scope::Local, NEW_TAGFILES_KEY)
}

pub fn save_new_tag_files<S: KeyValueStore + ?Sized>(
    store: &S,
    pending: &NewTagFileOptions,
) -> Result<()> {
    write_value(store, Scope::Local, NEW_TAGFILES_KEY, pending)
}

/// Drop the working area and the pending manifest additions.
pub fn clear_staged<S: KeyValueStore + ?Sized>(store: &S) -> Result<()> {
    store.remove(Scope::Local, WORKING_AREA_KEY)?;
    store.remove(Scope::Local, NEW_TAGFILES_KEY)
}
