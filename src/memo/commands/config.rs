use crate::commands::{CmdMessage, CmdResult};
use crate::config::MemoConfig;
use crate::error::Result;
use crate::options::{get_user_options, set_user_options, UserOptions, UserOptionsUpdate};
use crate::store::KeyValueStore;
use std::path::Path;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Settings come from two places: user options live in the synced store,
/// client config in `config.json` under `config_dir`. Keys are routed by name.
pub fn run<S: KeyValueStore + ?Sized>(
    store: &S,
    config_dir: &Path,
    action: ConfigAction,
) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let options = get_user_options(store)?;
            let config = MemoConfig::load(config_dir)?;
            Ok(CmdResult::default().with_settings(options, config))
        }
        ConfigAction::ShowKey(key) => {
            let mut result = CmdResult::default();
            match lookup(store, config_dir, &key)? {
                Some(val) => result.add_message(CmdMessage::info(val)),
                None => {
                    result.add_message(CmdMessage::error(format!("Unknown config key: {}", key)))
                }
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            if is_user_option(&key) {
                set_user_options(store, &UserOptionsUpdate::from_key(&key, value.clone())?)?;
                let options = get_user_options(store)?;
                let display_val = options.get(&key).unwrap_or(value);
                let mut result = CmdResult::default();
                result.add_message(CmdMessage::success(format!("{} set to {}", key, display_val)));
                return Ok(result);
            }

            let mut config = MemoConfig::load(config_dir)?;
            if let Err(e) = config.set(&key, &value) {
                let mut res = CmdResult::default();
                res.add_message(CmdMessage::error(e));
                return Ok(res);
            }
            config.save(config_dir)?;
            let display_val = config.get(&key).unwrap_or(value);
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::success(format!("{} set to {}", key, display_val)));
            Ok(result)
        }
    }
}

fn is_user_option(key: &str) -> bool {
    key == "accessToken" || UserOptions::KEYS.contains(&key)
}

fn lookup<S: KeyValueStore + ?Sized>(
    store: &S,
    config_dir: &Path,
    key: &str,
) -> Result<Option<String>> {
    if is_user_option(key) {
        return Ok(get_user_options(store)?.get(key));
    }
    Ok(MemoConfig::load(config_dir)?.get(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::InMemoryStore;
    use tempfile::TempDir;

    #[test]
    fn user_options_go_to_the_store() {
        let store = InMemoryStore::new();
        let dir = TempDir::new().unwrap();

        run(&store, dir.path(), ConfigAction::Set("repo".into(), "wiki".into())).unwrap();

        assert_eq!(get_user_options(&store).unwrap().repo, "wiki");
        assert!(!dir.path().join("config.json").exists());
    }

    #[test]
    fn client_config_goes_to_the_file() {
        let store = InMemoryStore::new();
        let dir = TempDir::new().unwrap();

        let result = run(&store, dir.path(), ConfigAction::Set("branch".into(), "main".into()))
            .unwrap();
        assert_eq!(result.messages[0].content, "branch set to main");
        assert_eq!(MemoConfig::load(dir.path()).unwrap().branch, "main");
    }

    #[test]
    fn token_is_masked_in_messages() {
        let store = InMemoryStore::new();
        let dir = TempDir::new().unwrap();

        let result = run(
            &store,
            dir.path(),
            ConfigAction::Set("access-token".into(), "ghp_secret9876".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].content, "access-token set to ****9876");

        let shown = run(&store, dir.path(), ConfigAction::ShowKey("access-token".into())).unwrap();
        assert_eq!(shown.messages[0].content, "****9876");
    }

    #[test]
    fn unknown_keys_report_errors() {
        let store = InMemoryStore::new();
        let dir = TempDir::new().unwrap();

        let shown = run(&store, dir.path(), ConfigAction::ShowKey("nope".into())).unwrap();
        assert!(matches!(shown.messages[0].level, MessageLevel::Error));

        let set = run(&store, dir.path(), ConfigAction::Set("nope".into(), "x".into())).unwrap();
        assert!(matches!(set.messages[0].level, MessageLevel::Error));
    }

    #[test]
    fn show_all_returns_both_sources() {
        let store = InMemoryStore::new();
        let dir = TempDir::new().unwrap();
        let result = run(&store, dir.path(), ConfigAction::ShowAll).unwrap();
        assert_eq!(result.user_options.unwrap().place, "home");
        assert_eq!(result.config.unwrap().branch, "master");
    }
}
