use colored::Colorize;
use memo::controller::ComposerView;
use memo::model::{ConnectionStatus, FullModel, SaveStatus};

/// Terminal composer: reports status transitions on stderr and keeps the
/// last rendered state for the final summary.
#[derive(Default)]
pub struct TerminalView {
    last: FullModel,
}

impl TerminalView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> &FullModel {
        &self.last
    }
}

impl ComposerView for TerminalView {
    fn render(&mut self, state: &FullModel, previous: &FullModel) {
        if state.connection_status != previous.connection_status {
            match state.connection_status {
                ConnectionStatus::Valid => eprintln!(
                    "{}",
                    format!(
                        "Connected: {} tags, {} files known",
                        state.tag_options.len(),
                        state.file_options.len()
                    )
                    .dimmed()
                ),
                ConnectionStatus::Error => {
                    eprintln!("{}", "Not connected, working without suggestions".yellow())
                }
                ConnectionStatus::Unknown => {}
            }
        }
        if state.save_status != previous.save_status && state.save_status == SaveStatus::Saving {
            eprintln!("{}", "Saving...".dimmed());
        }
        self.last = state.clone();
    }
}
