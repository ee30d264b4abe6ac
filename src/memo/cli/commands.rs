use super::print::{print_messages, print_pending, print_settings, print_working_area};
use super::setup::{Cli, Commands, PendingList};
use super::view::TerminalView;
use clap::Parser;
use colored::Colorize;
use directories::ProjectDirs;
use memo::api::{ConfigAction, MemoApi, PendingKind, StageOutcome};
use memo::controller::Controller;
use memo::error::{MemoError, Result};
use memo::metadata::PageSnapshot;
use memo::relay::{BackgroundRouter, ChannelTabs, Command, TabAgent, TabId, SAVE_MENU_ID};
use memo::store::fs::FileStore;
use std::cell::RefCell;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;

/// Overrides the platform data directory.
pub const DATA_DIR_ENV: &str = "MEMO_DATA_DIR";

const CAPTURE_TAB: TabId = 1;

struct AppContext {
    api: MemoApi<Rc<FileStore>>,
}

/// Everything `capture` was asked to put into the note.
struct CaptureArgs {
    page: PathBuf,
    url: String,
    selection: Option<String>,
    tags: Vec<String>,
    file: Option<String>,
    title: Option<String>,
    href: Option<String>,
    description: Option<String>,
    offline: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = init_context()?;

    match cli.command {
        Some(Commands::Capture {
            page,
            url,
            selection,
            tags,
            file,
            title,
            href,
            description,
            offline,
        }) => handle_capture(
            &ctx,
            CaptureArgs {
                page,
                url,
                selection,
                tags,
                file,
                title,
                href,
                description,
                offline,
            },
        ),
        Some(Commands::Status) | None => handle_status(&ctx),
        Some(Commands::Unstage { file, index }) => handle_unstage(&ctx, &file, index),
        Some(Commands::Forget { list, index }) => handle_forget(&ctx, list, index),
        Some(Commands::Save) => handle_save(&ctx),
        Some(Commands::Clear) => handle_clear(&ctx),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
    }
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "memo=debug" } else { "memo=warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "osmos", "memo")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MemoError::Config("Could not determine data dir".to_string()))
}

fn init_context() -> Result<AppContext> {
    let dir = data_dir()?;
    tracing::debug!(data_dir = %dir.display(), "using data dir");
    let store = Rc::new(FileStore::new(dir.clone()));
    Ok(AppContext {
        api: MemoApi::new(store, dir)?,
    })
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

fn read_page(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        return Ok(buffer);
    }
    Ok(std::fs::read_to_string(path)?)
}

fn handle_capture(ctx: &AppContext, args: CaptureArgs) -> Result<()> {
    let html = read_page(&args.page)?;
    let page = PageSnapshot::new(args.url, html);

    let tabs = Rc::new(ChannelTabs::new());
    let mut inbox = tabs.open_tab(CAPTURE_TAB);
    let router = BackgroundRouter::new(Rc::clone(&tabs));
    let mut agent = TabAgent::new(page);
    let view = Rc::new(RefCell::new(TerminalView::new()));
    let mut controller = Controller::new(
        Rc::clone(ctx.api.store()),
        Rc::clone(&tabs),
        Rc::clone(&view),
        ctx.api.config().clone(),
    );

    router.on_context_menu(SAVE_MENU_ID, args.selection.as_deref());
    pump(&mut inbox, &mut agent, &router, &mut controller);

    if !args.offline {
        runtime()?.block_on(controller.init());
    }
    controller.request_model();
    pump(&mut inbox, &mut agent, &router, &mut controller);

    if let Some(title) = &args.title {
        controller.set_title(title);
    }
    if let Some(href) = &args.href {
        controller.set_href(href);
    }
    if let Some(description) = &args.description {
        controller.set_description(description);
    }
    for tag in &args.tags {
        controller.add_tag(tag);
    }
    if let Some(file) = &args.file {
        controller.set_filename(file);
    }

    let outcome = controller.stage();
    pump(&mut inbox, &mut agent, &router, &mut controller);
    controller.handle().close();
    agent.dismiss();

    match outcome {
        StageOutcome::Success => {
            let state = view.borrow().last().clone();
            println!(
                "{}",
                format!("Staged to {}", state.filename).green()
            );
            if let Some(title) = &state.title {
                println!("  {}", title.bold());
            }
            Ok(())
        }
        StageOutcome::Fail => Err(MemoError::Validation(
            "A note needs a title, a link and a target file (--file)".to_string(),
        )),
        StageOutcome::Error => Err(MemoError::Storage(
            "Could not write the working area".to_string(),
        )),
    }
}

/// Deliver everything queued for the tab. Model replies go to the composer,
/// the rest to the tab agent whose replies go back through the router.
fn pump<S, V>(
    inbox: &mut UnboundedReceiver<Command>,
    agent: &mut TabAgent,
    router: &BackgroundRouter<Rc<ChannelTabs>>,
    controller: &mut Controller<S, ChannelTabs, V>,
) where
    S: memo::store::KeyValueStore,
    V: memo::controller::ComposerView + 'static,
{
    while let Ok(command) = inbox.try_recv() {
        match command {
            Command::MetadataReady { .. } | Command::CachedModelReady { .. } => {
                controller.handle_message(command)
            }
            other => {
                if let Some(reply) = agent.handle(other) {
                    router.on_runtime_message(reply);
                }
            }
        }
    }
}

fn handle_status(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.status()?;
    if let Some(area) = &result.working_area {
        print_working_area(area);
    }
    if let Some(pending) = &result.new_tag_files {
        print_pending(pending);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_unstage(ctx: &AppContext, file: &str, index: usize) -> Result<()> {
    let result = ctx.api.unstage(file, index)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_forget(ctx: &AppContext, list: PendingList, index: usize) -> Result<()> {
    let kind = match list {
        PendingList::Tag => PendingKind::Tag,
        PendingList::File => PendingKind::File,
    };
    let result = ctx.api.forget(kind, index)?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_save(ctx: &AppContext) -> Result<()> {
    let result = runtime()?.block_on(ctx.api.save())?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_clear(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.clear()?;
    print_messages(&result.messages);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.settings(action)?;
    if let (Some(options), Some(config)) = (&result.user_options, &result.config) {
        print_settings(options, config);
    }
    print_messages(&result.messages);
    Ok(())
}
