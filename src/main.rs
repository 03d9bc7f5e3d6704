use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use vocadr::app::App;
use vocadr::config::Config;
use vocadr::event::{AppEvent, EventHandler};
use vocadr::logging;
use vocadr::store::json_store::JsonStore;
use vocadr::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "vocadr", version, about = "Terminal vocabulary trainer")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(short, long, help = "Directory holding word sets and bookmarks")]
    data_dir: Option<PathBuf>,

    #[arg(short = 'k', long, help = "Wrong choices shown per question (1-5)")]
    distractors: Option<usize>,

    #[arg(long, help = "Interface language (en, ko)")]
    lang: Option<String>,

    #[arg(long, help = "List bundled themes and exit")]
    list_themes: bool,

    #[arg(long, help = "Write the effective settings to the config file and exit")]
    save_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_themes {
        for name in Theme::available_themes() {
            println!("{name}");
        }
        return Ok(());
    }

    let mut config = Config::load().context("cannot read config")?;
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(k) = cli.distractors {
        config.distractor_count = k;
    }
    if let Some(lang) = cli.lang {
        config.ui_language = lang;
    }
    config.validate();

    if cli.save_config {
        config.save()?;
        println!("{}", Config::config_path().display());
        return Ok(());
    }

    let data_dir = config.data_dir();
    let _log_guard = logging::init_tracing(&data_dir, &config.log_level)?;
    rust_i18n::set_locale(&config.ui_language);
    tracing::info!(data_dir = %data_dir.display(), "starting vocadr");

    let store = JsonStore::with_base_dir(data_dir).context("cannot open data directory")?;
    let mut app = App::new(config, Rc::new(store));
    app.start()?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(250));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("{err:?}");
        eprintln!("Error: {err:?}");
    }
    tracing::info!("bye");

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| app.render(frame))?;

        match events.next()? {
            AppEvent::Key(key) => app.handle_key(key),
            AppEvent::Tick | AppEvent::Resize => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
