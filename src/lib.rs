use std::io::{self, Stdout};
use std::time::Duration;

use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};

mod app;
mod error;
mod nav;
mod ops;
mod persistence;
mod remote;
mod store;
mod tab;
mod tree;
mod types;
mod ui;
mod util;

use app::App;
use persistence::load_persisted_state;
use remote::HttpStore;
use store::Workspace;
use ui::draw;

pub fn run() -> io::Result<()> {
    if std::env::args().any(|a| a == "--help" || a == "-h") {
        println!("Usage: remide [SERVER_URL] [PROJECT]");
        println!();
        println!("Arguments:");
        println!("  [SERVER_URL]    Base URL of the file server, e.g. http://localhost:8000/api");
        println!("  [PROJECT]       Project id to open");
        println!();
        println!("Both default to the values from the last session.");
        println!();
        println!("Environment:");
        println!("  REMIDE_TOKEN    Bearer token sent with every request");
        return Ok(());
    }

    let saved = load_persisted_state();
    let server = std::env::args()
        .nth(1)
        .or_else(|| saved.as_ref().and_then(|s| s.server_url.clone()));
    let project = std::env::args()
        .nth(2)
        .or_else(|| saved.as_ref().and_then(|s| s.project.clone()));
    let (Some(server), Some(project)) = (server, project) else {
        eprintln!("Usage: remide [SERVER_URL] [PROJECT] (run with --help for details)");
        return Ok(());
    };
    let token = std::env::var("REMIDE_TOKEN").ok().filter(|t| !t.is_empty());

    let store = match HttpStore::new(&server, &project, token) {
        Ok(store) => store,
        Err(err) => {
            eprintln!("{err}");
            return Ok(());
        }
    };
    let mut workspace = Workspace::new(Box::new(store));
    if let Err(err) = workspace.load() {
        eprintln!("Could not load project '{project}': {err}");
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let enhanced_keys =
        ratatui::crossterm::terminal::supports_keyboard_enhancement().unwrap_or(false);
    if enhanced_keys {
        let _ = execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        );
    }

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), PopKeyboardEnhancementFlags);
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(info);
    }));

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    let mut app = App::new(workspace, project);
    let result = run_app(terminal, &mut app);
    app.persist_state(&server);

    disable_raw_mode()?;
    let mut stdout = io::stdout();
    if enhanced_keys {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

    result
}

fn run_app(mut terminal: Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| draw(app, f))?;
        if app.quit {
            return Ok(());
        }
        if event::poll(Duration::from_millis(100))? {
            // Drain pending events before redrawing; rapid scrolling would
            // otherwise queue a redraw per event.
            loop {
                match event::read()? {
                    Event::Key(key) => app.handle_key(key),
                    Event::Mouse(mouse) => app.handle_mouse(mouse),
                    _ => {}
                }
                if app.quit {
                    return Ok(());
                }
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }
    }
}
