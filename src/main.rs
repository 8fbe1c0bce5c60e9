use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, terminal};
use indoc::indoc;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::Direction;
use ratatui::style::{Color, Style};
use tracing::Level;

use term_tiles::components::{TextFeed, TextPane};
use term_tiles::event_loop::{ControlFlow, CrosstermDriver, EventLoop};
use term_tiles::{
    AUTO_SIZE, Button, ButtonAlignment, Layout, Manager, ManagerCommands, Window, WindowHandle,
    tracing_sub,
};

const WORDS: &str = indoc! {"
    the splitter between two panes can be dragged with the mouse
    and both neighbours keep whatever size they had when it was released
    windows carry a title rule and small buttons on either side
    press the M button to fill the screen with one window and again to bring
    the rest back while the feeds keep running in the background
"};

const WORDS_PER_LINE: usize = 9;

#[derive(Parser, Debug)]
#[command(
    name = "term-tiles",
    version = env!("CARGO_PKG_VERSION"),
    about = "Tiled text windows with draggable splitters"
)]
struct Cli {
    /// Redraw rate.
    #[arg(short = 'f', long = "fps", value_name = "FPS", default_value_t = 30.0)]
    fps: f64,

    /// Append debug logs to this file. Nothing is logged without it.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Pause between words appended by the background feeds.
    #[arg(long = "words-delay-ms", value_name = "MS", default_value_t = 120)]
    words_delay_ms: u64,
}

impl Cli {
    fn poll_interval(&self) -> io::Result<Duration> {
        if !(1.0..=240.0).contains(&self.fps) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "fps must be between 1 and 240",
            ));
        }
        Ok(Duration::from_secs_f64(1.0 / self.fps))
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let poll_interval = cli.poll_interval()?;
    tracing_sub::init_default(cli.log_file.as_deref(), Level::DEBUG)?;

    let quit = Arc::new(AtomicBool::new(false));
    let manager = Manager::new();
    let commands = manager.commands();

    let feeds = [TextFeed::new(), TextFeed::new(), TextFeed::new()];
    let windows = [
        text_window("left", &feeds[0], &commands, &quit),
        text_window("right", &feeds[1], &commands, &quit),
        text_window("bottom", &feeds[2], &commands, &quit),
    ];

    let top = Layout::new()
        .with_direction(Direction::Horizontal)
        .with_separators(true)
        .with_item(windows[0].clone(), AUTO_SIZE)
        .with_item(windows[1].clone(), AUTO_SIZE);
    let root = Layout::new()
        .with_direction(Direction::Vertical)
        .with_separators(true)
        .with_item(top, AUTO_SIZE)
        .with_item(windows[2].clone(), AUTO_SIZE);
    manager.set_root(root);
    manager.focus();

    let delay = Duration::from_millis(cli.words_delay_ms);
    let producers: Vec<JoinHandle<()>> = feeds
        .iter()
        .enumerate()
        .map(|(index, feed)| spawn_feed(index, feed.clone(), delay, Arc::clone(&quit)))
        .collect::<io::Result<_>>()?;

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let mut event_loop = EventLoop::new(CrosstermDriver, poll_interval);
    let result = event_loop.run(|event| {
        match event {
            None => {
                terminal.draw(|frame| {
                    manager.set_rect(frame.area());
                    manager.draw(frame.buffer_mut());
                })?;
            }
            Some(Event::Key(key))
                if key.kind == KeyEventKind::Press
                    && key.code == KeyCode::Char('q')
                    && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                return Ok(ControlFlow::Quit);
            }
            Some(event) => {
                manager.handle_event(&event);
            }
        }
        if quit.load(Ordering::SeqCst) {
            return Ok(ControlFlow::Quit);
        }
        Ok(ControlFlow::Continue)
    });

    quit.store(true, Ordering::SeqCst);
    terminal.show_cursor()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal::disable_raw_mode()?;

    for producer in producers {
        if producer.join().is_err() {
            tracing::warn!("feed thread panicked");
        }
    }

    result
}

/// A bordered window showing `feed`, with a quit button on the left and a
/// maximize toggle on the right.
fn text_window(
    title: &str,
    feed: &TextFeed,
    commands: &ManagerCommands,
    quit: &Arc<AtomicBool>,
) -> WindowHandle {
    let pane = TextPane::new(feed.clone()).with_style(Style::default().fg(Color::Gray));
    let window = WindowHandle::new(Window::new().with_border(true).with_title(title).with_root(pane));

    let quit = Arc::clone(quit);
    let handle = window.downgrade();
    let commands = commands.clone();
    {
        let mut guard = window.lock();
        guard.add_button(
            Button::new('X', ButtonAlignment::Left).with_on_click(move |_, _| {
                quit.store(true, Ordering::SeqCst);
            }),
        );
        guard.add_button(
            Button::new('M', ButtonAlignment::Right).with_on_click(move |_, _| {
                if let Some(window) = handle.upgrade() {
                    commands.toggle_maximize(window);
                }
            }),
        );
    }
    window
}

fn spawn_feed(
    index: usize,
    feed: TextFeed,
    delay: Duration,
    quit: Arc<AtomicBool>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name(format!("feed-{index}"))
        .spawn(move || {
            let words: Vec<&str> = WORDS.split_whitespace().collect();
            let mut cursor = index * 7;
            let mut on_line = 0;
            while !quit.load(Ordering::SeqCst) {
                feed.push_word(words[cursor % words.len()]);
                cursor += 1;
                on_line += 1;
                if on_line == WORDS_PER_LINE {
                    feed.push_line("");
                    on_line = 0;
                }
                thread::sleep(delay);
            }
            tracing::debug!(index, lines = feed.len(), "feed stopped");
        })
}
