use std::io;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event::{KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::buffer::Buffer;
use ratatui::layout::{Direction, Rect};

use term_tiles::components::{TextFeed, TextPane};
use term_tiles::{AUTO_SIZE, Layout, Manager, MouseAction, Window, WindowHandle};

#[derive(Parser, Debug)]
#[command(
    name = "tile-bench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Off-screen benchmark for nested layout drawing and splitter drags"
)]
struct BenchCli {
    /// How long to run the benchmark.
    #[arg(
        short = 'd',
        long = "duration",
        value_name = "SECONDS",
        default_value_t = 5.0
    )]
    duration_seconds: f64,

    /// Width of the off-screen buffer.
    #[arg(long = "width", value_name = "COLUMNS", default_value_t = 200)]
    width: u16,

    /// Height of the off-screen buffer.
    #[arg(long = "height", value_name = "ROWS", default_value_t = 60)]
    height: u16,

    /// Windows per row of the grid.
    #[arg(short = 'c', long = "columns", default_value_t = 4)]
    columns: usize,

    /// Rows of windows.
    #[arg(short = 'r', long = "rows", default_value_t = 3)]
    rows: usize,
}

struct BenchConfig {
    duration: Duration,
    area: Rect,
    columns: usize,
    rows: usize,
}

impl TryFrom<&BenchCli> for BenchConfig {
    type Error = String;

    fn try_from(cli: &BenchCli) -> Result<Self, Self::Error> {
        if !(0.5..=600.0).contains(&cli.duration_seconds) {
            return Err("duration must be between 0.5 and 600 seconds".to_string());
        }
        if cli.width < 10 || cli.height < 5 {
            return Err("buffer must be at least 10x5".to_string());
        }
        if !(1..=32).contains(&cli.columns) || !(1..=32).contains(&cli.rows) {
            return Err("columns and rows must be between 1 and 32".to_string());
        }
        Ok(Self {
            duration: Duration::from_secs_f64(cli.duration_seconds),
            area: Rect::new(0, 0, cli.width, cli.height),
            columns: cli.columns,
            rows: cli.rows,
        })
    }
}

fn main() -> io::Result<()> {
    let args = BenchCli::parse();
    let config = BenchConfig::try_from(&args)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;

    let (manager, feeds) = build_grid(&config);
    let stats = run_benchmark(&manager, &feeds, &config);
    println!("{}", stats.final_report(&config));
    Ok(())
}

fn build_grid(config: &BenchConfig) -> (Manager, Vec<TextFeed>) {
    let mut feeds = Vec::with_capacity(config.columns * config.rows);
    let mut root = Layout::new()
        .with_direction(Direction::Vertical)
        .with_separators(true);
    for row in 0..config.rows {
        let mut band = Layout::new()
            .with_direction(Direction::Horizontal)
            .with_separators(true);
        for column in 0..config.columns {
            let feed = TextFeed::with_max_lines(256);
            let window = Window::new()
                .with_border(true)
                .with_title(format!("pane {row}.{column}"))
                .with_root(TextPane::new(feed.clone()));
            band.add_item(WindowHandle::new(window), AUTO_SIZE);
            feeds.push(feed);
        }
        root.add_item(band, AUTO_SIZE);
    }
    let manager = Manager::new().with_root(root);
    manager.set_rect(config.area);
    (manager, feeds)
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

/// Sweeps the first splitter of the top band back and forth.
struct DragScript {
    column: u16,
    row: u16,
    step: i32,
    lo: u16,
    hi: u16,
}

impl DragScript {
    /// `None` when the top band has a single window and therefore no splitter.
    fn new(config: &BenchConfig) -> Option<Self> {
        if config.columns < 2 {
            return None;
        }
        let area = config.area;
        let cells = (config.columns - 1) as u16;
        let pane_width = area.width.saturating_sub(cells) / config.columns as u16;
        let band_height = area.height.saturating_sub((config.rows - 1) as u16) / config.rows as u16;
        Some(Self {
            column: area.x + pane_width,
            row: area.y + band_height / 2,
            step: 1,
            lo: area.x + 1,
            hi: area.x + pane_width.saturating_mul(2),
        })
    }

    fn begin(&self, manager: &Manager) {
        let event = mouse(MouseEventKind::Down(MouseButton::Left), self.column, self.row);
        manager.handle_mouse(MouseAction::LeftDown, &event);
    }

    fn advance(&mut self, manager: &Manager) {
        let next = self.column as i32 + self.step;
        if next <= self.lo as i32 || next >= self.hi as i32 {
            self.step = -self.step;
        }
        self.column = (self.column as i32 + self.step).max(0) as u16;
        let event = mouse(MouseEventKind::Drag(MouseButton::Left), self.column, self.row);
        manager.handle_mouse(MouseAction::Move, &event);
    }
}

fn run_benchmark(manager: &Manager, feeds: &[TextFeed], config: &BenchConfig) -> BenchStats {
    let mut stats = BenchStats::new();
    let mut buffer = Buffer::empty(config.area);
    let mut drag = DragScript::new(config);
    let mut tick: u64 = 0;

    // one frame first so every region knows its rectangle
    manager.draw(&mut buffer);
    if let Some(drag) = drag.as_ref() {
        drag.begin(manager);
    }

    while stats.elapsed() < config.duration {
        let frame_start = Instant::now();
        for (index, feed) in feeds.iter().enumerate() {
            feed.push_line(format!("tick {tick} pane {index}"));
        }
        if let Some(drag) = drag.as_mut() {
            drag.advance(manager);
        }
        buffer.reset();
        manager.draw(&mut buffer);
        stats.record_frame(
            config.area.width as u64 * config.area.height as u64,
            frame_start.elapsed(),
        );
        tick = tick.wrapping_add(1);
    }

    stats.mark_completed();
    stats
}

struct BenchStats {
    start: Instant,
    completed_at: Option<Instant>,
    frame_count: u64,
    cell_updates: u64,
    total_draw_time: Duration,
    fastest_frame: Duration,
    slowest_frame: Duration,
}

impl BenchStats {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            completed_at: None,
            frame_count: 0,
            cell_updates: 0,
            total_draw_time: Duration::ZERO,
            fastest_frame: Duration::MAX,
            slowest_frame: Duration::ZERO,
        }
    }

    fn elapsed(&self) -> Duration {
        match self.completed_at {
            Some(done) => done.duration_since(self.start),
            None => self.start.elapsed(),
        }
    }

    fn mark_completed(&mut self) {
        self.completed_at = Some(Instant::now());
    }

    fn record_frame(&mut self, cells: u64, draw_time: Duration) {
        self.frame_count = self.frame_count.saturating_add(1);
        self.cell_updates = self.cell_updates.saturating_add(cells);
        self.total_draw_time += draw_time;
        if draw_time < self.fastest_frame {
            self.fastest_frame = draw_time;
        }
        if draw_time > self.slowest_frame {
            self.slowest_frame = draw_time;
        }
    }

    fn average_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        (self.total_draw_time.as_secs_f64() / self.frame_count as f64) * 1_000.0
    }

    fn fastest_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.fastest_frame.as_secs_f64() * 1_000.0
    }

    fn slowest_frame_ms(&self) -> f64 {
        if self.frame_count == 0 {
            return 0.0;
        }
        self.slowest_frame.as_secs_f64() * 1_000.0
    }

    fn final_report(&self, config: &BenchConfig) -> String {
        let elapsed = self.elapsed().as_secs_f64();
        let fps_avg = if elapsed > 0.0 {
            self.frame_count as f64 / elapsed
        } else {
            0.0
        };

        indoc::formatdoc!(
            r#"
            Tile bench completed.
            Grid: {columns}x{rows} windows in {width}x{height} cells
            Duration: {elapsed:.2}s (target {target:.2}s)
            Frames: {frames} | Avg FPS: {fps:.1}
            Avg frame: {avg:.2} ms | Best: {best:.2} ms | Worst: {worst:.2} ms
            Cells composed: {cells}
            "#,
            columns = config.columns,
            rows = config.rows,
            width = config.area.width,
            height = config.area.height,
            elapsed = elapsed,
            target = config.duration.as_secs_f64(),
            frames = self.frame_count,
            fps = fps_avg,
            avg = self.average_frame_ms(),
            best = self.fastest_frame_ms(),
            worst = self.slowest_frame_ms(),
            cells = self.cell_updates,
        )
    }
}
