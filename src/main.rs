//! bandview - terminal demo host for the lineband engine.
//!
//! Opens a text file and renders it with a tinted band behind every
//! odd-numbered line. Scrolling and resizing are translated into the same
//! layout/viewport events a real editor host would raise, so the whole
//! engine path is exercised end to end.

use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use lineband::band::{attach, BandBinding};
use lineband::buffer::LineIndex;
use lineband::config::{load_config_file, ResolvedConfig};
use lineband::host::events::{
    LayoutChanged, SnapshotId, ViewEvents, ViewportLeftChanged, ViewportWidthChanged,
};
use lineband::host::TextView;
use lineband::layer::VecLayer;
use lineband::model::{BufferOffset, Extent, LineLayout, LineNumber, ViewportSnapshot};
use lineband::view::{band_color, banded_rows, draw, Screen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::cell::Cell;
use std::error::Error;
use std::path::PathBuf;
use std::rc::Rc;
use tracing::info;

/// Render a text file with alternating line bands.
#[derive(Parser, Debug)]
#[command(name = "bandview")]
#[command(version)]
#[command(about = "Terminal viewer demonstrating the lineband decoration engine")]
struct Args {
    /// Path to the text file to display.
    file: PathBuf,

    /// Fixed band opacity, 0-255 (overrides config file).
    #[arg(long)]
    opacity: Option<u8>,

    /// Derive band opacity from the view background instead of a fixed
    /// value.
    #[arg(long)]
    opacity_from_viewport: bool,

    /// Path to configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to log file for tracing output.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Demo implementation of the host view: a [`LineIndex`] plus a shared
/// mutable viewport cell the event loop updates on resize and pan.
#[derive(Clone)]
struct TermView {
    index: Rc<LineIndex>,
    viewport: Rc<Cell<ViewportSnapshot>>,
}

impl TextView for TermView {
    fn viewport(&self) -> ViewportSnapshot {
        self.viewport.get()
    }

    fn line_number_at(&self, offset: BufferOffset) -> LineNumber {
        self.index.line_number_at(offset)
    }
}

/// Event-loop state for the demo host.
struct App {
    lines: Vec<String>,
    index: Rc<LineIndex>,
    viewport: Rc<Cell<ViewportSnapshot>>,
    events: ViewEvents,
    binding: BandBinding<TermView, VecLayer>,
    snapshot: SnapshotId,
    top_line: usize,
    left_col: usize,
    height: usize,
}

impl App {
    fn new(text: &str, config: &ResolvedConfig, width: u16, height: u16) -> Result<Self, Box<dyn Error>> {
        let lines: Vec<String> = text.lines().map(str::to_string).collect();
        let index = Rc::new(LineIndex::from_text(text));
        let viewport = Rc::new(Cell::new(ViewportSnapshot::new(
            width as f64,
            0.0,
            255, // opaque terminal background
        )));
        let mut events = ViewEvents::new();
        let view = TermView {
            index: index.clone(),
            viewport: viewport.clone(),
        };
        let binding = attach(Some(view), VecLayer::new(), config.style, &mut events)?;

        let mut app = Self {
            lines,
            index,
            viewport,
            events,
            binding,
            snapshot: SnapshotId::new(1),
            top_line: 0,
            left_col: 0,
            height: height as usize,
        };
        app.full_layout()?;
        Ok(app)
    }

    fn layouts(&self, range: std::ops::Range<usize>) -> Vec<LineLayout> {
        range
            .filter_map(|n| {
                let line = LineNumber::new(n);
                let start = self.index.line_start(line)?;
                let end = self.index.line_end(line)?;
                Some(LineLayout::new(Extent::new(start, end), n as f64, 1.0))
            })
            .collect()
    }

    fn visible_range(&self) -> std::ops::Range<usize> {
        let end = (self.top_line + self.height).min(self.lines.len());
        self.top_line..end
    }

    /// Emit a full-invalidation layout pass over the visible set, as a host
    /// does when line structure changes (here: first layout after load).
    fn full_layout(&mut self) -> Result<(), Box<dyn Error>> {
        let old = self.snapshot;
        self.snapshot = SnapshotId::new(old.get() + 1);
        let visible = self.layouts(self.visible_range());
        self.events.layout.dispatch(&LayoutChanged {
            old_snapshot: old,
            new_snapshot: self.snapshot,
            includes_line_edits: true,
            reformatted: vec![],
            visible,
        })?;
        Ok(())
    }

    /// Scroll vertically, reporting newly exposed lines as an incremental
    /// layout pass.
    fn scroll(&mut self, delta: isize) -> Result<(), Box<dyn Error>> {
        let max_top = self.lines.len().saturating_sub(1);
        let new_top = self
            .top_line
            .saturating_add_signed(delta)
            .min(max_top);
        if new_top == self.top_line {
            return Ok(());
        }

        let old_range = self.visible_range();
        self.top_line = new_top;
        let new_range = self.visible_range();
        let exposed: Vec<LineLayout> = self
            .layouts(new_range)
            .into_iter()
            .filter(|l| {
                let n = self.index.line_number_at(l.extent.start).get();
                !old_range.contains(&n)
            })
            .collect();

        self.events.layout.dispatch(&LayoutChanged {
            old_snapshot: self.snapshot,
            new_snapshot: self.snapshot,
            includes_line_edits: false,
            reformatted: exposed,
            visible: vec![],
        })?;
        Ok(())
    }

    /// Pan horizontally, broadcasting the new left edge to all bands.
    fn pan(&mut self, delta: isize) -> Result<(), Box<dyn Error>> {
        let new_left = self.left_col.saturating_add_signed(delta);
        if new_left == self.left_col {
            return Ok(());
        }
        self.left_col = new_left;

        let mut snapshot = self.viewport.get();
        snapshot.left = new_left as f64;
        self.viewport.set(snapshot);

        self.events
            .left
            .dispatch(&ViewportLeftChanged { left: new_left as f64 })?;
        Ok(())
    }

    /// Handle a terminal resize: broadcast the new width, then report any
    /// newly exposed rows.
    fn resize(&mut self, width: u16, height: u16) -> Result<(), Box<dyn Error>> {
        let mut snapshot = self.viewport.get();
        snapshot.width = width as f64;
        self.viewport.set(snapshot);
        self.events
            .width
            .dispatch(&ViewportWidthChanged { width: width as f64 })?;

        let old_range = self.visible_range();
        self.height = height as usize;
        let exposed: Vec<LineLayout> = self
            .layouts(self.visible_range())
            .into_iter()
            .filter(|l| {
                let n = self.index.line_number_at(l.extent.start).get();
                !old_range.contains(&n)
            })
            .collect();
        if !exposed.is_empty() {
            self.events.layout.dispatch(&LayoutChanged {
                old_snapshot: self.snapshot,
                new_snapshot: self.snapshot,
                includes_line_edits: false,
                reformatted: exposed,
                visible: vec![],
            })?;
        }
        Ok(())
    }
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
    config: &ResolvedConfig,
) -> Result<(), Box<dyn Error>> {
    loop {
        let (bands, brush) = {
            let renderer = app.binding.renderer().borrow();
            (renderer.layer().bands(), renderer.brush())
        };
        let banded = banded_rows(&bands);
        let fill = band_color(brush, config.base_background);

        terminal.draw(|frame| {
            draw(
                frame,
                &Screen {
                    lines: &app.lines,
                    top_line: app.top_line,
                    left_col: app.left_col,
                    banded: &banded,
                    fill,
                },
            )
        })?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Up | KeyCode::Char('k') => app.scroll(-1)?,
                KeyCode::Down | KeyCode::Char('j') => app.scroll(1)?,
                KeyCode::PageUp => app.scroll(-(app.height as isize))?,
                KeyCode::PageDown => app.scroll(app.height as isize)?,
                KeyCode::Left | KeyCode::Char('h') => app.pan(-1)?,
                KeyCode::Right | KeyCode::Char('l') => app.pan(1)?,
                KeyCode::Home => {
                    app.top_line = 0;
                    app.full_layout()?;
                }
                _ => {}
            },
            Event::Resize(width, height) => app.resize(width, height)?,
            _ => {}
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    // Defaults → config file → CLI flags.
    let mut config = match load_config_file(args.config.clone())? {
        Some(file) => ResolvedConfig::from_file(&file),
        None => ResolvedConfig::default(),
    };
    if args.opacity_from_viewport {
        config.style.opacity = lineband::band::OpacitySource::FromViewport;
    } else if let Some(alpha) = args.opacity {
        config.style.opacity = lineband::band::OpacitySource::Fixed(alpha);
    }
    if let Some(path) = args.log_file {
        config.log_file_path = path;
    }

    lineband::logging::init(&config.log_file_path)?;
    info!(file = %args.file.display(), "starting bandview");

    let text = std::fs::read_to_string(&args.file)?;

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(&text, &config, size.width, size.height)?;
    let result = run(&mut terminal, &mut app, &config);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    result
}
