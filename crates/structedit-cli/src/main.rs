use anyhow::Result;
use crossterm::{
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
        supports_keyboard_enhancement,
    },
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction as LayoutDirection, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::{
    env,
    fs::File,
    io::{Stdout, stdout},
    path::PathBuf,
    process,
    time::Duration,
};
use structedit_config::Config;
use structedit_engine::image::get_selected_image_widget;
use structedit_engine::model::modify_selection;
use structedit_engine::tree::TEXT_NAME;
use structedit_engine::{
    Direction, Editor, InputOutcome, Key, KeyInput, Modifiers, Position, RawInput, Selection, Unit,
};

/// Without release reports a key counts as released once no press of it has
/// arrived for this long. Longer than common auto-repeat delays, so a held
/// key stays one gesture.
const SYNTHETIC_RELEASE_AFTER: Duration = Duration::from_millis(700);

const DEFAULT_DATA: &str = concat!(
    "<paragraph>Hold backspace here[]</paragraph>",
    r#"<image alt="a cat"><caption>A caption you cannot backspace out of</caption></image>"#,
    r#"<paragraph>An inline <imageInline alt="dot"></imageInline> image</paragraph>"#,
);

struct App {
    editor: Editor,
    /// The terminal reports key releases; otherwise releases are synthesized.
    key_releases: bool,
    /// Pressed key still waiting for its synthetic release.
    pending_release: Option<KeyInput>,
    last_input: String,
    last_outcome: Option<InputOutcome>,
}

impl App {
    fn new(config: Config, data: &str, key_releases: bool) -> Result<Self> {
        let mut editor = Editor::builder()
            .with_config(config)
            .with_image_block()
            .with_image_inline()
            .build();
        editor.set_data(data)?;

        Ok(Self {
            editor,
            key_releases,
            pending_release: None,
            last_input: String::new(),
            last_outcome: None,
        })
    }

    fn handle_key(&mut self, key: KeyEvent) {
        let input = KeyInput::new(to_key(key.code)).with_modifiers(to_modifiers(key.modifiers));
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                // Auto-repeat arrives as more presses of the same key.
                if let Some(previous) = self.pending_release.take_if(|pending| *pending != input) {
                    self.release(previous);
                }
                let outcome = self.editor.handle(RawInput::KeyDown(input));
                self.last_input = format!("keydown {:?}", input.key);
                self.last_outcome = Some(outcome);
                if !outcome.prevented {
                    self.default_action(input);
                }
                if !self.key_releases {
                    self.pending_release = Some(input);
                }
            }
            KeyEventKind::Release => self.release(input),
        }
    }

    fn release(&mut self, input: KeyInput) {
        self.editor.handle(RawInput::KeyUp(input));
        self.last_input = format!("keyup {:?}", input.key);
    }

    /// Send the synthetic release of a key that went quiet.
    fn flush_release(&mut self) {
        if let Some(pending) = self.pending_release.take() {
            self.release(pending);
        }
    }

    /// What the "platform" does with keys the editor left alone.
    fn default_action(&mut self, input: KeyInput) {
        match input.key {
            Key::ArrowLeft => self.move_caret(Direction::Backward),
            Key::ArrowRight => self.move_caret(Direction::Forward),
            Key::Char('o') if input.modifiers.ctrl => {
                if let Err(e) = self.editor.insert_image(&[("alt", "new picture")]) {
                    log::warn!("image not inserted: {e}");
                }
            }
            Key::Char(c) if !input.modifiers.ctrl && !input.modifiers.alt => self.type_char(c),
            _ => {}
        }
    }

    fn move_caret(&mut self, direction: Direction) {
        self.editor.change(|writer| {
            let mut selection = writer.selection().clone();
            modify_selection(
                writer.tree(),
                writer.schema(),
                &mut selection,
                direction,
                Unit::Character,
            );
            if let Some(focus) = selection.focus() {
                writer.set_selection(Selection::collapsed_at(focus));
            }
        });
    }

    fn type_char(&mut self, c: char) {
        self.editor.change(|writer| {
            let Some(position) = writer.selection().first_position() else {
                return;
            };
            if !writer.selection().is_collapsed()
                || !writer
                    .schema()
                    .check_child_at(writer.tree(), position, TEXT_NAME)
            {
                return;
            }
            let text = writer.create_text(&c.to_string());
            writer.insert(text, position);
            writer.set_selection(Selection::collapsed_at(Position::new(
                position.parent,
                position.offset + 1,
            )));
        });
    }

    fn status_lines(&self) -> Vec<Line<'_>> {
        let view = self.editor.view();
        let widget = get_selected_image_widget(view.tree(), view.widgets(), view.selection())
            .map(|figure| view.widgets().get_label(view.tree(), figure))
            .unwrap_or_else(|| "-".to_string());
        let typing = self.editor.typing();

        vec![
            Line::from(vec![
                Span::raw(format!("last: {} ", self.last_input)),
                Span::raw(match self.last_outcome {
                    Some(outcome) if outcome.prevented => "(handled) ",
                    Some(_) => "(default) ",
                    None => "",
                }),
            ]),
            Line::from(format!(
                "gesture active: {} | snapshot: {} | scroll requests: {}",
                typing.observer().is_gesture_active(),
                typing.restorer().snapshot().is_some(),
                view.scroll_requests()
            )),
            Line::from(format!("selected widget: {widget}")),
            Line::from(format!("platform: {:?}", self.editor.platform())),
            Line::from(if self.key_releases {
                "key releases: reported by the terminal".to_string()
            } else {
                format!(
                    "key releases: synthesized {}ms after the last press",
                    SYNTHETIC_RELEASE_AFTER.as_millis()
                )
            }),
        ]
    }
}

fn to_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Delete => Key::Delete,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Left => Key::ArrowLeft,
        KeyCode::Right => Key::ArrowRight,
        KeyCode::Char(c) => Key::Char(c),
        _ => Key::Other,
    }
}

fn to_modifiers(modifiers: KeyModifiers) -> Modifiers {
    Modifiers {
        ctrl: modifiers.contains(KeyModifiers::CONTROL),
        alt: modifiers.contains(KeyModifiers::ALT),
        shift: modifiers.contains(KeyModifiers::SHIFT),
        meta: modifiers.contains(KeyModifiers::SUPER) || modifiers.contains(KeyModifiers::META),
    }
}

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} [--config <path>] [document-data]");
    process::exit(1);
}

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let mut config_path = None;
    let mut data = None;
    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => match rest.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => usage(&args[0]),
            },
            _ if data.is_none() => data = Some(arg.clone()),
            _ => usage(&args[0]),
        }
    }

    let config_path = config_path.unwrap_or_else(Config::config_path);
    let config = match Config::load_from_path(&config_path) {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    // The terminal belongs to the UI, so logs only go to a file.
    if let Some(log_file) = &config.log_file {
        let file = File::create(log_file)?;
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    log::info!("structedit-cli starting, config {}", config_path.display());

    let key_releases = supports_keyboard_enhancement().unwrap_or(false);
    let mut app = match App::new(config, data.as_deref().unwrap_or(DEFAULT_DATA), key_releases) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: Invalid document data: {e}");
            process::exit(1);
        }
    };

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if key_releases {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    if key_releases {
        execute!(terminal.backend_mut(), PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if !event::poll(SYNTHETIC_RELEASE_AFTER)? {
            app.flush_release();
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.code == KeyCode::Esc && key.kind != KeyEventKind::Release {
                return Ok(());
            }
            app.handle_key(key);
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(LayoutDirection::Vertical)
        .margin(1)
        .constraints([Constraint::Min(0), Constraint::Length(7), Constraint::Length(1)])
        .split(f.area());
    let panels = Layout::default()
        .direction(LayoutDirection::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let model = Paragraph::new(app.editor.data())
        .block(Block::default().borders(Borders::ALL).title("Model"))
        .wrap(Wrap { trim: false });
    f.render_widget(model, panels[0]);

    let view = Paragraph::new(app.editor.view_data())
        .block(Block::default().borders(Borders::ALL).title("View"))
        .wrap(Wrap { trim: false });
    f.render_widget(view, panels[1]);

    let status = Paragraph::new(app.status_lines())
        .block(Block::default().borders(Borders::ALL).title("Pipeline"));
    f.render_widget(status, rows[1]);

    let help = Line::from(vec![
        Span::raw("Esc: Quit | "),
        Span::raw("Backspace/Delete (+Ctrl or Alt for words) | "),
        Span::raw("←/→: Move | Ctrl-O: Insert image"),
    ]);
    f.render_widget(Paragraph::new(vec![help]), rows[2]);
}
