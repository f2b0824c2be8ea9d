use crate::config::Config;
use crate::error::AppError;
use crate::events::terminal::Handler as TerminalEventHandler;
use crate::state::State;
use crate::tasks::TaskStore;
use crate::ui::{self, BufferRenderer, Theme};
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::*;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io::stdout;
use tui_logger::{init_logger, set_default_level};

/// Oversees event processing, state management, and terminal output.
///
pub struct App {
    config: Config,
    store: TaskStore,
    state: State,
}

impl App {
    /// Start a new application according to the given configuration. Returns
    /// the result of the application execution.
    ///
    pub async fn start(config: Config) -> Result<()> {
        init_logger(LevelFilter::Trace).map_err(|e| AppError::Logger(format!("{:?}", e)))?;
        set_default_level(LevelFilter::Debug);

        info!("Starting application...");
        let theme = Theme::from_name(&config.theme_name).unwrap_or_else(|| {
            warn!(
                "Unknown theme '{}', available: {}",
                config.theme_name,
                Theme::available_themes().join(", ")
            );
            Theme::default()
        });
        let mut app = App {
            store: TaskStore::new(config.tasks_dir.clone()),
            state: State::new(theme, config.list, config.command_timeout()),
            config,
        };
        app.reload().await;
        app.state.initialize().await?;
        app.start_ui().await?;

        info!("Exiting application...");
        Ok(())
    }

    /// Read the tasks directory again and hand the result to the state. A
    /// failed read keeps the tasks already shown.
    ///
    async fn reload(&mut self) {
        match self.store.load_all().await {
            Ok(tasks) => {
                info!("Loaded {} tasks from {}", tasks.len(), self.store.dir().display());
                self.state.set_tasks(tasks);
            }
            Err(e) => error!("Failed to load tasks: {}", e),
        }
    }

    /// Begin the terminal event poll on a separate thread before starting the
    /// render loop on the main thread. Return the result following an exit
    /// request or unrecoverable error.
    ///
    async fn start_ui(&mut self) -> Result<()> {
        debug!(
            "Starting user interface on main thread (config: {:?})...",
            self.config.file_path()
        );
        let mut stdout = stdout();
        execute!(stdout, EnterAlternateScreen)?;
        enable_raw_mode()?;

        let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        terminal.hide_cursor()?;
        let size = terminal.size()?;
        let mut renderer = BufferRenderer::new(size.width, size.height);
        self.state.on_resize(size.width, size.height);

        let terminal_event_handler = TerminalEventHandler::new();
        let result = self
            .run(&mut terminal, &mut renderer, &terminal_event_handler)
            .await;
        self.state.dispose(&mut renderer);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Render after every processed event until an exit is requested.
    ///
    async fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        renderer: &mut BufferRenderer,
        events: &TerminalEventHandler,
    ) -> Result<()> {
        loop {
            self.state.render(renderer);
            terminal.draw(|frame| ui::present(frame, renderer))?;
            if !events.handle_next(&mut self.state, renderer)? {
                debug!("Received application exit request.");
                break;
            }
            if self.state.take_reload_request() {
                self.reload().await;
            }
        }
        Ok(())
    }
}
