use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use reptype::{
    app::{App, Control},
    app_dirs::AppDirs,
    clock::SystemClock,
    config::{Config, ConfigStore, FileConfigStore},
    corpus::Corpus,
    logging,
    runtime::{CrosstermEventSource, FixedTicker, Runner},
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};

const TICK_RATE_MS: u64 = 100;

/// a smoothed cursor follower and a sentence typing trainer for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Two terminal toys: a skeleton that eases after your mouse leaving a fading trail and click ripples, and a typing trainer that scores a random sentence by speed and errors."
)]
pub struct Cli {
    /// write the effective configuration to the config file and exit
    #[clap(long, global = true)]
    write_config: bool,

    #[clap(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug, Clone, strum_macros::Display)]
pub enum Mode {
    /// type a random sentence and get speed and error counts
    Type {
        /// custom sentence to type instead of a random one
        #[clap(short = 'p', long)]
        prompt: Option<String>,

        /// bundled sentence corpus to draw from
        #[clap(long)]
        corpus: Option<String>,
    },
    /// a skeleton that follows the mouse around
    Cursor {
        /// do not leave trail dots behind the pointer
        #[clap(long)]
        no_trail: bool,

        /// draw the follower bold
        #[clap(long)]
        glow: bool,

        /// fraction of the remaining distance covered per frame (0..1)
        #[clap(long)]
        smoothing: Option<f64>,
    },
}

impl Cli {
    /// Layer command line flags over the loaded configuration
    fn apply(&self, mut config: Config) -> Config {
        match &self.command {
            Mode::Type { corpus, .. } => {
                if let Some(corpus) = corpus {
                    config.corpus = corpus.clone();
                }
            }
            Mode::Cursor {
                no_trail,
                glow,
                smoothing,
            } => {
                if *no_trail {
                    config.trail_enabled = false;
                }
                if *glow {
                    config.glow = true;
                }
                if let Some(s) = smoothing {
                    config.smoothing = s.clamp(0.0, 1.0);
                }
            }
        }
        config
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(path) = AppDirs::log_path() {
        // logging is best effort; the app runs without it
        if let Err(err) = logging::init(&path) {
            eprintln!("logging disabled, cannot open {}: {err}", path.display());
        }
    }

    let store = FileConfigStore::new();
    let config = cli.apply(store.load());

    if cli.write_config {
        store.save(&config)?;
        println!("wrote {}", store.path().display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let (mut app, tick) = build_app(&cli, &config)?;
    tracing::info!(mode = %cli.command, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = start_tui(&mut terminal, &mut app, tick);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        DisableMouseCapture,
        LeaveAlternateScreen,
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(%err, "exited with error");
    }
    result
}

fn build_app(cli: &Cli, config: &Config) -> Result<(App, Duration), Box<dyn Error>> {
    let rng = App::with_entropy_rng();
    match &cli.command {
        Mode::Type { prompt, .. } => {
            let corpus = Corpus::load(&config.corpus)?;
            Ok((
                App::trainer(corpus, prompt.clone(), Box::new(SystemClock), rng),
                Duration::from_millis(TICK_RATE_MS),
            ))
        }
        Mode::Cursor { .. } => Ok((
            App::cursor(config, Box::new(SystemClock), rng),
            config.frame_interval(),
        )),
    }
}

fn start_tui<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick: Duration,
) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::new(tick));

    loop {
        terminal.draw(|f| f.render_widget(&*app, f.area()))?;

        if app.handle(runner.step()) == Control::Quit {
            break;
        }
    }

    Ok(())
}
