#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use clap::Parser;
    use std::io;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};
    use xixi_snake::logger::{self, LogTarget};
    use xixi_snake::{
        CliRenderer, FoodSkin, Game, Input, Renderer, Session, Settings, Speed, Theme,
        TickOutcome, TimerAction,
    };

    #[derive(Parser, Debug)]
    #[command(name = "xixi-snake-cli", about = "Snake in the terminal")]
    pub struct Args {
        /// Tick speed: slow, normal or fast
        #[arg(long, default_value_t = Speed::default())]
        pub speed: Speed,

        /// Food sprite: angela or tangyuan
        #[arg(long, default_value_t = FoodSkin::default())]
        pub food: FoodSkin,

        /// Colour theme: light or dark
        #[arg(long, default_value_t = Theme::default())]
        pub theme: Theme,

        /// Seed for food placement, for repeatable rounds
        #[arg(long)]
        pub seed: Option<u64>,

        /// Append log lines to this file; without it nothing is logged
        #[arg(long)]
        pub log_file: Option<PathBuf>,
    }

    impl Args {
        pub fn settings(&self) -> Settings {
            Settings {
                speed: self.speed,
                food: self.food,
                theme: self.theme,
            }
        }
    }

    pub fn run() -> io::Result<()> {
        let args = Args::parse();

        // The terminal belongs to the game screen until cleanup
        match &args.log_file {
            Some(path) => logger::init_logger(LogTarget::File(path))?,
            None => logger::init_logger(LogTarget::Off)?,
        }

        let game = match args.seed {
            Some(seed) => Game::with_seed(seed),
            None => Game::new(),
        };
        let mut session = Session::new(game, args.settings());
        let mut renderer = CliRenderer::new();

        renderer.init()?;

        // Tick source: `Some(period)` while a round is running
        let mut tick_period: Option<Duration> = None;
        let mut last_tick = Instant::now();

        loop {
            if let Some(input) = renderer.poll_input()? {
                let quit = input == Input::Quit;
                match session.handle_input(input) {
                    TimerAction::Start(period) => {
                        tick_period = Some(period);
                        last_tick = Instant::now();
                    }
                    TimerAction::Stop => tick_period = None,
                    TimerAction::Keep => {}
                }
                if quit {
                    break;
                }
            }

            if let Some(period) = tick_period {
                if last_tick.elapsed() >= period {
                    last_tick = Instant::now();
                    if let TickOutcome::GameOver { .. } = session.tick() {
                        tick_period = None;
                    }
                }
            }

            renderer.render(&session)?;
        }

        renderer.cleanup()?;
        Ok(())
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    cli::run()
}

// The browser build is driven from `start_game` in the library.
#[cfg(target_arch = "wasm32")]
fn main() {}
