mod commands;
mod context;
mod utils;

use clap::Parser;
use context::Context;
use utils::arg_man::Cli;
use utils::exit_codes::ExitCode;
use utils::tui;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let mut context = Context::new();
    let code = match commands::dispatch(cli.command, &mut context) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            tui::write_error(&e);
            ExitCode::Error
        }
    };
    std::process::exit(code.into());
}
