mod commands;
mod terminal;

use std::process::ExitCode;

use commands::{CommandLine, scan};
use terminal::{logging, print};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.quiet);
    print::banner(commands.quiet);

    match scan::scan(&commands).await {
        Ok(()) => {
            print::end_of_program(commands.quiet);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
