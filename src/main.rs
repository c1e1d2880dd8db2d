use clap::Parser;

mod commands;
mod output;

use commands::{create, list};
use hotpot::generate::Outcome;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "create-hotpot")]
#[command(version = VERSION)]
#[command(about = "Scaffold a new project from a hotpot template")]
struct Cli {
    #[command(flatten)]
    create: create::CreateArgs,

    /// List available templates and exit
    #[arg(long)]
    list: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let result = if cli.list {
        list::run().map(|(listing, exit_code)| {
            print!("{}", listing);
            exit_code
        })
    } else {
        create::run(cli.create).map(|(outcome, exit_code)| {
            if let Outcome::Generated(report) = &outcome {
                hotpot::log_status!("create", "Generated {} in {}", report.template_id, report.target);
            }
            exit_code
        })
    };

    let exit_code = match result {
        Ok(exit_code) => exit_code,
        Err(err) => {
            output::print_error(&err);
            output::exit_code_for_error(err.code)
        }
    };

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
