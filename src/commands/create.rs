use clap::Args;

use hotpot::catalog;
use hotpot::defaults;
use hotpot::fetch::fetcher_for;
use hotpot::generate::{GenerationRequest, Generator, Outcome};
use hotpot::prompt::PromptEngine;
use hotpot::Error;

use super::CmdResult;

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Directory to create the project in ("." for the current directory)
    pub target_dir: Option<String>,

    /// Template id; pass the flag alone to pick interactively
    #[arg(
        short,
        long,
        value_name = "ID",
        num_args = 0..=1,
        default_missing_value = ""
    )]
    pub template: Option<String>,
}

pub fn run(args: CreateArgs) -> CmdResult<Outcome> {
    let defaults = defaults::load_defaults()?;
    let cwd = std::env::current_dir().map_err(|e| {
        Error::internal_io(e.to_string(), Some("read current directory".to_string()))
    })?;

    let fetcher = fetcher_for(&defaults);
    let mut prompter = PromptEngine::stdio();

    let outcome = Generator::new(
        cwd,
        catalog::builtin(),
        &mut prompter,
        fetcher.as_ref(),
        &defaults,
    )
    .run(GenerationRequest {
        target_dir: args.target_dir,
        template: args.template,
    })?;

    Ok((outcome, 0))
}
