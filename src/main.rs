use clap::Parser;
use std::process;

use admitdesk::cli::commands::{Cli, Commands};
use admitdesk::cli::{self, Context};
use admitdesk::config::DeskConfig;
use admitdesk::logging;

fn main() {
    let cli_args = Cli::parse();
    logging::init(cli_args.verbose);
    let json_output = cli_args.json;

    let config = match DeskConfig::load() {
        Ok(config) => config.with_overrides(cli_args.api_url.as_deref(), cli_args.student.as_deref()),
        Err(e) => process::exit(cli::report(Err(e), json_output)),
    };
    let ctx = Context {
        json: json_output,
        config,
    };

    let exit_code = match cli_args.command {
        Commands::Init => cli::init::run(json_output),
        Commands::Config(cmd) => cli::config::run(cmd, &ctx),
        Commands::Status => cli::status::run(&ctx),
        Commands::Backend(cmd) => cli::backend::run_backend(cmd, &ctx),
        Commands::Cache(cmd) => cli::backend::run_cache(cmd, &ctx),
        Commands::Profile(cmd) => cli::profile::run(cmd, &ctx),
        Commands::Activity(cmd) => cli::activity::run(cmd, &ctx),
        Commands::Essay(cmd) => cli::essay::run(cmd, &ctx),
        Commands::Portfolio(cmd) => cli::portfolio::run(cmd, &ctx),
        Commands::Learn(cmd) => cli::learn::run(cmd, &ctx),
    };

    process::exit(exit_code);
}
