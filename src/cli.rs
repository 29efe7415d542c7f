use clap::{command, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use crate::config::RunOptions;

pub fn build_cli() -> Command {
    command!()
        .about("interactive chatbot that keeps its conversation in a remote assistant thread")
        .arg(
            Arg::new("env-file")
                .long("env-file")
                .short('e')
                .value_name("PATH")
                .value_parser(clap::value_parser!(PathBuf))
                .help("dotenv file loaded before reading OPENAI_API_KEY (default: .env)"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .short('m')
                .value_name("MODEL")
                .help("chat completion model (default: OPENAI_MODEL or gpt-4o)"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .short('u')
                .value_name("URL")
                .help("API base URL (default: OPENAI_BASE_URL or https://api.openai.com/v1)"),
        )
        .arg(
            Arg::new("markdown")
                .long("markdown")
                .action(ArgAction::SetTrue)
                .help("render assistant replies as markdown in the terminal"),
        )
        .arg(
            Arg::new("show-history")
                .long("show-history")
                .action(ArgAction::SetTrue)
                .help("print the full thread history after every exchange"),
        )
}

pub fn parse_run_options(matches: &ArgMatches) -> RunOptions {
    RunOptions {
        env_file: matches.get_one::<PathBuf>("env-file").cloned(),
        model: matches.get_one::<String>("model").cloned(),
        base_url: matches.get_one::<String>("base-url").cloned(),
        render_markdown: matches.get_flag("markdown"),
        show_history: matches.get_flag("show-history"),
    }
}
