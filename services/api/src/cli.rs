use crate::demo::{list_tests, run_demo, run_score, DemoArgs, ScoreArgs, TestsListArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use psyroom::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Psyroom",
    about = "Score psychometric tests and serve the attempt API from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the test catalog
    Tests {
        #[command(subcommand)]
        command: TestsCommand,
    },
    /// Score a CSV answer sheet against one test
    Score(ScoreArgs),
    /// Score sample answers for every built-in test and print the results
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum TestsCommand {
    /// List the tests available in the catalog
    List(TestsListArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Load test definitions from a JSON file instead of the built-in catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Tests {
            command: TestsCommand::List(args),
        } => list_tests(args),
        Command::Score(args) => run_score(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_requires_test_and_answers() {
        let cli = Cli::try_parse_from([
            "psyroom",
            "score",
            "--test",
            "work-style",
            "--answers",
            "sheet.csv",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.test, "work-style");
                assert_eq!(args.answers, PathBuf::from("sheet.csv"));
                assert!(args.json);
                assert!(args.catalog.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["psyroom", "score", "--test", "work-style"]).is_err());
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["psyroom"]).expect("no arguments parse");
        assert!(cli.command.is_none());
    }
}
