use crate::demo::{list_complaints, run_assessment, run_demo, AssessArgs, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use jeevan_triage::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Jeevan Triage",
    about = "Run the symptom assessment service or walk through an assessment from the terminal",
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
    /// List the complaints offered in the catalog
    Complaints,
    /// Answer one complaint's questions and print the recommendation
    Assess(AssessArgs),
    /// Run scripted assessments covering each outcome and an abandoned session
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Complaints => {
            list_complaints();
            Ok(())
        }
        Command::Assess(args) => run_assessment(args),
        Command::Demo(args) => run_demo(args),
    }
}
