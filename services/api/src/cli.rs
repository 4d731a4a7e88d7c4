use crate::commands::{run_apply, run_catalog, run_posts, ApplyArgs, PostsArgs};
use crate::demo::{run_demo, DemoArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use tuition_board::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Tuition Board",
    about = "Browse, filter, and apply to tuition posts from the command line",
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
    /// List posts from the marketplace backend, optionally filtered
    Posts(PostsArgs),
    /// Submit an application to a post
    Apply(ApplyArgs),
    /// Print the class levels and subjects offered by the filter form
    Catalog,
    /// Walk through browsing, logging in, and applying against sample data
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
        Command::Posts(args) => run_posts(args).await,
        Command::Apply(args) => run_apply(args).await,
        Command::Catalog => {
            run_catalog();
            Ok(())
        }
        Command::Demo(args) => run_demo(args).await,
    }
}
