use crate::demo::{
    run_candidate_export, run_demo, run_document_render, CandidateExportArgs, DemoArgs,
    DocumentRenderArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use invigilator_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Invigilator Portal",
    about = "Run the invigilator registration portal or its offline tools",
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
    /// Offline document tools
    Documents {
        #[command(subcommand)]
        command: DocumentsCommand,
    },
    /// Candidate data tools working on the configured database
    Candidates {
        #[command(subcommand)]
        command: CandidatesCommand,
    },
    /// Walk through publish, signup, submission, approval, and rendering in memory
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum DocumentsCommand {
    /// Render the document bundle from profile and exam JSON files
    Render(DocumentRenderArgs),
}

#[derive(Subcommand, Debug)]
enum CandidatesCommand {
    /// Write the candidate list as CSV
    Export(CandidateExportArgs),
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
        Command::Documents {
            command: DocumentsCommand::Render(args),
        } => run_document_render(args),
        Command::Candidates {
            command: CandidatesCommand::Export(args),
        } => run_candidate_export(args),
        Command::Demo(args) => run_demo(args),
    }
}
