use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use log::{error, info};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use interactive_dialog::core::config::{self, CliOverrides};
use interactive_dialog::core::schema::load_dialog;
use interactive_dialog::core::selection::TeammateNameDisplay;
use interactive_dialog::core::state::Dialog;
use interactive_dialog::submit::HttpSubmitter;
use interactive_dialog::tui::{self, ExitReason};

#[derive(Parser)]
#[command(
    name = "interactive-dialog",
    about = "Fill in and submit an integration's interactive dialog"
)]
struct Args {
    /// Dialog request JSON (`{"url", "trigger_id", "dialog"}`)
    dialog_file: PathBuf,

    /// Submit to this URL instead of the one in the dialog file
    #[arg(long)]
    url: Option<String>,

    /// How user selections are labelled
    #[arg(long, value_enum)]
    name_display: Option<TeammateNameDisplay>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to interactive-dialog.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("interactive-dialog.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    info!("Interactive dialog starting with {}", args.dialog_file.display());

    match run(args) {
        Ok(ExitReason::Submitted) => {
            println!("Dialog submitted.");
            ExitCode::SUCCESS
        }
        Ok(ExitReason::Cancelled) => {
            println!("Dialog cancelled.");
            ExitCode::SUCCESS
        }
        Ok(ExitReason::Quit) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitReason, Box<dyn std::error::Error>> {
    let file_config = config::load_config()?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            name_display: args.name_display,
            url: args.url,
        },
    );

    let mut request = load_dialog(&args.dialog_file)?;
    if let Some(url) = resolved.url_override.clone() {
        info!("Submitting to override url {}", url);
        request.url = url;
    }

    let submitter = HttpSubmitter::new(resolved.auth_token.clone(), resolved.request_timeout)?;
    let dialog = Dialog::new(request, resolved.name_display);

    Ok(tui::run(dialog, Arc::new(submitter), resolved.directory)?)
}
