//! Execution of parsed subcommands.

use crate::backend::{DocumentApiClient, DocumentBackend};
use crate::cli::{Cli, Command, files, render, shell};
use crate::config::Config;
use crate::controller::{Confirm, Confirmed, DeletionOutcome, Dispatch, DocumentController};
use anyhow::{Context, Result};
use std::io::{BufRead, Write};

/// Confirmation read from the terminal.
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{prompt} [y/N] ");
        let _ = std::io::stderr().flush();
        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }
}

/// Run a parsed command line against the configured service.
pub async fn run(cli: Cli, config: &Config) -> Result<()> {
    let mut config = config.clone();
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url;
    }
    let client =
        DocumentApiClient::from_config(&config).context("failed to build document service client")?;
    tracing::debug!(base_url = client.base_url(), "Using document service");
    let controller = DocumentController::new(client);
    let default_case = config.default_case_id.as_deref();

    match cli.command {
        Command::List { case } => {
            controller
                .refresh_documents(case.as_deref().or(default_case))
                .await
                .context("failed to list documents")?;
            println!("{}", render::document_list(&controller.state()));
        }
        Command::Show { id } => {
            let document = controller
                .backend()
                .get_document(&id)
                .await
                .with_context(|| format!("failed to fetch document {id}"))?;
            println!("{}", render::document_line(&document, false));
        }
        Command::Upload { paths, case } => {
            let paths = files::collect_upload_paths(&paths)?;
            let files = files::load_upload_files(&paths).await?;
            let report = controller
                .upload(files, case.as_deref().or(default_case))
                .await?;
            println!("{}", render::upload_report(&report));
            report.into_result()?;
        }
        Command::Summarize { ids, style } => {
            select_all(&controller, &ids);
            if let Dispatch::Applied(summary) = controller.summarize(style).await? {
                println!("{}", summary.text);
            }
        }
        Command::Chat { ids, message } => {
            select_all(&controller, &ids);
            if let Dispatch::Applied(answer) = controller.chat(&message).await? {
                println!("{}", answer.text);
            }
        }
        Command::Delete { id, yes } => {
            let confirm: &dyn Confirm = if yes { &Confirmed } else { &TerminalConfirm };
            match controller.delete_document(&id, confirm).await? {
                DeletionOutcome::Cancelled => println!("cancelled"),
                DeletionOutcome::Deleted(_) => println!("deleted {id}"),
            }
        }
        Command::Shell => shell::run_shell(&controller, default_case).await?,
    }
    Ok(())
}

fn select_all<B: DocumentBackend>(controller: &DocumentController<B>, ids: &[String]) {
    for id in ids {
        if !controller.state().selection().contains(id) {
            controller.toggle(id);
        }
    }
}
