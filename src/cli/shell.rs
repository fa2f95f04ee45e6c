//! Interactive session over a single controller.

use crate::backend::{DocumentBackend, SummaryStyle};
use crate::cli::{files, render};
use crate::controller::{
    Confirm, ControllerError, DELETE_PROMPT, DeletionOutcome, Dispatch, DocumentController,
};
use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

const HELP: &str = "\
commands:
  ls [case|--all]     refresh the document list, optionally switching the case filter
  sel <id>            toggle a document in the selection
  clear               clear the selection
  stage <paths...>    stage files or directories for upload
  case <tag>          set the case tag for the next upload (empty clears it)
  upload              upload the staged files
  sum [style]         summarize the selection (brief, detailed, key_points)
  ask <text>          ask a question about the selection
  rm <id>             delete a document
  state               show the current selection and results
  stats               show session counters
  help                show this help
  quit                leave the shell";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Refresh the list; `Some("")` clears the case filter.
    List(Option<String>),
    /// Toggle a document after checking it exists.
    Select(String),
    /// Empty the selection.
    Clear,
    /// Stage files for upload.
    Stage(Vec<PathBuf>),
    /// Set the upload case tag.
    Case(String),
    /// Upload the staged files.
    Upload,
    /// Summarize with the given style, or the last one used.
    Summarize(Option<SummaryStyle>),
    /// Ask a question.
    Ask(String),
    /// Delete a document.
    Remove(String),
    /// Show the controller state.
    State,
    /// Show session counters.
    Stats,
    /// Show the command list.
    Help,
    /// Leave the shell.
    Quit,
}

/// Whether the shell keeps reading after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Read the next line.
    Continue,
    /// Stop the session.
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb {
        "ls" | "list" => match rest {
            "" => ShellCommand::List(None),
            "--all" => ShellCommand::List(Some(String::new())),
            case => ShellCommand::List(Some(case.to_string())),
        },
        "sel" | "select" => ShellCommand::Select(required(rest, "sel <id>")?),
        "clear" => ShellCommand::Clear,
        "stage" => {
            if rest.is_empty() {
                return Err("usage: stage <paths...>".into());
            }
            ShellCommand::Stage(rest.split_whitespace().map(PathBuf::from).collect())
        }
        "case" => ShellCommand::Case(rest.to_string()),
        "upload" => ShellCommand::Upload,
        "sum" | "summarize" => match rest {
            "" => ShellCommand::Summarize(None),
            style => ShellCommand::Summarize(Some(style.parse()?)),
        },
        "ask" => ShellCommand::Ask(required(rest, "ask <text>")?),
        "rm" | "delete" => ShellCommand::Remove(required(rest, "rm <id>")?),
        "state" => ShellCommand::State,
        "stats" => ShellCommand::Stats,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{other}'; type 'help'")),
    };
    Ok(Some(command))
}

fn required(value: &str, usage: &str) -> Result<String, String> {
    if value.is_empty() {
        Err(format!("usage: {usage}"))
    } else {
        Ok(value.to_string())
    }
}

/// Run the read-eval-print loop on stdin until `quit` or end of input.
pub async fn run_shell<B>(controller: &DocumentController<B>, default_case: Option<&str>) -> Result<()>
where
    B: DocumentBackend,
{
    let mut stdout = std::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    controller.set_default_case_tag(default_case);
    if let Err(err) = controller.refresh_documents(default_case).await {
        writeln!(stdout, "error: {err}")?;
    }
    writeln!(stdout, "{}", render::document_list(&controller.state()))?;

    loop {
        write!(stdout, "ragdesk> ")?;
        stdout.flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                writeln!(stdout, "{message}")?;
                continue;
            }
        };

        let approved = match &command {
            ShellCommand::Remove(_) => ask(&mut lines, &mut stdout).await?,
            _ => false,
        };
        let confirm = move |_: &str| approved;
        if execute(controller, command, &confirm, &mut stdout).await? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

async fn ask<W: Write>(lines: &mut Lines<BufReader<Stdin>>, out: &mut W) -> Result<bool> {
    write!(out, "{DELETE_PROMPT} [y/N] ")?;
    out.flush()?;
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

/// Execute one command against the controller, writing results to `out`.
///
/// Controller failures are printed and do not end the session.
pub async fn execute<B, W>(
    controller: &DocumentController<B>,
    command: ShellCommand,
    confirm: &dyn Confirm,
    out: &mut W,
) -> Result<Flow>
where
    B: DocumentBackend,
    W: Write,
{
    let result: Result<(), ControllerError> = match command {
        ShellCommand::List(case) => controller
            .refresh_documents(case.as_deref())
            .await
            .map(|_| {
                let _ = writeln!(out, "{}", render::document_list(&controller.state()));
            }),
        ShellCommand::Select(id) => controller.select_document(&id).await.map(|selected| {
            let verb = if selected { "selected" } else { "deselected" };
            let _ = writeln!(out, "{verb} {id}");
        }),
        ShellCommand::Clear => {
            controller.clear_selection();
            writeln!(out, "selection cleared")?;
            Ok(())
        }
        ShellCommand::Stage(inputs) => {
            let paths = match files::collect_upload_paths(&inputs) {
                Ok(paths) => paths,
                Err(err) => {
                    writeln!(out, "error: {err:#}")?;
                    return Ok(Flow::Continue);
                }
            };
            match files::load_upload_files(&paths).await {
                Ok(loaded) => {
                    writeln!(out, "staged {} file(s)", loaded.len())?;
                    controller.stage_files(loaded);
                }
                Err(err) => writeln!(out, "error: {err:#}")?,
            }
            Ok(())
        }
        ShellCommand::Case(tag) => {
            controller.set_case_tag(&tag);
            Ok(())
        }
        ShellCommand::Upload => controller.upload_staged().await.map(|report| {
            let _ = writeln!(out, "{}", render::upload_report(&report));
        }),
        ShellCommand::Summarize(style) => {
            let style = style.unwrap_or_else(|| controller.state().summary_style());
            controller.summarize(style).await.map(|dispatch| match dispatch {
                Dispatch::Applied(summary) => {
                    let _ = writeln!(out, "{}", summary.text);
                }
                Dispatch::Discarded => {
                    let _ = writeln!(out, "selection changed; summary discarded");
                }
            })
        }
        ShellCommand::Ask(text) => {
            controller.set_chat_draft(&text);
            controller.send_chat_draft().await.map(|dispatch| match dispatch {
                Dispatch::Applied(answer) => {
                    let _ = writeln!(out, "{}", answer.text);
                }
                Dispatch::Discarded => {
                    let _ = writeln!(out, "selection changed; answer discarded");
                }
            })
        }
        ShellCommand::Remove(id) => {
            controller
                .delete_document(&id, confirm)
                .await
                .map(|outcome| match outcome {
                    DeletionOutcome::Cancelled => {
                        let _ = writeln!(out, "cancelled");
                    }
                    DeletionOutcome::Deleted(_) => {
                        let _ = writeln!(out, "deleted {id}");
                    }
                })
        }
        ShellCommand::State => {
            writeln!(out, "{}", render::state_overview(&controller.state()))?;
            Ok(())
        }
        ShellCommand::Stats => {
            writeln!(out, "{}", serde_json::to_string_pretty(&controller.metrics())?)?;
            Ok(())
        }
        ShellCommand::Help => {
            writeln!(out, "{HELP}")?;
            Ok(())
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    };

    if let Err(err) = result {
        writeln!(out, "error: {err}")?;
    }
    Ok(Flow::Continue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::UploadFile;
    use crate::controller::testing::{Call, FakeBackend};

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn parses_commands_and_arguments() {
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(
            parse_line("sel doc1"),
            Ok(Some(ShellCommand::Select("doc1".into())))
        );
        assert_eq!(
            parse_line("ask  what was decided? "),
            Ok(Some(ShellCommand::Ask("what was decided?".into())))
        );
        assert_eq!(
            parse_line("sum key_points"),
            Ok(Some(ShellCommand::Summarize(Some(SummaryStyle::KeyPoints))))
        );
        assert_eq!(parse_line("ls --all"), Ok(Some(ShellCommand::List(Some(String::new())))));
        assert_eq!(parse_line("case"), Ok(Some(ShellCommand::Case(String::new()))));
    }

    #[test]
    fn rejects_missing_arguments_and_unknown_verbs() {
        assert_eq!(parse_line("sel"), Err("usage: sel <id>".into()));
        assert!(parse_line("sum verbose").is_err());
        assert!(parse_line("frobnicate").unwrap_err().contains("unknown command"));
    }

    #[tokio::test]
    async fn session_selects_summarizes_and_reports_errors() {
        let controller = DocumentController::new(FakeBackend::new().with_documents(&["doc1"]));
        let decline = |_: &str| false;
        let mut out = Vec::new();

        for line in ["sel doc1", "sum detailed", "ask", "ask why?", "rm doc1"] {
            match parse_line(line) {
                Ok(Some(command)) => {
                    execute(&controller, command, &decline, &mut out)
                        .await
                        .expect("execute");
                }
                Ok(None) => {}
                Err(message) => out.extend_from_slice(format!("{message}\n").as_bytes()),
            }
        }

        assert_eq!(
            output(out),
            "selected doc1\n\
             detailed summary of doc1\n\
             usage: ask <text>\n\
             answer to: why?\n\
             cancelled\n"
        );
        assert!(
            !controller
                .backend()
                .calls()
                .iter()
                .any(|call| matches!(call, Call::Delete(_)))
        );
    }

    #[tokio::test]
    async fn staged_upload_uses_default_case_until_overridden() {
        let controller = DocumentController::new(FakeBackend::new());
        controller.set_default_case_tag(Some("CASE-1"));
        let allow = |_: &str| true;
        let mut out = Vec::new();

        for tag in [None, Some("CASE-2")] {
            controller.stage_files(vec![UploadFile::from_bytes("a.pdf", b"pdf".to_vec())]);
            if let Some(tag) = tag {
                execute(&controller, ShellCommand::Case(tag.into()), &allow, &mut out)
                    .await
                    .expect("case");
            }
            execute(&controller, ShellCommand::Upload, &allow, &mut out)
                .await
                .expect("upload");
        }

        let uploads: Vec<_> = controller
            .backend()
            .calls()
            .into_iter()
            .filter(|call| matches!(call, Call::Upload { .. }))
            .collect();
        assert_eq!(
            uploads,
            vec![
                Call::Upload {
                    filename: "a.pdf".into(),
                    case_id: Some("CASE-1".into()),
                },
                Call::Upload {
                    filename: "a.pdf".into(),
                    case_id: Some("CASE-2".into()),
                },
            ]
        );
    }

    #[tokio::test]
    async fn controller_errors_are_printed_not_returned() {
        let controller = DocumentController::new(FakeBackend::new());
        let mut out = Vec::new();

        let flow = execute(&controller, ShellCommand::Summarize(None), &|_: &str| true, &mut out)
            .await
            .expect("execute");

        assert_eq!(flow, Flow::Continue);
        assert_eq!(
            output(out),
            "error: Please select at least one document to generate a summary.\n"
        );
    }

    #[tokio::test]
    async fn quit_stops_the_session() {
        let controller = DocumentController::new(FakeBackend::new());
        let mut out = Vec::new();
        let flow = execute(&controller, ShellCommand::Quit, &|_: &str| true, &mut out)
            .await
            .expect("execute");
        assert_eq!(flow, Flow::Quit);
    }
}
