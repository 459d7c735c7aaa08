//! Command line parsing for the headless host.
use std::path::PathBuf;

use blackbook_core::{DiagramKind, TemplateKind};
use thiserror::Error;

pub const USAGE: &str = "\
usage: blackbook_app [--verbose] <command> [args]

commands:
  status                       completion, readiness and outline
  set <field> <value>          projectTitle, studentName, ..., name, guide, doc_scope, ...
  section <id> <text>          replace a section's text
  reference <label> <url>      append a reference
  code <path>...               attach source files
  screenshot <path>...         attach screenshots
  diagram <kind> [image]       generate a diagram, or attach an image for it
  improve <section>            rewrite a section with the AI service
  template <ieee|college|custom>
  check                        originality estimate
  preview <out.html>           write the rendered preview
  ai                           fill documentation from the project title
  generate <out-dir>           build the report and download it
  snapshot <note>              record a version
  history                      list recorded versions
  restore <id>                 restore a recorded version
  reset                        start over (history is kept)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Set { field: String, value: String },
    Section { id: String, text: String },
    Reference { label: String, url: String },
    Code(Vec<PathBuf>),
    Screenshot(Vec<PathBuf>),
    Diagram { kind: DiagramKind, image: Option<PathBuf> },
    Improve(String),
    Template(TemplateKind),
    Check,
    Preview(PathBuf),
    Ai,
    Generate(PathBuf),
    Snapshot(String),
    History,
    Restore(String),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub verbose: bool,
    pub command: Command,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("no command given")]
    Missing,
    #[error("unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{command}: expected {expected}")]
    Arguments {
        command: &'static str,
        expected: &'static str,
    },
    #[error("unknown diagram kind {0:?}")]
    DiagramKind(String),
    #[error("unknown template {0:?}")]
    Template(String),
}

pub fn parse(args: &[String]) -> Result<Invocation, UsageError> {
    let (verbose, rest) = match args.split_first() {
        Some((flag, rest)) if flag == "--verbose" || flag == "-v" => (true, rest),
        _ => (false, args),
    };
    let (name, rest) = rest.split_first().ok_or(UsageError::Missing)?;

    let command = match name.as_str() {
        "status" => none(rest, "status", Command::Status)?,
        "set" => {
            let [field, value] = exactly::<2>(rest, "set", "<field> <value>")?;
            Command::Set { field, value }
        }
        "section" => {
            let [id, text] = exactly::<2>(rest, "section", "<id> <text>")?;
            Command::Section { id, text }
        }
        "reference" => {
            let [label, url] = exactly::<2>(rest, "reference", "<label> <url>")?;
            Command::Reference { label, url }
        }
        "code" => Command::Code(paths(rest, "code")?),
        "screenshot" => Command::Screenshot(paths(rest, "screenshot")?),
        "diagram" => match rest {
            [kind] => Command::Diagram {
                kind: diagram_kind(kind)?,
                image: None,
            },
            [kind, image] => Command::Diagram {
                kind: diagram_kind(kind)?,
                image: Some(PathBuf::from(image)),
            },
            _ => {
                return Err(UsageError::Arguments {
                    command: "diagram",
                    expected: "<kind> [image]",
                })
            }
        },
        "improve" => {
            let [id] = exactly::<1>(rest, "improve", "<section>")?;
            Command::Improve(id)
        }
        "template" => {
            let [key] = exactly::<1>(rest, "template", "<ieee|college|custom>")?;
            Command::Template(TemplateKind::from_key(&key).ok_or(UsageError::Template(key))?)
        }
        "check" => none(rest, "check", Command::Check)?,
        "preview" => {
            let [out] = exactly::<1>(rest, "preview", "<out.html>")?;
            Command::Preview(PathBuf::from(out))
        }
        "ai" => none(rest, "ai", Command::Ai)?,
        "generate" => {
            let [dir] = exactly::<1>(rest, "generate", "<out-dir>")?;
            Command::Generate(PathBuf::from(dir))
        }
        "snapshot" => {
            let [note] = exactly::<1>(rest, "snapshot", "<note>")?;
            Command::Snapshot(note)
        }
        "history" => none(rest, "history", Command::History)?,
        "restore" => {
            let [id] = exactly::<1>(rest, "restore", "<id>")?;
            Command::Restore(id)
        }
        "reset" => none(rest, "reset", Command::Reset)?,
        other => return Err(UsageError::UnknownCommand(other.to_string())),
    };
    Ok(Invocation { verbose, command })
}

fn none(rest: &[String], command: &'static str, parsed: Command) -> Result<Command, UsageError> {
    if rest.is_empty() {
        Ok(parsed)
    } else {
        Err(UsageError::Arguments {
            command,
            expected: "no arguments",
        })
    }
}

fn exactly<const N: usize>(
    rest: &[String],
    command: &'static str,
    expected: &'static str,
) -> Result<[String; N], UsageError> {
    <[String; N]>::try_from(rest.to_vec()).map_err(|_| UsageError::Arguments { command, expected })
}

fn paths(rest: &[String], command: &'static str) -> Result<Vec<PathBuf>, UsageError> {
    if rest.is_empty() {
        return Err(UsageError::Arguments {
            command,
            expected: "<path>...",
        });
    }
    Ok(rest.iter().map(PathBuf::from).collect())
}

fn diagram_kind(key: &str) -> Result<DiagramKind, UsageError> {
    DiagramKind::from_key(key).ok_or_else(|| UsageError::DiagramKind(key.to_string()))
}
