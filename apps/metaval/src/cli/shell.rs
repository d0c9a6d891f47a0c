//! # Interactive Shell
//!
//! Line-oriented driver for a `Session`. Each line is one command; delayed
//! tasks (assistant replies, draft generation, tender analysis) fire in real
//! time while the shell waits for input.

use super::render::{print_clauses, print_json, print_notice, print_page, print_pages};
use crate::assistant::RandomResponses;
use crate::notify::TracingNotifier;
use metaval_core::catalog::SavedView;
use metaval_core::exit::ExitType;
use metaval_core::generate::Template;
use metaval_core::schedule::FiredTask;
use metaval_core::tender::{TENDER_INSIGHTS, TenderUpload};
use metaval_core::{
    DelayedTask, MetavalError, NavTarget, Notifier, Page, RequestView, ResponseProvider, Session,
    Transition,
};
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::Instant;

pub type ShellSession = Session<RandomResponses, TracingNotifier>;

pub const HELP: &str = "\
Navigation:  goto <page>[:<view>]   pages   show   wait <ms>   quit
Request:     set <field> <value>   submit   cancel   edit   say <text>   start
             open <request-id>   generate
Workflow:    next   back   jump <n>   restart
Generate:    template <name>   generate   negotiate   cancel
Exit:        exit-type <type>   check <n>   debrief <text>   execute   abort
Search:      view <all|my|expiring|high-risk|nda>   find <text>   clauses
Tender AI:   upload <file> <bytes>   analyze <id>   remove <id>   insights <id>   back";

// =============================================================================
// COMMANDS
// =============================================================================

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Unknown command: {0} (type `help`)")]
    UnknownCommand(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("Not a number: {0}")]
    InvalidNumber(String),

    #[error(transparent)]
    Core(#[from] MetavalError),
}

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    Show,
    Pages,
    Goto(NavTarget),
    Set { field: String, value: String },
    Submit,
    Cancel,
    Edit,
    Start,
    Say(String),
    Open(String),
    Next,
    Back,
    Jump(usize),
    Restart,
    Generate,
    Template(Template),
    Negotiate,
    ExitType(ExitType),
    Check(usize),
    Debrief(String),
    Execute,
    Abort,
    View(SavedView),
    Find(String),
    Clauses,
    Upload { name: String, size_bytes: u64 },
    Remove(u64),
    Analyze(u64),
    Insights(u64),
    Wait(u64),
    Quit,
}

fn required<'a>(
    rest: &'a str,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, ShellError> {
    if rest.is_empty() {
        Err(ShellError::MissingArgument { command, argument })
    } else {
        Ok(rest)
    }
}

fn number<T: std::str::FromStr>(
    rest: &str,
    command: &'static str,
    argument: &'static str,
) -> Result<T, ShellError> {
    let raw = required(rest, command, argument)?;
    raw.parse()
        .map_err(|_| ShellError::InvalidNumber(raw.to_string()))
}

impl ShellCommand {
    /// Parse a line. Blank lines and `#` comments yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, ShellError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let command = match head.to_ascii_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "show" | "ls" => Self::Show,
            "pages" => Self::Pages,
            "goto" | "go" => Self::Goto(required(rest, "goto", "page")?.parse()?),
            "set" => {
                let args = required(rest, "set", "field")?;
                let (field, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
                Self::Set {
                    field: field.to_string(),
                    value: value.trim().to_string(),
                }
            }
            "submit" => Self::Submit,
            "cancel" => Self::Cancel,
            "edit" => Self::Edit,
            "start" => Self::Start,
            "say" => Self::Say(rest.to_string()),
            "open" => Self::Open(required(rest, "open", "request id")?.to_string()),
            "next" => Self::Next,
            "back" => Self::Back,
            "jump" => Self::Jump(number(rest, "jump", "stage number")?),
            "restart" => Self::Restart,
            "generate" => Self::Generate,
            "template" => Self::Template(required(rest, "template", "template name")?.parse()?),
            "negotiate" => Self::Negotiate,
            "exit-type" => Self::ExitType(required(rest, "exit-type", "exit type")?.parse()?),
            "check" => Self::Check(number(rest, "check", "item number")?),
            "debrief" => Self::Debrief(rest.to_string()),
            "execute" => Self::Execute,
            "abort" => Self::Abort,
            "view" => Self::View(required(rest, "view", "saved view")?.parse()?),
            "find" => Self::Find(rest.to_string()),
            "clauses" => Self::Clauses,
            "upload" => {
                let args = required(rest, "upload", "file name")?;
                let (name, size) = args
                    .rsplit_once(char::is_whitespace)
                    .ok_or(ShellError::MissingArgument {
                        command: "upload",
                        argument: "size in bytes",
                    })?;
                Self::Upload {
                    name: name.trim().to_string(),
                    size_bytes: number(size, "upload", "size in bytes")?,
                }
            }
            "remove" | "rm" => Self::Remove(number(rest, "remove", "file id")?),
            "analyze" => Self::Analyze(number(rest, "analyze", "file id")?),
            "insights" => Self::Insights(number(rest, "insights", "file id")?),
            "wait" => Self::Wait(number(rest, "wait", "milliseconds")?),
            "quit" | "exit" | "q" => Self::Quit,
            other => return Err(ShellError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

// =============================================================================
// EXECUTION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

fn describe(transition: Transition) -> String {
    match transition {
        Transition::Moved { from, to } => format!("Stage {} -> {}", from, to),
        Transition::Completed { total } => format!("All {} stages complete", total),
        Transition::Unchanged => "No change".to_string(),
    }
}

/// Apply one command to the session.
pub fn run_command<R: ResponseProvider, N: Notifier>(
    session: &mut Session<R, N>,
    command: ShellCommand,
    json_mode: bool,
) -> Result<Flow, ShellError> {
    let mut show = true;

    match command {
        ShellCommand::Help => {
            println!("{}", HELP);
            show = false;
        }
        ShellCommand::Show => {}
        ShellCommand::Pages => {
            print_pages(json_mode);
            show = false;
        }
        ShellCommand::Goto(target) => {
            let nav = session.navigate(target);
            tracing::debug!(from = %nav.from, to = %nav.to, "Navigated");
        }
        ShellCommand::Set { field, value } => {
            let field = session.set_field(&field, &value)?;
            tracing::debug!(field = field.key(), "Field set");
            show = false;
        }
        ShellCommand::Submit => {
            session.submit()?;
        }
        ShellCommand::Cancel => session.cancel()?,
        ShellCommand::Edit => session.edit()?,
        ShellCommand::Start => session.start_workflow()?,
        ShellCommand::Say(text) => {
            if session.send_chat(&text)?.is_none() {
                println!("(nothing to send)");
            }
            show = false;
        }
        ShellCommand::Open(id) => {
            session.open_request(&id)?;
        }
        ShellCommand::Next => {
            let transition = session.advance()?;
            if !json_mode {
                println!("{}", describe(transition));
            }
        }
        ShellCommand::Back if session.current_page() == Page::TenderAi => {
            session.tender_back()?;
        }
        ShellCommand::Back => {
            let transition = session.retreat()?;
            if !json_mode {
                println!("{}", describe(transition));
            }
        }
        ShellCommand::Jump(index) => {
            session.jump_to(index)?;
        }
        ShellCommand::Restart => {
            session.restart()?;
        }
        ShellCommand::Generate => {
            let on_detail = session.current_page() == Page::Requests
                && session.request_view() == RequestView::Detail;
            if on_detail {
                session.generate_from_request()?;
            } else if !session.generate()? {
                println!("(generation already running)");
            }
        }
        ShellCommand::Template(template) => session.select_template(template)?,
        ShellCommand::Negotiate => {
            session.review_and_negotiate()?;
        }
        ShellCommand::ExitType(exit_type) => session.select_exit_type(exit_type)?,
        ShellCommand::Check(index) => {
            session.toggle_checklist(index)?;
        }
        ShellCommand::Debrief(text) => session.set_debrief(&text)?,
        ShellCommand::Execute => {
            session.execute_closure()?;
            show = false;
        }
        ShellCommand::Abort => {
            session.abort()?;
        }
        ShellCommand::View(view) => session.set_saved_view(view)?,
        ShellCommand::Find(query) => session.set_search_query(&query)?,
        ShellCommand::Clauses => {
            let clauses = session.clause_results();
            if json_mode {
                print_json(&serde_json::json!({ "clauses": clauses }));
            } else {
                print_clauses(&clauses);
            }
            show = false;
        }
        ShellCommand::Upload { name, size_bytes } => {
            let file = session.upload_file(TenderUpload::from_name(name, size_bytes))?;
            tracing::debug!(file = file.id, name = %file.name, "Tender uploaded");
        }
        ShellCommand::Remove(id) => {
            session.remove_file(id)?;
        }
        ShellCommand::Analyze(id) => session.analyze_file(id)?,
        ShellCommand::Insights(id) => {
            let text = session.export_insights(id)?;
            if json_mode {
                print_json(&serde_json::json!({ "file": id, "insights": text }));
            } else {
                println!("{}", text);
            }
            show = false;
        }
        ShellCommand::Wait(ms) => {
            let fired = session.tick(ms);
            report_fired(session, &fired, json_mode);
            show = false;
        }
        ShellCommand::Quit => return Ok(Flow::Quit),
    }

    if show {
        print_page(session, json_mode);
    }
    Ok(Flow::Continue)
}

/// Print assistant replies and tender insights delivered by fired tasks.
/// Other task outcomes surface as notices.
fn report_fired<R: ResponseProvider, N: Notifier>(
    session: &Session<R, N>,
    fired: &[FiredTask],
    json_mode: bool,
) {
    let replies = fired
        .iter()
        .filter(|f| matches!(f.task, DelayedTask::ChatReply { .. }))
        .count();
    let messages = session.chat().messages();
    for message in &messages[messages.len().saturating_sub(replies)..] {
        if json_mode {
            print_json(&serde_json::json!({ "chat": message }));
        } else {
            println!("Assistant: {}", message.text);
        }
    }

    for f in fired {
        let DelayedTask::TenderInsight { file, index } = &f.task else {
            continue;
        };
        let Some(insight) = TENDER_INSIGHTS.get(*index) else {
            continue;
        };
        if json_mode {
            print_json(&serde_json::json!({ "insight": { "file": file, "text": insight } }));
        } else {
            println!("Insight #{}: {}", file, insight);
        }
    }
}

// =============================================================================
// LOOP
// =============================================================================

fn flush_notices(session: &mut ShellSession, json_mode: bool) {
    for notice in session.notifier_mut().take() {
        print_notice(&notice, json_mode);
    }
}

fn prompt(session: &ShellSession, json_mode: bool) {
    if json_mode {
        return;
    }
    print!("metaval:{}> ", session.current_page());
    if let Err(e) = std::io::stdout().flush() {
        tracing::trace!(error = %e, "stdout flush failed");
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

/// Maps real elapsed time onto the session clock.
///
/// `wait` pushes the session clock ahead of real time. The offset records
/// that lead so later catch-ups keep counting from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClockSync {
    offset_ms: u64,
}

impl ClockSync {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session time corresponding to `real_ms` of real elapsed time.
    #[must_use]
    pub fn target(&self, real_ms: u64) -> u64 {
        real_ms.saturating_add(self.offset_ms)
    }

    /// Re-anchor after a command moved the session clock past the target.
    pub fn resync(&mut self, session_now: u64, real_ms: u64) {
        if session_now > self.target(real_ms) {
            self.offset_ms = session_now.saturating_sub(real_ms);
        }
    }
}

/// Bring the session clock up to real elapsed time. Returns how many delayed
/// tasks fired.
pub fn catch_up<R: ResponseProvider, N: Notifier>(
    session: &mut Session<R, N>,
    clock: &ClockSync,
    real_ms: u64,
    json_mode: bool,
) -> usize {
    let behind = clock.target(real_ms).saturating_sub(session.now());
    if behind == 0 {
        return 0;
    }
    let fired = session.tick(behind);
    if !fired.is_empty() {
        tracing::debug!(count = fired.len(), now = session.now(), "Delayed tasks fired");
        report_fired(session, &fired, json_mode);
    }
    fired.len()
}

/// Run the interactive loop until `quit`, end of input or Ctrl+C.
pub async fn run_shell(session: &mut ShellSession, json_mode: bool) -> Result<(), MetavalError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let started = Instant::now();
    let mut clock = ClockSync::new();

    if !json_mode {
        println!("Type `help` for commands.");
    }
    print_page(session, json_mode);
    prompt(session, json_mode);

    loop {
        if catch_up(session, &clock, elapsed_ms(started), json_mode) > 0 {
            flush_notices(session, json_mode);
            prompt(session, json_mode);
        }
        let wait = session.next_due_in().map(Duration::from_millis);

        tokio::select! {
            line = lines.next_line() => {
                catch_up(session, &clock, elapsed_ms(started), json_mode);
                let Some(line) = line.map_err(|e| MetavalError::IoError(e.to_string()))? else {
                    break;
                };

                let flow = match ShellCommand::parse(&line) {
                    Ok(Some(command)) => run_command(session, command, json_mode),
                    Ok(None) => Ok(Flow::Continue),
                    Err(e) => Err(e),
                };
                clock.resync(session.now(), elapsed_ms(started));
                flush_notices(session, json_mode);

                match flow {
                    Ok(Flow::Quit) => break,
                    Ok(Flow::Continue) => {}
                    Err(e) => {
                        tracing::debug!(error = %e, "Command failed");
                        if json_mode {
                            print_json(&serde_json::json!({ "error": e.to_string() }));
                        } else {
                            println!("error: {}", e);
                        }
                    }
                }
                prompt(session, json_mode);
            }
            () = tokio::time::sleep(wait.unwrap_or_default()), if wait.is_some() => {}
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    if !json_mode {
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_sync_keeps_lead_from_wait() {
        let mut clock = ClockSync::new();
        assert_eq!(clock.target(500), 500);

        clock.resync(10_000, 200);
        assert_eq!(clock.target(200), 10_000);
        assert_eq!(clock.target(1100), 10_900);

        // Session behind the target leaves the offset alone.
        clock.resync(10_000, 5000);
        assert_eq!(clock.target(5000), 14_800);
    }

    #[test]
    fn describe_transitions() {
        assert_eq!(describe(Transition::Moved { from: 1, to: 2 }), "Stage 1 -> 2");
        assert_eq!(describe(Transition::Unchanged), "No change");
    }
}
