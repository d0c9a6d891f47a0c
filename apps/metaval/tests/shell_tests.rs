//! Tests for shell command parsing and execution.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::NaiveDate;
use clap::Parser;
use metaval::cli::shell::{ClockSync, Flow, ShellCommand, ShellError, catch_up, run_command};
use metaval::cli::{Cli, Commands};
use metaval_core::catalog::SavedView;
use metaval_core::exit::ExitType;
use metaval_core::generate::Template;
use metaval_core::tender::TenderView;
use metaval_core::{
    FixedResponse, MetavalError, NavTarget, NoticeBuffer, Page, RequestView, Session,
    SessionOptions,
};

fn parse(line: &str) -> ShellCommand {
    ShellCommand::parse(line).unwrap().unwrap()
}

fn session() -> Session<FixedResponse, NoticeBuffer> {
    let today = NaiveDate::from_ymd_opt(2026, 1, 20).unwrap();
    Session::new(
        SessionOptions::new(today),
        FixedResponse::new("Sure."),
        NoticeBuffer::new(),
    )
}

// =============================================================================
// PARSING
// =============================================================================

#[test]
fn test_blank_and_comment_lines() {
    assert!(ShellCommand::parse("   ").unwrap().is_none());
    assert!(ShellCommand::parse("# note").unwrap().is_none());
}

#[test]
fn test_goto_with_view() {
    assert_eq!(
        parse("goto requests:list"),
        ShellCommand::Goto(NavTarget::WithView {
            page: Page::Requests,
            view: RequestView::List,
        })
    );
    assert_eq!(parse("go exit"), ShellCommand::Goto(NavTarget::Page(Page::Exit)));
}

#[test]
fn test_goto_unknown_page() {
    let err = ShellCommand::parse("goto billing").unwrap_err();
    assert!(matches!(err, ShellError::Core(MetavalError::UnknownPage(_))));
}

#[test]
fn test_set_keeps_value_spaces() {
    assert_eq!(
        parse("set contract_name   Valve Supply 2026 "),
        ShellCommand::Set {
            field: "contract_name".to_string(),
            value: "Valve Supply 2026".to_string(),
        }
    );
}

#[test]
fn test_typed_arguments() {
    assert_eq!(parse("jump 4"), ShellCommand::Jump(4));
    assert_eq!(parse("wait 800"), ShellCommand::Wait(800));
    assert_eq!(parse("template service-msa"), ShellCommand::Template(Template::ServiceMsa));
    assert_eq!(parse("exit-type cause"), ShellCommand::ExitType(ExitType::Cause));
    assert_eq!(parse("view high-risk"), ShellCommand::View(SavedView::HighRisk));
    assert_eq!(parse("NEXT"), ShellCommand::Next);
    assert_eq!(
        parse("upload Q3 tender.pdf 1048576"),
        ShellCommand::Upload {
            name: "Q3 tender.pdf".to_string(),
            size_bytes: 1_048_576,
        }
    );
    assert_eq!(parse("analyze 2"), ShellCommand::Analyze(2));
}

#[test]
fn test_argument_errors() {
    assert!(matches!(
        ShellCommand::parse("jump"),
        Err(ShellError::MissingArgument { command: "jump", .. })
    ));
    assert!(matches!(
        ShellCommand::parse("jump two"),
        Err(ShellError::InvalidNumber(_))
    ));
    assert!(matches!(
        ShellCommand::parse("upload rfp.pdf"),
        Err(ShellError::MissingArgument { command: "upload", .. })
    ));
    assert!(matches!(
        ShellCommand::parse("upload rfp.pdf big"),
        Err(ShellError::InvalidNumber(_))
    ));
    assert!(matches!(
        ShellCommand::parse("dance"),
        Err(ShellError::UnknownCommand(_))
    ));
}

// =============================================================================
// EXECUTION
// =============================================================================

#[test]
fn test_request_flow_through_commands() {
    let mut s = session();
    for line in [
        "goto requests",
        "set contract_name Valve Supply",
        "set contract_type MSA",
        "submit",
        "edit",
        "start",
        "next",
    ] {
        let flow = run_command(&mut s, parse(line), true).unwrap();
        assert_eq!(flow, Flow::Continue, "line {line}");
    }
    assert_eq!(s.workflow().and_then(|w| w.current_index()), Some(2));
}

#[test]
fn test_wait_delivers_chat_reply() {
    let mut s = session();
    for line in [
        "goto requests",
        "set contract_name X",
        "set contract_type Y",
        "submit",
        "edit",
        "say make it shorter",
        "wait 800",
    ] {
        run_command(&mut s, parse(line), true).unwrap();
    }
    assert_eq!(s.chat().last().map(|m| m.text.as_str()), Some("Sure."));
}

#[test]
fn test_catch_up_after_wait_keeps_real_time_pace() {
    let mut s = session();
    for line in [
        "goto requests",
        "set contract_name X",
        "set contract_type Y",
        "submit",
        "edit",
        "wait 10000",
    ] {
        run_command(&mut s, parse(line), true).unwrap();
    }
    let mut clock = ClockSync::new();
    clock.resync(s.now(), 0);

    s.send_chat("hello").unwrap();
    assert_eq!(catch_up(&mut s, &clock, 700, true), 0);
    assert_eq!(catch_up(&mut s, &clock, 900, true), 1);
    assert_eq!(s.chat().messages().len(), 3);
    assert_eq!(catch_up(&mut s, &clock, 900, true), 0);
}

#[test]
fn test_tender_upload_and_analysis_through_commands() {
    let mut s = session();
    for line in [
        "goto tender-ai",
        "upload Supplier RFP.pdf 2048",
        "analyze 1",
        "wait 25000",
    ] {
        run_command(&mut s, parse(line), true).unwrap();
    }
    let file = s.tender_page().file(1).unwrap();
    assert_eq!(file.name, "Supplier RFP.pdf");
    assert_eq!(file.insights.len(), 5);

    run_command(&mut s, parse("wait 16000"), true).unwrap();
    assert!(s.tender_page().document().is_some());

    run_command(&mut s, parse("back"), true).unwrap();
    assert_eq!(s.tender_page().view(), TenderView::Upload);
    run_command(&mut s, parse("insights 1"), true).unwrap();
    run_command(&mut s, parse("remove 1"), true).unwrap();
    assert!(s.tender_page().files().is_empty());
}

#[test]
fn test_tender_upload_rejects_non_pdf() {
    let mut s = session();
    run_command(&mut s, parse("goto tender-ai"), true).unwrap();
    let err = run_command(&mut s, parse("upload notes.txt 10"), true).unwrap_err();
    assert!(matches!(
        err,
        ShellError::Core(MetavalError::UnsupportedFileType(_))
    ));
    assert_eq!(s.notifier().count_of("Only PDF files are supported"), 1);
}

#[test]
fn test_action_on_wrong_page_is_error() {
    let mut s = session();
    let err = run_command(&mut s, parse("execute"), true).unwrap_err();
    assert!(matches!(
        err,
        ShellError::Core(MetavalError::NotAvailable { page: Page::Dashboard, .. })
    ));
}

#[test]
fn test_quit() {
    let mut s = session();
    assert_eq!(run_command(&mut s, parse("quit"), true).unwrap(), Flow::Quit);
}

// =============================================================================
// CLI ARGUMENTS
// =============================================================================

#[test]
fn test_cli_parses_draft_fields() {
    let cli = Cli::try_parse_from([
        "metaval",
        "--json-mode",
        "draft",
        "-s",
        "contract_name=Test",
        "--set",
        "contract_type=MSA",
    ])
    .unwrap();
    assert!(cli.json_mode);
    match cli.command {
        Some(Commands::Draft { fields }) => {
            assert_eq!(fields, vec!["contract_name=Test", "contract_type=MSA"]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_cli_defaults_to_shell() {
    let cli = Cli::try_parse_from(["metaval", "-q"]).unwrap();
    assert!(cli.quiet);
    assert!(cli.command.is_none());
}
