//! # Scenario Tests
//!
//! End-to-end request module flows driven through `Session`.

#![allow(clippy::panic)]

use chrono::NaiveDate;
use metaval_core::catalog::SavedView;
use metaval_core::draft::PLACEHOLDER;
use metaval_core::session::{MSG_DRAFT_CREATED, MSG_REQUIRED_FIELDS, MSG_WORKFLOW_COMPLETED};
use metaval_core::{
    CyclingResponses, FixedResponse, MetavalError, NavTarget, NoticeBuffer, NoticeLevel, Page,
    RequestField, RequestView, Session, SessionOptions, Transition,
};

fn options() -> SessionOptions {
    SessionOptions::new(NaiveDate::from_ymd_opt(2026, 1, 20).expect("valid date"))
}

fn workflow_session() -> Session<FixedResponse, NoticeBuffer> {
    let mut session = Session::new(options(), FixedResponse::new("ok"), NoticeBuffer::new());
    session.navigate(NavTarget::WithView {
        page: Page::Requests,
        view: RequestView::Workflow,
    });
    session
}

fn request_session() -> Session<CyclingResponses, NoticeBuffer> {
    let mut session = Session::new(options(), CyclingResponses::default(), NoticeBuffer::new());
    session.navigate(Page::Requests);
    session
}

// =============================================================================
// WORKFLOW
// =============================================================================

#[test]
fn full_pass_through_eight_stages_completes_once() {
    let mut session = workflow_session();

    for _ in 0..7 {
        session.advance().expect("advance");
    }
    assert_eq!(session.workflow().and_then(|w| w.current_index()), Some(8));
    assert!(session.notifier().notices().is_empty());

    let transition = session.advance().expect("advance");
    assert!(transition.is_completion());
    assert_eq!(session.notifier().count_of(MSG_WORKFLOW_COMPLETED), 1);
    assert_eq!(session.notifier().notices().len(), 1);
    assert_eq!(session.workflow().and_then(|w| w.current_index()), Some(1));
}

#[test]
fn retreat_on_first_stage_is_silent() {
    let mut session = workflow_session();

    assert_eq!(session.retreat().expect("retreat"), Transition::Unchanged);
    assert_eq!(session.workflow().and_then(|w| w.current_index()), Some(1));
    assert!(session.notifier().notices().is_empty());
}

#[test]
fn out_of_range_jump_is_rejected() {
    let mut session = workflow_session();
    session.jump_to(4).expect("jump");

    assert!(matches!(
        session.jump_to(9),
        Err(MetavalError::OutOfRange { index: 9, total: 8 })
    ));
    assert_eq!(session.workflow().and_then(|w| w.current_index()), Some(4));
}

// =============================================================================
// REQUEST FORM
// =============================================================================

#[test]
fn submit_with_empty_name_is_rejected() {
    let mut session = request_session();
    session.set_field("contract_name", "").expect("set");
    session.set_field("contract_type", "MSA").expect("set");

    let err = session.submit().expect_err("missing name");
    match err {
        MetavalError::Validation(v) => {
            assert!(v.missing_fields.contains(&RequestField::ContractName));
            assert!(!v.missing_fields.contains(&RequestField::ContractType));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(session.draft().is_none());
    assert_eq!(session.notifier().count_of(MSG_REQUIRED_FIELDS), 1);
    assert_eq!(session.notifier().notices()[0].level, NoticeLevel::Error);
}

#[test]
fn submit_with_name_and_type_shows_draft() {
    let mut session = request_session();
    session.set_field("contract_name", "Test").expect("set");
    session.set_field("contract_type", "MSA").expect("set");

    let draft = session.submit().expect("submit");
    assert_eq!(
        draft.populated_fields(),
        vec![RequestField::ContractName, RequestField::ContractType]
    );
    assert_eq!(draft.value_of(RequestField::ContractName), Some("Test"));
    assert_eq!(draft.value_of(RequestField::Notes), None);
    for row in draft.rows() {
        if !matches!(row.field, RequestField::ContractName | RequestField::ContractType) {
            assert_eq!(row.value, PLACEHOLDER, "row {}", row.label);
        }
    }
    assert_eq!(session.notifier().count_of(MSG_DRAFT_CREATED), 1);
}

#[test]
fn whitespace_only_type_counts_as_missing() {
    let mut session = request_session();
    session.set_field("contract_name", "Test").expect("set");
    session.set_field("contract_type", "   ").expect("set");
    assert!(session.submit().is_err());
}

#[test]
fn select_fields_reject_unknown_options() {
    let mut session = request_session();
    assert!(matches!(
        session.set_field("payment_terms", "Net 999"),
        Err(MetavalError::InvalidChoice { .. })
    ));
    assert!(matches!(
        session.set_field("colour", "red"),
        Err(MetavalError::UnknownField(_))
    ));
}

// =============================================================================
// NAVIGATION / DELAYS
// =============================================================================

#[test]
fn unknown_page_fails_to_parse() {
    assert!(matches!(
        "billing".parse::<NavTarget>(),
        Err(MetavalError::UnknownPage(_))
    ));
    assert!("generate:list".parse::<NavTarget>().is_err());
    assert_eq!(
        "requests:workflow".parse::<NavTarget>().ok(),
        Some(NavTarget::WithView {
            page: Page::Requests,
            view: RequestView::Workflow
        })
    );
}

#[test]
fn view_is_cleared_by_other_targets() {
    let mut session = request_session();
    session.navigate(NavTarget::WithView {
        page: Page::Requests,
        view: RequestView::List,
    });
    let nav = session.navigate(Page::Generate);
    assert_eq!(nav.initial_view, None);

    session.navigate(Page::Requests);
    assert_eq!(session.request_view(), RequestView::New);
}

#[test]
fn chat_replies_cycle_through_suggestions() {
    let mut session = request_session();
    session.set_field("contract_name", "Test").expect("set");
    session.set_field("contract_type", "MSA").expect("set");
    session.submit().expect("submit");
    session.edit().expect("edit");

    session.send_chat("first").expect("send");
    session.tick(400);
    session.send_chat("second").expect("send");
    assert_eq!(session.next_due_in(), Some(400));

    session.tick(400);
    session.tick(400);
    let texts: Vec<_> = session
        .chat()
        .messages()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(texts.len(), 5);
    assert_eq!(texts[1], "first");
    assert_eq!(texts[2], "second");
    assert_eq!(texts[3], metaval_core::assistant::ASSISTANT_SUGGESTIONS[0]);
    assert_eq!(texts[4], metaval_core::assistant::ASSISTANT_SUGGESTIONS[1]);
}

#[test]
fn draft_generation_is_dropped_when_leaving_generate() {
    let mut session = request_session();
    session.navigate(Page::Generate);
    session.generate().expect("generate");
    session.navigate(Page::Dashboard);

    assert!(session.tick(5000).is_empty());
    assert!(session.notifier().notices().is_empty());
}

#[test]
fn my_contracts_use_configured_user() {
    let mut opts = options();
    opts.current_user = "Sarah Miller".to_string();
    let mut session = Session::new(opts, FixedResponse::new("ok"), NoticeBuffer::new());
    session.navigate(Page::Contracts);
    session.set_saved_view(SavedView::My).expect("view");

    let results = session.contract_results();
    assert!(!results.is_empty());
    assert!(results.iter().all(|c| c.owner == "Sarah Miller"));
}
