//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::render::{
    print_clauses, print_contracts, print_json, print_markers, print_notice, print_pages,
    print_stage_view,
};
use super::shell::run_shell;
use crate::assistant::RandomResponses;
use crate::config::AppConfig;
use crate::notify::TracingNotifier;
use chrono::NaiveDate;
use metaval_core::catalog::SavedView;
use metaval_core::{
    CyclingResponses, MetavalError, NavTarget, Page, RequestForm, RequestView, ResponseProvider,
    Session, StageIndicator, WorkflowController, WorkflowKind,
};
use std::path::Path;

// =============================================================================
// SHARED SETUP
// =============================================================================

/// Load the config file and apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, MetavalError> {
    let mut config = AppConfig::load(path)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    Ok(config)
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn open_session<R: ResponseProvider>(
    config: &AppConfig,
    responder: R,
) -> Session<R, TracingNotifier> {
    let options = config.session_options(today());
    tracing::debug!(
        user = %options.current_user,
        completion = ?options.completion,
        today = %options.today,
        "Opening session"
    );
    Session::new(options, responder, TracingNotifier::new())
}

// =============================================================================
// SHELL COMMAND
// =============================================================================

/// Run the interactive shell.
pub async fn cmd_shell(
    config: &AppConfig,
    json_mode: bool,
    page: &str,
    seed: Option<u64>,
) -> Result<(), MetavalError> {
    let target: NavTarget = page.parse()?;
    let responder = seed.map_or_else(RandomResponses::new, RandomResponses::seeded);

    let mut session = open_session(config, responder);
    session.navigate(target);
    tracing::info!(page = %session.current_page(), "Shell started");

    run_shell(&mut session, json_mode).await
}

// =============================================================================
// PAGES COMMAND
// =============================================================================

/// List navigable pages.
pub fn cmd_pages(json_mode: bool) -> Result<(), MetavalError> {
    print_pages(json_mode);
    Ok(())
}

// =============================================================================
// STAGES COMMAND
// =============================================================================

/// Show the indicator of a workflow at a given stage.
pub fn cmd_stages(json_mode: bool, workflow: &str, current: usize) -> Result<(), MetavalError> {
    let kind: WorkflowKind = workflow.parse()?;
    let mut controller = WorkflowController::new(kind.sequence());
    controller.jump_to(current)?;
    let markers = StageIndicator::for_controller(&controller);

    if json_mode {
        print_json(&serde_json::json!({
            "workflow": workflow,
            "current": current,
            "total": controller.total_stages(),
            "markers": markers,
        }));
        return Ok(());
    }

    print_markers(&markers);
    println!();
    for marker in &markers {
        println!("  {} {}. {}", marker.state.glyph(), marker.index, marker.label);
    }
    Ok(())
}

// =============================================================================
// DRAFT COMMAND
// =============================================================================

/// Fill a request form from `key=value` pairs and print the draft.
pub fn cmd_draft(config: &AppConfig, json_mode: bool, fields: &[String]) -> Result<(), MetavalError> {
    let mut form = RequestForm::new();
    for assignment in fields {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| MetavalError::UnknownField(assignment.clone()))?;
        form.set_field(key.trim(), value)?;
    }

    let generated_on = config.search.today.unwrap_or_else(today);
    let draft = form.submit(generated_on)?;

    if json_mode {
        print_json(&serde_json::json!({ "draft": draft }));
    } else {
        println!("{}", draft.to_text());
    }
    Ok(())
}

// =============================================================================
// WALK COMMAND
// =============================================================================

/// Submit a request and advance through every workflow stage.
pub fn cmd_walk(
    config: &AppConfig,
    json_mode: bool,
    verbose: bool,
    name: &str,
    contract_type: &str,
) -> Result<(), MetavalError> {
    let mut session = open_session(config, CyclingResponses::default());
    session.navigate(Page::Requests);
    session.set_field("contract_name", name)?;
    session.set_field("contract_type", contract_type)?;
    session.submit()?;
    session.edit()?;
    session.start_workflow()?;

    let mut stages = Vec::new();
    while session.request_view() == RequestView::Workflow {
        let Some(view) = session.stage_view() else {
            break;
        };

        if !json_mode {
            if let Some(markers) = session.workflow_indicator() {
                print_markers(&markers);
            }
            if verbose {
                print_stage_view(&view);
            } else {
                println!("{}. {} - {}", view.index, view.name, view.heading);
            }
            println!();
        }
        stages.push(view);

        if session.advance()?.is_completion() {
            break;
        }
    }

    let notices = session.notifier_mut().take();
    if json_mode {
        print_json(&serde_json::json!({
            "stages": stages,
            "notices": notices,
        }));
    } else {
        for notice in &notices {
            print_notice(notice, false);
        }
    }
    Ok(())
}

// =============================================================================
// SEARCH COMMAND
// =============================================================================

/// Filter contracts by saved view and query, or search clauses.
pub fn cmd_search(
    config: &AppConfig,
    json_mode: bool,
    view: &str,
    query: &str,
    clauses: bool,
) -> Result<(), MetavalError> {
    let view: SavedView = view.parse()?;
    let mut session = open_session(config, CyclingResponses::default());
    session.navigate(Page::Contracts);
    session.set_saved_view(view)?;
    session.set_search_query(query)?;

    if clauses {
        let found = session.clause_results();
        if json_mode {
            print_json(&serde_json::json!({ "clauses": found }));
        } else {
            println!("Clauses matching {:?}: {}", query, found.len());
            print_clauses(&found);
        }
        return Ok(());
    }

    let found = session.contract_results();
    if json_mode {
        print_json(&serde_json::json!({
            "view": view,
            "query": query,
            "contracts": found,
        }));
    } else {
        println!("{} - {} result(s)", view.label(), found.len());
        print_contracts(&found);
    }
    Ok(())
}
