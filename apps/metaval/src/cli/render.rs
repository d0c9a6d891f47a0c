//! # Console Rendering
//!
//! Text and JSON output of session state.

use metaval_core::catalog::{Clause, Contract, RequestRecord};
use metaval_core::generate::DEFAULT_KEY_TERMS;
use metaval_core::navigation::{NAV_ITEMS, NavGroup, nav_items_in};
use metaval_core::tender::{TenderView, format_file_size};
use metaval_core::{
    Notice, Notifier, Page, RequestView, ResponseProvider, Session, StageIndicator, StageMarker,
    StageView,
};

/// Print a JSON value on one line.
pub fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string(value).unwrap_or_default());
}

pub fn print_notice(notice: &Notice, json_mode: bool) {
    if json_mode {
        print_json(&serde_json::json!({ "notice": notice }));
    } else {
        println!("{}", notice);
    }
}

// =============================================================================
// PAGE LIST
// =============================================================================

pub fn print_pages(json_mode: bool) {
    if json_mode {
        let pages: Vec<_> = Page::ALL
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id(),
                    "title": p.title(),
                    "module": p.module(),
                    "sidebar": NAV_ITEMS.iter().any(|item| item.page == *p),
                })
            })
            .collect();
        print_json(&serde_json::json!({ "pages": pages }));
        return;
    }

    for group in [NavGroup::Main, NavGroup::Resources, NavGroup::System] {
        println!("{}", group.label());
        for item in nav_items_in(group) {
            println!("  {:<12} {}", item.page.id(), item.label);
        }
    }
    println!("Workflow");
    for page in Page::ALL
        .iter()
        .filter(|p| !NAV_ITEMS.iter().any(|item| item.page == **p))
    {
        println!("  {:<12} {}", page.id(), page.title());
    }
}

// =============================================================================
// FRAGMENTS
// =============================================================================

pub fn print_markers(markers: &[StageMarker]) {
    println!("{}", StageIndicator::render_line(markers));
}

pub fn print_stage_view(view: &StageView) {
    println!("{}", view.to_text());
}

pub fn print_contracts(contracts: &[Contract]) {
    if contracts.is_empty() {
        println!("  (no contracts)");
    }
    for c in contracts {
        println!(
            "  {:<9} {:<38} {:<24} {:>11}  {}  {}  {}",
            c.id, c.name, c.counterparty, c.value, c.end, c.stage, c.risk
        );
    }
}

pub fn print_clauses(clauses: &[Clause]) {
    for c in clauses {
        println!("  {:<6} {:<16} [{}] {}", c.id, c.clause_type, c.risk, c.contract);
        println!("         {}", c.snippet);
    }
}

fn print_requests(requests: &[RequestRecord]) {
    for r in requests {
        println!(
            "  {:<13} {:<40} {:<13} {:>9}  {}",
            r.id, r.title, r.requester, r.value, r.status
        );
    }
}

fn print_request(r: &RequestRecord) {
    println!("{} - {}", r.id, r.title);
    println!("  Requester:  {} ({})", r.requester, r.department);
    println!("  Value:      {}", r.value);
    println!("  Created:    {}", r.created);
    println!("  Status:     {}", r.status);
    println!("  Category:   {}", r.category);
    println!("  {}", r.description);
}

// =============================================================================
// PAGE
// =============================================================================

/// Render the current page.
pub fn print_page<R: ResponseProvider, N: Notifier>(session: &Session<R, N>, json_mode: bool) {
    if json_mode {
        print_json(&page_json(session));
        return;
    }

    let page = session.current_page();
    println!("== {} ({}) ==", page.title(), page.id());
    if let Some(markers) = session.lifecycle_indicator() {
        print_markers(&markers);
    }

    match page {
        Page::Requests => print_request_module(session),
        Page::Generate => {
            let generate = session.generate_page();
            println!("Template: {}", generate.template());
            println!("Status:   {:?}", generate.status());
            for (label, value) in DEFAULT_KEY_TERMS {
                println!("  {:<20} {}", label, value);
            }
        }
        Page::Exit => {
            let plan = session.exit_plan();
            let exit_type = plan.exit_type();
            println!("Exit type: {} ({})", exit_type, exit_type.description());
            for (i, item) in plan.checklist().iter().enumerate() {
                let mark = if item.done { 'x' } else { ' ' };
                println!("  {}. [{}] {:?}: {}", i + 1, mark, item.group, item.label);
            }
            if !plan.debrief().is_empty() {
                println!("Debrief: {}", plan.debrief());
            }
        }
        Page::Contracts | Page::Search => {
            let search = session.search_state();
            println!("View: {}  Query: {:?}", search.view.label(), search.query);
            print_contracts(&session.contract_results());
        }
        Page::TenderAi => print_tender(session),
        _ => println!("(read-only page; try `goto requests`)"),
    }
}

fn print_request_module<R: ResponseProvider, N: Notifier>(session: &Session<R, N>) {
    match session.request_view() {
        RequestView::List => print_requests(session.requests()),
        RequestView::Detail => match session.selected_request() {
            Some(r) => print_request(r),
            None => println!("(no request selected; `open <id>`)"),
        },
        RequestView::New => {
            let data = session.form().data();
            for field in data.filled_fields() {
                println!("  {:<26} {}", field.label(), data.get(field));
            }
            if let Some(draft) = session.draft() {
                println!();
                println!("{}", draft.to_text());
            }
        }
        RequestView::EditChat => {
            for m in session.chat().messages() {
                println!("  {:?}: {}", m.sender, m.text);
            }
        }
        RequestView::Workflow => {
            if let Some(markers) = session.workflow_indicator() {
                print_markers(&markers);
            }
            match session.stage_view() {
                Some(view) => print_stage_view(&view),
                None => println!("Workflow completed. `restart` to begin again."),
            }
            if session.workflow().is_some_and(|w| w.is_on_final_stage()) {
                println!("`next` completes the workflow.");
            }
        }
    }
}

fn print_tender<R: ResponseProvider, N: Notifier>(session: &Session<R, N>) {
    let tender = session.tender_page();
    if tender.view() == TenderView::Generating {
        let name = tender.current_file().map_or("", |f| f.name.as_str());
        if let Some(phase) = tender.phase() {
            println!("Generating from {}: {:?}", name, phase);
        }
        if let Some(document) = tender.document() {
            println!();
            println!("{}", document);
        }
        println!("(`back` returns to uploads)");
        return;
    }

    if tender.files().is_empty() {
        println!("  (no uploads; `upload <file.pdf> <bytes>`)");
    }
    for f in tender.files() {
        println!(
            "  #{:<3} {:<32} {:>10}  {}  {:?}",
            f.id,
            f.name,
            format_file_size(f.size_bytes),
            f.uploaded_on,
            f.status
        );
        for insight in &f.insights {
            println!("        - {}", insight);
        }
    }
}

/// JSON snapshot of the current page.
pub fn page_json<R: ResponseProvider, N: Notifier>(session: &Session<R, N>) -> serde_json::Value {
    let page = session.current_page();
    let mut value = serde_json::json!({
        "page": page.id(),
        "title": page.title(),
        "lifecycle": session.lifecycle_indicator(),
    });

    let detail = match page {
        Page::Requests => serde_json::json!({
            "view": session.request_view(),
            "form": session
                .form()
                .data()
                .filled_fields()
                .iter()
                .map(|f| (f.key().to_string(), serde_json::json!(session.form().data().get(*f))))
                .collect::<serde_json::Map<_, _>>(),
            "draft": session.draft(),
            "chat": session.chat().messages(),
            "selected_request": session.selected_request(),
            "workflow": session.workflow().map(|w| serde_json::json!({
                "phase": w.phase(),
                "total": w.total_stages(),
                "completions": w.completions(),
                "final_stage": w.is_on_final_stage(),
            })),
            "stage": session.stage_view(),
        }),
        Page::Generate => serde_json::json!({ "generate": session.generate_page() }),
        Page::Exit => serde_json::json!({ "exit": session.exit_plan() }),
        Page::Contracts | Page::Search => serde_json::json!({
            "saved_view": session.search_state().view,
            "query": session.search_state().query,
            "contracts": session.contract_results(),
        }),
        Page::TenderAi => serde_json::json!({ "tender": session.tender_page() }),
        _ => serde_json::json!({}),
    };

    if let (Some(map), serde_json::Value::Object(extra)) = (value.as_object_mut(), detail) {
        map.extend(extra);
    }
    value
}
