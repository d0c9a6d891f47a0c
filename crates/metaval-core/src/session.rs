//! # Session Module
//!
//! The module shell: one value owning every piece of dashboard state and the
//! transitions between them.
//!
//! A `Session` combines:
//! - the `Router` (current page, request sub-view)
//! - the request module (form, draft, chat, workflow controller)
//! - the generate, exit and tender pages
//! - contract search state
//! - the delayed-task `Scheduler`
//!
//! Collaborators are injected: a [`ResponseProvider`] answers chat prompts and
//! a [`Notifier`] receives toast-style notices.
//!
//! ## Page lifetime
//!
//! Module state lives only while its page is shown. Navigating to a page
//! rendered by a different module resets the state of the module being left
//! and cancels its pending delayed tasks.

use crate::assistant::{ChatSession, ResponseProvider};
use crate::catalog::{
    Clause, Contract, ContractQuery, RequestRecord, SavedView, find_request, sample_clauses,
    sample_contracts, sample_requests, search_clauses, search_contracts,
};
use crate::draft::DraftDocument;
use crate::exit::{ExitPlan, ExitType};
use crate::form::{RequestField, RequestForm};
use crate::generate::{GeneratePage, Template};
use crate::navigation::{ModuleKind, NavTarget, Navigation, Page, RequestView, Router};
use crate::schedule::{
    DEFAULT_CHAT_REPLY_DELAY_MS, DEFAULT_DRAFT_GENERATION_DELAY_MS, DelayedTask, FiredTask,
    Scheduler, TaskId,
};
use crate::tender::{
    DRAFTING_MS, GENERATING_VIEW_DELAY_MS, INSIGHT_INTERVAL_MS, TENDER_INSIGHTS, THINKING_MS,
    TenderPage, TenderUpload, UploadedFile,
};
use crate::workflow::{
    CompletionPolicy, StageIndicator, StageMarker, StageRenderer, StageSequence, StageView,
    Transition, WorkflowController,
};
use crate::{MetavalError, Notice, Notifier};
use chrono::NaiveDate;

// =============================================================================
// NOTICE TEXT
// =============================================================================

pub const MSG_DRAFT_CREATED: &str = "Draft created!";
pub const MSG_REQUIRED_FIELDS: &str = "Please fill in at least Contract Name and Type";
pub const MSG_WORKFLOW_COMPLETED: &str = "Contract workflow completed!";
pub const MSG_CONTRACT_DRAFTED: &str = "Contract drafted successfully!";
pub const MSG_TERMINATION_STARTED: &str = "Termination sequence initiated.";
pub const MSG_PDF_ONLY: &str = "Only PDF files are supported";
pub const MSG_FILE_TOO_LARGE: &str = "File size exceeds 50MB limit";
pub const MSG_PDF_UPLOADED: &str = "PDF uploaded successfully!";
pub const MSG_FILE_REMOVED: &str = "File removed";
pub const MSG_TENDER_GENERATED: &str = "Tender document generated!";
pub const MSG_TENDER_EXPORTED: &str = "Tender generated and downloaded!";

/// Owner used by the "My Contracts" view when none is configured.
pub const DEFAULT_USER: &str = "Robert Chen";

// =============================================================================
// OPTIONS
// =============================================================================

/// Tunables of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub completion: CompletionPolicy,
    pub chat_reply_delay_ms: u64,
    pub draft_generation_delay_ms: u64,
    pub current_user: String,
    /// Date stamped on drafts and used by the "expiring" search view.
    pub today: NaiveDate,
}

impl SessionOptions {
    /// Defaults for everything except the date, which the caller supplies.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            completion: CompletionPolicy::default(),
            chat_reply_delay_ms: DEFAULT_CHAT_REPLY_DELAY_MS,
            draft_generation_delay_ms: DEFAULT_DRAFT_GENERATION_DELAY_MS,
            current_user: DEFAULT_USER.to_string(),
            today,
        }
    }
}

/// Saved view and free-text query of the contract search page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchState {
    pub view: SavedView,
    pub query: String,
}

// =============================================================================
// SESSION
// =============================================================================

pub struct Session<R: ResponseProvider, N: Notifier> {
    options: SessionOptions,
    router: Router,
    scheduler: Scheduler,

    // Request module
    request_view: RequestView,
    form: RequestForm,
    workflow: Option<WorkflowController>,
    chat: ChatSession,
    requests: Vec<RequestRecord>,
    selected_request: Option<RequestRecord>,

    generate: GeneratePage,
    exit: ExitPlan,
    tender: TenderPage,

    search: SearchState,
    contracts: Vec<Contract>,
    clauses: Vec<Clause>,

    responder: R,
    notifier: N,
}

impl<R: ResponseProvider, N: Notifier> Session<R, N> {
    /// Open a session on the dashboard.
    pub fn new(options: SessionOptions, responder: R, notifier: N) -> Self {
        Self {
            options,
            router: Router::new(),
            scheduler: Scheduler::new(),
            request_view: RequestView::default(),
            form: RequestForm::new(),
            workflow: None,
            chat: ChatSession::new(),
            requests: sample_requests(),
            selected_request: None,
            generate: GeneratePage::new(),
            exit: ExitPlan::new(),
            tender: TenderPage::new(),
            search: SearchState::default(),
            contracts: sample_contracts(),
            clauses: sample_clauses(),
            responder,
            notifier,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    #[must_use]
    pub fn current_page(&self) -> Page {
        self.router.current()
    }

    #[must_use]
    pub fn request_view(&self) -> RequestView {
        self.request_view
    }

    #[must_use]
    pub fn form(&self) -> &RequestForm {
        &self.form
    }

    #[must_use]
    pub fn draft(&self) -> Option<&DraftDocument> {
        self.form.draft()
    }

    /// The request workflow controller; `None` until the workflow is entered.
    #[must_use]
    pub fn workflow(&self) -> Option<&WorkflowController> {
        self.workflow.as_ref()
    }

    #[must_use]
    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    #[must_use]
    pub fn requests(&self) -> &[RequestRecord] {
        &self.requests
    }

    #[must_use]
    pub fn selected_request(&self) -> Option<&RequestRecord> {
        self.selected_request.as_ref()
    }

    #[must_use]
    pub fn generate_page(&self) -> &GeneratePage {
        &self.generate
    }

    #[must_use]
    pub fn exit_plan(&self) -> &ExitPlan {
        &self.exit
    }

    #[must_use]
    pub fn tender_page(&self) -> &TenderPage {
        &self.tender
    }

    #[must_use]
    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    #[must_use]
    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    /// Virtual time of the session clock in milliseconds.
    #[must_use]
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    /// Milliseconds until the next delayed task is due.
    #[must_use]
    pub fn next_due_in(&self) -> Option<u64> {
        self.scheduler.next_due_in()
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending_count()
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Switch pages.
    ///
    /// Leaving a module resets its state and cancels its delayed tasks. An
    /// initial sub-view is applied only to the request module; entering it
    /// without one shows the new-request form.
    pub fn navigate(&mut self, target: impl Into<NavTarget>) -> Navigation {
        let nav = self.router.navigate(target);

        if nav.from.module() != nav.to.module() {
            self.scheduler.cancel_for(nav.from);
            self.reset_module(nav.from.module());
        }

        if nav.to == Page::Requests {
            match nav.initial_view {
                Some(view) => self.enter_request_view(view),
                None if nav.changed_page() => self.enter_request_view(RequestView::default()),
                None => {}
            }
        }

        nav
    }

    fn reset_module(&mut self, module: ModuleKind) {
        match module {
            ModuleKind::Request => {
                self.request_view = RequestView::default();
                self.form = RequestForm::new();
                self.workflow = None;
                self.chat = ChatSession::new();
                self.selected_request = None;
            }
            ModuleKind::Generate => self.generate = GeneratePage::new(),
            ModuleKind::Exit => self.exit = ExitPlan::new(),
            ModuleKind::Search => self.search = SearchState::default(),
            ModuleKind::TenderAi => self.tender = TenderPage::new(),
            _ => {}
        }
    }

    fn enter_request_view(&mut self, view: RequestView) {
        if view == RequestView::Workflow {
            self.workflow = Some(self.fresh_workflow());
        }
        self.request_view = view;
    }

    fn fresh_workflow(&self) -> WorkflowController {
        WorkflowController::with_policy(StageSequence::request_workflow(), self.options.completion)
    }

    fn require_page(&self, action: &str, page: Page) -> Result<(), MetavalError> {
        if self.current_page() == page {
            Ok(())
        } else {
            Err(MetavalError::not_available(action, self.current_page()))
        }
    }

    fn require_request_view(&self, action: &str, view: RequestView) -> Result<(), MetavalError> {
        self.require_page(action, Page::Requests)?;
        if self.request_view == view {
            Ok(())
        } else {
            Err(MetavalError::not_available(action, Page::Requests))
        }
    }

    // -------------------------------------------------------------------------
    // Request form
    // -------------------------------------------------------------------------

    /// Set a form field by key on the new-request form.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<RequestField, MetavalError> {
        self.require_request_view("set", RequestView::New)?;
        self.form.set_field(key, value)
    }

    /// Validate the form and show the draft.
    ///
    /// Either outcome is also reported through the notifier.
    pub fn submit(&mut self) -> Result<&DraftDocument, MetavalError> {
        self.require_request_view("submit", RequestView::New)?;

        if let Err(e) = RequestForm::validate(self.form.data()) {
            self.notifier.notify(Notice::error(MSG_REQUIRED_FIELDS));
            return Err(e.into());
        }

        self.notifier.notify(Notice::success(MSG_DRAFT_CREATED));
        Ok(self.form.submit(self.options.today)?)
    }

    /// Leave the current request sub-view for the new-request form, hiding
    /// any draft. On the generate page, return to requests.
    pub fn cancel(&mut self) -> Result<(), MetavalError> {
        match self.current_page() {
            Page::Requests => {
                self.form.dismiss_draft();
                self.workflow = None;
                self.request_view = RequestView::New;
                Ok(())
            }
            Page::Generate => {
                self.navigate(Page::Requests);
                Ok(())
            }
            other => Err(MetavalError::not_available("cancel", other)),
        }
    }

    /// Open the assistant chat for the shown draft.
    pub fn edit(&mut self) -> Result<(), MetavalError> {
        self.require_request_view("edit", RequestView::New)?;
        if self.form.draft().is_none() {
            return Err(MetavalError::not_available("edit", Page::Requests));
        }
        self.request_view = RequestView::EditChat;
        Ok(())
    }

    /// Enter the request workflow at stage 1.
    pub fn start_workflow(&mut self) -> Result<(), MetavalError> {
        self.require_request_view("start", RequestView::EditChat)?;
        self.enter_request_view(RequestView::Workflow);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Request list / detail
    // -------------------------------------------------------------------------

    /// Show the detail view of a request.
    pub fn open_request(&mut self, id: &str) -> Result<&RequestRecord, MetavalError> {
        self.require_page("open", Page::Requests)?;
        let record = find_request(id)?;
        self.request_view = RequestView::Detail;
        Ok(&*self.selected_request.insert(record))
    }

    /// "Generate Contract" from the request detail view.
    pub fn generate_from_request(&mut self) -> Result<Navigation, MetavalError> {
        self.require_request_view("generate", RequestView::Detail)?;
        Ok(self.navigate(Page::Generate))
    }

    // -------------------------------------------------------------------------
    // Workflow
    // -------------------------------------------------------------------------

    fn workflow_mut(&mut self, action: &str) -> Result<&mut WorkflowController, MetavalError> {
        self.require_request_view(action, RequestView::Workflow)?;
        self.workflow
            .as_mut()
            .ok_or_else(|| MetavalError::not_available(action, Page::Requests))
    }

    /// Forward action of the workflow.
    ///
    /// Completing the final stage notifies once. Under auto-reset the request
    /// module then returns to the new-request form with the controller back on
    /// stage 1.
    pub fn advance(&mut self) -> Result<Transition, MetavalError> {
        let transition = self.workflow_mut("next")?.advance();
        if transition.is_completion() {
            self.notifier.notify(Notice::success(MSG_WORKFLOW_COMPLETED));
            if self.options.completion == CompletionPolicy::AutoReset {
                self.request_view = RequestView::New;
            }
        }
        Ok(transition)
    }

    pub fn retreat(&mut self) -> Result<Transition, MetavalError> {
        Ok(self.workflow_mut("back")?.retreat())
    }

    pub fn jump_to(&mut self, index: usize) -> Result<Transition, MetavalError> {
        self.workflow_mut("jump")?.jump_to(index)
    }

    pub fn restart(&mut self) -> Result<Transition, MetavalError> {
        Ok(self.workflow_mut("restart")?.restart())
    }

    /// Content of the current workflow stage, projected from the form.
    #[must_use]
    pub fn stage_view(&self) -> Option<StageView> {
        let stage = self.workflow.as_ref()?.current_stage()?;
        Some(StageRenderer::render(stage, self.form.data()))
    }

    /// Markers of the request workflow stepper.
    #[must_use]
    pub fn workflow_indicator(&self) -> Option<Vec<StageMarker>> {
        self.workflow.as_ref().map(StageIndicator::for_controller)
    }

    /// Markers of the contract lifecycle, for pages that show it.
    #[must_use]
    pub fn lifecycle_indicator(&self) -> Option<Vec<StageMarker>> {
        let key = self.current_page().lifecycle_stage()?;
        let lifecycle = StageSequence::contract_lifecycle();
        let current = lifecycle.position_of(key)?;
        Some(StageIndicator::markers(
            current,
            lifecycle.len(),
            &lifecycle.labels(),
        ))
    }

    // -------------------------------------------------------------------------
    // Chat
    // -------------------------------------------------------------------------

    /// Post a chat message. The reply is scheduled after the chat delay.
    ///
    /// Returns `None` when the message was blank and nothing was sent.
    pub fn send_chat(&mut self, text: &str) -> Result<Option<TaskId>, MetavalError> {
        self.require_request_view("say", RequestView::EditChat)?;
        Ok(self.chat.send(text).map(|prompt| {
            self.scheduler.schedule(
                self.options.chat_reply_delay_ms,
                DelayedTask::ChatReply { prompt },
            )
        }))
    }

    // -------------------------------------------------------------------------
    // Generate page
    // -------------------------------------------------------------------------

    pub fn select_template(&mut self, template: Template) -> Result<(), MetavalError> {
        self.require_page("template", Page::Generate)?;
        self.generate.select_template(template);
        Ok(())
    }

    /// Start draft generation. Returns false if it is already running.
    pub fn generate(&mut self) -> Result<bool, MetavalError> {
        self.require_page("generate", Page::Generate)?;
        if !self.generate.begin() {
            return Ok(false);
        }
        self.scheduler.schedule(
            self.options.draft_generation_delay_ms,
            DelayedTask::DraftGenerated,
        );
        Ok(true)
    }

    /// Move on to negotiation once a draft exists.
    pub fn review_and_negotiate(&mut self) -> Result<Navigation, MetavalError> {
        self.require_page("negotiate", Page::Generate)?;
        if !self.generate.is_drafted() {
            return Err(MetavalError::not_available("negotiate", Page::Generate));
        }
        Ok(self.navigate(Page::Negotiate))
    }

    // -------------------------------------------------------------------------
    // Exit page
    // -------------------------------------------------------------------------

    pub fn select_exit_type(&mut self, exit_type: ExitType) -> Result<(), MetavalError> {
        self.require_page("exit-type", Page::Exit)?;
        self.exit.select(exit_type);
        Ok(())
    }

    pub fn toggle_checklist(&mut self, index: usize) -> Result<bool, MetavalError> {
        self.require_page("check", Page::Exit)?;
        self.exit.toggle(index)
    }

    pub fn set_debrief(&mut self, text: &str) -> Result<(), MetavalError> {
        self.require_page("debrief", Page::Exit)?;
        self.exit.set_debrief(text);
        Ok(())
    }

    pub fn execute_closure(&mut self) -> Result<(), MetavalError> {
        self.require_page("execute", Page::Exit)?;
        self.notifier.notify(Notice::error(MSG_TERMINATION_STARTED));
        Ok(())
    }

    pub fn abort(&mut self) -> Result<Navigation, MetavalError> {
        self.require_page("abort", Page::Exit)?;
        Ok(self.navigate(Page::Review))
    }

    // -------------------------------------------------------------------------
    // Tender AI page
    // -------------------------------------------------------------------------

    /// Validate and store an uploaded tender file.
    ///
    /// Rejections and successes are both reported through the notifier.
    pub fn upload_file(&mut self, upload: TenderUpload) -> Result<&UploadedFile, MetavalError> {
        self.require_page("upload", Page::TenderAi)?;
        match self.tender.upload(upload, self.options.today) {
            Ok(file) => {
                self.notifier.notify(Notice::success(MSG_PDF_UPLOADED));
                Ok(file)
            }
            Err(e) => {
                let message = match &e {
                    MetavalError::FileTooLarge { .. } => MSG_FILE_TOO_LARGE,
                    _ => MSG_PDF_ONLY,
                };
                self.notifier.notify(Notice::error(message));
                Err(e)
            }
        }
    }

    /// Drop an uploaded file along with its pending analysis.
    pub fn remove_file(&mut self, id: u64) -> Result<UploadedFile, MetavalError> {
        self.require_page("remove", Page::TenderAi)?;
        let removed = self.tender.remove(id)?;
        self.scheduler.cancel_where(|task| task.tender_file() == Some(id));
        self.notifier.notify(Notice::info(MSG_FILE_REMOVED));
        Ok(removed)
    }

    /// Start extracting insights from a ready file, one per interval.
    pub fn analyze_file(&mut self, id: u64) -> Result<(), MetavalError> {
        self.require_page("analyze", Page::TenderAi)?;
        self.tender.begin_analysis(id)?;
        let mut delay = 0u64;
        for index in 0..TENDER_INSIGHTS.len() {
            delay = delay.saturating_add(INSIGHT_INTERVAL_MS);
            self.scheduler
                .schedule(delay, DelayedTask::TenderInsight { file: id, index });
        }
        Ok(())
    }

    /// Leave the generating view for the upload list.
    pub fn tender_back(&mut self) -> Result<(), MetavalError> {
        self.require_page("back", Page::TenderAi)?;
        self.tender.show_upload();
        Ok(())
    }

    /// Plain-text insight export of a file.
    pub fn export_insights(&mut self, id: u64) -> Result<String, MetavalError> {
        self.require_page("insights", Page::TenderAi)?;
        let text = self
            .tender
            .file(id)
            .map(UploadedFile::insights_text)
            .ok_or(MetavalError::UnknownFile(id))?;
        self.notifier.notify(Notice::success(MSG_TENDER_EXPORTED));
        Ok(text)
    }

    // -------------------------------------------------------------------------
    // Contract search
    // -------------------------------------------------------------------------

    fn require_search(&self, action: &str) -> Result<(), MetavalError> {
        if self.current_page().module() == ModuleKind::Search {
            Ok(())
        } else {
            Err(MetavalError::not_available(action, self.current_page()))
        }
    }

    pub fn set_saved_view(&mut self, view: SavedView) -> Result<(), MetavalError> {
        self.require_search("view")?;
        self.search.view = view;
        Ok(())
    }

    pub fn set_search_query(&mut self, query: &str) -> Result<(), MetavalError> {
        self.require_search("find")?;
        self.search.query = query.to_string();
        Ok(())
    }

    /// Contracts matching the current saved view and query.
    #[must_use]
    pub fn contract_results(&self) -> Vec<Contract> {
        search_contracts(
            &self.contracts,
            &ContractQuery {
                view: self.search.view,
                text: &self.search.query,
                current_user: &self.options.current_user,
                today: self.options.today,
            },
        )
    }

    /// Clauses matching the current query.
    #[must_use]
    pub fn clause_results(&self) -> Vec<Clause> {
        search_clauses(&self.clauses, &self.search.query)
    }

    // -------------------------------------------------------------------------
    // Clock
    // -------------------------------------------------------------------------

    /// Advance the session clock and apply every delayed task that came due.
    ///
    /// Tasks scheduled by a firing task are measured from its due time and
    /// fire within the same tick when they fall inside the window.
    pub fn tick(&mut self, elapsed_ms: u64) -> Vec<FiredTask> {
        let until = self.scheduler.now().saturating_add(elapsed_ms);
        let mut fired = Vec::new();
        while let Some(task) = self.scheduler.pop_due(until) {
            self.apply(&task.task);
            fired.push(task);
        }
        self.scheduler.advance_to(until);
        fired
    }

    fn apply(&mut self, task: &DelayedTask) {
        match task {
            DelayedTask::ChatReply { prompt } => {
                let reply = self.responder.respond(prompt);
                self.chat.receive(reply);
            }
            DelayedTask::DraftGenerated => {
                if self.generate.finish() {
                    self.notifier.notify(Notice::success(MSG_CONTRACT_DRAFTED));
                }
            }
            DelayedTask::TenderInsight { file, index } => {
                if self.tender.add_insight(*file, *index) == Some(true) {
                    self.scheduler.schedule(
                        GENERATING_VIEW_DELAY_MS,
                        DelayedTask::TenderGenerating { file: *file },
                    );
                }
            }
            DelayedTask::TenderGenerating { file } => {
                if self.tender.open_generating(*file) {
                    self.scheduler
                        .schedule(THINKING_MS, DelayedTask::TenderDrafting { file: *file });
                }
            }
            DelayedTask::TenderDrafting { file } => {
                if self.tender.start_drafting(*file) {
                    self.scheduler
                        .schedule(DRAFTING_MS, DelayedTask::TenderComplete { file: *file });
                }
            }
            DelayedTask::TenderComplete { file } => {
                if self.tender.complete(*file, self.options.today) {
                    self.notifier.notify(Notice::success(MSG_TENDER_GENERATED));
                }
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
