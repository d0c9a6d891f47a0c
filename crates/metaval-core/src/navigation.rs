//! # Navigation
//!
//! Closed set of page identifiers, the sidebar table, and the router that
//! owns the current page.
//!
//! Unknown identifiers are rejected when parsed; the router itself only ever
//! holds a valid [`Page`].

use crate::MetavalError;
use crate::workflow::StageKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// PAGES
// =============================================================================

/// Every top-level page the shell can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    Contracts,
    TenderAi,
    Review,
    Library,
    Risk,
    Renewals,
    Audit,
    Admin,
    Managers,
    Calendar,
    Settings,
    Requests,
    Generate,
    Negotiate,
    Approval,
    Execute,
    Search,
    Comply,
    Exit,
    Vendors,
    Analytics,
}

/// The module that renders a page. Several pages share a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleKind {
    Dashboard,
    Search,
    TenderAi,
    Review,
    Vendors,
    Comply,
    Analytics,
    Settings,
    Request,
    Generate,
    Negotiate,
    Approval,
    Execute,
    Exit,
}

impl Page {
    pub const ALL: [Page; 22] = [
        Page::Dashboard,
        Page::Contracts,
        Page::TenderAi,
        Page::Review,
        Page::Library,
        Page::Risk,
        Page::Renewals,
        Page::Audit,
        Page::Admin,
        Page::Managers,
        Page::Calendar,
        Page::Settings,
        Page::Requests,
        Page::Generate,
        Page::Negotiate,
        Page::Approval,
        Page::Execute,
        Page::Search,
        Page::Comply,
        Page::Exit,
        Page::Vendors,
        Page::Analytics,
    ];

    /// Route identifier.
    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Contracts => "contracts",
            Page::TenderAi => "tender-ai",
            Page::Review => "review",
            Page::Library => "library",
            Page::Risk => "risk",
            Page::Renewals => "renewals",
            Page::Audit => "audit",
            Page::Admin => "admin",
            Page::Managers => "managers",
            Page::Calendar => "calendar",
            Page::Settings => "settings",
            Page::Requests => "requests",
            Page::Generate => "generate",
            Page::Negotiate => "negotiate",
            Page::Approval => "approval",
            Page::Execute => "execute",
            Page::Search => "search",
            Page::Comply => "comply",
            Page::Exit => "exit",
            Page::Vendors => "vendors",
            Page::Analytics => "analytics",
        }
    }

    /// Breadcrumb title. Sidebar pages use their sidebar label.
    #[must_use]
    pub fn title(&self) -> &'static str {
        if let Some(item) = NAV_ITEMS.iter().find(|item| item.page == *self) {
            return item.label;
        }
        match self {
            Page::Requests => "Requests",
            Page::Generate => "Generate",
            Page::Negotiate => "Negotiate",
            Page::Approval => "Approvals",
            Page::Execute => "Execute",
            Page::Search => "Search",
            Page::Comply => "Compliance",
            Page::Exit => "Exit",
            Page::Vendors => "Vendors",
            Page::Analytics => "Analytics",
            _ => "Dashboard",
        }
    }

    #[must_use]
    pub fn module(&self) -> ModuleKind {
        match self {
            Page::Dashboard | Page::Calendar => ModuleKind::Dashboard,
            Page::Contracts | Page::Search => ModuleKind::Search,
            Page::TenderAi => ModuleKind::TenderAi,
            Page::Review | Page::Renewals => ModuleKind::Review,
            Page::Library | Page::Managers | Page::Vendors => ModuleKind::Vendors,
            Page::Risk | Page::Comply => ModuleKind::Comply,
            Page::Audit | Page::Analytics => ModuleKind::Analytics,
            Page::Admin | Page::Settings => ModuleKind::Settings,
            Page::Requests => ModuleKind::Request,
            Page::Generate => ModuleKind::Generate,
            Page::Negotiate => ModuleKind::Negotiate,
            Page::Approval => ModuleKind::Approval,
            Page::Execute => ModuleKind::Execute,
            Page::Exit => ModuleKind::Exit,
        }
    }

    /// Lifecycle stage a page represents, for pages that show the indicator.
    #[must_use]
    pub fn lifecycle_stage(&self) -> Option<StageKey> {
        match self {
            Page::Generate => Some(StageKey::Generate),
            Page::Exit => Some(StageKey::Exit),
            _ => None,
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Page {
    type Err = MetavalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Page::ALL
            .into_iter()
            .find(|p| p.id() == wanted)
            .ok_or_else(|| MetavalError::UnknownPage(s.trim().to_string()))
    }
}

// =============================================================================
// REQUEST SUB-VIEWS
// =============================================================================

/// Sub-views of the request module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestView {
    List,
    #[default]
    New,
    Detail,
    Workflow,
    EditChat,
}

impl RequestView {
    pub const ALL: [RequestView; 5] = [
        RequestView::List,
        RequestView::New,
        RequestView::Detail,
        RequestView::Workflow,
        RequestView::EditChat,
    ];

    #[must_use]
    pub fn id(&self) -> &'static str {
        match self {
            RequestView::List => "list",
            RequestView::New => "new",
            RequestView::Detail => "detail",
            RequestView::Workflow => "workflow",
            RequestView::EditChat => "edit-chat",
        }
    }
}

impl fmt::Display for RequestView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RequestView {
    type Err = MetavalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        RequestView::ALL
            .into_iter()
            .find(|v| v.id() == wanted)
            .ok_or_else(|| MetavalError::UnknownView(s.trim().to_string()))
    }
}

// =============================================================================
// NAVIGATION TARGET
// =============================================================================

/// Argument of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NavTarget {
    Page(Page),
    WithView { page: Page, view: RequestView },
}

impl NavTarget {
    #[must_use]
    pub fn page(&self) -> Page {
        match self {
            NavTarget::Page(page) | NavTarget::WithView { page, .. } => *page,
        }
    }
}

impl From<Page> for NavTarget {
    fn from(page: Page) -> Self {
        NavTarget::Page(page)
    }
}

impl FromStr for NavTarget {
    type Err = MetavalError;

    /// Parses `page` or `page:view` (e.g. `requests:new`).
    ///
    /// A sub-view is only meaningful for `requests`; giving one for any other
    /// page is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            None => Ok(NavTarget::Page(s.parse()?)),
            Some((page, view)) => {
                let page: Page = page.parse()?;
                if page != Page::Requests {
                    return Err(MetavalError::UnknownView(format!("{}:{}", page, view.trim())));
                }
                Ok(NavTarget::WithView {
                    page,
                    view: view.parse()?,
                })
            }
        }
    }
}

// =============================================================================
// SIDEBAR
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavGroup {
    Main,
    Resources,
    System,
}

impl NavGroup {
    pub const ALL: [NavGroup; 3] = [NavGroup::Main, NavGroup::Resources, NavGroup::System];

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            NavGroup::Main => "Main",
            NavGroup::Resources => "Resources",
            NavGroup::System => "System",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub page: Page,
    pub label: &'static str,
    pub group: NavGroup,
}

pub const NAV_ITEMS: [NavItem; 12] = [
    NavItem { page: Page::Dashboard, label: "Dashboard", group: NavGroup::Main },
    NavItem { page: Page::Contracts, label: "Contracts", group: NavGroup::Main },
    NavItem { page: Page::TenderAi, label: "Tender AI", group: NavGroup::Main },
    NavItem { page: Page::Review, label: "Review", group: NavGroup::Main },
    NavItem { page: Page::Library, label: "Library", group: NavGroup::Resources },
    NavItem { page: Page::Risk, label: "Risk Dashboard", group: NavGroup::Resources },
    NavItem { page: Page::Renewals, label: "Renewals", group: NavGroup::Resources },
    NavItem { page: Page::Audit, label: "Audit Logs", group: NavGroup::System },
    NavItem { page: Page::Admin, label: "Admin", group: NavGroup::System },
    NavItem { page: Page::Managers, label: "Managers", group: NavGroup::System },
    NavItem { page: Page::Calendar, label: "Calendar", group: NavGroup::System },
    NavItem { page: Page::Settings, label: "Settings", group: NavGroup::System },
];

/// Sidebar entries of one group, in table order.
pub fn nav_items_in(group: NavGroup) -> impl Iterator<Item = &'static NavItem> {
    NAV_ITEMS.iter().filter(move |item| item.group == group)
}

// =============================================================================
// ROUTER
// =============================================================================

/// Outcome of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub from: Page,
    pub to: Page,
    pub initial_view: Option<RequestView>,
}

impl Navigation {
    #[must_use]
    pub fn changed_page(&self) -> bool {
        self.from != self.to
    }
}

/// Owns the current page and the pending request sub-view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    current: Page,
    request_view: Option<RequestView>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Start on the dashboard.
    #[must_use]
    pub fn new() -> Self {
        Self {
            current: Page::Dashboard,
            request_view: None,
        }
    }

    #[must_use]
    pub fn current(&self) -> Page {
        self.current
    }

    /// Sub-view requested for the request module by the last navigation.
    #[must_use]
    pub fn request_view(&self) -> Option<RequestView> {
        self.request_view
    }

    /// Switch pages. Only a `requests` target keeps its sub-view; every other
    /// target clears the stored one.
    pub fn navigate(&mut self, target: impl Into<NavTarget>) -> Navigation {
        let target = target.into();
        let from = self.current;

        self.request_view = match target {
            NavTarget::WithView {
                page: Page::Requests,
                view,
            } => Some(view),
            _ => None,
        };
        self.current = target.page();

        Navigation {
            from,
            to: self.current,
            initial_view: self.request_view,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_ids_round_trip() {
        for page in Page::ALL {
            assert_eq!(page.id().parse::<Page>().ok(), Some(page));
        }
    }

    #[test]
    fn unknown_page_rejected() {
        assert!(matches!(
            "billing".parse::<Page>(),
            Err(MetavalError::UnknownPage(p)) if p == "billing"
        ));
    }

    #[test]
    fn nav_target_with_view() {
        let target: NavTarget = "requests:new".parse().expect("parse");
        assert_eq!(
            target,
            NavTarget::WithView {
                page: Page::Requests,
                view: RequestView::New
            }
        );
        assert!("review:new".parse::<NavTarget>().is_err());
        assert!("requests:grid".parse::<NavTarget>().is_err());
    }

    #[test]
    fn router_keeps_view_only_for_requests() {
        let mut router = Router::new();
        let nav = router.navigate(NavTarget::WithView {
            page: Page::Requests,
            view: RequestView::Workflow,
        });
        assert_eq!(nav.to, Page::Requests);
        assert_eq!(router.request_view(), Some(RequestView::Workflow));

        router.navigate(Page::Generate);
        assert_eq!(router.current(), Page::Generate);
        assert_eq!(router.request_view(), None);
    }

    #[test]
    fn titles_follow_sidebar_labels() {
        assert_eq!(Page::Risk.title(), "Risk Dashboard");
        assert_eq!(Page::Audit.title(), "Audit Logs");
        assert_eq!(Page::Requests.title(), "Requests");
    }

    #[test]
    fn shared_modules() {
        assert_eq!(Page::Contracts.module(), ModuleKind::Search);
        assert_eq!(Page::Renewals.module(), ModuleKind::Review);
        assert_eq!(Page::Managers.module(), ModuleKind::Vendors);
        assert_eq!(Page::Admin.module(), ModuleKind::Settings);
    }

    #[test]
    fn sidebar_groups() {
        assert_eq!(nav_items_in(NavGroup::Main).count(), 4);
        assert_eq!(nav_items_in(NavGroup::Resources).count(), 3);
        assert_eq!(nav_items_in(NavGroup::System).count(), 5);
    }
}
