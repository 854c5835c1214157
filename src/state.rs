//! Core application state types and constants.
//!
//! This module contains the per-screen state held by the app, the results
//! posted by background workers, and the palette shared by the screens.

use std::collections::{HashMap, HashSet};
use std::sync::mpsc::Receiver;

use crate::api::{PendingUser, Team, User};
use crate::poller::RefreshPoller;
use crate::ui::invite_qr::QrGrid;
use crate::viewport::{MeasurementPoint, ViewportEngine};

// ============================================================================
// Constants
// ============================================================================

/// How long a toast stays on screen, in seconds
pub const TOAST_DURATION_SECS: u64 = 3;

/// Relaxation level above which a reading is considered relaxed (chart guide)
pub const RELAXED_LEVEL: f64 = 70.0;

/// Relaxation level below which a reading is considered tense (chart guide)
pub const TENSE_LEVEL: f64 = 30.0;

/// Member bar thresholds on the team page
pub const BAR_GOOD_LEVEL: f64 = 75.0;
pub const BAR_FAIR_LEVEL: f64 = 40.0;

/// Brand colors
pub const PRIMARY_COLOR: [u8; 3] = [59, 130, 246]; // Blue
pub const ACCENT_COLOR: [u8; 3] = [139, 92, 246]; // Violet
pub const GOOD_COLOR: [u8; 3] = [16, 185, 129]; // Green
pub const FAIR_COLOR: [u8; 3] = [245, 158, 11]; // Amber
pub const POOR_COLOR: [u8; 3] = [239, 68, 68]; // Red
pub const MUTED_TEXT_COLOR: [u8; 3] = [100, 116, 139]; // Slate

// ============================================================================
// Navigation
// ============================================================================

/// The screen currently shown
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Welcome,
    Auth,
    ConfirmEmail,
    Main,
    Team(String),
    UserDetail { team_id: String, user_id: String },
}

impl Screen {
    /// Whether the screen needs a signed-in user
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Screen::Welcome | Screen::Auth | Screen::ConfirmEmail)
    }

    /// Apply the router guards: signed-out users are sent to the welcome
    /// screen, signed-in users skip the public screens
    pub fn guarded(self, signed_in: bool) -> Screen {
        match (signed_in, self.requires_auth()) {
            (false, true) => Screen::Welcome,
            (true, false) => Screen::Main,
            (_, _) => self,
        }
    }
}

// ============================================================================
// Background work
// ============================================================================

/// Result from a background job
pub enum LoadResult<T> {
    Success(T),
    Error(String),
}

/// Current state of a background load
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadingState {
    /// No loading in progress
    #[default]
    Idle,
    /// Loading (contains what is being loaded)
    Loading(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading(_))
    }
}

/// Type of toast notification (determines color)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToastType {
    /// Informational message (blue)
    #[default]
    Info,
    /// Success message (green)
    Success,
    /// Warning message (amber)
    Warning,
    /// Error message (red)
    Error,
}

impl ToastType {
    /// Get the background color for this toast type
    pub fn color(&self) -> [u8; 3] {
        match self {
            ToastType::Info => PRIMARY_COLOR,
            ToastType::Success => GOOD_COLOR,
            ToastType::Warning => FAIR_COLOR,
            ToastType::Error => POOR_COLOR,
        }
    }

    /// Get the text color for this toast type
    pub fn text_color(&self) -> [u8; 3] {
        match self {
            ToastType::Warning => [30, 30, 30], // Dark text for amber background
            _ => [255, 255, 255],
        }
    }
}

// ============================================================================
// Relaxation helpers
// ============================================================================

/// Color band of a member's latest relaxation level
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelaxationBand {
    Good,
    Fair,
    Poor,
}

impl RelaxationBand {
    pub fn of(level: f64) -> Self {
        if level >= BAR_GOOD_LEVEL {
            RelaxationBand::Good
        } else if level >= BAR_FAIR_LEVEL {
            RelaxationBand::Fair
        } else {
            RelaxationBand::Poor
        }
    }

    pub fn color(&self) -> [u8; 3] {
        match self {
            RelaxationBand::Good => GOOD_COLOR,
            RelaxationBand::Fair => FAIR_COLOR,
            RelaxationBand::Poor => POOR_COLOR,
        }
    }
}

/// A team member with their most recent reading
#[derive(Clone, Debug)]
pub struct MemberRow {
    pub user: User,
    pub latest: Option<MeasurementPoint>,
}

/// Mean of the latest readings of members that have data
pub fn relaxation_average(rows: &[MemberRow]) -> Option<f64> {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|row| row.latest.as_ref().map(|p| p.anxiety))
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Case-insensitive match of a member against the search box
pub fn member_matches(user: &User, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    user.email.to_lowercase().contains(&query)
        || user
            .name
            .as_deref()
            .is_some_and(|n| n.to_lowercase().contains(&query))
}

/// Number of distinct members across all teams
pub fn unique_member_count(teams: &[Team]) -> usize {
    teams
        .iter()
        .flat_map(|t| t.clients.iter().map(|u| u.id.as_str()))
        .collect::<HashSet<_>>()
        .len()
}

// ============================================================================
// Per-screen state
// ============================================================================

/// What an auth request produced
pub enum AuthOutcome {
    SignedIn { user: User, token: String },
    Registered { user: User, token: String },
}

/// Login / register form
#[derive(Default)]
pub struct AuthForm {
    pub is_login: bool,
    pub name: String,
    pub email: String,
    pub password: String,
    pub error: Option<String>,
    pub receiver: Option<Receiver<LoadResult<AuthOutcome>>>,
}

impl AuthForm {
    pub fn login() -> Self {
        Self {
            is_login: true,
            ..Default::default()
        }
    }

    /// Client-side validation; name is only required when registering
    pub fn validate(&self) -> Result<(), String> {
        if !self.is_login && self.name.trim().is_empty() {
            return Err("Please enter your name".to_string());
        }
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err("Please enter e-mail and password".to_string());
        }
        Ok(())
    }
}

/// Everything the main page loads in one go
pub struct MainPageData {
    pub teams: Vec<Team>,
    pub requests: Vec<PendingUser>,
    /// Errors from the individual requests, joined for display
    pub errors: Vec<String>,
}

#[derive(Default)]
pub struct MainPageState {
    pub teams: Vec<Team>,
    pub requests: Vec<PendingUser>,
    pub invite_url: Option<String>,
    /// QR code of `invite_url`, encoded once when the link arrives
    pub invite_qr: Option<QrGrid>,
    pub error: Option<String>,
    pub loading: LoadingState,
    pub adding_team: bool,
    pub new_team_name: String,
    /// Team chosen for each pending request, keyed by e-mail
    pub request_team: HashMap<String, String>,
    pub receiver: Option<Receiver<LoadResult<MainPageData>>>,
    pub invite_receiver: Option<Receiver<LoadResult<String>>>,
    pub action_receiver: Option<Receiver<LoadResult<String>>>,
}

pub struct TeamPageData {
    pub team: Team,
    pub rows: Vec<MemberRow>,
}

pub struct TeamPageState {
    pub team_id: String,
    pub team: Option<Team>,
    pub rows: Vec<MemberRow>,
    pub search: String,
    pub error: Option<String>,
    pub loading: LoadingState,
    pub confirm_delete: bool,
    pub receiver: Option<Receiver<LoadResult<TeamPageData>>>,
    pub action_receiver: Option<Receiver<LoadResult<TeamAction>>>,
}

impl TeamPageState {
    pub fn new(team_id: String) -> Self {
        Self {
            team_id,
            team: None,
            rows: Vec::new(),
            search: String::new(),
            error: None,
            loading: LoadingState::Idle,
            confirm_delete: false,
            receiver: None,
            action_receiver: None,
        }
    }
}

/// Completed team-page mutation
pub enum TeamAction {
    MemberRemoved(String),
    TeamDeleted,
}

/// Initial load of a detail view: display name and first sequence
pub struct DetailLoad {
    pub display_name: String,
    pub points: Vec<MeasurementPoint>,
}

/// Lifecycle of a detail view
pub enum DetailPhase {
    Loading,
    Failed(String),
    Ready(Box<ViewportEngine>),
}

pub struct DetailState {
    pub team_id: String,
    pub user_id: String,
    pub display_name: String,
    pub phase: DetailPhase,
    pub poller: Option<RefreshPoller>,
    pub jump_input: String,
    pub jump_error: Option<String>,
    pub receiver: Option<Receiver<LoadResult<DetailLoad>>>,
}

impl DetailState {
    pub fn new(team_id: String, user_id: String) -> Self {
        Self {
            display_name: user_id.clone(),
            team_id,
            user_id,
            phase: DetailPhase::Loading,
            poller: None,
            jump_input: String::new(),
            jump_error: None,
            receiver: None,
        }
    }

    pub fn engine_mut(&mut self) -> Option<&mut ViewportEngine> {
        match &mut self.phase {
            DetailPhase::Ready(engine) => Some(engine),
            _ => None,
        }
    }
}
