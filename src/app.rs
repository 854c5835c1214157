//! Main application state and the eframe::App implementation.
//!
//! Network work never runs on the UI thread: every request goes to a
//! short-lived worker that reports back over an `mpsc` channel, and `update`
//! drains those channels before drawing.

use eframe::egui;
use std::sync::mpsc::{channel, Receiver};
use std::thread;
use std::time::Instant;
use tracing::{info, warn};

use crate::api::{ApiClient, User};
use crate::session::{AuthEvent, Session, SubscriptionId};
use crate::settings::UserSettings;
use crate::state::{
    AuthForm, DetailState, LoadResult, MainPageState, Screen, TeamPageState, ToastType,
    TOAST_DURATION_SECS,
};

/// Main application state
pub struct ChillRateApp {
    pub(crate) ctx: egui::Context,
    pub(crate) settings: UserSettings,
    /// Copy of the settings being edited in the settings window
    pub(crate) settings_draft: UserSettings,
    pub(crate) show_settings: bool,
    /// Client carrying the current session token (if any)
    pub(crate) client: ApiClient,
    pub(crate) session: Session,
    auth_subscription: SubscriptionId,
    auth_events: Receiver<AuthEvent>,
    /// Signed-in user, `None` while signed out
    pub(crate) user: Option<User>,
    /// Pending session probe started at launch
    restore_receiver: Option<Receiver<bool>>,
    pub(crate) screen: Screen,
    pub(crate) auth_form: AuthForm,
    pub(crate) main_page: MainPageState,
    pub(crate) team_page: Option<TeamPageState>,
    pub(crate) detail: Option<DetailState>,
    /// Toast messages for user feedback
    pub(crate) toast_message: Option<(String, Instant, ToastType)>,
}

impl ChillRateApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = UserSettings::load();
        let base_url = settings.effective_base_url();
        info!("Using ChillRate API at {}", base_url);

        let client = ApiClient::new(base_url, settings.request_timeout());
        let mut session = Session::load_default();
        let (auth_subscription, auth_events) = session.subscribe();

        let mut app = Self {
            ctx: cc.egui_ctx.clone(),
            settings_draft: settings.clone(),
            settings,
            show_settings: false,
            client,
            session,
            auth_subscription,
            auth_events,
            user: None,
            restore_receiver: None,
            screen: Screen::Welcome,
            auth_form: AuthForm::login(),
            main_page: MainPageState::default(),
            team_page: None,
            detail: None,
            toast_message: None,
        };
        app.start_session_restore();
        app
    }

    // ------------------------------------------------------------------------
    // Background jobs
    // ------------------------------------------------------------------------

    /// Run `job` on a worker thread and hand back the receiving end
    pub(crate) fn spawn_job<T, F>(&self, job: F) -> Receiver<LoadResult<T>>
    where
        T: Send + 'static,
        F: FnOnce() -> LoadResult<T> + Send + 'static,
    {
        let (sender, receiver) = channel();
        let ctx = self.ctx.clone();
        thread::spawn(move || {
            // The receiver is gone if the user navigated away; nothing to do
            let _ = sender.send(job());
            ctx.request_repaint();
        });
        receiver
    }

    fn start_session_restore(&mut self) {
        let Some(token) = self.session.begin_restore() else {
            return;
        };
        let client = self.client.clone().with_token(token);
        let (sender, receiver) = channel();
        let ctx = self.ctx.clone();
        thread::spawn(move || {
            let _ = sender.send(client.probe());
            ctx.request_repaint();
        });
        self.restore_receiver = Some(receiver);
    }

    fn check_session_restore(&mut self) {
        let Some(receiver) = &self.restore_receiver else {
            return;
        };
        if let Ok(live) = receiver.try_recv() {
            self.restore_receiver = None;
            if !live {
                info!("Stored session is no longer valid");
            }
            self.session.complete_restore(live);
        }
    }

    pub(crate) fn is_restoring(&self) -> bool {
        self.restore_receiver.is_some()
    }

    // ------------------------------------------------------------------------
    // Auth events
    // ------------------------------------------------------------------------

    fn drain_auth_events(&mut self) {
        while let Ok(event) = self.auth_events.try_recv() {
            match event {
                AuthEvent::SignedIn(user) => {
                    info!("Signed in as {}", user.email);
                    self.client.set_token(self.session.token());
                    self.user = Some(user);
                    if !self.screen.requires_auth() {
                        self.navigate(Screen::Main);
                    }
                }
                AuthEvent::SignedOut => {
                    self.client.set_token(None);
                    self.user = None;
                    if self.screen.requires_auth() {
                        self.navigate(Screen::Welcome);
                    }
                }
            }
        }
    }

    pub(crate) fn logout(&mut self) {
        if let Err(e) = self.session.logout() {
            warn!("Failed to clear stored session: {}", e);
        }
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Switch screens. Leaving a detail view drops it, which cancels its
    /// refresh poller and orphans any in-flight load.
    pub(crate) fn navigate(&mut self, screen: Screen) {
        let screen = screen.guarded(self.user.is_some());

        self.detail = None;
        self.team_page = None;

        match &screen {
            Screen::Main => self.open_main_page(),
            Screen::Team(team_id) => self.open_team_page(team_id.clone()),
            Screen::UserDetail { team_id, user_id } => {
                self.open_detail(team_id.clone(), user_id.clone())
            }
            Screen::Auth | Screen::Welcome | Screen::ConfirmEmail => {}
        }
        self.screen = screen;
    }

    // ------------------------------------------------------------------------
    // Toasts
    // ------------------------------------------------------------------------

    pub(crate) fn show_toast(&mut self, message: &str) {
        self.show_toast_with_type(message, ToastType::Info);
    }

    pub(crate) fn show_toast_success(&mut self, message: &str) {
        self.show_toast_with_type(message, ToastType::Success);
    }

    pub(crate) fn show_toast_error(&mut self, message: &str) {
        self.show_toast_with_type(message, ToastType::Error);
    }

    fn show_toast_with_type(&mut self, message: &str, toast_type: ToastType) {
        self.toast_message = Some((message.to_string(), Instant::now(), toast_type));
    }

    pub(crate) fn toast_expired(&self, shown_at: Instant) -> bool {
        shown_at.elapsed().as_secs() >= TOAST_DURATION_SECS
    }
}

impl Drop for ChillRateApp {
    fn drop(&mut self) {
        self.session.unsubscribe(self.auth_subscription);
    }
}

impl eframe::App for ChillRateApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for completed background work
        self.check_session_restore();
        self.drain_auth_events();
        self.check_auth_complete();
        self.check_main_page_complete();
        self.check_team_page_complete();
        self.check_detail_complete();

        ctx.set_visuals(egui::Visuals::light());

        // Toast notifications
        self.render_toast(ctx);

        // Settings window
        self.render_settings_window(ctx);

        egui::TopBottomPanel::top("header_panel")
            .resizable(false)
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| match self.screen.clone() {
            Screen::Welcome => self.render_welcome(ui),
            Screen::Auth => self.render_auth_page(ui),
            Screen::ConfirmEmail => self.render_confirm_email(ui),
            Screen::Main => self.render_main_page(ui),
            Screen::Team(_) => self.render_team_page(ui),
            Screen::UserDetail { .. } => self.render_user_detail(ui),
        });
    }
}
