//! Main application state and frame loop.

use std::time::{Duration, Instant};

use chrono::Utc;
use eframe::egui::{self, Align, Layout, RichText};
use egui_phosphor::regular::{BUILDINGS, SIGN_OUT};
use tokio::sync::mpsc;

use crate::auth;
use crate::client::DirectoryClient;
use crate::config::AppConfig;
use crate::route::{DASHBOARD_PATH, LOGIN_PATH, Route, Router};
use crate::session::is_authenticated;
use crate::sync;
use crate::tree::{DepartmentTree, Notice, Outcome, Request};

use super::components::{icon_button, toast};
use super::{department_panel, dialogs, landing, login_panel};

/// How long a toast stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(4);

/// How often the dashboard re-checks that the session is still valid.
const SESSION_CHECK_INTERVAL: Duration = Duration::from_secs(1);

/// Messages from async tasks to UI.
pub enum UiMessage {
    /// Result for the tree that was current when the request was dispatched.
    Directory { generation: u64, outcome: Outcome },
    LoggedIn,
    LoginFailed(String),
}

/// Login form state.
#[derive(Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub submitting: bool,
}

/// Main application state.
pub struct ConsoleApp {
    rt: tokio::runtime::Runtime,
    client: DirectoryClient,
    config: AppConfig,

    // Message channel for async communication
    tx: mpsc::UnboundedSender<UiMessage>,
    rx: mpsc::UnboundedReceiver<UiMessage>,

    router: Router,
    pub tree: DepartmentTree,
    // Bumped whenever the tree is replaced
    generation: u64,
    last_session_check: Instant,
    pub login: LoginForm,
    toasts: Vec<(Notice, Instant)>,
}

impl ConsoleApp {
    pub fn new(client: DirectoryClient, config: AppConfig, rt: tokio::runtime::Runtime) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut app = Self {
            rt,
            client,
            config,
            tx,
            rx,
            router: Router::new(),
            tree: DepartmentTree::new(),
            generation: 0,
            last_session_check: Instant::now(),
            login: LoginForm::default(),
            toasts: Vec::new(),
        };

        // A still-valid session skips the landing screen.
        app.navigate(Route::Landing.path());
        app
    }

    fn is_authenticated(&self) -> bool {
        is_authenticated(&**self.client.session(), Utc::now())
    }

    /// Switch screens through the route guard.
    pub fn navigate(&mut self, path: &str) {
        let previous = self.router.current();
        let authenticated = self.is_authenticated();
        let route = self.router.navigate(path, authenticated);

        if route == Route::Dashboard && previous != Route::Dashboard {
            self.reset_tree();
            let request = self.tree.refresh();
            self.dispatch(request);
        }
        if route == Route::Login {
            self.login.submitting = false;
        }
    }

    /// Re-run the route guard on the current screen.
    pub fn revalidate_session(&mut self) {
        let previous = self.router.current();
        let authenticated = self.is_authenticated();
        let route = self.router.revalidate(authenticated);
        if route != previous {
            tracing::info!("Session no longer valid, leaving {}", previous.path());
            self.reset_tree();
        }
        if route == Route::Login {
            self.login.submitting = false;
        }
    }

    /// Start over with an empty tree. Results still in flight for the old
    /// tree are dropped when they arrive.
    fn reset_tree(&mut self) {
        self.generation += 1;
        self.tree = DepartmentTree::new();
    }

    /// Execute a view-model request on the runtime.
    pub fn dispatch(&mut self, request: Request) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let generation = self.generation;

        self.rt.spawn(async move {
            let outcome = sync::perform(&client, request).await;
            let _ = tx.send(UiMessage::Directory { generation, outcome });
        });
    }

    /// Dispatch when an intent produced a request.
    pub fn dispatch_opt(&mut self, request: Option<Request>) {
        if let Some(request) = request {
            self.dispatch(request);
        }
    }

    /// Submit the login form.
    pub fn submit_login(&mut self) {
        if self.login.submitting {
            return;
        }
        if self.login.username.trim().is_empty() || self.login.password.is_empty() {
            self.login.error = Some("Username and password are required".to_string());
            return;
        }

        self.login.error = None;
        self.login.submitting = true;

        let client = self.client.clone();
        let tx = self.tx.clone();
        let username = self.login.username.trim().to_string();
        let password = self.login.password.clone();

        self.rt.spawn(async move {
            let message = match auth::login(&client, &username, &password).await {
                Ok(_) => UiMessage::LoggedIn,
                Err(e) => UiMessage::LoginFailed(e.to_string()),
            };
            let _ = tx.send(message);
        });
    }

    pub fn logout(&mut self) {
        auth::logout(&self.client);
        self.revalidate_session();
    }

    /// Poll async operation results.
    fn poll_async_results(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            match msg {
                UiMessage::Directory { generation, outcome } => {
                    if generation != self.generation {
                        tracing::debug!("Discarding directory result for a replaced tree");
                        continue;
                    }
                    if self.router.current() != Route::Dashboard {
                        // Dashboard was left while the call was in flight.
                        tracing::debug!("Discarding directory result outside the dashboard");
                        continue;
                    }
                    let follow_up = self.tree.apply(outcome);
                    self.dispatch_opt(follow_up);
                }
                UiMessage::LoggedIn => {
                    self.login = LoginForm::default();
                    self.navigate(DASHBOARD_PATH);
                }
                UiMessage::LoginFailed(e) => {
                    self.login.submitting = false;
                    self.login.password.clear();
                    self.login.error = Some(e);
                }
            }
        }

        let now = Instant::now();
        for notice in self.tree.take_notices() {
            self.toasts.push((notice, now));
        }
        self.toasts.retain(|(_, shown)| now.duration_since(*shown) < TOAST_TTL);
    }

    fn has_pending_work(&self) -> bool {
        self.tree.is_loading()
            || self.login.submitting
            || self.tree.edit().is_some_and(|s| s.submitting)
            || self.tree.delete_target().is_some_and(|s| s.submitting)
            || self.tree.create().is_some_and(|s| s.submitting)
            || !self.toasts.is_empty()
    }

    /// Render header bar with title and logout.
    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").min_height(40.0).show(ctx, |ui| {
            ui.horizontal_centered(|ui| {
                if ui
                    .add(egui::Button::new(RichText::new(format!("{BUILDINGS}  Department Management")).strong()).frame(false))
                    .clicked()
                {
                    self.navigate(DASHBOARD_PATH);
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if icon_button(ui, SIGN_OUT, "Logout", true).clicked() {
                        self.logout();
                    }
                });
            });
        });
    }

    fn show_toasts(&self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for (notice, _) in &self.toasts {
                    toast(ui, notice);
                    ui.add_space(6.0);
                }
            });
    }
}

impl eframe::App for ConsoleApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_async_results();

        // Request repaint during async operations
        if self.has_pending_work() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        if self.router.current() == Route::Dashboard
            && self.last_session_check.elapsed() >= SESSION_CHECK_INTERVAL
        {
            self.last_session_check = Instant::now();
            self.revalidate_session();
        }

        match self.router.current() {
            Route::Landing => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    if landing::show(ui, self.config.api.base_url()) {
                        self.navigate(LOGIN_PATH);
                    }
                });
            }
            Route::Login => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    if login_panel::show(&mut self.login, ui) {
                        self.submit_login();
                    }
                });
            }
            Route::Dashboard => {
                self.show_header(ctx);
                egui::CentralPanel::default().show(ctx, |ui| {
                    let action = department_panel::show(&self.tree, ui);
                    self.handle_panel_action(action);
                });
                self.show_dialogs(ctx);
            }
        }

        self.show_toasts(ctx);
    }
}

impl ConsoleApp {
    fn handle_panel_action(&mut self, action: department_panel::Action) {
        use department_panel::Action;

        match action {
            Action::None => {}
            Action::Refresh => {
                let request = self.tree.refresh();
                self.dispatch(request);
            }
            Action::NewDepartment => self.tree.open_create(),
            Action::Toggle(id) => {
                self.tree.toggle(id);
            }
            Action::Edit(id) => {
                self.tree.begin_edit(id);
            }
            Action::Delete(id) => {
                self.tree.begin_delete(id);
            }
            Action::GoToPage(page) => {
                let request = self.tree.go_to_page(page);
                self.dispatch_opt(request);
            }
        }
    }

    /// Render create, rename, and delete dialogs.
    fn show_dialogs(&mut self, ctx: &egui::Context) {
        match dialogs::show_create(&mut self.tree, ctx) {
            dialogs::DialogAction::None => {}
            dialogs::DialogAction::Close => self.tree.close_create(),
            dialogs::DialogAction::Submit => match self.tree.submit_create() {
                Ok(request) => self.dispatch_opt(request),
                Err(e) => tracing::debug!("Create rejected: {}", e),
            },
        }

        match dialogs::show_rename(&mut self.tree, ctx) {
            dialogs::DialogAction::None => {}
            dialogs::DialogAction::Close => self.tree.cancel_edit(),
            dialogs::DialogAction::Submit => match self.tree.submit_edit() {
                Ok(request) => self.dispatch_opt(request),
                Err(e) => tracing::debug!("Rename rejected: {}", e),
            },
        }

        match dialogs::show_delete_confirm(&self.tree, ctx) {
            dialogs::DialogAction::None => {}
            dialogs::DialogAction::Close => self.tree.cancel_delete(),
            dialogs::DialogAction::Submit => {
                let request = self.tree.confirm_delete();
                self.dispatch_opt(request);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::models::Page;
    use crate::session::{MemorySessionStore, SessionStore, SharedSession, Token};
    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use chrono::TimeDelta;
    use std::sync::Arc;

    fn valid_token() -> Token {
        let exp = (Utc::now() + TimeDelta::hours(1)).timestamp();
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{exp}}}"#));
        Token::new(format!("header.{payload}.signature"))
    }

    /// App whose runtime never polls spawned calls, so every result is injected by hand.
    fn app_with(session: SharedSession) -> ConsoleApp {
        let config = AppConfig {
            api: ApiConfig {
                url: "http://127.0.0.1:9".to_string(),
                ..ApiConfig::default()
            },
            ..AppConfig::default()
        };
        let client = DirectoryClient::new(&config.api, session).unwrap();
        let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
        ConsoleApp::new(client, config, rt)
    }

    #[test]
    fn test_results_from_previous_session_are_dropped() {
        let session = Arc::new(MemorySessionStore::with_token(valid_token()));
        let mut app = app_with(session.clone());
        assert_eq!(app.router.current(), Route::Dashboard);
        let stale = app.generation;

        app.logout();
        assert_eq!(app.router.current(), Route::Login);

        session.set_token(valid_token());
        app.navigate(DASHBOARD_PATH);
        assert_eq!(app.router.current(), Route::Dashboard);

        app.tx
            .send(UiMessage::Directory {
                generation: stale,
                outcome: Outcome::Deleted { id: 7, result: Ok(true) },
            })
            .ok();
        app.poll_async_results();

        assert!(app.toasts.is_empty());
        assert!(app.tree.is_loading());

        app.tx
            .send(UiMessage::Directory {
                generation: app.generation,
                outcome: Outcome::Listed {
                    page: 1,
                    result: Ok(Page {
                        departments: Vec::new(),
                        total_pages: 1,
                    }),
                },
            })
            .ok();
        app.poll_async_results();

        assert!(!app.tree.is_loading());
    }

    #[test]
    fn test_expired_session_leaves_dashboard() {
        let session = Arc::new(MemorySessionStore::with_token(valid_token()));
        let mut app = app_with(session.clone());
        assert_eq!(app.router.current(), Route::Dashboard);

        session.clear();
        app.revalidate_session();

        assert_eq!(app.router.current(), Route::Login);
    }

    #[test]
    fn test_logout_returns_to_login() {
        let session = Arc::new(MemorySessionStore::with_token(valid_token()));
        let mut app = app_with(session.clone());

        app.logout();

        assert!(session.token().is_none());
        assert_eq!(app.router.current(), Route::Login);
    }
}
