// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Auth page: sign-in and registration.
//!
//! The form is a two-field state machine. Every label is derived from the
//! mode, so rendering after any transition shows the same text as rendering
//! that state from scratch.

use chrono::Utc;
use tokio::sync::mpsc;

use crate::error::{ClientError, Result};
use crate::models::{AccountRecord, Role};
use crate::pages::{PageExit, Session};
use crate::time_utils::format_utc_rfc3339;
use crate::ui::{Element, NavigationMode, Route, View};

const REGISTERED_MESSAGE: &str =
    "Your account has been created. You can now sign in with your email and password.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

/// Text shown for one form mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormLabels {
    pub title: &'static str,
    pub submit: &'static str,
    pub toggle_prompt: &'static str,
    pub toggle_link: &'static str,
}

impl AuthMode {
    pub fn labels(self) -> FormLabels {
        match self {
            AuthMode::Login => FormLabels {
                title: "Welcome Back",
                submit: "Sign In",
                toggle_prompt: "Don't have an account?",
                toggle_link: "Create Account",
            },
            AuthMode::Register => FormLabels {
                title: "Create your account",
                submit: "Sign Up",
                toggle_prompt: "Do you have an account?",
                toggle_link: "Sign In",
            },
        }
    }

    fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

/// Auth form state. Starts as `(Login, Jobseeker)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthForm {
    mode: AuthMode,
    role: Role,
}

impl AuthForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Flip between login and registration. The role is kept.
    pub fn toggled(self) -> Self {
        Self {
            mode: self.mode.toggled(),
            ..self
        }
    }

    pub fn with_role(self, role: Role) -> Self {
        Self { role, ..self }
    }

    /// State after a successful registration.
    pub fn after_registration(self) -> Self {
        Self {
            mode: AuthMode::Login,
            ..self
        }
    }

    pub fn labels(&self) -> FormLabels {
        self.mode.labels()
    }
}

/// Submitted form fields.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Events on the auth page, all handled by one dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// The toggle link was clicked.
    ToggleMode,
    SelectRole(Role),
    Submit(Credentials),
}

/// Auth page controller.
pub struct AuthPage<V: View> {
    session: Session,
    view: V,
    form: AuthForm,
}

impl<V: View> AuthPage<V> {
    /// Build the page and render the initial form.
    pub fn new(session: Session, view: V) -> Self {
        let mut page = Self {
            session,
            view,
            form: AuthForm::new(),
        };
        page.render_form();
        page.render_role();
        page
    }

    pub fn form(&self) -> AuthForm {
        self.form
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Run the page until it navigates away or `events` closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<AuthEvent>) -> PageExit {
        while let Some(event) = events.recv().await {
            if let Some(exit) = self.handle(event).await {
                return exit;
            }
        }
        PageExit::Closed
    }

    /// Dispatch one event.
    pub async fn handle(&mut self, event: AuthEvent) -> Option<PageExit> {
        match event {
            AuthEvent::ToggleMode => {
                self.form = self.form.toggled();
                tracing::debug!(mode = ?self.form.mode(), "Auth mode toggled");
                self.render_form();
                None
            }
            AuthEvent::SelectRole(role) => {
                self.form = self.form.with_role(role);
                self.render_role();
                None
            }
            AuthEvent::Submit(credentials) => match self.form.mode() {
                AuthMode::Register => {
                    self.register(&credentials).await;
                    None
                }
                AuthMode::Login => self.login(&credentials).await,
            },
        }
    }

    async fn register(&mut self, credentials: &Credentials) {
        match create_account(&self.session, credentials, self.form.role()).await {
            Ok(()) => {
                self.view.alert(REGISTERED_MESSAGE);
                self.form = self.form.after_registration();
                self.render_form();
                self.view.clear_input(Element::PasswordInput);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Registration failed");
                self.view.alert(&format!("Registration failed: {}", e));
            }
        }
    }

    async fn login(&mut self, credentials: &Credentials) -> Option<PageExit> {
        let result = self
            .session
            .identity
            .sign_in(&credentials.email, &credentials.password)
            .await;

        match result {
            Ok(account) => {
                tracing::info!(uid = %account.uid, "Signed in");
                self.view.navigate(Route::Dashboard, NavigationMode::Push);
                Some(PageExit::Navigated(Route::Dashboard))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Sign-in failed");
                self.view.alert(&format!("Sign-in failed: {}", e));
                None
            }
        }
    }

    fn render_form(&mut self) {
        let labels = self.form.labels();
        self.view.set_text(Element::FormTitle, labels.title);
        self.view.set_text(Element::SubmitButton, labels.submit);
        self.view.set_text(Element::TogglePrompt, labels.toggle_prompt);
        self.view.set_text(Element::ToggleLink, labels.toggle_link);
    }

    fn render_role(&mut self) {
        let role = self.form.role();
        self.view
            .set_active(Element::RoleJobseeker, role == Role::Jobseeker);
        self.view
            .set_active(Element::RoleRecruiter, role == Role::Recruiter);
    }
}

/// Create the account and merge its record into the user's document.
async fn create_account(session: &Session, credentials: &Credentials, role: Role) -> Result<()> {
    let account = session
        .identity
        .create_account(&credentials.email, &credentials.password)
        .await
        .map_err(ClientError::from)?;

    let record = AccountRecord {
        email: credentials.email.clone(),
        role,
        created_at: format_utc_rfc3339(Utc::now()),
    };
    session.db.save_account_record(&account.uid, &record).await?;

    tracing::info!(uid = %account.uid, role = role.as_str(), "Account created");
    Ok(())
}
