// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Dashboard page: greeting, logout and CV analysis.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::mpsc;

use crate::error::{ClientError, Result};
use crate::models::{ExtractedProfile, ProfilePatch, SelectedFile, UserAccount, UserProfile};
use crate::pages::session::{run_session_page, PageEvent, SessionPage};
use crate::pages::{PageExit, Session};
use crate::render::{AnalysisPanel, AnalysisSummary};
use crate::time_utils::format_utc_rfc3339;
use crate::ui::{Element, NavigationMode, Route, View};

/// Dashboard page controller.
pub struct DashboardPage<V: View> {
    session: Session,
    view: V,
}

impl<V: View> DashboardPage<V> {
    pub fn new(session: Session, view: V) -> Self {
        Self { session, view }
    }

    /// Run the page's event loop.
    pub async fn run(self, events: mpsc::Receiver<PageEvent>) -> PageExit {
        run_session_page(self, events).await
    }

    async fn load_profile(&mut self, account: &UserAccount) {
        match self.session.db.get_profile(&account.uid).await {
            Ok(Some(profile)) => self.show_profile(&profile),
            Ok(None) => {
                tracing::debug!(uid = %account.uid, "Profile not built yet");
            }
            Err(e) => {
                tracing::error!(uid = %account.uid, error = %e, "Failed to load profile");
            }
        }
    }

    fn show_profile(&mut self, profile: &UserProfile) {
        if let Some(role) = profile.role.as_deref() {
            self.view.set_text(Element::RoleBadge, role);
        }
        self.view
            .set_text(Element::DisplayName, &format!("Hello, {}!", greeting_name(profile)));
    }

    /// Validate the selection, run the analysis and save the result.
    async fn analyze(&mut self, files: Vec<SelectedFile>) {
        let file = match validate_selection(&files) {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected CV selection");
                self.view.alert(&e.to_string());
                return;
            }
        };

        self.view.show_analysis(&AnalysisPanel::Analyzing);

        match self.session.backend.analyze_cv(file).await {
            Ok(report) => {
                self.view
                    .show_analysis(&AnalysisPanel::Result(AnalysisSummary::from_report(&report)));

                if let Err(e) = persist_profile(&self.session, &report.profile).await {
                    tracing::error!(error = %e, "Failed to save analyzed profile");
                }
            }
            Err(e) => {
                self.view.show_analysis(&AnalysisPanel::Error(e.to_string()));
            }
        }
    }
}

#[async_trait]
impl<V: View> SessionPage for DashboardPage<V> {
    fn session(&self) -> &Session {
        &self.session
    }

    fn redirect_to_entry(&mut self) {
        self.view.navigate(Route::Entry, NavigationMode::Replace);
    }

    async fn on_signed_in(&mut self, account: UserAccount) {
        self.view
            .set_text(Element::UserEmail, account.email.as_deref().unwrap_or(""));
        self.load_profile(&account).await;
    }

    async fn on_event(&mut self, event: PageEvent) {
        match event {
            PageEvent::CvSelected(files) => self.analyze(files).await,
            PageEvent::Logout => {}
        }
    }
}

/// Save an extracted profile into the signed-in user's document.
///
/// An existing document only gets its CV-derived fields updated; a new one
/// is created with the account email merged in.
pub async fn persist_profile(session: &Session, extracted: &ExtractedProfile) -> Result<()> {
    let account = session
        .identity
        .current_user()
        .ok_or(ClientError::Unauthenticated)?;

    let patch = ProfilePatch::from_extracted(extracted, format_utc_rfc3339(Utc::now()));
    let db = &session.db;

    if db.get_profile(&account.uid).await?.is_some() {
        db.update_profile(&account.uid, &patch).await?;
        tracing::info!(uid = %account.uid, "Profile saved (update)");
    } else {
        db.merge_profile(&account.uid, &patch.with_email(account.email.clone()))
            .await?;
        tracing::info!(uid = %account.uid, "Profile saved (create)");
    }

    Ok(())
}

/// Accept exactly one PDF.
pub fn validate_selection(files: &[SelectedFile]) -> Result<&SelectedFile> {
    match files {
        [] => Err(ClientError::Validation("Please select a PDF file.".to_string())),
        [file] if file.is_pdf() => Ok(file),
        [_] => Err(ClientError::Validation("Please upload a PDF file.".to_string())),
        _ => Err(ClientError::Validation(
            "Please select a single PDF file.".to_string(),
        )),
    }
}

fn greeting_name(profile: &UserProfile) -> &str {
    profile
        .full_name
        .as_deref()
        .filter(|v| !v.is_empty())
        .or_else(|| profile.email.as_deref().filter(|v| !v.is_empty()))
        .unwrap_or("there")
}
