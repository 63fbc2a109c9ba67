// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile page.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::models::UserAccount;
use crate::pages::session::{run_session_page, PageEvent, SessionPage};
use crate::pages::{PageExit, Session};
use crate::render::ProfileDisplay;
use crate::ui::{Element, NavigationMode, Route, View};

const EMPTY_NAME: &str = "Complete your profile";
const EMPTY_HEADLINE: &str = "Upload your CV from the dashboard to let AI build this profile.";

/// Profile page controller.
pub struct ProfilePage<V: View> {
    session: Session,
    view: V,
}

impl<V: View> ProfilePage<V> {
    pub fn new(session: Session, view: V) -> Self {
        Self { session, view }
    }

    pub async fn run(self, events: mpsc::Receiver<PageEvent>) -> PageExit {
        run_session_page(self, events).await
    }

    fn render(&mut self, display: &ProfileDisplay) {
        let view = &mut self.view;
        view.set_text(Element::ProfileName, &display.full_name);
        view.set_text(Element::ProfileHeadline, &display.headline);
        view.set_text(Element::ProfileLocation, &display.location);
        view.set_text(Element::ProfileSeniority, &display.seniority);
        view.set_text(Element::ProfileAvatarInitials, &display.initials);
        view.set_text(Element::ProfileSummary, &display.summary);
        view.set_text(Element::ProfileLastUpdated, &display.last_updated);
        view.set_items(Element::ProfileSkills, &display.skill_chips);
        view.set_text(Element::ProfileExperience, &display.experience);
        view.set_text(Element::ProfileSkillCount, &display.skill_count);
        view.set_text(Element::ProfileRoleFocus, &display.role_focus);
    }
}

#[async_trait]
impl<V: View> SessionPage for ProfilePage<V> {
    fn session(&self) -> &Session {
        &self.session
    }

    fn redirect_to_entry(&mut self) {
        self.view.navigate(Route::Entry, NavigationMode::Push);
    }

    async fn on_signed_in(&mut self, account: UserAccount) {
        self.view.set_text(
            Element::ProfileEmail,
            account.email.as_deref().unwrap_or("-"),
        );

        match self.session.db.get_profile(&account.uid).await {
            Ok(Some(profile)) => {
                tracing::debug!(uid = %account.uid, "Profile loaded");
                self.render(&ProfileDisplay::from_profile(&profile));
            }
            Ok(None) => {
                self.view.set_text(Element::ProfileName, EMPTY_NAME);
                self.view.set_text(Element::ProfileHeadline, EMPTY_HEADLINE);
            }
            Err(e) => {
                tracing::error!(uid = %account.uid, error = %e, "Failed to load profile");
            }
        }
    }

    async fn on_event(&mut self, event: PageEvent) {
        tracing::debug!(?event, "Event not handled on the profile page");
    }
}
