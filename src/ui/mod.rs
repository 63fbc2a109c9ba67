// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The page surface: element-addressed updates, alerts and navigation.
//!
//! Pages mutate their view only from their own event loop.

pub mod console;

pub use console::ConsoleView;

use crate::render::AnalysisPanel;

/// Addressable page elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    // Auth page
    FormTitle,
    SubmitButton,
    TogglePrompt,
    ToggleLink,
    RoleJobseeker,
    RoleRecruiter,
    PasswordInput,
    // Dashboard
    UserEmail,
    RoleBadge,
    DisplayName,
    // Profile page
    ProfileEmail,
    ProfileName,
    ProfileHeadline,
    ProfileLocation,
    ProfileSeniority,
    ProfileAvatarInitials,
    ProfileSummary,
    ProfileLastUpdated,
    ProfileSkills,
    ProfileExperience,
    ProfileSkillCount,
    ProfileRoleFocus,
}

impl Element {
    /// DOM id of the element.
    pub fn id(self) -> &'static str {
        match self {
            Element::FormTitle => "form-title",
            Element::SubmitButton => "submit-btn",
            Element::TogglePrompt => "toggle-text",
            Element::ToggleLink => "toggle-auth-link",
            Element::RoleJobseeker => "btn-jobseeker",
            Element::RoleRecruiter => "btn-recruiter",
            Element::PasswordInput => "password",
            Element::UserEmail => "user-email-display",
            Element::RoleBadge => "user-role-badge",
            Element::DisplayName => "display-name",
            Element::ProfileEmail => "profile-email",
            Element::ProfileName => "profile-name",
            Element::ProfileHeadline => "profile-headline",
            Element::ProfileLocation => "profile-location",
            Element::ProfileSeniority => "profile-seniority",
            Element::ProfileAvatarInitials => "profile-avatar-initials",
            Element::ProfileSummary => "profile-summary",
            Element::ProfileLastUpdated => "profile-last-updated",
            Element::ProfileSkills => "profile-skills",
            Element::ProfileExperience => "profile-experience",
            Element::ProfileSkillCount => "profile-skill-count",
            Element::ProfileRoleFocus => "profile-role-focus",
        }
    }
}

/// Navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Unauthenticated landing / login page
    Entry,
    Dashboard,
    Profile,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Entry => "index.html",
            Route::Dashboard => "dashboard.html",
            Route::Profile => "profile.html",
        }
    }
}

/// How a navigation affects history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationMode {
    Push,
    /// Replace the current history entry
    Replace,
}

/// A page's rendering surface.
pub trait View: Send {
    fn set_text(&mut self, element: Element, text: &str);

    fn set_active(&mut self, element: Element, active: bool);

    /// Replace the children of a list element (skill chips).
    fn set_items(&mut self, element: Element, items: &[String]);

    fn clear_input(&mut self, element: Element);

    /// Show the CV analysis panel in the given state.
    fn show_analysis(&mut self, panel: &AnalysisPanel);

    /// Blocking user-visible message.
    fn alert(&mut self, message: &str);

    fn navigate(&mut self, route: Route, mode: NavigationMode);
}
