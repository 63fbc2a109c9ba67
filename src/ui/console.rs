// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Terminal rendering of a page.

use std::io::Write;

use crate::render::AnalysisPanel;
use crate::ui::{Element, NavigationMode, Route, View};

/// Renders page updates as lines of text.
pub struct ConsoleView<W: Write + Send = std::io::Stdout> {
    out: W,
    /// Last navigation requested by the page
    navigated_to: Option<Route>,
}

impl ConsoleView {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            navigated_to: None,
        }
    }

    pub fn navigated_to(&self) -> Option<Route> {
        self.navigated_to
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", text) {
            tracing::warn!(error = %e, "Console write failed");
        }
    }
}

impl<W: Write + Send> View for ConsoleView<W> {
    fn set_text(&mut self, element: Element, text: &str) {
        self.line(format_args!("{:<24} {}", element.id(), text));
    }

    fn set_active(&mut self, element: Element, active: bool) {
        if active {
            self.line(format_args!("{:<24} [selected]", element.id()));
        }
    }

    fn set_items(&mut self, element: Element, items: &[String]) {
        let chips: Vec<String> = items.iter().map(|item| format!("[{}]", item)).collect();
        self.line(format_args!("{:<24} {}", element.id(), chips.join(" ")));
    }

    fn clear_input(&mut self, element: Element) {
        self.line(format_args!("{:<24} (cleared)", element.id()));
    }

    fn show_analysis(&mut self, panel: &AnalysisPanel) {
        match panel {
            AnalysisPanel::Analyzing => self.line(format_args!("Analyzing CV...")),
            AnalysisPanel::Result(summary) => {
                self.line(format_args!("AI Analysis Result"));
                self.line(format_args!("  Name:     {}", summary.name));
                self.line(format_args!("  Headline: {}", summary.headline));
                self.line(format_args!("  Location: {}", summary.location));
                self.line(format_args!("  Skills:   {}", summary.skills));
                self.line(format_args!("---"));
                self.line(format_args!("{}", summary.raw_analysis));
            }
            AnalysisPanel::Error(message) => self.line(format_args!("Error: {}", message)),
        }
    }

    fn alert(&mut self, message: &str) {
        self.line(format_args!("! {}", message));
    }

    fn navigate(&mut self, route: Route, mode: NavigationMode) {
        self.navigated_to = Some(route);
        let how = match mode {
            NavigationMode::Push => "navigate",
            NavigationMode::Replace => "replace",
        };
        self.line(format_args!("-> {} {}", how, route.path()));
    }
}
