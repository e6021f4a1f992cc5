//! The dashboard: a mode selector, a form, and the latest result.

use std::sync::Arc;

use qa_client::types::{ClassificationRequest, GenerationRequest};
use strum::IntoEnumIterator as _;

use crate::{
    api::{ApiRequest, ApiResponse},
    report::Outcome,
};

use super::{
    event::{Action, InputMode},
    input::{TextInputEvent, TextInputViewModel},
    AppEvent,
};

pub mod view;

/// All a user ever learns about a failed request.
pub const FAILURE_MESSAGE: &str = "Failed to process request";

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, strum::EnumIter, strum::Display, strum::FromRepr,
)]
pub enum Mode {
    #[default]
    #[strum(to_string = "LLM Prompt")]
    Generation,
    #[strum(to_string = "Text Classification")]
    Classification,
}

impl Mode {
    pub fn index(self) -> usize {
        self as usize
    }

    fn next(self) -> Mode {
        Mode::from_repr(self.index() + 1).unwrap_or(self)
    }

    fn previous(self) -> Mode {
        self.index()
            .checked_sub(1)
            .and_then(Mode::from_repr)
            .unwrap_or(self)
    }
}

/// The form element that has the keyboard.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum Focus {
    #[default]
    Prompt,
    Category(usize),
    AddCategory,
    Process,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub enum ApiHealth {
    #[default]
    Unknown,
    Healthy,
    Degraded(Arc<str>),
    Unreachable(Arc<str>),
}

#[derive(Debug, Clone)]
pub struct DashboardViewModel {
    mode: Mode,
    prompt: TextInputViewModel,
    /// Never empty.
    categories: Vec<TextInputViewModel>,
    outcome: Option<Outcome>,
    loading: bool,
    error: Option<&'static str>,
    focus: Focus,
    editing: bool,
    health: ApiHealth,
    /// A health check is queued or in flight.
    health_pending: bool,
}

impl Default for DashboardViewModel {
    fn default() -> Self {
        DashboardViewModel {
            mode: Mode::default(),
            prompt: TextInputViewModel::multiline(),
            categories: vec![TextInputViewModel::default()],
            outcome: None,
            loading: false,
            error: None,
            focus: Focus::default(),
            editing: false,
            health: ApiHealth::default(),
            health_pending: false,
        }
    }
}

impl DashboardViewModel {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn prompt(&self) -> &TextInputViewModel {
        &self.prompt
    }

    pub fn categories(&self) -> &[TextInputViewModel] {
        &self.categories
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn health(&self) -> &ApiHealth {
        &self.health
    }

    /// Switching modes drops the result of the previous one.
    pub fn select_mode(&mut self, mode: Mode) {
        if mode == self.mode {
            return;
        }

        tracing::debug!(from = %self.mode, to = %mode, "switching mode");
        self.mode = mode;
        self.outcome = None;
        self.focus = Focus::Prompt;
    }

    pub fn add_category(&mut self) {
        self.categories.push(TextInputViewModel::default());
    }

    /// Only the empty string is refused; whitespace goes through.
    pub fn can_submit(&self) -> bool {
        !self.loading && !self.prompt.is_empty()
    }

    /// Start a submission and produce the request to send.
    pub fn submit(&mut self) -> Option<ApiRequest> {
        if !self.can_submit() {
            return None;
        }

        self.loading = true;
        self.error = None;

        let prompt = self.prompt.value();
        let request = match self.mode {
            Mode::Generation => ApiRequest::Generate(GenerationRequest::new(prompt)),
            Mode::Classification => ApiRequest::Classify(ClassificationRequest::new(
                prompt,
                self.categories.iter().map(TextInputViewModel::value),
            )),
        };

        tracing::info!(mode = %self.mode, "submitting request");
        Some(request)
    }

    /// At most one health check is outstanding at a time.
    pub fn refresh_health(&mut self) -> Option<ApiRequest> {
        if self.health_pending {
            tracing::debug!("health check already pending");
            return None;
        }

        self.health_pending = true;
        Some(ApiRequest::Health)
    }

    /// The worker refused a request, treat it like a failed one.
    pub fn handle_rejected(&mut self, request: &ApiRequest) {
        match request.mode() {
            Some(mode) => self.handle_response(ApiResponse::Failed(mode)),
            None => self.health_pending = false,
        }
    }

    pub fn handle_response(&mut self, response: ApiResponse) {
        tracing::debug!(response = response.as_ref(), "handling response");
        match response {
            ApiResponse::Generated(response) => self.finish(Outcome::Generation(response)),
            ApiResponse::Classified(response) => self.finish(Outcome::Classification(response)),
            ApiResponse::Failed(mode) => {
                tracing::warn!(%mode, "request failed");
                self.loading = false;
                self.outcome = None;
                self.error = Some(FAILURE_MESSAGE);
            }
            ApiResponse::Health(status) => {
                self.health_pending = false;
                self.health = if status.is_healthy() {
                    ApiHealth::Healthy
                } else {
                    ApiHealth::Degraded(status.status.into())
                };
            }
            ApiResponse::Unreachable(reason) => {
                self.health_pending = false;
                self.health = ApiHealth::Unreachable(reason);
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.loading = false;
        if outcome.mode() == self.mode {
            self.outcome = Some(outcome);
        } else {
            tracing::info!(mode = %outcome.mode(), "dropping result for inactive mode");
        }
    }

    pub fn handle_action(&mut self, action: Action) -> Option<AppEvent> {
        if self.editing {
            return self.handle_edit_action(action);
        }

        match action {
            Action::Quit => Some(AppEvent::Quit),
            Action::Left => {
                self.select_mode(self.mode.previous());
                None
            }
            Action::Right => {
                self.select_mode(self.mode.next());
                None
            }
            Action::Tab(index) => {
                if let Some(mode) = Mode::from_repr(index) {
                    self.select_mode(mode);
                }
                None
            }
            Action::Up => {
                self.move_focus(-1);
                None
            }
            Action::Down => {
                self.move_focus(1);
                None
            }
            Action::Edit => self.start_editing(),
            Action::AddCategory if self.mode == Mode::Classification => {
                self.add_category();
                self.focus = Focus::Category(self.categories.len() - 1);
                None
            }
            Action::Submit => self.submit().map(AppEvent::Submit),
            Action::Refresh => self.refresh_health().map(AppEvent::Submit),
            Action::Enter => match self.focus {
                Focus::Prompt | Focus::Category(_) => self.start_editing(),
                Focus::AddCategory => {
                    self.add_category();
                    None
                }
                Focus::Process => self.submit().map(AppEvent::Submit),
            },
            _ => None,
        }
    }

    fn handle_edit_action(&mut self, action: Action) -> Option<AppEvent> {
        let event = self.focused_input_mut()?.handle_action(action);
        match event {
            Some(TextInputEvent::Done) => {
                self.editing = false;
                Some(AppEvent::InputMode(InputMode::Normal))
            }
            None => None,
        }
    }

    fn start_editing(&mut self) -> Option<AppEvent> {
        self.focused_input_mut()?;
        self.editing = true;
        Some(AppEvent::InputMode(InputMode::Edit))
    }

    fn focused_input_mut(&mut self) -> Option<&mut TextInputViewModel> {
        match self.focus {
            Focus::Prompt => Some(&mut self.prompt),
            Focus::Category(index) => self.categories.get_mut(index),
            Focus::AddCategory | Focus::Process => None,
        }
    }

    /// Focusable elements of the current form, top to bottom.
    fn focus_order(&self) -> Vec<Focus> {
        let categories = match self.mode {
            Mode::Generation => 0,
            Mode::Classification => self.categories.len(),
        };

        std::iter::once(Focus::Prompt)
            .chain((0..categories).map(Focus::Category))
            .chain((self.mode == Mode::Classification).then_some(Focus::AddCategory))
            .chain(std::iter::once(Focus::Process))
            .collect()
    }

    fn move_focus(&mut self, step: isize) {
        let order = self.focus_order();
        let current = order
            .iter()
            .position(|focus| *focus == self.focus)
            .unwrap_or(0);
        let next = current.saturating_add_signed(step).min(order.len() - 1);
        self.focus = order[next];
    }
}

/// Titles of the mode tabs in display order.
pub fn mode_titles() -> Vec<String> {
    Mode::iter().map(|mode| mode.to_string()).collect()
}
