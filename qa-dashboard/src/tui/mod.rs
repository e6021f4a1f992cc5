use std::time::Duration;

use dashboard::{view::DashboardView as _, DashboardViewModel};
use event::{EventProcessor, InputMode};
use futures::StreamExt as _;
use qa_client::Client;
use ratatui::{
    crossterm::event::Event,
    style::{Color, Style},
    DefaultTerminal, Frame,
};
use request_context::RequestContext;

use crate::{api::ApiRequest, error::Error};

pub mod dashboard;
pub mod event;
pub mod input;
mod request_context;

pub struct AppContext {
    request_context: RequestContext,
    event_processor: EventProcessor,
    dashboard: DashboardViewModel,
}

#[extend::ext]
impl Style {
    fn focused() -> Self {
        Style::default().fg(Color::Green)
    }

    fn active() -> Self {
        Style::default().fg(Color::Cyan)
    }

    fn disabled() -> Self {
        Style::default().fg(Color::DarkGray)
    }

    fn alert() -> Self {
        Style::default().fg(Color::Red)
    }
}

impl AppContext {
    pub fn new(client: Client) -> Self {
        Self {
            request_context: RequestContext::spawn(client),
            event_processor: Default::default(),
            dashboard: Default::default(),
        }
    }

    fn draw(&mut self, frame: &mut Frame) {
        frame.dashboard_view(frame.area(), Style::default(), &self.dashboard);
    }

    pub async fn run(mut self, mut terminal: DefaultTerminal) -> anyhow::Result<()> {
        if let Some(request) = self.dashboard.refresh_health() {
            self.handle_event(AppEvent::Submit(request))?;
        }

        let period = Duration::from_secs_f32(1.0 / 15.0);
        let mut interval = tokio::time::interval(period);
        let mut events = ratatui::crossterm::event::EventStream::new();
        loop {
            tokio::select! {
                _ = interval.tick() => { terminal.draw(|frame| self.draw(frame))?; },
                Some(Ok(event)) = events.next() => {
                    if let Some(app_event) = self.handle_input(event) {
                        let cont = self.handle_event(app_event)?;
                        if !cont {
                            return Ok(());
                        }
                    }
                },
                Some(response) = self.request_context.response_receiver.recv() => {
                    self.dashboard.handle_response(response);
                }
            }
        }
    }

    /// Returns true if the event was handled
    /// and false if the app should quit.
    fn handle_event(&mut self, event: AppEvent) -> anyhow::Result<bool> {
        match event {
            AppEvent::Submit(request) => match self.request_context.submit(request) {
                Ok(()) => Ok(true),
                Err(Error::WorkerBusy(request)) => {
                    tracing::warn!(?request, "request worker busy, dropping request");
                    self.dashboard.handle_rejected(&request);
                    Ok(true)
                }
                Err(error) => Err(error.into()),
            },
            AppEvent::InputMode(input_mode) => {
                self.event_processor.input_mode(input_mode);
                Ok(true)
            }
            AppEvent::Quit => Ok(false),
        }
    }

    fn handle_input(&mut self, event: Event) -> Option<AppEvent> {
        let action = self.event_processor.process(event);
        self.dashboard.handle_action(action)
    }
}

#[derive(Debug)]
pub enum AppEvent {
    Submit(ApiRequest),
    InputMode(InputMode),
    Quit,
}
