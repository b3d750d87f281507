//! # Application Controller
//!
//! Runs the event loop: key presses become [`ControllerAction`]s through the
//! command registry, [`ControllerState::apply`] turns them into effects, and
//! the controller performs those effects. Network calls run on tokio tasks
//! and report back over a channel as further actions, so the loop never
//! blocks on the server.

use std::future::Future;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{Event, KeyEventKind};
use tokio::sync::mpsc;

use crate::config::ConsoleProfile;
use crate::console::commands::{CommandContext, CommandRegistry};
use crate::console::events::{ControllerAction, Effect, RequestKind};
use crate::console::io::{EventStream, RenderStream};
use crate::console::models::{Notice, ThemeStore};
use crate::console::services::{ApiClient, ApiError};
use crate::console::view_models::ControllerState;
use crate::console::views::{TerminalRenderer, ViewRenderer};

const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(100);
const RESPONSE_CHANNEL_SIZE: usize = 32;

pub struct AppController<ES: EventStream, RS: RenderStream> {
    state: ControllerState,
    view_renderer: TerminalRenderer<RS>,
    command_registry: CommandRegistry,
    event_stream: ES,
    client: ApiClient,
    profile: ConsoleProfile,
    theme_store: ThemeStore,
    response_sender: mpsc::Sender<ControllerAction>,
    response_receiver: mpsc::Receiver<ControllerAction>,
    /// Spawned requests that have not reported back yet
    in_flight: usize,
    last_fetch: Instant,
}

impl<ES: EventStream, RS: RenderStream> AppController<ES, RS> {
    pub fn with_io_streams(
        profile: ConsoleProfile,
        theme_store: ThemeStore,
        event_stream: ES,
        render_stream: RS,
    ) -> Result<Self> {
        let client = ApiClient::new(&profile)?;
        let view_renderer = TerminalRenderer::with_render_stream(render_stream)?;

        let mut state = ControllerState::new(theme_store.load());
        state.status_line_mut().set_server(client.base_url().as_str());

        let (response_sender, response_receiver) = mpsc::channel(RESPONSE_CHANNEL_SIZE);
        tracing::info!(
            "Console started for profile '{}' against {}",
            profile.name,
            client.base_url()
        );

        Ok(Self {
            state,
            view_renderer,
            command_registry: CommandRegistry::new(),
            event_stream,
            client,
            profile,
            theme_store,
            response_sender,
            response_receiver,
            in_flight: 0,
            last_fetch: Instant::now(),
        })
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Run until the operator quits
    pub async fn run(&mut self) -> Result<()> {
        self.view_renderer.initialize()?;
        let result = self.event_loop().await;
        self.view_renderer.cleanup()?;
        result
    }

    async fn event_loop(&mut self) -> Result<()> {
        self.dispatch(ControllerAction::Refresh)?;
        self.view_renderer.render_full(&self.state)?;

        while !self.state.should_quit() {
            let mut dirty = false;

            if self.event_stream.poll(EVENT_POLL_INTERVAL)? {
                let event = self.event_stream.read()?;
                dirty |= self.handle_event(event)?;
            }
            dirty |= self.drain_responses()?;
            dirty |= self.poll_refresh()?;

            if dirty && !self.state.should_quit() {
                self.view_renderer.render_full(&self.state)?;
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Handle one terminal event; true when the screen needs redrawing
    pub fn handle_event(&mut self, event: Event) -> Result<bool> {
        match event {
            Event::Key(key_event) if key_event.kind != KeyEventKind::Release => {
                let context = CommandContext::from_state(&self.state);
                let actions = self.command_registry.process_event(key_event, &context)?;
                let handled = !actions.is_empty();
                for action in actions {
                    self.dispatch(action)?;
                }
                Ok(handled)
            }
            Event::Resize(width, height) => {
                self.view_renderer.update_size(width, height);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Apply an action and perform the effects it requests
    pub fn dispatch(&mut self, action: ControllerAction) -> Result<()> {
        for effect in self.state.apply(action) {
            self.perform(effect)?;
        }
        Ok(())
    }

    /// Apply every completion that has already arrived
    pub fn drain_responses(&mut self) -> Result<bool> {
        let mut received = false;
        while let Ok(action) = self.response_receiver.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.dispatch(action)?;
            received = true;
        }
        Ok(received)
    }

    /// Wait until every spawned request, including follow-ups, has reported back
    pub async fn settle(&mut self) -> Result<()> {
        while self.in_flight > 0 {
            let Some(action) = self.response_receiver.recv().await else {
                break;
            };
            self.in_flight -= 1;
            self.dispatch(action)?;
        }
        Ok(())
    }

    /// Periodic refresh, skipped while a prompt is open or a fetch is pending
    fn poll_refresh(&mut self) -> Result<bool> {
        let Some(secs) = self.profile.poll_secs else {
            return Ok(false);
        };
        if self.state.prompt().is_some()
            || self.state.status_line().is_loading()
            || self.last_fetch.elapsed() < Duration::from_secs(secs)
        {
            return Ok(false);
        }
        tracing::debug!("Polling scan list after {}s", secs);
        self.dispatch(ControllerAction::Refresh)?;
        Ok(true)
    }

    fn perform(&mut self, effect: Effect) -> Result<()> {
        tracing::debug!("perform: {:?}", effect);
        match effect {
            Effect::FetchScans { filter } => {
                tracing::debug!("Fetching scan list for the {:?} view", filter);
                self.last_fetch = Instant::now();
                let client = self.client.clone();
                self.spawn_request(
                    RequestKind::ScanList,
                    async move { client.scan_list().await },
                    |scans| ControllerAction::ScansLoaded { scans },
                );
            }
            Effect::Dispatch { kind, ids } => {
                let client = self.client.clone();
                let request_ids = ids.clone();
                self.spawn_request(
                    RequestKind::Bulk(kind),
                    async move { client.dispatch(kind, &request_ids).await },
                    move |reply| ControllerAction::BulkCompleted {
                        kind,
                        ids,
                        message: reply.message,
                    },
                );
            }
            Effect::Export { format, ids } => {
                let client = self.client.clone();
                let dir = self.profile.export_dir();
                self.spawn_request(
                    RequestKind::Export(format),
                    async move { client.download_export(format, &ids, &dir).await },
                    move |path| ControllerAction::ExportSaved { format, path },
                );
            }
            Effect::ShowCloneLink { id } => {
                let notice = match self.client.clone_url(&id) {
                    Ok(url) => Notice::info(format!("Clone scan {id}: {url}")),
                    Err(e) => Notice::error(e.to_string()),
                };
                self.dispatch(ControllerAction::Notify(notice))?;
            }
            Effect::PersistTheme(theme) => {
                if let Err(e) = self.theme_store.save(theme) {
                    tracing::warn!("Failed to save theme: {:#}", e);
                    self.dispatch(ControllerAction::Notify(Notice::warning(format!(
                        "Theme not saved: {e}"
                    ))))?;
                }
            }
            Effect::Quit => tracing::info!("Quit requested"),
        }
        Ok(())
    }

    /// Run `request` on a tokio task and send its outcome back as an action
    fn spawn_request<T, F, C>(&mut self, kind: RequestKind, request: F, on_success: C)
    where
        T: Send + 'static,
        F: Future<Output = std::result::Result<T, ApiError>> + Send + 'static,
        C: FnOnce(T) -> ControllerAction + Send + 'static,
    {
        let sender = self.response_sender.clone();
        self.in_flight += 1;
        tokio::spawn(async move {
            let action = match request.await {
                Ok(value) => on_success(value),
                Err(error) => ControllerAction::RequestFailed {
                    request: kind,
                    error,
                },
            };
            if sender.send(action).await.is_err() {
                tracing::debug!("Controller gone before {:?} completed", kind);
            }
        });
    }
}
