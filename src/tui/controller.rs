use std::time::Duration;

use tracing::{error, info, warn};

use super::{
    event::AppEvent,
    form::{ConnectForm, ConnectRequest},
    link::{DeviceLink, LinkStatus},
    state::AppState,
};
use crate::{
    core::session::TerminalSession,
    domain::{config::ConnectionConfig, error::SerialLoggerResult},
    infrastructure::{
        logging::LogTarget,
        serial::{PortEnumerator, PortInfo},
    },
};

/// Opens a session for the chosen connection
pub type SessionOpener = Box<dyn FnMut(ConnectionConfig) -> SerialLoggerResult<TerminalSession>>;

/// Connection handling behind the UI keys: reconnect, connect popup, log file.
///
/// Never waits for the reader. A connect chosen while the previous session is
/// still shutting down is held until `tick` sees the link free.
pub struct Controller {
    pub state: AppState,
    connection: ConnectionConfig,
    link: DeviceLink,
    log: LogTarget,
    ports: Box<dyn PortEnumerator>,
    opener: SessionOpener,
    pending: Option<ConnectRequest>,
}

impl Controller {
    pub fn new(
        session: TerminalSession,
        log: LogTarget,
        ports: Box<dyn PortEnumerator>,
        opener: SessionOpener,
        poll_interval: Duration,
    ) -> SerialLoggerResult<Self> {
        let connection = session.config().clone();
        let mut link = DeviceLink::new(poll_interval);
        link.attach(session)?;

        let mut state = AppState::new(&connection, log.path());
        state.link = link.status();

        Ok(Self {
            state,
            connection,
            link,
            log,
            ports,
            opener,
            pending: None,
        })
    }

    /// Act on a key-level event. `Quit` belongs to the caller.
    pub fn handle(&mut self, event: AppEvent) {
        match event {
            AppEvent::Quit => {}
            AppEvent::ToggleConnection => self.toggle_connection(),
            AppEvent::OpenConnectForm => {
                let ports = self.list_ports();
                self.state.connect_form = Some(ConnectForm::new(
                    ports,
                    &self.connection.port,
                    self.connection.baud_rate,
                    &self.log.path(),
                ));
            }
            AppEvent::RefreshPorts => {
                let ports = self.list_ports();
                if let Some(form) = self.state.connect_form.as_mut() {
                    form.refresh_ports(ports);
                }
            }
            AppEvent::Connect(request) => self.request_connect(request),
        }
    }

    /// Apply queued reader output, then start a held connect once the link is free
    pub fn tick(&mut self) {
        for event in self.link.drain() {
            self.state.apply(event);
        }
        self.state.link = self.link.status();

        if self.state.link == LinkStatus::Disconnected {
            if let Some(request) = self.pending.take() {
                self.connect_to(request);
            }
        }
    }

    /// Stop the reader and wait for it
    pub fn shutdown(&mut self) {
        self.pending = None;
        for event in self.link.shutdown() {
            self.state.apply(event);
        }
        self.state.link = self.link.status();
    }

    fn toggle_connection(&mut self) {
        match self.link.status() {
            LinkStatus::Connected => {
                self.pending = None;
                self.link.request_disconnect();
                self.state.link = LinkStatus::Disconnecting;
                self.state
                    .set_status_message(format!("Disconnecting from '{}'...", self.connection.port));
            }
            LinkStatus::Disconnecting => {
                self.state
                    .set_status_message("Still disconnecting, waiting for the last read".to_string());
            }
            LinkStatus::Disconnected => self.open_current(),
        }
    }

    fn request_connect(&mut self, request: ConnectRequest) {
        if self.link.status() == LinkStatus::Disconnected {
            self.connect_to(request);
            return;
        }

        self.link.request_disconnect();
        self.state.link = LinkStatus::Disconnecting;
        self.state
            .set_status_message(format!("Switching to '{}'...", request.port));
        self.pending = Some(request);
    }

    fn connect_to(&mut self, request: ConnectRequest) {
        let current_log = self.log.path();
        if request.log_file != current_log {
            info!("Log continues in '{}'", request.log_file.display());
            if let Err(e) = self.log.switch_to(&request.log_file) {
                error!("{}", e);
                self.state.set_status_message(e.to_string());
                return;
            }
            info!("Log continued from '{}'", current_log.display());
            self.state.log_file = request.log_file;
        }

        self.connection.port = request.port;
        self.connection.baud_rate = request.baud_rate;
        self.state.port = self.connection.port.clone();
        self.state.baud_rate = self.connection.baud_rate;
        self.open_current();
    }

    fn open_current(&mut self) {
        let opened = (self.opener)(self.connection.clone()).and_then(|session| self.link.attach(session));
        match opened {
            Ok(()) => {
                info!(
                    "Connected to '{}' at {} baud",
                    self.connection.port, self.connection.baud_rate
                );
                self.state
                    .set_status_message(format!("Connected to '{}'", self.connection.port));
            }
            Err(e) => {
                error!("Connecting to '{}' failed: {}", self.connection.port, e);
                self.state.set_status_message(format!("Failed to connect: {}", e));
            }
        }
        self.state.link = self.link.status();
    }

    fn list_ports(&mut self) -> Vec<PortInfo> {
        match self.ports.available_ports() {
            Ok(ports) => ports,
            Err(e) => {
                warn!("{}", e);
                self.state.set_status_message(e.to_string());
                Vec::new()
            }
        }
    }
}
