//! Logging setup for the jukebox
//!
//! Human-readable lines always go to stderr. When a log host is configured,
//! every event is also sent to it as JSON in a syslog datagram, prefixed with
//! the `<PRI>` header (facility `user`).

use std::io::{self, Write};
use std::net::UdpSocket;
use std::sync::Arc;

use tracing::{Dispatch, Level, Metadata};
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Registry};

/// Syslog facility `user`
const FACILITY_USER: u8 = 1;

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Unable to reach log host {host}:{port}: {source}")]
    Syslog {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },
}

/// Build the subscriber, install it globally and return it for injection
pub fn init_logging(syslog: Option<(String, u16)>) -> Result<Dispatch, LoggingError> {
    let dispatch = build_dispatch(syslog, env_filter("info"))?;
    tracing::dispatcher::set_global_default(dispatch.clone())
        .map_err(|e| LoggingError::TracingInit(e.to_string()))?;
    Ok(dispatch)
}

/// Build the stderr and (optionally) syslog subscriber without installing it
pub fn build_dispatch(syslog: Option<(String, u16)>, filter: EnvFilter) -> Result<Dispatch, LoggingError> {
    let syslog_layer = match syslog {
        Some((host, port)) => {
            let writer = SyslogMakeWriter::connect(&host, port)
                .map_err(|source| LoggingError::Syslog { host, port, source })?;
            Some(fmt::layer().json().with_current_span(false).with_writer(writer))
        }
        None => None,
    };

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .compact(),
        )
        .with(syslog_layer)
        .with(filter);

    Ok(Dispatch::new(subscriber))
}

/// `JUKEBOX_LOG_LEVEL`, then `RUST_LOG`, then `default_level`
pub fn env_filter(default_level: &str) -> EnvFilter {
    if let Ok(level) = std::env::var("JUKEBOX_LOG_LEVEL") {
        EnvFilter::new(level)
    } else if let Ok(rust_log) = std::env::var("RUST_LOG") {
        EnvFilter::new(rust_log)
    } else {
        EnvFilter::new(default_level)
    }
}

/// Syslog severity for a tracing level
fn severity(level: &Level) -> u8 {
    match *level {
        Level::ERROR => 3,
        Level::WARN => 4,
        Level::INFO => 6,
        _ => 7,
    }
}

fn priority(level: &Level) -> u8 {
    FACILITY_USER * 8 + severity(level)
}

/// Hands out one [`SyslogDatagram`] per event
#[derive(Debug, Clone)]
pub struct SyslogMakeWriter {
    socket: Arc<UdpSocket>,
}

impl SyslogMakeWriter {
    pub fn connect(host: &str, port: u16) -> io::Result<Self> {
        let socket = UdpSocket::bind(("0.0.0.0", 0))?;
        socket.connect((host, port))?;
        Ok(Self {
            socket: Arc::new(socket),
        })
    }
}

impl<'a> MakeWriter<'a> for SyslogMakeWriter {
    type Writer = SyslogDatagram;

    fn make_writer(&'a self) -> Self::Writer {
        SyslogDatagram::new(Arc::clone(&self.socket), priority(&Level::INFO))
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        SyslogDatagram::new(Arc::clone(&self.socket), priority(meta.level()))
    }
}

/// Buffers one formatted event and sends it when dropped
#[derive(Debug)]
pub struct SyslogDatagram {
    socket: Arc<UdpSocket>,
    buf: Vec<u8>,
}

impl SyslogDatagram {
    fn new(socket: Arc<UdpSocket>, priority: u8) -> Self {
        Self {
            socket,
            buf: format!("<{}>", priority).into_bytes(),
        }
    }
}

impl Write for SyslogDatagram {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for SyslogDatagram {
    fn drop(&mut self) {
        while self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        // A lost log line must never take the jukebox down
        let _ = self.socket.send(&self.buf);
    }
}
