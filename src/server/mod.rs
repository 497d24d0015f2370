pub mod handler;
pub mod http;

pub use handler::{OutputFormat, ReportQuery, ReportService, ServiceSettings};
pub use http::{HttpRequest, HttpResponse};

use crate::cli::ServeArgs;
use crate::error::Result;
use crate::git::{CommandRunner, SystemRunner};
use anyhow::Context;
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const READ_TIMEOUT: Duration = Duration::from_secs(30);

pub fn exec(args: ServeArgs) -> anyhow::Result<()> {
    let runner = SystemRunner::new(args.command_timeout);
    let service = ReportService::new(
        runner,
        ServiceSettings {
            work_dir: args.work_dir,
            output: args.output,
        },
    );

    let server = Server::bind(&args.bind)
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!(
        addr = %server.local_addr()?,
        output = %service.settings().output.display(),
        command_timeout = %humantime::format_duration(args.command_timeout),
        "Listening"
    );
    server.serve(service).context("Server stopped")
}

pub struct Server {
    listener: TcpListener,
}

impl Server {
    pub fn bind(addr: &str) -> Result<Self> {
        Ok(Self {
            listener: TcpListener::bind(addr)?,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, one thread per connection.
    pub fn serve<R: CommandRunner + 'static>(self, service: ReportService<R>) -> Result<()> {
        let service = Arc::new(service);
        for stream in self.listener.incoming() {
            match stream {
                Ok(stream) => {
                    let service = Arc::clone(&service);
                    std::thread::spawn(move || handle_stream(stream, &service));
                }
                Err(e) => warn!(error = %e, "TCP accept error"),
            }
        }
        Ok(())
    }
}

fn handle_stream<R: CommandRunner>(mut stream: TcpStream, service: &ReportService<R>) {
    if let Err(e) = stream.set_read_timeout(Some(READ_TIMEOUT)) {
        warn!(error = %e, "Failed to set read timeout");
    }
    serve_connection(&mut stream, service);
    let _ = stream.shutdown(Shutdown::Write);
}

/// Read one request from `stream`, handle it and write the response.
pub fn serve_connection<S, R>(stream: &mut S, service: &ReportService<R>)
where
    S: Read + Write,
    R: CommandRunner,
{
    let started = Instant::now();
    let (request, response) = match http::read_request(stream) {
        None => return,
        Some(Ok(request)) => {
            let response = service.handle(&request);
            (Some(request), response)
        }
        Some(Err(e)) => {
            warn!(error = %e, "Malformed request");
            (None, HttpResponse::text(400, &e.to_string()))
        }
    };

    if let Some(request) = &request {
        info!(
            method = %request.method,
            target = %request.target,
            status = response.status,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Handled request"
        );
    }

    if let Err(e) = http::write_response(stream, &response) {
        debug!(error = %e, "Client went away before the response was written");
    }
}
