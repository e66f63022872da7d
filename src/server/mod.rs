use std::io::{self, BufReader};
use std::net::{TcpListener, TcpStream};

pub mod api;
pub mod http;
pub mod routes;

use self::http::{read_request, HttpResponse, MAX_BODY_BYTES};

pub fn run_server(bind_addr: &str) -> io::Result<()> {
    let listener = TcpListener::bind(bind_addr)?;
    tracing::info!("battle report server listening on http://{bind_addr}");
    serve(listener)
}

/// Answer connections on an already bound listener, one at a time.
pub fn serve(listener: TcpListener) -> io::Result<()> {
    for stream in listener.incoming() {
        match stream {
            Ok(stream) => {
                if let Err(err) = handle_connection(&stream) {
                    tracing::warn!(%err, "failed to write response");
                }
            }
            Err(err) => tracing::warn!(%err, "connection failed"),
        }
    }
    Ok(())
}

fn handle_connection(stream: &TcpStream) -> io::Result<()> {
    let mut reader = BufReader::new(stream);
    let response = match read_request(&mut reader, MAX_BODY_BYTES) {
        Ok(Some(request)) => {
            let response = routes::route_request(&request.method, &request.path, &request.body);
            tracing::debug!(
                method = %request.method,
                path = %request.path,
                body_bytes = request.body.len(),
                status = response.status_code,
                "handled request"
            );
            response
        }
        Ok(None) => return Ok(()),
        Err(err) => {
            tracing::warn!(%err, "rejected request");
            HttpResponse::from(&err)
        }
    };
    let mut writer = stream;
    response.write_to(&mut writer)
}
