use crate::server::api;
use crate::server::http::HttpResponse;

const HEALTH: &str = "/api/health";
const REPORT: &str = "/api/report";
const REPORT_BATCH: &str = "/api/report/batch";

/// Dispatch on method and path; the query string is ignored.
pub fn route_request(method: &str, path: &str, body: &str) -> HttpResponse {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    let payload = match (method, path) {
        ("GET", HEALTH) => api::health_payload(),
        ("POST", REPORT) => api::report_payload(body),
        ("POST", REPORT_BATCH) => api::batch_payload(body),
        (_, HEALTH | REPORT | REPORT_BATCH) => {
            return HttpResponse::error(405, format!("{method} not allowed on {path}"));
        }
        _ => return HttpResponse::error(404, format!("no route for {method} {path}")),
    };
    match payload {
        Ok(body) => HttpResponse::json(200, body),
        Err(err) => HttpResponse::from(&err),
    }
}
