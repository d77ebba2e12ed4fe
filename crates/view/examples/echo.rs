//! An endpoint that answers GET with a greeting and echoes POSTed mappings back.
//!
//! Runs a few requests through it and prints the responses.

use bytes::Bytes;
use http::Request;
use micro_rest_view::html::discoverable_content_types;
use micro_rest_view::{Endpoint, RestResponse, handler_fn};
use serde_json::json;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let endpoint = Endpoint::builder()
        .content_types(discoverable_content_types())
        .get(handler_fn(|_view| json!({"hello": "world"})))
        .post(handler_fn(|view| match view.request_data_as_object() {
            // a real service would store the data here
            Ok(data) => view.created(data.into()),
            Err(e) => view.bad_request(json!({"error": e.to_string()})),
        }))
        .build();

    let requests = [
        ("GET", "/hello", "application/json", ""),
        ("GET", "/hello?mimetype=application/x-yaml", "application/json", ""),
        ("POST", "/hello", "application/json", r#"{"a": "test"}"#),
        ("POST", "/hello", "application/x-yaml", "- not\n- a\n- mapping\n"),
        ("PUT", "/hello", "application/json", "{}"),
        ("GET", "/hello", "image/png", ""),
    ];

    for (method, uri, accept, body) in requests {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(http::header::ACCEPT, accept)
            .body(Bytes::from_static(body.as_bytes()))
            .expect("valid request");
        let mut response = RestResponse::new();

        let body = match endpoint.render(&request, &mut response, "hello") {
            Ok(body) => body,
            Err(e) => {
                info!(cause = %e, "render failed");
                continue;
            }
        };

        let (status, reason) = response.status_line();
        info!(method, uri, status, reason, "handled request");
        println!("{method} {uri} -> {status} {reason}\n{}\n", String::from_utf8_lossy(&body));
    }
}
