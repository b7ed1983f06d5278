//! Test fixtures: request bodies and a compressed measurement file.

use axum_test::multipart::{MultipartForm, Part};
use serde_json::{json, Value};

/// Upload body. The gateway forwards bytes untouched, so plain line protocol stands in for
/// the compressed file and can be matched verbatim on the mock side.
pub const MEASUREMENT_FILE: &str =
    "cpu,host=a usage=0.5 1700000000000\ncpu,host=b usage=0.7 1700000000000\n";

pub fn measurement_form(filename: &str) -> MultipartForm {
    let part = Part::bytes(bytes::Bytes::from_static(MEASUREMENT_FILE.as_bytes()))
        .file_name(filename.to_string())
        .mime_type("application/gzip");
    MultipartForm::new()
        .add_text("source", "sensor-gateway")
        .add_part("file", part)
}

pub fn registration_body() -> Value {
    json!({
        "first_name": "Alice",
        "last_name": "Liddell",
        "password": "correct horse battery staple"
    })
}

pub fn create_user_body(email: &str) -> Value {
    json!({
        "first_name": "Bob",
        "last_name": "Builder",
        "email": email,
        "password": "can-we-fix-it",
        "roles": ["operator"]
    })
}
