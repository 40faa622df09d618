use rocket::data::{ByteUnit, Data, FromData, Outcome};
use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::serde_json;
use rocket_okapi::r#gen::OpenApiGenerator;
use rocket_okapi::request::OpenApiFromData;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use std::ops::Deref;
use tracing::warn;

/// A JSON body wrapper that logs structured information when parsing fails.
///
/// Rocket's built-in `Json` swallows the reason for a 422; this wrapper
/// records the failing field position and a preview of the payload.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<T> Deref for JsonBody<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[rocket::async_trait]
impl<'r, T: DeserializeOwned> FromData<'r> for JsonBody<T> {
    type Error = serde_json::Error;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> Outcome<'r, Self> {
        let limit = req.limits().get("json").unwrap_or(ByteUnit::Mebibyte(1));

        let bytes = match data.open(limit).into_bytes().await {
            Ok(bytes) if bytes.is_complete() => bytes.into_inner(),
            Ok(_) => {
                warn!(method = %req.method(), uri = %req.uri(), "JSON payload exceeded size limit");
                return Outcome::Error((
                    Status::PayloadTooLarge,
                    serde_json::Error::io(std::io::Error::other("payload too large")),
                ));
            }
            Err(e) => {
                warn!(method = %req.method(), uri = %req.uri(), error = %e, "Failed to read request body");
                return Outcome::Error((Status::BadRequest, serde_json::Error::io(e)));
            }
        };

        match serde_json::from_slice::<T>(&bytes) {
            Ok(value) => Outcome::Success(JsonBody(value)),
            Err(e) => {
                let preview = body_preview(&bytes);

                warn!(
                    method = %req.method(),
                    uri = %req.uri(),
                    error_message = %e,
                    error_line = e.line(),
                    error_column = e.column(),
                    request_body = %preview,
                    "Failed to parse JSON request body"
                );

                Outcome::Error((Status::UnprocessableEntity, e))
            }
        }
    }
}

impl<'r, T: DeserializeOwned + JsonSchema> OpenApiFromData<'r> for JsonBody<T> {
    fn request_body(generator: &mut OpenApiGenerator) -> rocket_okapi::Result<okapi::openapi3::RequestBody> {
        <rocket::serde::json::Json<T> as OpenApiFromData>::request_body(generator)
    }
}

const PREVIEW_LIMIT: usize = 500;

/// Short lossy preview of a request body for the parse-failure log.
/// Truncation backs up to a char boundary; payloads are attacker-supplied
/// bytes and the cut point can land inside a multi-byte sequence.
fn body_preview(bytes: &[u8]) -> String {
    let preview = String::from_utf8_lossy(bytes);
    if preview.len() <= PREVIEW_LIMIT {
        return preview.into_owned();
    }

    let mut cut = PREVIEW_LIMIT;
    while !preview.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &preview[..cut])
}
