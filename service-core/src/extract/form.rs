use crate::error::AppError;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;

/// Form fields decoded from either a urlencoded or a multipart body.
///
/// Browser clients posting `FormData` send `multipart/form-data`, curl and
/// plain HTML forms send `application/x-www-form-urlencoded`. Both land in
/// the same `T`. File parts in a multipart body are skipped, and a repeated
/// key resolves to its last value.
#[derive(Debug, Clone)]
pub struct FormFields<T>(pub T);

#[derive(Debug, PartialEq, Eq)]
enum FormEncoding {
    UrlEncoded,
    Multipart,
}

fn form_encoding(req: &Request) -> Option<FormEncoding> {
    let value = req.headers().get(CONTENT_TYPE)?.to_str().ok()?;
    let media_type = value.split(';').next().unwrap_or_default().trim();

    if media_type.eq_ignore_ascii_case("application/x-www-form-urlencoded") {
        Some(FormEncoding::UrlEncoded)
    } else if media_type.eq_ignore_ascii_case("multipart/form-data") {
        Some(FormEncoding::Multipart)
    } else {
        None
    }
}

/// Collapses repeated keys onto their last value, keeping first-seen key order.
fn last_value_per_key(pairs: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut fields: Vec<(String, String)> = Vec::with_capacity(pairs.len());
    for (name, value) in pairs {
        match fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(field) => field.1 = value,
            None => fields.push((name, value)),
        }
    }
    fields
}

async fn multipart_pairs<S>(req: Request, state: &S) -> Result<Vec<(String, String)>, AppError>
where
    S: Send + Sync,
{
    let mut multipart = Multipart::from_request(req, state)
        .await
        .map_err(|rejection| AppError::BadRequest(anyhow::anyhow!(rejection.body_text())))?;

    let mut pairs = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        if field.file_name().is_some() {
            continue;
        }
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let value = field.text().await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read field {}: {}", name, e))
        })?;
        pairs.push((name, value));
    }
    Ok(pairs)
}

#[async_trait]
impl<T, S> FromRequest<S> for FormFields<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let pairs: Vec<(String, String)> = match form_encoding(&req) {
            Some(FormEncoding::Multipart) => multipart_pairs(req, state).await?,
            Some(FormEncoding::UrlEncoded) => {
                let body = Bytes::from_request(req, state).await.map_err(|rejection| {
                    AppError::BadRequest(anyhow::anyhow!(rejection.body_text()))
                })?;
                serde_urlencoded::from_bytes(&body).map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Invalid urlencoded body: {}", e))
                })?
            }
            None => {
                return Err(AppError::UnprocessableEntity(anyhow::anyhow!(
                    "Expected a urlencoded or multipart form body"
                )))
            }
        };

        // Reuse the urlencoded deserializer so both encodings share one set of rules.
        let encoded = serde_urlencoded::to_string(last_value_per_key(pairs))
            .map_err(|e| AppError::BadRequest(anyhow::anyhow!("Invalid form fields: {}", e)))?;
        let value = serde_urlencoded::from_str::<T>(&encoded).map_err(|e| {
            AppError::UnprocessableEntity(anyhow::anyhow!("Failed to deserialize form: {}", e))
        })?;

        Ok(Self(value))
    }
}
