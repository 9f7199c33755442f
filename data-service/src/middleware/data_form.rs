use crate::dtos::DataInput;
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use service_core::error::AppError;

/// Request body of `POST /data`.
///
/// Bound by `Content-Type`: JSON, multipart form, or form-encoded otherwise.
#[derive(Debug)]
pub struct DataForm(pub DataInput);

#[async_trait]
impl<S> FromRequest<S> for DataForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let input = if content_type.starts_with("application/json") {
            let Json(input) = Json::<DataInput>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;
            input
        } else if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;
            read_multipart(multipart).await?
        } else {
            let Form(input) = Form::<DataInput>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(anyhow::anyhow!(e.body_text())))?;
            input
        };

        Ok(Self(input))
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<DataInput, AppError> {
    let mut id = None;
    let mut data = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.map_err(|e| {
            AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field {}: {}", name, e))
        })?;

        match name.as_str() {
            "id" => id = Some(value),
            "data" => data = Some(value),
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("missing field `data`")))?;
    Ok(DataInput { id, data })
}
