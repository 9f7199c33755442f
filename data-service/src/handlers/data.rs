//! `GET /data` and `POST /data`.
//!
//! Both answer with an [`Envelope`] and only ever use 200 or 400. Every
//! failure branch returns right away, so a request gets exactly one response.

use crate::dtos::{DataResponse, Envelope};
use crate::middleware::{DataForm, DbHandle};
use crate::models::Data;
use crate::services::record_operation;
use axum::{
    response::{IntoResponse, Response},
    Extension,
};
use service_core::error::AppError;

pub const GET_SUCCESS: &str = "get data sucess";
pub const POST_SUCCESS: &str = "post data sucess";
pub const CANT_REACH_DB: &str = "can't reach db";
pub const CANT_CONNECT_DB: &str = "can't connect to db";
pub const CANT_GET_DATA: &str = "can't get data from database";
pub const INCORRECT_DATA: &str = "Incorrect data";
pub const ERROR_POST: &str = "error post to db";

pub async fn get_data(handle: Option<Extension<DbHandle>>) -> Response {
    let Some(Extension(handle)) = handle else {
        return Envelope::into_bad_request(CANT_REACH_DB);
    };

    match handle.store().fetch_all().await {
        Ok(records) => {
            record_operation("fetch_all", "ok");
            let body: Vec<DataResponse> = records.into_iter().map(DataResponse::from).collect();
            Envelope::ok(GET_SUCCESS, body).into_response()
        }
        Err(e) => {
            record_operation("fetch_all", "error");
            tracing::warn!(error = %e, "Failed to fetch records");
            Envelope::into_bad_request(CANT_GET_DATA)
        }
    }
}

pub async fn post_data(
    handle: Option<Extension<DbHandle>>,
    input: Result<DataForm, AppError>,
) -> Response {
    let Some(Extension(handle)) = handle else {
        return Envelope::into_bad_request(CANT_CONNECT_DB);
    };

    let record = match input.and_then(|DataForm(input)| Data::try_from(input)) {
        Ok(record) => record,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected request body");
            return Envelope::into_bad_request(INCORRECT_DATA);
        }
    };

    match handle.store().insert_one(record).await {
        Ok(stored) => {
            record_operation("insert_one", "ok");
            Envelope::ok(POST_SUCCESS, DataResponse::from(stored)).into_response()
        }
        Err(e) => {
            record_operation("insert_one", "error");
            tracing::warn!(error = %e, "Failed to insert record");
            Envelope::into_bad_request(ERROR_POST)
        }
    }
}
