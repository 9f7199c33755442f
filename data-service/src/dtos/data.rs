use crate::models::Data;
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

/// Wire form of a stored record; the id is rendered as 24 hex characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataResponse {
    pub id: String,
    pub data: String,
}

impl From<Data> for DataResponse {
    fn from(record: Data) -> Self {
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            data: record.data,
        }
    }
}

/// Fields accepted by `POST /data`, form-encoded, multipart or JSON.
#[derive(Debug, Clone, Deserialize)]
pub struct DataInput {
    #[serde(default)]
    pub id: Option<String>,
    pub data: String,
}

impl TryFrom<DataInput> for Data {
    type Error = AppError;

    fn try_from(input: DataInput) -> Result<Self, Self::Error> {
        // An empty `id=` form field means "generate one".
        let id = match input.id.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(hex) => Some(ObjectId::parse_str(hex).map_err(|e| {
                AppError::BadRequest(anyhow::anyhow!("Invalid id '{}': {}", hex, e))
            })?),
        };

        Ok(Data {
            id,
            data: input.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(id: Option<&str>) -> DataInput {
        DataInput {
            id: id.map(str::to_string),
            data: "hello".to_string(),
        }
    }

    #[test]
    fn test_input_without_id() {
        let record = Data::try_from(input(None)).unwrap();
        assert_eq!(record, Data::new("hello"));

        let record = Data::try_from(input(Some(""))).unwrap();
        assert!(record.id.is_none());
    }

    #[test]
    fn test_input_with_valid_id() {
        let id = ObjectId::new();
        let record = Data::try_from(input(Some(&id.to_hex()))).unwrap();
        assert_eq!(record.id, Some(id));
    }

    #[test]
    fn test_input_with_invalid_id() {
        let result = Data::try_from(input(Some("not-an-object-id")));
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_response_renders_hex_id() {
        let id = ObjectId::new();
        let response = DataResponse::from(Data {
            id: Some(id),
            data: "hello".to_string(),
        });
        assert_eq!(response.id, id.to_hex());
        assert_eq!(response.data, "hello");
    }
}
