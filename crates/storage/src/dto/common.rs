use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Success envelope shared by every endpoint: `{ success, data?, message? }`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct ListUsersParams {
    #[serde(default = "default_limit")]
    pub limit: u32,
    /// Return users whose id sorts after this one
    pub start_after: Option<String>,
}

pub(crate) fn default_limit() -> u32 {
    10
}

impl ListUsersParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.limit < 1 || self.limit > 100 {
            return Err("limit must be between 1 and 100".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_omits_absent_fields() {
        let json = serde_json::to_value(ApiResponse::ok(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": 3 }));

        let json = serde_json::to_value(ApiResponse::ok(()).with_message("done")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "success": true, "data": null, "message": "done" })
        );
    }

    #[test]
    fn test_list_limit_bounds() {
        let params = |limit| ListUsersParams {
            limit,
            start_after: None,
        };
        assert!(params(0).validate().is_err());
        assert!(params(1).validate().is_ok());
        assert!(params(100).validate().is_ok());
        assert!(params(101).validate().is_err());
    }
}
