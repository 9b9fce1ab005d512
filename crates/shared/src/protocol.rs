use serde::{Deserialize, Serialize};

use crate::domain::{ImageMimeType, StagingStyle};

pub const STAGE_PATH: &str = "/api/stage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    /// Standard-alphabet base64 without any `data:` prefix.
    pub data: String,
    pub mime_type: ImageMimeType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRequest {
    pub image: InlineImage,
    pub style: StagingStyle,
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageResponse {
    #[serde(default)]
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stage_request_uses_camel_case_wire_fields() {
        let request = StageRequest {
            image: InlineImage {
                data: "AAEC".to_string(),
                mime_type: ImageMimeType::Jpeg,
            },
            style: StagingStyle::MidCenturyModern,
            description: "add a sofa".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request).expect("serialize"),
            json!({
                "image": { "data": "AAEC", "mimeType": "image/jpeg" },
                "style": "Mid-Century Modern",
                "description": "add a sofa",
            })
        );
    }

    #[test]
    fn stage_response_tolerates_missing_image_url() {
        let response: StageResponse = serde_json::from_value(json!({})).expect("parse");
        assert!(response.image_url.is_none());

        let response: StageResponse =
            serde_json::from_value(json!({ "imageUrl": "https://cdn/x.png" })).expect("parse");
        assert_eq!(response.image_url.as_deref(), Some("https://cdn/x.png"));
    }
}
