use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `{"data": ...}` envelope every v2 response uses
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: Option<T>,
}

/// The authenticated account
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub username: Option<String>,
}

/// A tweet as returned by the timeline endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteResult {
    pub deleted: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeline_page() {
        let body = r#"{
            "data": [
                {"id": "1460323737035677698", "created_at": "2021-11-15T19:08:05.000Z", "text": "hi"},
                {"id": "1460323737035677699"}
            ],
            "meta": {"result_count": 2}
        }"#;

        let page: Envelope<Vec<Tweet>> = serde_json::from_str(body).unwrap();
        let tweets = page.data.unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(
            tweets[0].created_at.unwrap().to_rfc3339(),
            "2021-11-15T19:08:05+00:00"
        );
        assert!(tweets[1].created_at.is_none());
    }

    #[test]
    fn test_empty_timeline_has_no_data() {
        let page: Envelope<Vec<Tweet>> =
            serde_json::from_str(r#"{"meta": {"result_count": 0}}"#).unwrap();
        assert!(page.data.is_none());
    }
}
