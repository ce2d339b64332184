use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_EVENT_TYPE: &str = "UNKNOWN_SUSPICIOUS_EVENT";

// Incoming security event - every field is optional
#[derive(Deserialize, Debug, Default, Clone)]
pub struct SecurityEventRequest {
    pub event_type: Option<String>,
    pub url: Option<String>,
    pub user_agent: Option<String>,
    pub details: Option<Value>,
}

// Row written to the event log table
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SecurityEventRecord {
    pub event_type: String,
    pub ip_address: String,
    pub user_agent: Option<String>,
    pub url: Option<String>,
    pub details: Value,
}

impl SecurityEventRecord {
    /// Fills the gaps in a client report.
    ///
    /// `user_agent` and `url` fall back to the request's `User-Agent` and
    /// `Referer` headers when the body leaves them out.
    pub fn from_request(
        req: SecurityEventRequest,
        ip_address: String,
        header_user_agent: Option<String>,
        header_referer: Option<String>,
    ) -> Self {
        Self {
            event_type: req
                .event_type
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string()),
            ip_address,
            user_agent: req.user_agent.or(header_user_agent),
            url: req.url.or(header_referer),
            details: match req.details {
                Some(Value::Null) | None => Value::Object(Default::default()),
                Some(details) => details,
            },
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct LoggedResponse {
    pub success: bool,
    pub message: String,
}

impl LoggedResponse {
    pub fn logged() -> Self {
        Self {
            success: true,
            message: "Incident logged securely.".to_string(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ErrorBody {
    pub error: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_report_gets_defaults() {
        let record = SecurityEventRecord::from_request(
            SecurityEventRequest::default(),
            "Unknown".to_string(),
            None,
            None,
        );

        assert_eq!(record.event_type, DEFAULT_EVENT_TYPE);
        assert_eq!(record.ip_address, "Unknown");
        assert_eq!(record.details, json!({}));
        assert!(record.user_agent.is_none());
        assert!(record.url.is_none());
    }

    #[test]
    fn body_fields_win_over_headers() {
        let req: SecurityEventRequest = serde_json::from_value(json!({
            "event_type": "DEVTOOLS_OPENED",
            "url": "https://intentia.co/pricing",
            "details": {"attempts": 3}
        }))
        .unwrap();

        let record = SecurityEventRecord::from_request(
            req,
            "1.2.3.4".to_string(),
            Some("curl/8.0".to_string()),
            Some("https://intentia.co/".to_string()),
        );

        assert_eq!(record.event_type, "DEVTOOLS_OPENED");
        assert_eq!(record.url.as_deref(), Some("https://intentia.co/pricing"));
        assert_eq!(record.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(record.details, json!({"attempts": 3}));
    }
}
