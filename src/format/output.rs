use crate::model::Record;
use serde::Serialize;

/// Result of a command that changed one issue.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChangeResult {
    pub guid: String,
    pub action: &'static str,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl ChangeResult {
    #[must_use]
    pub fn new(action: &'static str, record: &Record) -> Self {
        Self {
            guid: record.guid().to_string(),
            action,
            status: record
                .status()
                .map_or_else(|_| "unknown".to_string(), |status| status.to_string()),
            order: None,
        }
    }

    #[must_use]
    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }
}

/// Records selected by `list`.
#[derive(Debug, Clone, Serialize)]
pub struct ListResult<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<&'a str>,
    pub count: usize,
    pub records: Vec<&'a Record>,
}

impl<'a> ListResult<'a> {
    #[must_use]
    pub fn new(query: Option<&'a str>, records: Vec<&'a Record>) -> Self {
        Self {
            query,
            count: records.len(),
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Field;

    fn record() -> Record {
        let mut record = Record::new();
        record.set(Field::Guid, "0x00000000000000ff");
        record.set(Field::Status, "closed");
        record.set(Field::ClosedMsg, "fixed");
        record
    }

    #[test]
    fn test_change_result_serializes_status() {
        let result = ChangeResult::new("close", &record());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["guid"], "0x00000000000000ff");
        assert_eq!(json["action"], "close");
        assert_eq!(json["status"], "closed");
        assert!(json.get("order").is_none());
    }

    #[test]
    fn test_change_result_with_order() {
        let result = ChangeResult::new("add", &record()).with_order("3");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["order"], "3");
    }

    #[test]
    fn test_list_result_counts_and_uses_query_names() {
        let record = record();
        let result = ListResult::new(Some("status == \"closed\""), vec![&record]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["records"][0]["closed_msg"], "fixed");
        assert_eq!(json["query"], "status == \"closed\"");
    }
}
