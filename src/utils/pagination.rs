use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginationMeta {
    pub total: i64,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    pub has_more: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PaginationParams {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            limit: Some(10),
            page: Some(1),
        }
    }
}

impl PaginationParams {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }

    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page() - 1) * self.limit()
    }
}

impl PaginationMeta {
    pub fn for_page(params: &PaginationParams, total: i64) -> Self {
        let limit = params.limit();
        Self {
            total,
            limit,
            page: Some(params.page()),
            has_more: params.offset() + limit < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_ten_per_page_from_page_one() {
        let params = PaginationParams::default();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.page(), 1);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn limit_is_clamped() {
        let params = PaginationParams {
            limit: Some(500),
            page: None,
        };
        assert_eq!(params.limit(), 100);

        let params = PaginationParams {
            limit: Some(-3),
            page: None,
        };
        assert_eq!(params.limit(), 1);
    }

    #[test]
    fn offset_is_derived_from_page() {
        let params = PaginationParams {
            limit: Some(25),
            page: Some(3),
        };
        assert_eq!(params.offset(), 50);
    }

    #[test]
    fn query_string_numbers_deserialize() {
        let params: PaginationParams = serde_json::from_str(r#"{"limit":"25","page":"2"}"#).unwrap();
        assert_eq!(params.limit(), 25);
        assert_eq!(params.page(), 2);

        let params: PaginationParams = serde_json::from_str(r#"{"limit":"","page":""}"#).unwrap();
        assert_eq!(params.limit(), 10);
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn meta_reports_has_more() {
        let params = PaginationParams {
            limit: Some(10),
            page: Some(1),
        };
        let meta = PaginationMeta::for_page(&params, 35);
        assert_eq!(meta.total, 35);
        assert!(meta.has_more);

        let last = PaginationParams {
            limit: Some(10),
            page: Some(4),
        };
        assert!(!PaginationMeta::for_page(&last, 35).has_more);
    }
}
