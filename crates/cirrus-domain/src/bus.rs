//! Service-bus entities as the management plane represents them: topics,
//! subscriptions, and per-subscription rules carrying a filter and an
//! optional SQL action.

use serde::{Deserialize, Serialize};

/// The service default compatibility level stamped on SQL filters and actions.
pub const SQL_COMPATIBILITY_LEVEL: i32 = 20;

/// SQL expression of the match-everything filter a new rule gets by default.
pub const MATCH_ALL_EXPRESSION: &str = "1=1";

// ── Topics ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbTopic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<TopicProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_message_time_to_live: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_partitioning: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// ── Subscriptions ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbSubscription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<SubscriptionProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lock_duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_delivery_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// ── Rules ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterType {
    SqlFilter,
    CorrelationFilter,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlFilter {
    pub sql_expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_level: Option<i32>,
}

impl SqlFilter {
    pub fn new(expression: impl Into<String>) -> Self {
        SqlFilter {
            sql_expression: expression.into(),
            compatibility_level: Some(SQL_COMPATIBILITY_LEVEL),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrelationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlRuleAction {
    pub sql_expression: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_level: Option<i32>,
}

impl SqlRuleAction {
    pub fn new(expression: impl Into<String>) -> Self {
        SqlRuleAction {
            sql_expression: expression.into(),
            compatibility_level: Some(SQL_COMPATIBILITY_LEVEL),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SbRule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<RuleProperties>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleProperties {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<FilterType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sql_filter: Option<SqlFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_filter: Option<CorrelationFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<SqlRuleAction>,
}

impl RuleProperties {
    /// A rule that matches every message, as the service defaults a rule
    /// created with no explicit filter.
    pub fn match_all() -> Self {
        RuleProperties {
            filter_type: Some(FilterType::SqlFilter),
            sql_filter: Some(SqlFilter::new(MATCH_ALL_EXPRESSION)),
            correlation_filter: None,
            action: None,
        }
    }

    pub fn with_sql_filter(expression: impl Into<String>) -> Self {
        RuleProperties {
            filter_type: Some(FilterType::SqlFilter),
            sql_filter: Some(SqlFilter::new(expression)),
            correlation_filter: None,
            action: None,
        }
    }

    pub fn with_correlation_filter(correlation_id: impl Into<String>) -> Self {
        RuleProperties {
            filter_type: Some(FilterType::CorrelationFilter),
            sql_filter: None,
            correlation_filter: Some(CorrelationFilter {
                correlation_id: Some(correlation_id.into()),
                ..Default::default()
            }),
            action: None,
        }
    }

    pub fn and_action(mut self, expression: impl Into<String>) -> Self {
        self.action = Some(SqlRuleAction::new(expression));
        self
    }

    /// True when the filter matches every message.
    pub fn is_match_all(&self) -> bool {
        self.filter_type == Some(FilterType::SqlFilter)
            && self
                .sql_filter
                .as_ref()
                .is_some_and(|f| f.sql_expression == MATCH_ALL_EXPRESSION)
    }
}
