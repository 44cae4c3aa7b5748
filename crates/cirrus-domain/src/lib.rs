pub mod bus;
pub mod error;
pub mod types;

#[cfg(test)]
mod tests;

pub use bus::{
    CorrelationFilter, FilterType, RuleProperties, SbRule, SbSubscription, SbTopic, SqlFilter,
    SqlRuleAction, SubscriptionProperties, TopicProperties,
};
pub use error::DomainError;
pub use types::*;
