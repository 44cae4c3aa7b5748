//! Service-bus management plane: topics, subscriptions, and rules inside one
//! namespace.

use cirrus_client::{ArmConnection, ClientError, Page, Response};
use cirrus_domain::{
    RuleProperties, SbRule, SbSubscription, SbTopic, SubscriptionId, SubscriptionProperties,
    TopicProperties,
};
use tracing::info;

const API_VERSION: &str = "2021-11-01";
const PROVIDER: &str = "Microsoft.ServiceBus";

/// `$skip` / `$top` options for list calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    pub skip: Option<u32>,
    pub top: Option<u32>,
}

impl ListOptions {
    pub fn skip(n: u32) -> Self {
        Self { skip: Some(n), top: None }
    }

    pub fn top(n: u32) -> Self {
        Self { skip: None, top: Some(n) }
    }

    pub fn skip_and_top(skip: u32, top: u32) -> Self {
        Self { skip: Some(skip), top: Some(top) }
    }

    fn query(&self) -> String {
        let mut q = String::new();
        if let Some(skip) = self.skip {
            q.push_str(&format!("&$skip={}", skip));
        }
        if let Some(top) = self.top {
            q.push_str(&format!("&$top={}", top));
        }
        q
    }
}

/// Client for one service-bus namespace.
pub struct ServiceBusClient<'a> {
    conn: &'a ArmConnection,
    subscription_id: SubscriptionId,
    resource_group: String,
    namespace: String,
}

impl<'a> ServiceBusClient<'a> {
    pub fn new(
        conn: &'a ArmConnection,
        subscription_id: SubscriptionId,
        resource_group: impl Into<String>,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            conn,
            subscription_id,
            resource_group: resource_group.into(),
            namespace: namespace.into(),
        }
    }

    fn namespace_path(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/{}/namespaces/{}",
            self.subscription_id, self.resource_group, PROVIDER, self.namespace,
        )
    }

    fn topic_url(&self, topic: &str) -> String {
        self.conn.url(&format!(
            "{}/topics/{}?api-version={}",
            self.namespace_path(),
            topic,
            API_VERSION,
        ))
    }

    fn subscription_url(&self, topic: &str, name: &str) -> String {
        self.conn.url(&format!(
            "{}/topics/{}/subscriptions/{}?api-version={}",
            self.namespace_path(),
            topic,
            name,
            API_VERSION,
        ))
    }

    fn rule_url(&self, topic: &str, subscription: &str, name: &str) -> String {
        self.conn.url(&format!(
            "{}/topics/{}/subscriptions/{}/rules/{}?api-version={}",
            self.namespace_path(),
            topic,
            subscription,
            name,
            API_VERSION,
        ))
    }

    // ── Topics ────────────────────────────────────────────────────────────────

    pub async fn create_topic(
        &self,
        topic: &str,
        properties: &TopicProperties,
    ) -> Result<Response<SbTopic>, ClientError> {
        info!(namespace = %self.namespace, topic, "creating topic");
        let body = SbTopic {
            properties: Some(properties.clone()),
            ..Default::default()
        };
        self.conn.put(&self.topic_url(topic), &body).await
    }

    pub async fn get_topic(&self, topic: &str) -> Result<Response<SbTopic>, ClientError> {
        self.conn.get(&self.topic_url(topic)).await
    }

    /// Deleting a topic removes its subscriptions and their rules with it.
    pub async fn delete_topic(&self, topic: &str) -> Result<Response<()>, ClientError> {
        info!(namespace = %self.namespace, topic, "deleting topic");
        self.conn.delete(&self.topic_url(topic)).await
    }

    pub async fn list_topics(
        &self,
        options: &ListOptions,
    ) -> Result<Response<Page<SbTopic>>, ClientError> {
        let url = self.conn.url(&format!(
            "{}/topics?api-version={}{}",
            self.namespace_path(),
            API_VERSION,
            options.query(),
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_topics_next(&self, token: &str) -> Result<Response<Page<SbTopic>>, ClientError> {
        self.conn.get_page(token).await
    }

    // ── Subscriptions ─────────────────────────────────────────────────────────

    pub async fn create_subscription(
        &self,
        topic: &str,
        name: &str,
        properties: &SubscriptionProperties,
    ) -> Result<Response<SbSubscription>, ClientError> {
        info!(namespace = %self.namespace, topic, name, "creating subscription");
        let body = SbSubscription {
            properties: Some(properties.clone()),
            ..Default::default()
        };
        self.conn.put(&self.subscription_url(topic, name), &body).await
    }

    pub async fn get_subscription(
        &self,
        topic: &str,
        name: &str,
    ) -> Result<Response<SbSubscription>, ClientError> {
        self.conn.get(&self.subscription_url(topic, name)).await
    }

    pub async fn delete_subscription(
        &self,
        topic: &str,
        name: &str,
    ) -> Result<Response<()>, ClientError> {
        self.conn.delete(&self.subscription_url(topic, name)).await
    }

    pub async fn list_subscriptions(
        &self,
        topic: &str,
        options: &ListOptions,
    ) -> Result<Response<Page<SbSubscription>>, ClientError> {
        let url = self.conn.url(&format!(
            "{}/topics/{}/subscriptions?api-version={}{}",
            self.namespace_path(),
            topic,
            API_VERSION,
            options.query(),
        ));
        self.conn.get_page(&url).await
    }

    // ── Rules ─────────────────────────────────────────────────────────────────

    pub async fn create_rule(
        &self,
        topic: &str,
        subscription: &str,
        name: &str,
        properties: &RuleProperties,
    ) -> Result<Response<SbRule>, ClientError> {
        info!(namespace = %self.namespace, topic, subscription, name, "creating rule");
        let body = SbRule {
            properties: Some(properties.clone()),
            ..Default::default()
        };
        self.conn.put(&self.rule_url(topic, subscription, name), &body).await
    }

    pub async fn get_rule(
        &self,
        topic: &str,
        subscription: &str,
        name: &str,
    ) -> Result<Response<SbRule>, ClientError> {
        self.conn.get(&self.rule_url(topic, subscription, name)).await
    }

    pub async fn delete_rule(
        &self,
        topic: &str,
        subscription: &str,
        name: &str,
    ) -> Result<Response<()>, ClientError> {
        self.conn.delete(&self.rule_url(topic, subscription, name)).await
    }

    pub async fn list_rules(
        &self,
        topic: &str,
        subscription: &str,
        options: &ListOptions,
    ) -> Result<Response<Page<SbRule>>, ClientError> {
        let url = self.conn.url(&format!(
            "{}/topics/{}/subscriptions/{}/rules?api-version={}{}",
            self.namespace_path(),
            topic,
            subscription,
            API_VERSION,
            options.query(),
        ));
        self.conn.get_page(&url).await
    }

    pub async fn list_rules_next(&self, token: &str) -> Result<Response<Page<SbRule>>, ClientError> {
        self.conn.get_page(token).await
    }
}
