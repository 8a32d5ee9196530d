use std::time::Duration;

use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::producer::FutureProducer;
use rdkafka::producer::FutureRecord;
use rdkafka::util::Timeout;
use serde::Serialize;
use thiserror::Error;

use crate::authentication::errors::EventPublisherError;
use crate::authentication::events::AuthEvent;
use crate::authentication::ports::EventPublisher;
use crate::config::Config;
use crate::outbound::events::messages::AuthEventMessage;

#[derive(Debug, Error)]
pub enum KafkaProducerError {
    #[error("Failed to send message to Kafka: {0}")]
    SendError(String),

    #[error("Failed to serialize message: {0}")]
    SerializationError(String),
}

impl From<KafkaProducerError> for EventPublisherError {
    fn from(err: KafkaProducerError) -> Self {
        match err {
            KafkaProducerError::SerializationError(msg) => {
                EventPublisherError::SerializationFailed(msg)
            }
            KafkaProducerError::SendError(msg) => EventPublisherError::PublishFailed(msg),
        }
    }
}

/// Publishes authentication events to a Kafka topic, keyed by user ID.
pub struct KafkaEventProducer {
    producer: FutureProducer,
    topic: String,
    timeout: Duration,
}

impl KafkaEventProducer {
    /// Create a new Kafka event producer.
    ///
    /// Notifications are best-effort: the broker acknowledgement is awaited for at
    /// most `events.publish_timeout_ms` and no idempotence is requested.
    pub fn new(config: &Config) -> Result<Self, anyhow::Error> {
        tracing::info!(
            "Initializing Kafka producer for auth events: brokers={}, topic={}",
            &config.kafka.brokers,
            &config.kafka.topic
        );

        let timeout_ms = config.events.publish_timeout_ms.to_string();
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &config.kafka.brokers)
            .set("message.timeout.ms", &timeout_ms)
            .set("queue.buffering.max.messages", "10000")
            .set("compression.type", "gzip")
            .set("acks", "1")
            .set("retries", "3")
            .set("retry.backoff.ms", "100")
            .create()?;

        tracing::info!("Kafka producer initialized successfully");

        Ok(Self {
            producer,
            topic: config.kafka.topic.to_string(),
            timeout: Duration::from_millis(config.events.publish_timeout_ms),
        })
    }

    async fn send<T: Serialize>(&self, key: &str, message: &T) -> Result<(), KafkaProducerError> {
        let payload = serde_json::to_string(message)
            .map_err(|e| KafkaProducerError::SerializationError(e.to_string()))?;

        let record = FutureRecord::to(&self.topic).key(key).payload(&payload);

        self.producer
            .send(record, Timeout::After(self.timeout))
            .await
            .map(|_| ())
            .map_err(|(err, _)| KafkaProducerError::SendError(err.to_string()))
    }
}

#[async_trait]
impl EventPublisher for KafkaEventProducer {
    async fn publish(&self, event: &AuthEvent) -> Result<(), EventPublisherError> {
        let message = AuthEventMessage::from(event);

        tracing::debug!(
            topic = %self.topic,
            event_type = event.event_type(),
            user_id = event.user_id(),
            "Publishing auth event"
        );

        self.send(event.user_id(), &message).await.map_err(Into::into)
    }
}
