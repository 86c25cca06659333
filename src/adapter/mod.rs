//! Implementations of ports (hexagonal adapters).
//!
//! - [`FeedSource`] - [`OddsSource`](crate::port::OddsSource) over a JSON promotions feed
//! - [`WebhookChannel`] - [`AlertChannel`](crate::port::AlertChannel) doing one HTTP POST per alert
//! - [`StreamChannel`] - [`AlertChannel`](crate::port::AlertChannel) over a self-healing WebSocket

mod feed;
mod stream;
mod webhook;

pub use feed::FeedSource;
pub use stream::StreamChannel;
pub use webhook::WebhookChannel;
