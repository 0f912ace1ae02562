//! Runtime configuration.
//!
//! | Variable | Default |
//! |----------|---------|
//! | RAZORPAY_KEY_ID | test_key_id |
//! | RAZORPAY_KEY_SECRET | test_key_secret |
//! | PAYMENT_CURRENCY | INR |
//! | FCM_SERVER_KEY | unset (push disabled) |
//! | LOW_STOCK_THRESHOLD | 5 |
//! | PAYMENT_TIMEOUT_MS | 5000 |
//! | PUSH_TIMEOUT_MS | 5000 |
//! | ACTOR_BUFFER_SIZE | 100 |
//! | NOTIFICATION_QUEUE_SIZE | 256 |
//! | LIVE_FEED_CAPACITY | 256 |

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Clone)]
pub struct Config {
    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub payment_currency: String,
    pub fcm_server_key: Option<String>,
    /// Stock strictly below this raises a vendor low-stock warning.
    pub low_stock_threshold: u32,
    pub payment_timeout_ms: u64,
    pub push_timeout_ms: u64,
    pub actor_buffer_size: usize,
    pub notification_queue_size: usize,
    pub live_feed_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            razorpay_key_id: "test_key_id".into(),
            razorpay_key_secret: "test_key_secret".into(),
            payment_currency: "INR".into(),
            fcm_server_key: None,
            low_stock_threshold: 5,
            payment_timeout_ms: 5000,
            push_timeout_ms: 5000,
            actor_buffer_size: 100,
            notification_queue_size: 256,
            live_feed_capacity: 256,
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the environment. Unset or
    /// unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Self {
            razorpay_key_id: std::env::var("RAZORPAY_KEY_ID").unwrap_or(defaults.razorpay_key_id),
            razorpay_key_secret: std::env::var("RAZORPAY_KEY_SECRET").unwrap_or(defaults.razorpay_key_secret),
            payment_currency: std::env::var("PAYMENT_CURRENCY").unwrap_or(defaults.payment_currency),
            fcm_server_key: std::env::var("FCM_SERVER_KEY").ok().filter(|key| !key.trim().is_empty()),
            low_stock_threshold: parse_env("LOW_STOCK_THRESHOLD", defaults.low_stock_threshold),
            payment_timeout_ms: parse_env("PAYMENT_TIMEOUT_MS", defaults.payment_timeout_ms),
            push_timeout_ms: parse_env("PUSH_TIMEOUT_MS", defaults.push_timeout_ms),
            actor_buffer_size: parse_env("ACTOR_BUFFER_SIZE", defaults.actor_buffer_size),
            notification_queue_size: parse_env("NOTIFICATION_QUEUE_SIZE", defaults.notification_queue_size),
            live_feed_capacity: parse_env("LIVE_FEED_CAPACITY", defaults.live_feed_capacity),
        }
    }

    pub fn payment_timeout(&self) -> Duration {
        Duration::from_millis(self.payment_timeout_ms)
    }

    pub fn push_timeout(&self) -> Duration {
        Duration::from_millis(self.push_timeout_ms)
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

// Keeps secrets out of logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("razorpay_key_id", &self.razorpay_key_id)
            .field("razorpay_key_secret", &"***")
            .field("payment_currency", &self.payment_currency)
            .field("fcm_server_key", &self.fcm_server_key.as_ref().map(|_| "***"))
            .field("low_stock_threshold", &self.low_stock_threshold)
            .field("payment_timeout_ms", &self.payment_timeout_ms)
            .field("push_timeout_ms", &self.push_timeout_ms)
            .field("actor_buffer_size", &self.actor_buffer_size)
            .field("notification_queue_size", &self.notification_queue_size)
            .field("live_feed_capacity", &self.live_feed_capacity)
            .finish()
    }
}
