use std::time::Duration;

use clap::Parser;

use crate::functions::{FootballConfig, SubscriptionConfig};

#[derive(Parser, Debug)]
#[command(version, about = "World Cup 2026 PWA backend functions")]
pub struct Cli {
    #[arg(long, env = "BIND", default_value = "127.0.0.1")]
    pub bind: String,

    #[arg(long, env = "PORT", default_value_t = 8888)]
    pub port: u16,

    #[arg(long, env = "FOOTBALL_API_KEY", hide_env_values = true)]
    pub football_api_key: Option<String>,

    #[arg(long, env = "FOOTBALL_BASE_URL", default_value = "https://api.football-data.org/v4")]
    pub football_base_url: String,

    /// Competition code on football-data.org
    #[arg(long, env = "FOOTBALL_COMPETITION", default_value = "WC")]
    pub competition: String,

    /// How long fetched match data is served from memory
    #[arg(long, env = "MATCH_CACHE_TTL_SECONDS", default_value_t = 1800)]
    pub cache_ttl_seconds: u32,

    #[arg(long, env = "BEEHIIV_API_KEY", hide_env_values = true)]
    pub beehiiv_api_key: Option<String>,

    #[arg(long, env = "BEEHIIV_PUB_ID")]
    pub beehiiv_pub_id: Option<String>,

    #[arg(long, env = "BEEHIIV_BASE_URL", default_value = "https://api.beehiiv.com")]
    pub beehiiv_base_url: String,

    /// Upper bound for any single upstream call
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECONDS", default_value_t = 10)]
    pub upstream_timeout_seconds: u64,
}

impl Cli {
    pub fn football(&self) -> FootballConfig {
        FootballConfig {
            api_key: self.football_api_key.clone().filter(|key| !key.is_empty()),
            base_url: self.football_base_url.clone(),
            competition: self.competition.clone(),
        }
    }

    pub fn subscription(&self) -> SubscriptionConfig {
        SubscriptionConfig {
            api_key: self.beehiiv_api_key.clone(),
            publication_id: self.beehiiv_pub_id.clone(),
            base_url: self.beehiiv_base_url.clone(),
        }
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::from(self.cache_ttl_seconds))
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }
}
