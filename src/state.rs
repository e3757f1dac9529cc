use crate::config::{ConfigError, ProxyConfig};
use crate::forecast::ForecastFetcher;
use crate::rate_limit::RateLimiter;
use crate::zones::ZoneValidator;

// app's shared state
pub struct AppState {
    pub config: ProxyConfig,
    pub zones: ZoneValidator,
    pub rate_limiter: RateLimiter,
    pub fetcher: ForecastFetcher,
}

impl AppState {
    pub fn new(config: ProxyConfig) -> Result<Self, ConfigError> {
        let rate_limiter = RateLimiter::new(config.rate_limit);
        Self::with_rate_limiter(config, rate_limiter)
    }

    // Swap in a limiter with its own store or clock
    pub fn with_rate_limiter(
        config: ProxyConfig,
        rate_limiter: RateLimiter,
    ) -> Result<Self, ConfigError> {
        let fetcher = ForecastFetcher::new(
            config.upstream_base.clone(),
            &config.user_agent,
            config.upstream_timeout,
        )?;

        Ok(Self {
            zones: ZoneValidator::new(&config.zones),
            rate_limiter,
            fetcher,
            config,
        })
    }
}
