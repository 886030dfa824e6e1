/// One year.
pub const MAX_SESSION_TTL_HOURS: i64 = 8760;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid PORT: {}", e))?;
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;
        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "20".into())
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid DATABASE_MAX_CONNECTIONS: {}", e))?;
        let session_secret = std::env::var("SESSION_SECRET")
            .map_err(|_| anyhow::anyhow!("SESSION_SECRET must be set"))?;
        let session_ttl_hours = parse_ttl_hours(
            &std::env::var("SESSION_TTL_HOURS").unwrap_or_else(|_| "24".into()),
        )?;
        let cookie_secure = parse_flag(
            &std::env::var("COOKIE_SECURE").unwrap_or_else(|_| "false".into()),
        )
        .ok_or_else(|| anyhow::anyhow!("invalid COOKIE_SECURE"))?;
        let cors_origins =
            parse_origins(&std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".into()));

        Ok(Self {
            host,
            port,
            database_url,
            database_max_connections,
            session_secret,
            session_ttl_hours,
            cookie_secure,
            cors_origins,
        })
    }
}

fn parse_ttl_hours(raw: &str) -> anyhow::Result<i64> {
    let hours: i64 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid SESSION_TTL_HOURS: {}", e))?;
    if !(1..=MAX_SESSION_TTL_HOURS).contains(&hours) {
        anyhow::bail!("SESSION_TTL_HOURS must be between 1 and {MAX_SESSION_TTL_HOURS}");
    }
    Ok(hours)
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn session_ttl_is_bounded() {
        assert_eq!(parse_ttl_hours("24").unwrap(), 24);
        assert_eq!(parse_ttl_hours("8760").unwrap(), MAX_SESSION_TTL_HOURS);
        assert!(parse_ttl_hours("0").is_err());
        assert!(parse_ttl_hours("-3").is_err());
        assert!(parse_ttl_hours("8761").is_err());
        assert!(parse_ttl_hours("3000000000").is_err());
        assert!(parse_ttl_hours("a day").is_err());
    }

    #[test]
    fn flags() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
