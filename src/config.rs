use clap::Parser;

// CLI argument structure, every option can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "intentia-gateway")]
#[command(about = "Rate limited security event ingestion for Intentia")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    // Rate limit max events per window and client
    #[arg(long, env = "RATE_LIMIT", default_value_t = 5)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, env = "RATE_WINDOW", default_value_t = 60)]
    pub rate_window: u64,

    // How often expired counters are evicted, in seconds (0 disables)
    #[arg(long, env = "SWEEP_INTERVAL", default_value_t = 300)]
    pub sweep_interval: u64,

    // How long a closed window is kept before eviction, in seconds
    #[arg(long, env = "SWEEP_GRACE", default_value_t = 60)]
    pub sweep_grace: u64,

    // Origins allowed to call the API (comma-separated)
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        default_value = "https://intentia.co,https://www.intentia.co,http://localhost:5173"
    )]
    pub allowed_origins: String,

    // Supabase project url
    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: Option<String>,

    // Supabase service role key
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub supabase_key: Option<String>,

    // Table security events are inserted into
    #[arg(long, env = "SECURITY_LOG_TABLE", default_value = "security_logs")]
    pub table: String,

    // Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    pub log_json: bool,
}

impl Args {
    // Both url and key are required to talk to the store
    pub fn supabase_credentials(&self) -> Option<(&str, &str)> {
        match (self.supabase_url.as_deref(), self.supabase_key.as_deref()) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Some((url, key))
            }
            _ => None,
        }
    }
}
