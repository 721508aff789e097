use clap::Parser;

/// Server command-line flags; each one overrides its environment setting
#[derive(Debug, Parser)]
#[command(name = "guardpost-api")]
#[command(about = "Guardpost API - records service for security staffing")]
#[command(version)]
pub struct Args {
    #[arg(long, help = "Port to listen on (overrides PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Address to bind (overrides HOST)")]
    pub host: Option<String>,

    #[arg(long, help = "PostgreSQL connection string (overrides DATABASE_URL)")]
    pub database_url: Option<String>,

    #[arg(long, help = "Keep records in process memory instead of PostgreSQL")]
    pub memory: bool,
}
