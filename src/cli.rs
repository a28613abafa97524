use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "lifedrop-api")]
#[command(about = "LifeDrop blood donation API server")]
#[command(version)]
pub struct Args {
    #[arg(long, help = "Port to listen on (overrides configuration)")]
    pub port: Option<u16>,

    #[arg(long, help = "Keep documents in process memory instead of Postgres")]
    pub in_memory: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = Args::parse_from(["lifedrop-api", "--port", "8080", "--in-memory"]);
        assert_eq!(args.port, Some(8080));
        assert!(args.in_memory);
    }
}
