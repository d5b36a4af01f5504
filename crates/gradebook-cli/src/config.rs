//! Command-line configuration.

use std::net::SocketAddr;

use clap::Parser;
use gradebook_server::service::ServiceConfig;

/// Gradebook school-records API server.
#[derive(Debug, Parser)]
#[command(name = "gradebook", version, about)]
pub struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "SERVER_ADDRESS", default_value = "0.0.0.0:4000")]
    pub address: SocketAddr,

    /// Skip running pending database migrations at startup.
    #[arg(long, env = "SKIP_MIGRATIONS", default_value_t = false)]
    pub skip_migrations: bool,

    /// Service configuration (database, session keys).
    #[command(flatten)]
    pub service: ServiceConfig,
}

#[cfg(test)]
mod test {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
