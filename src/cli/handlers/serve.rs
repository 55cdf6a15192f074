//! Serve command handler
//!
//! Either validates configuration and exits (`--dry-run`) or runs the server.

use crate::config::settings::Settings;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.validate_only()?;
            return Ok(());
        }

        Server::new(self.config).run().await
    }

    /// Checks the configuration without opening any connection.
    pub fn validate_only(&self) -> anyhow::Result<()> {
        self.config.validate()?;

        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());
        println!(
            "✓ Database pool: {}-{} connections, auto-migrate {}",
            self.config.database.min_connections,
            self.config.database.max_connections,
            if self.config.database.auto_migrate { "on" } else { "off" }
        );
        println!("✓ Log level: {}", self.config.logger.level);
        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
