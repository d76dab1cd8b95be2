//! Console email provider for development.

use crate::error::Result;
use crate::providers::EmailProvider;
use tracing::info;

/// Console email provider.
///
/// Logs verification emails instead of sending them. Useful for local
/// development where no email gateway is wired up. Never use this in
/// production: it prints the code.
#[derive(Clone, Debug, Default)]
pub struct ConsoleEmailProvider;

impl ConsoleEmailProvider {
    /// Create a new console email provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl EmailProvider for ConsoleEmailProvider {
    async fn send_verification_code(&self, to: &str, code: &str, valid_minutes: i64) -> Result<()> {
        info!(to = %to, "📧 Verification Code Email (Development Mode)");
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║               VERIFICATION CODE EMAIL                        ║");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║ To: {to:<57}║");
        println!("║ Subject: Confirm your email address{:<27}║", "");
        println!("╠══════════════════════════════════════════════════════════════╣");
        println!("║                                                              ║");
        println!("║ Your verification code is:                                   ║");
        println!("║     {code:<57}║");
        println!("║                                                              ║");
        println!("║ It expires in {valid_minutes} minutes.{:<38}║", "");
        println!("║                                                              ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");

        Ok(())
    }
}
