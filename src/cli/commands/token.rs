use clap::Args;
use serde_json::json;

use crate::auth::{Claims, JwtKeys};
use crate::chat::{Principal, Role};
use crate::cli::OutputFormat;
use crate::config;

#[derive(Args)]
pub struct TokenArgs {
    #[arg(long, help = "Role claim: admin, student or guest")]
    pub role: String,

    #[arg(long, help = "Student code claim")]
    pub student_code: Option<String>,

    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = config::config();
    let role: Role = args.role.parse()?;
    if role == Role::Unknown {
        anyhow::bail!("unknown role '{}'", args.role);
    }

    let principal = Principal::new(role, args.student_code);
    let hours = args.hours.unwrap_or(config.security.jwt_expiry_hours);
    let token = JwtKeys::new(&config.security.jwt_secret).generate(&Claims::new(&principal, hours))?;

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({ "token": token, "principal": principal, "hours": hours }))?
        ),
        OutputFormat::Text => println!("{}", token),
    }
    Ok(())
}
