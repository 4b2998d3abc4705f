use clap::Args;
use serde_json::json;

use crate::chat::{ChatPolicy, Role};
use crate::cli::OutputFormat;
use crate::config;

#[derive(Args)]
pub struct DetectArgs {
    #[arg(help = "Message to route")]
    pub message: String,

    #[arg(long, default_value = "guest", help = "Role to authorize for")]
    pub role: String,
}

pub fn handle(args: DetectArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let policy = ChatPolicy::load(config::config().chat.policy_path.as_deref())?;
    let role: Role = args.role.parse()?;

    let detected = policy.detector.detect(&args.message);
    let authorized = policy.access.authorize(role, &detected);

    match output_format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "role": role,
                "detected": detected,
                "authorized": authorized,
            }))?
        ),
        OutputFormat::Text => {
            let names = |set: &std::collections::BTreeSet<crate::chat::Table>| {
                set.iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
            };
            println!("role:       {}", role);
            println!("detected:   {}", names(&detected));
            println!("authorized: {}", names(&authorized));
        }
    }
    Ok(())
}
