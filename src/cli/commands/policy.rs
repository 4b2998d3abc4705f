use clap::Args;

use crate::chat::ChatPolicy;
use crate::cli::OutputFormat;
use crate::config;

#[derive(Args)]
pub struct PolicyArgs {
    #[arg(long, help = "Policy file to validate instead of CHAT_POLICY_PATH")]
    pub file: Option<String>,
}

pub fn handle(args: PolicyArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let path = args.file.or_else(|| config::config().chat.policy_path.clone());
    let policy = ChatPolicy::load(path.as_deref())?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&policy.to_file())?),
        OutputFormat::Text => print!("{}", policy.to_yaml()?),
    }
    Ok(())
}
