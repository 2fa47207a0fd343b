//! Config command implementation

use crate::config::Config;
use crate::io::redact_url;
use clap::Args;

#[derive(Args, Debug, Default)]
pub struct ConfigArgs {}

impl ConfigArgs {
    pub fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let settings = config.settings()?;

        println!("Current configuration:");
        println!("  Item: {}", settings.url);
        println!(
            "  Alert: baseline {} / threshold {}%",
            settings.baseline, settings.threshold
        );
        println!("  Interval: {}s", settings.interval.as_secs());
        println!(
            "  Source: {:?} renderer, selector {:?}, timeout {}s",
            config.source.renderer, config.source.selector, config.source.timeout_secs
        );
        println!("  History: {}", config.history.path.display());
        println!("  Webhook: {}", mask_webhook(&settings.webhook));
        Ok(())
    }
}

fn mask_webhook(url: &reqwest::Url) -> String {
    redact_url(url.as_str())
}
