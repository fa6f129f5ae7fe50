use std::sync::Arc;

use brand_monitor::cli::{parse_dashboard, Command, DASHBOARD_USAGE};
use brand_monitor::dashboard::serve;
use brand_monitor::sentiment::{CachedClassifier, HostedClassifier};
use eyre::Result;

#[actix_web::main]
async fn main() -> Result<()> {
    brand_monitor::init_logging();

    let options = match parse_dashboard(std::env::args().skip(1))? {
        Command::Run(options) => options,
        Command::Help => {
            eprintln!("{DASHBOARD_USAGE}");
            return Ok(());
        }
    };

    let classifier = CachedClassifier::new(HostedClassifier::from_env()?);
    serve(options, Arc::new(classifier)).await
}
