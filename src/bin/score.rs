use brand_monitor::cli::{parse_score, Command, SCORE_USAGE};
use brand_monitor::config::DataPaths;
use brand_monitor::sentiment::{score_file, HostedClassifier};
use eyre::Result;

/// Scores `reviews.json` once so the dashboard can skip the model.
#[tokio::main]
async fn main() -> Result<()> {
    brand_monitor::init_logging();

    let args = match parse_score(std::env::args().skip(1))? {
        Command::Run(args) => args,
        Command::Help => {
            eprintln!("{SCORE_USAGE}");
            return Ok(());
        }
    };

    let paths = DataPaths::new(args.data_dir);
    let classifier = HostedClassifier::from_env()?;
    match score_file(&paths, &classifier).await? {
        0 => println!("No reviews to analyze."),
        saved => println!(
            "Saved {saved} reviews to {}",
            paths.reviews_scored().display()
        ),
    }
    Ok(())
}
