use brand_monitor::cli::{parse_scrape, Command, SCRAPE_USAGE};
use brand_monitor::config::{DataPaths, Site};
use brand_monitor::scrape::{scrape_products, scrape_reviews, scrape_testimonials};
use brand_monitor::store::save_json;
use eyre::Result;
use log::info;

#[tokio::main]
async fn main() -> Result<()> {
    brand_monitor::init_logging();

    let args = match parse_scrape(std::env::args().skip(1))? {
        Command::Run(args) => args,
        Command::Help => {
            eprintln!("{SCRAPE_USAGE}");
            return Ok(());
        }
    };

    let site = Site::from_env()?;
    let paths = DataPaths::new(args.out_dir);
    let client = brand_monitor::build_client()?;
    info!("scraping {} into {}", site.base, paths.dir().display());

    let products = scrape_products(&client, &site, args.max_pages).await?;
    save_json(&paths.products(), &products)?;
    println!("Products scraped: {}", products.len());

    let reviews = scrape_reviews(&client, &site, args.max_pages).await?;
    save_json(&paths.reviews(), &reviews)?;
    println!("Reviews scraped: {}", reviews.len());

    let testimonials = scrape_testimonials(&client, &site, args.max_pages).await?;
    save_json(&paths.testimonials(), &testimonials)?;
    println!("Testimonials scraped: {}", testimonials.len());

    Ok(())
}
