use anyhow::{Context, Result};
use himalayan_trails::{
    CatalogBrowser, CategoryPage, GatewayConfig, PackagePage, Page, PostgrestGateway, Route,
    TracingNotifier,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "himalayan_trails=info,trails=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = GatewayConfig::from_env().context("loading gateway configuration")?;
    let gateway = PostgrestGateway::new(&config).context("building gateway client")?;
    let browser = CatalogBrowser::new(
        Arc::new(gateway),
        Arc::new(TracingNotifier),
        config.tables.clone(),
    );

    let path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    let mut route = Route::parse(&path);
    tracing::info!(%route, "loading page");

    // Follow at most one redirect, the way the site navigates away from a missing record.
    let mut page = browser.open(&route).await;
    let redirect = match &page {
        Page::Category(CategoryPage::Redirect(target))
        | Page::Package(PackagePage::Redirect(target))
        | Page::Booking(PackagePage::Redirect(target)) => Some(target.clone()),
        _ => None,
    };
    if let Some(target) = redirect {
        route = target;
        tracing::info!(%route, "redirected");
        page = browser.open(&route).await;
    }

    let width = config.image_proxy.default_width;
    match page {
        Page::Home(home) => {
            for category in &home.categories {
                println!("{} {} ({})", category.icon.symbol(), category.name, route_for(&category.slug));
                for destination in home.destinations_by_category(&category.id) {
                    println!("    {} - {}", destination.name, destination.location);
                }
            }
            println!("Featured packages:");
            for package in &home.featured_packages {
                println!(
                    "    {} | {} days | ₹{} | {}",
                    package.name,
                    package.duration_days,
                    package.price,
                    package.images.first_url(&config.image_proxy, width)
                );
            }
        }
        Page::Category(CategoryPage::Loaded { category, destinations }) => {
            println!("{} {}", category.icon.symbol(), category.name);
            for destination in destinations {
                println!(
                    "    {}{} | rating {} | {}",
                    if destination.is_featured { "* " } else { "" },
                    destination.name,
                    destination.rating,
                    destination.images.first_url(&config.image_proxy, width)
                );
            }
        }
        Page::Packages(listing) => {
            if let Some(message) = listing.error {
                println!("{}", message);
            }
            for package in listing.packages {
                println!("    {} | {} days | ₹{}", package.name, package.duration_days, package.price);
            }
        }
        Page::Package(PackagePage::Loaded(package)) | Page::Booking(PackagePage::Loaded(package)) => {
            println!("{} ({} days, ₹{} per person)", package.name, package.duration_days, package.price);
            println!("Includes: {}", package.inclusions.join(", "));
            println!("Excludes: {}", package.exclusions.join(", "));
        }
        Page::NotFound => println!("404: {} was not found", path),
        Page::Category(_) | Page::Package(_) | Page::Booking(_) => {
            println!("Nothing to show for {}", route);
        }
    }

    Ok(())
}

fn route_for(slug: &str) -> Route {
    Route::Category {
        slug: slug.to_string(),
    }
}
