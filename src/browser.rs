// Category/Destination/Package Browser
// Read-only lists, fetched from scratch on every page load. Nothing is cached.

use crate::catalog::{Category, Destination, Package};
use crate::config::TableNames;
use crate::gateway::{maybe_single_as, select_as, DataGateway, GatewayError, Query};
use crate::notify::{Notification, Notifier};
use crate::routes::Route;
use std::sync::Arc;
use tracing::{debug, error};

pub const PACKAGES_UNAVAILABLE: &str = "Failed to load packages. Please try again later.";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HomeCatalog {
    pub categories: Vec<Category>,
    pub destinations: Vec<Destination>,
    pub featured_packages: Vec<Package>,
}

impl HomeCatalog {
    pub fn destinations_by_category(&self, category_id: &str) -> Vec<&Destination> {
        self.destinations
            .iter()
            .filter(|d| d.category_id.as_deref() == Some(category_id))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CategoryPage {
    Loaded {
        category: Category,
        destinations: Vec<Destination>,
    },
    /// Unknown slug: the caller navigates to the route instead of rendering.
    Redirect(Route),
    /// The lookup itself failed; nothing to render.
    Unavailable,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageListing {
    pub packages: Vec<Package>,
    /// Inline message shown above the (empty) listing.
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PackagePage {
    Loaded(Package),
    Redirect(Route),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Page {
    Home(HomeCatalog),
    Category(CategoryPage),
    Packages(PackageListing),
    Package(PackagePage),
    Booking(PackagePage),
    NotFound,
}

pub struct CatalogBrowser {
    gateway: Arc<dyn DataGateway>,
    notifier: Arc<dyn Notifier>,
    tables: TableNames,
}

impl CatalogBrowser {
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        notifier: Arc<dyn Notifier>,
        tables: TableNames,
    ) -> Self {
        Self {
            gateway,
            notifier,
            tables,
        }
    }

    /// Loads whatever the route's page needs on mount.
    pub async fn open(&self, route: &Route) -> Page {
        debug!(%route, "opening page");
        match route {
            Route::Home => Page::Home(self.load_home().await),
            Route::Category { slug } => Page::Category(self.load_category(slug).await),
            Route::Packages => Page::Packages(self.load_packages().await),
            Route::Package { id } => Page::Package(self.load_package(id).await),
            Route::Booking { id } => Page::Booking(self.load_package(id).await),
            Route::NotFound => Page::NotFound,
        }
    }

    /// Categories, destinations and featured packages, fetched concurrently.
    /// A failed list is logged and left empty; the other lists still load.
    pub async fn load_home(&self) -> HomeCatalog {
        let categories_query = Query::select(&self.tables.categories);
        let destinations_query = Query::select(&self.tables.destinations);
        let packages_query = Query::select(&self.tables.packages).eq("is_featured", true);

        let (categories, destinations, featured_packages) = futures::join!(
            select_as::<Category>(self.gateway.as_ref(), &categories_query),
            select_as::<Destination>(self.gateway.as_ref(), &destinations_query),
            select_as::<Package>(self.gateway.as_ref(), &packages_query),
        );

        HomeCatalog {
            categories: logged_or_empty(&categories_query.table, categories),
            destinations: logged_or_empty(&destinations_query.table, destinations),
            featured_packages: logged_or_empty(&packages_query.table, featured_packages),
        }
    }

    /// Category by slug, then its destinations featured-first and by rating.
    pub async fn load_category(&self, slug: &str) -> CategoryPage {
        let lookup = Query::select(&self.tables.categories).eq("slug", slug);
        let category = match maybe_single_as::<Category>(self.gateway.as_ref(), &lookup).await {
            Ok(Some(category)) => category,
            Ok(None) => {
                self.notifier.notify(Notification::error(
                    "Category not found",
                    "The requested category does not exist.",
                ));
                return CategoryPage::Redirect(Route::Home);
            }
            Err(err) => {
                self.fetch_failed(&lookup.table, &err, "category data");
                return CategoryPage::Unavailable;
            }
        };

        let listing = Query::select(&self.tables.destinations)
            .eq("category_id", category.id.as_str())
            .order("is_featured", false)
            .order("rating", false);
        let destinations = match select_as::<Destination>(self.gateway.as_ref(), &listing).await {
            Ok(destinations) => destinations,
            Err(err) => {
                self.fetch_failed(&listing.table, &err, "category data");
                Vec::new()
            }
        };

        CategoryPage::Loaded {
            category,
            destinations,
        }
    }

    /// Every package, newest first. Failures stay inline on the page.
    pub async fn load_packages(&self) -> PackageListing {
        let query = Query::select(&self.tables.packages).order("created_at", false);
        match select_as::<Package>(self.gateway.as_ref(), &query).await {
            Ok(packages) => PackageListing {
                packages,
                error: None,
            },
            Err(err) => {
                error!(table = %query.table, error = %err, "Error fetching packages");
                PackageListing {
                    packages: Vec::new(),
                    error: Some(PACKAGES_UNAVAILABLE.to_string()),
                }
            }
        }
    }

    pub async fn load_package(&self, id: &str) -> PackagePage {
        let lookup = Query::select(&self.tables.packages).eq("id", id);
        match maybe_single_as::<Package>(self.gateway.as_ref(), &lookup).await {
            Ok(Some(package)) => PackagePage::Loaded(package),
            Ok(None) => {
                self.notifier.notify(Notification::error(
                    "Package not found",
                    "The requested package does not exist.",
                ));
                PackagePage::Redirect(Route::Packages)
            }
            Err(err) => {
                self.fetch_failed(&lookup.table, &err, "package details");
                PackagePage::Redirect(Route::Packages)
            }
        }
    }

    pub fn request_destination_booking(&self, destination: &Destination) {
        self.notifier.notify(Notification::success(
            "Booking Request",
            format!(
                "We'll contact you soon to arrange your visit to {}!",
                destination.name
            ),
        ));
    }

    fn fetch_failed(&self, table: &str, err: &GatewayError, what: &str) {
        error!(table, error = %err, "Error fetching {}", what);
        self.notifier.notify(Notification::error(
            "Error",
            format!("Failed to load {}. Please try again.", what),
        ));
    }
}

fn logged_or_empty<T>(table: &str, result: Result<Vec<T>, GatewayError>) -> Vec<T> {
    result.unwrap_or_else(|err| {
        error!(table, error = %err, "Error fetching data");
        Vec::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryGateway;
    use crate::notify::RecordingNotifier;
    use serde_json::json;
    use std::time::Duration;
    use tokio::time::Instant;

    fn seeded() -> InMemoryGateway {
        InMemoryGateway::new()
            .with_table(
                "categories",
                vec![
                    json!({"id": "c1", "name": "Treks", "slug": "treks", "icon": "mountain"}),
                    json!({"id": "c2", "name": "Stays", "slug": "stays", "icon": "bed"}),
                ],
            )
            .with_table(
                "destinations",
                vec![
                    json!({"id": "d1", "name": "Kedarkantha", "category_id": "c1", "rating": 4.6, "is_featured": false}),
                    json!({"id": "d2", "name": "Har Ki Dun", "category_id": "c1", "rating": 4.2, "is_featured": true}),
                    json!({"id": "d3", "name": "Brahmatal", "category_id": "c1", "rating": 4.9, "is_featured": false}),
                    json!({"id": "d4", "name": "Dhanaulti Homestay", "category_id": "c2", "rating": 4.0}),
                ],
            )
            .with_table(
                "packages",
                vec![
                    json!({"id": "p1", "name": "Valley of Flowers", "price": 12500, "is_featured": true, "created_at": "2025-10-01T00:00:00Z"}),
                    json!({"id": "p2", "name": "Chopta Weekend", "price": 6500, "is_featured": false, "created_at": "2025-10-10T00:00:00Z"}),
                ],
            )
    }

    fn browser(gateway: Arc<InMemoryGateway>, notifier: Arc<RecordingNotifier>) -> CatalogBrowser {
        CatalogBrowser::new(gateway, notifier, TableNames::default())
    }

    #[tokio::test]
    async fn test_home_loads_featured_packages_only() {
        let gateway = Arc::new(seeded());
        let notifier = Arc::new(RecordingNotifier::new());

        let home = browser(gateway.clone(), notifier.clone()).load_home().await;

        assert_eq!(home.categories.len(), 2);
        assert_eq!(home.destinations.len(), 4);
        assert_eq!(home.featured_packages.len(), 1);
        assert_eq!(home.featured_packages[0].id, "p1");
        assert_eq!(home.destinations_by_category("c2").len(), 1);
        assert_eq!(gateway.request_count(), 3);
    }

    #[tokio::test]
    async fn test_home_fetch_failure_is_not_surfaced() {
        let gateway = Arc::new(seeded());
        let notifier = Arc::new(RecordingNotifier::new());
        gateway.fail_next_requests(3);

        let home = browser(gateway, notifier.clone()).load_home().await;

        assert_eq!(home, HomeCatalog::default());
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_home_keeps_rows_with_null_columns() {
        let gateway = Arc::new(
            seeded()
                .with_table(
                    "destinations",
                    vec![json!({"id": "d5", "name": "Nag Tibba", "description": null, "location": null, "images": null, "category_id": null, "rating": null, "is_featured": null})],
                )
                .with_table(
                    "packages",
                    vec![json!({"id": "p3", "name": "Kuari Pass", "description": null, "duration_days": null, "location": null, "is_featured": true})],
                ),
        );
        let notifier = Arc::new(RecordingNotifier::new());

        let home = browser(gateway, notifier.clone()).load_home().await;

        assert_eq!(home.categories.len(), 2);
        assert_eq!(home.destinations.len(), 5);
        assert_eq!(home.featured_packages.len(), 2);
        let nag_tibba = &home.destinations[4];
        assert!(nag_tibba.description.is_empty());
        assert!(!nag_tibba.is_featured);
        assert_eq!(home.featured_packages[1].duration_days, 0);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_home_reads_run_concurrently() {
        let delay = Duration::from_millis(200);
        let gateway = Arc::new(seeded());
        gateway.set_delay(delay.as_millis() as usize);

        let started = Instant::now();
        let home = browser(gateway.clone(), Arc::new(RecordingNotifier::new()))
            .load_home()
            .await;
        let elapsed = started.elapsed();

        assert_eq!(gateway.request_count(), 3);
        assert_eq!(home.categories.len(), 2);
        assert!(elapsed >= delay);
        assert!(elapsed < delay * 2, "three reads took {:?}", elapsed);
    }

    #[tokio::test]
    async fn test_category_destinations_featured_first_then_rating() {
        let notifier = Arc::new(RecordingNotifier::new());
        let page = browser(Arc::new(seeded()), notifier.clone())
            .load_category("treks")
            .await;

        let CategoryPage::Loaded { category, destinations } = page else {
            panic!("expected a loaded category page");
        };
        assert_eq!(category.name, "Treks");
        let ids: Vec<&str> = destinations.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["d2", "d3", "d1"]);
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_slug_redirects_home_with_one_error() {
        let gateway = Arc::new(seeded());
        let notifier = Arc::new(RecordingNotifier::new());

        let page = browser(gateway.clone(), notifier.clone())
            .load_category("scuba")
            .await;

        assert_eq!(page, CategoryPage::Redirect(Route::Home));
        let seen = notifier.notifications();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].is_error());
        assert_eq!(seen[0].title, "Category not found");
        // The destination list is never requested.
        assert_eq!(gateway.request_count(), 1);
    }

    #[tokio::test]
    async fn test_category_lookup_failure_notifies() {
        let gateway = Arc::new(seeded());
        let notifier = Arc::new(RecordingNotifier::new());
        gateway.fail_next_requests(1);

        let page = browser(gateway, notifier.clone()).load_category("treks").await;

        assert_eq!(page, CategoryPage::Unavailable);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_packages_newest_first() {
        let listing = browser(Arc::new(seeded()), Arc::new(RecordingNotifier::new()))
            .load_packages()
            .await;

        let ids: Vec<&str> = listing.packages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p2", "p1"]);
        assert!(listing.error.is_none());
    }

    #[tokio::test]
    async fn test_packages_failure_stays_inline() {
        let gateway = Arc::new(seeded());
        let notifier = Arc::new(RecordingNotifier::new());
        gateway.fail_next_requests(1);

        let listing = browser(gateway, notifier.clone()).load_packages().await;

        assert!(listing.packages.is_empty());
        assert_eq!(listing.error.as_deref(), Some(PACKAGES_UNAVAILABLE));
        assert!(notifier.notifications().is_empty());
    }

    #[tokio::test]
    async fn test_open_routes() {
        let notifier = Arc::new(RecordingNotifier::new());
        let browser = browser(Arc::new(seeded()), notifier.clone());

        assert!(matches!(
            browser.open(&Route::parse("/package/p2")).await,
            Page::Package(PackagePage::Loaded(ref p)) if p.name == "Chopta Weekend"
        ));
        assert_eq!(
            browser.open(&Route::parse("/booking/missing")).await,
            Page::Booking(PackagePage::Redirect(Route::Packages))
        );
        assert_eq!(browser.open(&Route::parse("/nowhere/at/all")).await, Page::NotFound);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[test]
    fn test_destination_booking_request_names_destination() {
        let notifier = Arc::new(RecordingNotifier::new());
        let browser = browser(Arc::new(seeded()), notifier.clone());
        let destination: Destination =
            serde_json::from_value(json!({"id": "d1", "name": "Kedarkantha"})).unwrap();

        browser.request_destination_booking(&destination);

        let last = notifier.last().unwrap();
        assert_eq!(last.title, "Booking Request");
        assert!(last.description.contains("Kedarkantha"));
    }
}
