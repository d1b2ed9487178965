// Booking and catalog core for the Himalayan Trails travel site

// Export modules, leaf to root
pub mod browser;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod form;
pub mod gateway;
pub mod memory;
pub mod notify;
pub mod postgrest;
pub mod routes;
pub mod submission;
pub mod wizard;

// Re-export key types for convenience
pub use browser::{CatalogBrowser, CategoryPage, HomeCatalog, Page, PackageListing, PackagePage};
pub use catalog::{first_image, Category, CategoryIcon, Destination, ImageList, Package};
pub use config::{ConfigError, GatewayConfig, ImageProxyConfig, TableNames};
pub use contact::{show_contact, ContactChannel};
pub use form::{
    BookingField, BookingForm, ContactField, ContactForm, Dialog, Form, FormError, FormState,
    GroupSize,
};
pub use gateway::{DataGateway, GatewayError, Query};
pub use memory::InMemoryGateway;
pub use notify::{Notification, NotificationVariant, Notifier, RecordingNotifier, TracingNotifier};
pub use postgrest::PostgrestGateway;
pub use routes::Route;
pub use submission::{BookingContext, SubmissionHandler, SubmissionOutcome};
pub use wizard::{BookingWizard, TravellerProfile, WizardStep};
