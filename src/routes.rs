// Navigation shell: URL paths to pages

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Category { slug: String },
    Packages,
    Booking { id: String },
    Package { id: String },
    NotFound,
}

impl Route {
    /// Resolves a browser path. Query strings, fragments and trailing
    /// slashes are ignored; anything unrecognised is `NotFound`.
    pub fn parse(path: &str) -> Self {
        let path = path
            .split(|c: char| c == '?' || c == '#')
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["packages"] => Route::Packages,
            ["category", slug] => Route::Category {
                slug: slug.to_string(),
            },
            ["booking", id] => Route::Booking { id: id.to_string() },
            ["package", id] => Route::Package { id: id.to_string() },
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Category { slug } => format!("/category/{}", slug),
            Route::Packages => "/packages".to_string(),
            Route::Booking { id } => format!("/booking/{}", id),
            Route::Package { id } => format!("/package/{}", id),
            Route::NotFound => "/404".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
