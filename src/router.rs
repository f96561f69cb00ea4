//! # Router Module
//!
//! Fixed-shape path resolution for the API surface:
//! `api/<version>/<module>/<controller>/<action>[/<id>]`.
//!
//! This is deliberately not a pattern-matching engine. The transport only
//! needs the module/controller/action triple (plus the optional trailing
//! id, surfaced as the `id` parameter); anything that does not match the
//! shape is unroutable and rendered as a 404 by the server.

/// Route triple resolved from an API path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRoute {
    pub module: String,
    pub controller: String,
    pub action: String,
    pub id: Option<String>,
}

/// Resolver for one API version prefix.
#[derive(Debug, Clone)]
pub struct ApiRouter {
    version: String,
}

impl Default for ApiRouter {
    fn default() -> Self {
        Self::new("v1")
    }
}

impl ApiRouter {
    #[must_use]
    pub fn new(version: &str) -> Self {
        ApiRouter {
            version: version.to_string(),
        }
    }

    /// Resolve a path (without query string) into a route triple.
    #[must_use]
    pub fn route(&self, path: &str) -> Option<ApiRoute> {
        let mut segments = path.trim_matches('/').split('/');

        if segments.next()? != "api" {
            return None;
        }
        if segments.next()? != self.version {
            return None;
        }

        let module = segments.next()?;
        let controller = segments.next()?;
        let action = segments.next()?;
        let id = segments.next();

        // Anything beyond the optional id does not match the shape.
        if segments.next().is_some() {
            return None;
        }
        if module.is_empty() || controller.is_empty() || action.is_empty() {
            return None;
        }

        Some(ApiRoute {
            module: module.to_string(),
            controller: controller.to_string(),
            action: action.to_string(),
            id: id.filter(|v| !v.is_empty()).map(str::to_string),
        })
    }
}
