//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a request may ask for.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// Resolve the `limit` query parameter into a page size.
    ///
    /// # Errors
    /// Returns [Error::InvalidRequest] if `limit` is not an integer in
    /// `[1, max_page_size]`.
    pub fn page_size(&self, limit: Option<&str>) -> Result<u64, Error> {
        let Some(limit) = limit else {
            return Ok(self.default_page_size);
        };

        match limit.trim().parse::<u64>() {
            Ok(page_size) if (1..=self.max_page_size).contains(&page_size) => Ok(page_size),
            _ => Err(Error::InvalidRequest(format!(
                "Invalid 'limit'. Must be between 1 and {}",
                self.max_page_size
            ))),
        }
    }
}
