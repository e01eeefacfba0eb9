//! This modules defines the common functionality for paging data.

use crate::Error;

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of transactions per page when not specified in a request.
    pub default_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 10,
        }
    }
}

/// A 1-based page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u64,
    size: u64,
}

impl Page {
    /// Create a page, falling back to the defaults in `config` for missing values.
    ///
    /// # Errors
    /// Returns [Error::InvalidQuery] if the page number or page size is zero,
    /// or if the page starts past the largest offset a store can skip.
    pub fn new(
        number: Option<u64>,
        size: Option<u64>,
        config: &PaginationConfig,
    ) -> Result<Self, Error> {
        let number = number.unwrap_or(config.default_page);
        let size = size.unwrap_or(config.default_page_size);

        if number == 0 {
            return Err(Error::InvalidQuery("page must be at least 1".to_owned()));
        }

        if size == 0 {
            return Err(Error::InvalidQuery("perPage must be at least 1".to_owned()));
        }

        let page = Self { number, size };

        match (page.offset(), i64::try_from(size)) {
            (Some(offset), Ok(_)) if i64::try_from(offset).is_ok() => Ok(page),
            _ => Err(Error::InvalidQuery(format!(
                "page {number} with {size} items per page is out of range"
            ))),
        }
    }

    /// The first page with the default size.
    pub fn first(config: &PaginationConfig) -> Self {
        Self {
            number: 1,
            size: config.default_page_size.max(1),
        }
    }

    /// The 1-based page number.
    pub fn number(&self) -> u64 {
        self.number
    }

    /// The maximum number of items on the page.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The number of items before this page, `None` on overflow.
    fn offset(&self) -> Option<u64> {
        (self.number - 1).checked_mul(self.size)
    }

    /// The number of items to skip to reach this page.
    pub fn skip(&self) -> u64 {
        // `Page::new` and `Page::first` guarantee that the offset fits.
        self.offset().unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        pagination::{Page, PaginationConfig},
    };

    #[test]
    fn uses_defaults_for_missing_values() {
        let config = PaginationConfig::default();

        let page = Page::new(None, None, &config).unwrap();

        assert_eq!(page.number(), 1);
        assert_eq!(page.size(), 10);
        assert_eq!(page.skip(), 0);
    }

    #[test]
    fn skips_previous_pages() {
        let config = PaginationConfig::default();

        let page = Page::new(Some(3), Some(20), &config).unwrap();

        assert_eq!(page.skip(), 40);
        assert_eq!(page.size(), 20);
    }

    #[test]
    fn rejects_page_zero() {
        let got = Page::new(Some(0), None, &PaginationConfig::default());

        assert!(matches!(got, Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn rejects_empty_pages() {
        let got = Page::new(None, Some(0), &PaginationConfig::default());

        assert!(matches!(got, Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn rejects_offsets_that_overflow() {
        let got = Page::new(Some(u64::MAX), Some(u64::MAX), &PaginationConfig::default());

        assert!(matches!(got, Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn rejects_offsets_too_large_for_the_store() {
        let got = Page::new(Some(u64::MAX / 2), Some(4), &PaginationConfig::default());

        assert!(matches!(got, Err(Error::InvalidQuery(_))));
    }

    #[test]
    fn first_page_uses_default_size() {
        let config = PaginationConfig {
            default_page: 2,
            default_page_size: 25,
        };

        let page = Page::first(&config);

        assert_eq!(page.number(), 1);
        assert_eq!(page.size(), 25);
        assert_eq!(page.skip(), 0);
    }
}
