//! Record manager configuration.

/// Rows per page when nothing else is configured.
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Tunables for [`crate::RecordManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Rows shown per page. Zero falls back to [`DEFAULT_PAGE_SIZE`].
    pub page_size: usize,
}

impl ManagerConfig {
    pub fn with_page_size(page_size: usize) -> Self {
        Self { page_size }.normalized()
    }

    /// Replaces invalid values with defaults.
    pub fn normalized(self) -> Self {
        let page_size = if self.page_size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.page_size
        };
        Self { page_size }
    }
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ManagerConfig, DEFAULT_PAGE_SIZE};

    #[test]
    fn zero_page_size_falls_back_to_default() {
        assert_eq!(ManagerConfig::with_page_size(0).page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(ManagerConfig::with_page_size(20).page_size, 20);
    }
}
