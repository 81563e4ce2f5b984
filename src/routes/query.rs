use serde::Deserialize;

use crate::errors::ShipError;
use crate::filter::{Page, ShipOrder};

/// Paging parameters for listing. The filter parameters are parsed
/// separately from the same query string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParameters {
    pub order: Option<ShipOrder>,
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
}

impl PageParameters {
    pub fn into_page(self, default_page_size: u32) -> Result<Page, ShipError> {
        Page::new(
            self.page_number.unwrap_or(0),
            self.page_size.unwrap_or(default_page_size),
            self.order.unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::PageParameters;
    use crate::filter::ShipOrder;

    #[test]
    fn defaults_to_first_page_by_id() {
        let page = PageParameters::default().into_page(3).unwrap();

        assert_eq!(page.number, 0);
        assert_eq!(page.size, 3);
        assert_eq!(page.order, ShipOrder::Id);
    }

    #[test]
    fn rejects_empty_pages() {
        let parameters = PageParameters {
            page_size: Some(0),
            ..PageParameters::default()
        };

        assert!(parameters.into_page(3).is_err());
    }
}
