use crate::model::{Customer, MaintenanceAgreement, Project, Stored, SupportTicket};

/// Case-insensitive search over the columns a table shows
pub trait Searchable {
    /// Text of the searchable columns
    fn search_fields(&self) -> Vec<&str>;

    /// True when any searchable column contains `query`; an empty query matches everything
    fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Searchable for Customer {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.customer_id.as_str(),
            self.customer_name.as_str(),
            self.tax_id_or_id_card.as_str(),
        ]
    }
}

impl Searchable for Project {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.project_id.as_str(), self.project_name.as_str(), self.customer_name.as_str()]
    }
}

impl Searchable for MaintenanceAgreement {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.ma_number.as_str(), self.project_name.as_str(), self.customer_name.as_str()]
    }
}

impl Searchable for SupportTicket {
    fn search_fields(&self) -> Vec<&str> {
        vec![self.ma_number.as_str(), self.project_name.as_str()]
    }
}

impl<T: Searchable> Searchable for Stored<T> {
    fn search_fields(&self) -> Vec<&str> {
        self.record.search_fields()
    }
}

/// Rows of `items` matching `query`, in their original order
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches(query)).collect()
}
