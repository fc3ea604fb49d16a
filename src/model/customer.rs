use super::{Record, collections};
use crate::sequence::SequenceSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    #[default]
    Corporation,
    Individual,
}

/// Registration type of a corporate customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BranchType {
    HeadOffice,
    Branch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_type: CustomerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch_type: Option<BranchType>,
    /// Tax id for corporations, national id card number for individuals
    pub tax_id_or_id_card: String,
    pub address: String,
    #[serde(default)]
    pub zip_code: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub fax: String,
    #[serde(default)]
    pub website: String,
    pub contact_name: String,
    pub mobile: String,
    pub contact_email: String,
    /// Sign-in account of the customer
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

impl Record for Customer {
    const COLLECTION: &'static str = collections::CUSTOMERS;
    const SEQUENCE: SequenceSpec = SequenceSpec::CUSTOMER;
    const ID_FIELD: &'static str = "customerId";

    fn business_id(&self) -> &str {
        &self.customer_id
    }
}
