use super::{Record, collections};
use crate::lifecycle::{self, AgreementStatus, Lifecycle};
use crate::sequence::SequenceSpec;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceAgreement {
    pub ma_number: String,
    pub project_id: String,
    pub project_name: String,
    pub customer_id: String,
    pub customer_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Cached; see [`MaintenanceAgreement::lifecycle`]
    pub maturity: String,
    /// Cached; see [`MaintenanceAgreement::lifecycle`]
    pub status: AgreementStatus,
}

impl MaintenanceAgreement {
    /// Lifecycle of this agreement as of `today`, independent of the cached fields
    pub fn lifecycle(&self, today: NaiveDate) -> Lifecycle {
        lifecycle::classify(self.start_date, self.end_date, today)
    }

    /// Recomputes the cached `maturity` and `status` fields
    pub fn refresh(&mut self, today: NaiveDate) -> Lifecycle {
        let lifecycle = self.lifecycle(today);
        self.maturity = lifecycle.maturity.clone();
        self.status = lifecycle.status;
        lifecycle
    }
}

impl Record for MaintenanceAgreement {
    const COLLECTION: &'static str = collections::MAINTENANCE_AGREEMENTS;
    const SEQUENCE: SequenceSpec = SequenceSpec::AGREEMENT;
    const ID_FIELD: &'static str = "maNumber";

    fn business_id(&self) -> &str {
        &self.ma_number
    }
}
