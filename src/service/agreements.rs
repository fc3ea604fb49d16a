use super::{Desk, not_found};
use crate::auth::IdentityProvider;
use crate::core::{DeskError, Result};
use crate::lifecycle::{AgreementStatus, Clock, Lifecycle, term_end};
use crate::model::{DocumentKey, MaintenanceAgreement, Project, Stored};
use crate::store::{DocumentStore, records};
use crate::validation::{AgreementForm, FieldErrors};
use crate::view::Searchable;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// An agreement as listed, with its lifecycle as of today
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementRow {
    pub key: DocumentKey,
    pub agreement: MaintenanceAgreement,
    pub lifecycle: Lifecycle,
}

impl Searchable for AgreementRow {
    fn search_fields(&self) -> Vec<&str> {
        self.agreement.search_fields()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerOption {
    pub customer_id: String,
    pub customer_name: String,
}

/// Choices offered by the new-agreement form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementOptions {
    /// Customers with at least one project not yet under agreement
    pub customers: Vec<CustomerOption>,
    /// Projects not yet under agreement, of the selected customer when one is given
    pub projects: Vec<Project>,
}

impl AgreementOptions {
    pub fn has_customers(&self) -> bool {
        !self.customers.is_empty()
    }

    pub fn has_projects(&self) -> bool {
        !self.projects.is_empty()
    }
}

impl<S: DocumentStore, I: IdentityProvider, C: Clock> Desk<S, I, C> {
    /// Creates an agreement when `existing` is `None`, otherwise moves its term.
    ///
    /// The term always ends 365 days after the start date. An existing
    /// agreement keeps its number, customer and project; only the start date
    /// is taken from the form.
    pub async fn save_agreement(
        &self,
        form: &AgreementForm,
        existing: Option<&DocumentKey>,
    ) -> Result<Stored<MaintenanceAgreement>> {
        let _permit = self.guard.try_acquire()?;

        let errors = form.validate();
        let Some(start_date) = form.start_date.filter(|_| errors.is_empty()) else {
            return Err(DeskError::Validation(errors));
        };
        let end_date = term_end(start_date).map_err(|e| {
            debug!(error = %e, "agreement start date rejected");
            let mut errors = FieldErrors::new();
            errors.insert("startDate", "Start Date is out of range");
            DeskError::Validation(errors)
        })?;

        let today = self.clock.today();
        let agreements = records::<MaintenanceAgreement, _>(&self.store);

        if let Some(key) = existing {
            let mut agreement = agreements.fetch(key).await?.record;
            agreement.start_date = start_date;
            agreement.end_date = end_date;
            agreement.refresh(today);

            agreements.update(key, &agreement).await?;
            info!(ma_number = %agreement.ma_number, %start_date, "agreement term moved");
            return Ok(Stored::new(key.clone(), agreement));
        }

        let project = records::<Project, _>(&self.store)
            .find_by_business_id(&form.project_id)
            .await?
            .ok_or_else(|| not_found("Project", &form.project_id))?
            .record;

        if project.customer_id != form.customer_id {
            return Err(DeskError::Unavailable(format!(
                "Project '{}' does not belong to customer '{}'",
                project.project_name, form.customer_id
            )));
        }
        if !agreements.find_by("projectId", &project.project_id).await?.is_empty() {
            return Err(DeskError::Unavailable(format!(
                "Project '{}' already has a maintenance agreement",
                project.project_name
            )));
        }

        let customer = self.customer_by_id(&form.customer_id).await?.record;

        let mut agreement = MaintenanceAgreement {
            ma_number: self.next_business_id::<MaintenanceAgreement>().await?,
            project_id: project.project_id,
            project_name: project.project_name,
            customer_id: customer.customer_id,
            customer_name: customer.customer_name,
            start_date,
            end_date,
            maturity: String::new(),
            status: AgreementStatus::Active,
        };
        agreement.refresh(today);

        let key = agreements.insert(&agreement).await?;
        info!(ma_number = %agreement.ma_number, %key, status = %agreement.status, "agreement created");
        Ok(Stored::new(key, agreement))
    }

    /// Every agreement ordered by MA number, classified against today
    pub async fn list_agreements(&self) -> Result<Vec<AgreementRow>> {
        let today = self.clock.today();
        let stored = records::<MaintenanceAgreement, _>(&self.store).list().await?;

        Ok(stored
            .into_iter()
            .map(|Stored { key, mut record }| {
                let lifecycle = record.refresh(today);
                AgreementRow {
                    key,
                    agreement: record,
                    lifecycle,
                }
            })
            .collect())
    }

    /// Writes back the cached status and maturity of every agreement whose
    /// cache is stale. Returns how many documents were updated.
    pub async fn refresh_stored_agreements(&self) -> Result<usize> {
        let _permit = self.guard.try_acquire()?;
        let today = self.clock.today();
        let agreements = records::<MaintenanceAgreement, _>(&self.store);

        let mut updated = 0;
        for Stored { key, mut record } in agreements.list().await? {
            let cached = (record.status, record.maturity.clone());
            record.refresh(today);
            if cached != (record.status, record.maturity.clone()) {
                agreements.update(&key, &record).await?;
                debug!(ma_number = %record.ma_number, status = %record.status, "status refreshed");
                updated += 1;
            }
        }

        info!(updated, "agreement statuses refreshed");
        Ok(updated)
    }

    /// Customers and projects the new-agreement form can offer.
    ///
    /// A project is available while no agreement refers to it.
    pub async fn agreement_options(&self, customer_id: Option<&str>) -> Result<AgreementOptions> {
        let projects = records::<Project, _>(&self.store);
        let agreements = records::<MaintenanceAgreement, _>(&self.store);
        let (projects, agreements) = futures::try_join!(projects.list(), agreements.list())?;

        let used: HashSet<String> = agreements
            .into_iter()
            .map(|a| a.record.project_id)
            .collect();
        let available: Vec<Project> = projects
            .into_iter()
            .map(|p| p.record)
            .filter(|p| !used.contains(&p.project_id))
            .collect();

        let mut seen = HashSet::new();
        let mut customers: Vec<CustomerOption> = available
            .iter()
            .filter(|p| seen.insert(p.customer_id.clone()))
            .map(|p| CustomerOption {
                customer_id: p.customer_id.clone(),
                customer_name: p.customer_name.clone(),
            })
            .collect();
        customers.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));

        let projects = match customer_id {
            Some(id) => available.into_iter().filter(|p| p.customer_id == id).collect(),
            None => available,
        };

        Ok(AgreementOptions {
            customers,
            projects,
        })
    }

    /// Agreements whose MA number contains `query`; nothing for an empty query
    pub async fn search_agreements(&self, query: &str) -> Result<Vec<Stored<MaintenanceAgreement>>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let agreements = records::<MaintenanceAgreement, _>(&self.store).list().await?;
        Ok(agreements
            .into_iter()
            .filter(|a| a.record.ma_number.to_lowercase().contains(&needle))
            .collect())
    }
}
