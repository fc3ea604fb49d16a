use super::{Desk, not_found};
use crate::auth::IdentityProvider;
use crate::core::{DeskError, Result};
use crate::lifecycle::Clock;
use crate::model::{DocumentKey, MaintenanceAgreement, Stored, SupportTicket};
use crate::store::{DocumentStore, records};
use crate::validation::TicketForm;
use tracing::info;

impl<S: DocumentStore, I: IdentityProvider, C: Clock> Desk<S, I, C> {
    /// Opens a ticket when `existing` is `None`, otherwise updates it.
    ///
    /// Project and customer are taken from the agreement the MA number names.
    pub async fn save_ticket(
        &self,
        form: &TicketForm,
        existing: Option<&DocumentKey>,
    ) -> Result<Stored<SupportTicket>> {
        let _permit = self.guard.try_acquire()?;

        let errors = form.validate();
        let Some(type_issue) = form.type_issue.filter(|_| errors.is_empty()) else {
            return Err(DeskError::Validation(errors));
        };

        let ma_number = form.ma_number.trim();
        let agreement = records::<MaintenanceAgreement, _>(&self.store)
            .find_by_business_id(ma_number)
            .await?
            .ok_or_else(|| not_found("Maintenance agreement", ma_number))?
            .record;

        let tickets = records::<SupportTicket, _>(&self.store);
        let ticket_id = match existing {
            Some(key) => tickets.fetch(key).await?.record.ticket_id,
            None => self.next_business_id::<SupportTicket>().await?,
        };

        let ticket = SupportTicket {
            ticket_id,
            ma_number: agreement.ma_number,
            project_name: agreement.project_name,
            customer_id: agreement.customer_id,
            type_issue,
            issue_description: form.issue_description.trim().to_string(),
        };

        let key = match existing {
            Some(key) => {
                tickets.update(key, &ticket).await?;
                key.clone()
            }
            None => tickets.insert(&ticket).await?,
        };

        info!(ticket_id = %ticket.ticket_id, ma_number = %ticket.ma_number, %key, "ticket saved");
        Ok(Stored::new(key, ticket))
    }

    /// Every ticket, ordered by ticket id
    pub async fn list_tickets(&self) -> Result<Vec<Stored<SupportTicket>>> {
        Ok(records::<SupportTicket, _>(&self.store).list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use crate::core::DeskError;
    use crate::model::IssueType;
    use crate::validation::{AgreementForm, ProjectForm, TicketForm};

    async fn seeded() -> TestDesk {
        let desk = desk(date(2024, 6, 1));
        desk.save_customer(&customer_form("nok", "Nok Co"), None).await.unwrap();
        let project = ProjectForm {
            project_name: "Payroll".into(),
            customer_id: "CU000001".into(),
        };
        desk.save_project(&project, None).await.unwrap();
        let agreement = AgreementForm {
            customer_id: "CU000001".into(),
            project_id: "LS00001".into(),
            start_date: Some(date(2024, 1, 1)),
        };
        desk.save_agreement(&agreement, None).await.unwrap();
        desk
    }

    fn form(ma_number: &str, issue: Option<IssueType>, description: &str) -> TicketForm {
        TicketForm {
            ma_number: ma_number.into(),
            type_issue: issue,
            issue_description: description.into(),
        }
    }

    #[tokio::test]
    async fn test_ticket_copies_agreement_fields() {
        let desk = seeded().await;
        let ticket = desk
            .save_ticket(&form("MA00001", Some(IssueType::SystemBugs), "Export crashes"), None)
            .await
            .unwrap();

        assert_eq!(ticket.record.ticket_id, "ST000001");
        assert_eq!(ticket.record.project_name, "Payroll");
        assert_eq!(ticket.record.customer_id, "CU000001");

        let edited = desk
            .save_ticket(
                &form("MA00001", Some(IssueType::DataIssues), "Totals are off"),
                Some(&ticket.key),
            )
            .await
            .unwrap();
        assert_eq!(edited.record.ticket_id, "ST000001");
        assert_eq!(edited.record.type_issue, IssueType::DataIssues);
        assert_eq!(desk.list_tickets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_agreement() {
        let desk = seeded().await;
        let err = desk
            .save_ticket(&form("MA00077", Some(IssueType::UserError), "Locked out"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_required_fields() {
        let desk = seeded().await;
        let err = desk.save_ticket(&form("", None, ""), None).await.unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.get("maNumber"), Some("MA Number is required"));
        assert_eq!(fields.get("typeIssue"), Some("Type Issue is required"));
        assert_eq!(fields.get("issueDescription"), Some("Issue Description is required"));
    }
}
