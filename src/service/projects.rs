use super::Desk;
use crate::auth::IdentityProvider;
use crate::core::{DeskError, Result};
use crate::lifecycle::Clock;
use crate::model::{DocumentKey, Project, Stored};
use crate::store::{DocumentStore, records};
use crate::validation::{FieldErrors, ProjectForm};
use tracing::info;

impl<S: DocumentStore, I: IdentityProvider, C: Clock> Desk<S, I, C> {
    /// Creates a project when `existing` is `None`, otherwise updates it.
    ///
    /// Project names are unique across all customers.
    pub async fn save_project(
        &self,
        form: &ProjectForm,
        existing: Option<&DocumentKey>,
    ) -> Result<Stored<Project>> {
        let _permit = self.guard.try_acquire()?;
        form.validate().into_result().map_err(DeskError::Validation)?;

        let customer = self.customer_by_id(&form.customer_id).await?.record;
        let projects = records::<Project, _>(&self.store);

        let name = form.project_name.trim();
        let clash = projects
            .find_by("projectName", name)
            .await?
            .into_iter()
            .any(|p| Some(&p.key) != existing);
        if clash {
            let mut errors = FieldErrors::new();
            errors.insert("projectName", "Project Name already exists.");
            return Err(DeskError::Validation(errors));
        }

        let project_id = match existing {
            Some(key) => projects.fetch(key).await?.record.project_id,
            None => self.next_business_id::<Project>().await?,
        };
        let project = Project {
            project_id,
            project_name: name.to_string(),
            customer_id: customer.customer_id,
            customer_name: customer.customer_name,
        };

        let key = match existing {
            Some(key) => {
                projects.update(key, &project).await?;
                key.clone()
            }
            None => projects.insert(&project).await?,
        };

        info!(project_id = %project.project_id, %key, "project saved");
        Ok(Stored::new(key, project))
    }

    /// Every project, ordered by project id
    pub async fn list_projects(&self) -> Result<Vec<Stored<Project>>> {
        Ok(records::<Project, _>(&self.store).list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use crate::core::DeskError;
    use crate::model::Project;
    use crate::store::records;
    use crate::validation::ProjectForm;

    fn form(name: &str, customer_id: &str) -> ProjectForm {
        ProjectForm {
            project_name: name.into(),
            customer_id: customer_id.into(),
        }
    }

    #[tokio::test]
    async fn test_create_and_rename() {
        let desk = desk(date(2024, 1, 1));
        desk.save_customer(&customer_form("nok", "Nok Co"), None).await.unwrap();

        let erp = desk.save_project(&form("ERP", "CU000001"), None).await.unwrap();
        let crm = desk.save_project(&form("CRM", "CU000001"), None).await.unwrap();
        assert_eq!(erp.record.project_id, "LS00001");
        assert_eq!(crm.record.project_id, "LS00002");
        assert_eq!(erp.record.customer_name, "Nok Co");

        // saving under its own name is not a duplicate
        let same = desk.save_project(&form("ERP", "CU000001"), Some(&erp.key)).await.unwrap();
        assert_eq!(same.record.project_id, "LS00001");

        let renamed = desk.save_project(&form("ERP 2", "CU000001"), Some(&erp.key)).await.unwrap();
        assert_eq!(renamed.record.project_id, "LS00001");
        assert_eq!(renamed.record.project_name, "ERP 2");
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let desk = desk(date(2024, 1, 1));
        desk.save_customer(&customer_form("nok", "Nok Co"), None).await.unwrap();
        desk.save_project(&form("ERP", "CU000001"), None).await.unwrap();
        let crm = desk.save_project(&form("CRM", "CU000001"), None).await.unwrap();

        let err = desk.save_project(&form("ERP", "CU000001"), None).await.unwrap_err();
        assert_eq!(
            err.field_errors().unwrap().get("projectName"),
            Some("Project Name already exists.")
        );

        let err = desk.save_project(&form("ERP", "CU000001"), Some(&crm.key)).await.unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
        assert_eq!(desk.list_projects().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_ids_keep_counting_past_the_padding() {
        let desk = desk(date(2024, 1, 1));
        desk.save_customer(&customer_form("nok", "Nok Co"), None).await.unwrap();

        let imported = Project {
            project_id: "LS99999".into(),
            project_name: "Imported".into(),
            customer_id: "CU000001".into(),
            customer_name: "Nok Co".into(),
        };
        records::<Project, _>(desk.store()).insert(&imported).await.unwrap();

        let a = desk.save_project(&form("A", "CU000001"), None).await.unwrap();
        let b = desk.save_project(&form("B", "CU000001"), None).await.unwrap();
        assert_eq!(a.record.project_id, "LS100000");
        assert_eq!(b.record.project_id, "LS100001");

        let ids: Vec<_> = desk
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.record.project_id)
            .collect();
        assert_eq!(ids, ["LS99999", "LS100000", "LS100001"]);
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let desk = desk(date(2024, 1, 1));
        let err = desk.save_project(&form("ERP", "CU000404"), None).await.unwrap_err();
        assert!(matches!(err, DeskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let desk = desk(date(2024, 1, 1));
        let err = desk.save_project(&form("", ""), None).await.unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields.get("projectName"), Some("Project Name is required"));
        assert_eq!(fields.get("customerName"), Some("Customer Name is required"));
    }
}
