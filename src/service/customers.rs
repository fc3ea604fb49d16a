use super::{Desk, not_found};
use crate::auth::{AuthError, IdentityProvider};
use crate::core::{DeskError, Result};
use crate::lifecycle::Clock;
use crate::model::{Customer, CustomerType, DocumentKey, Stored};
use crate::store::{DocumentStore, records};
use crate::validation::{CustomerForm, FieldErrors, FormMode};
use tracing::{error, info, warn};

impl CustomerForm {
    /// Customer record carrying `customer_id`
    pub fn to_customer(&self, customer_id: String) -> Customer {
        Customer {
            customer_id,
            customer_name: self.customer_name.trim().to_string(),
            customer_type: self.customer_type,
            branch_type: match self.customer_type {
                CustomerType::Corporation => self.branch_type,
                CustomerType::Individual => None,
            },
            tax_id_or_id_card: self.tax_id_or_id_card().to_string(),
            address: self.address.clone(),
            zip_code: self.zip_code.clone(),
            phone: self.phone.clone(),
            fax: self.fax.clone(),
            website: self.website.clone(),
            contact_name: self.contact_name.clone(),
            mobile: self.mobile.clone(),
            contact_email: self.contact_email.clone(),
            username: self.username.clone(),
            email: self.email.trim().to_lowercase(),
        }
    }
}

fn email_error(message: &str) -> DeskError {
    let mut errors = FieldErrors::new();
    errors.insert("email", message);
    DeskError::Validation(errors)
}

impl<S: DocumentStore, I: IdentityProvider, C: Clock> Desk<S, I, C> {
    /// Creates a customer when `existing` is `None`, otherwise updates it.
    ///
    /// Creating also opens the customer's sign-in account with the identity
    /// provider. Editing leaves the account and the business id untouched.
    pub async fn save_customer(
        &self,
        form: &CustomerForm,
        existing: Option<&DocumentKey>,
    ) -> Result<Stored<Customer>> {
        let _permit = self.guard.try_acquire()?;

        let mode = match existing {
            Some(_) => FormMode::Edit,
            None => FormMode::Create,
        };
        form.validate(mode, self.config.min_password_length)
            .into_result()
            .map_err(DeskError::Validation)?;

        let customers = records::<Customer, _>(&self.store);

        if let Some(key) = existing {
            let current = customers.fetch(key).await?.record;
            let mut customer = form.to_customer(current.customer_id);
            customer.username = current.username;
            customer.email = current.email;

            customers.update(key, &customer).await?;
            info!(customer_id = %customer.customer_id, "customer updated");
            return Ok(Stored::new(key.clone(), customer));
        }

        let email = form.email.trim().to_lowercase();
        if !customers.find_by("email", &email).await?.is_empty() {
            return Err(email_error("Email is already in use."));
        }

        // everything that can abort the save runs before the account exists
        let customer = form.to_customer(self.next_business_id::<Customer>().await?);

        let user = match self.identity.sign_up(&email, &form.password).await {
            Ok(user) => user,
            Err(AuthError::EmailInUse(_)) => {
                return Err(email_error("Email is already in use."));
            }
            Err(e) => {
                warn!(error = %e, "customer account creation failed");
                return Err(e.into());
            }
        };
        info!(uid = user.uid(), "customer account created");

        let key = match customers.insert(&customer).await {
            Ok(key) => key,
            Err(e) => {
                warn!(error = %e, customer_id = %customer.customer_id, "customer insert failed");
                if let Err(undo) = self.identity.delete_account(user.email()).await {
                    error!(error = %undo, email = user.email(), "customer account left behind");
                }
                return Err(e.into());
            }
        };

        info!(customer_id = %customer.customer_id, %key, "customer created");
        Ok(Stored::new(key, customer))
    }

    /// Every customer, ordered by customer id
    pub async fn list_customers(&self) -> Result<Vec<Stored<Customer>>> {
        Ok(records::<Customer, _>(&self.store).list().await?)
    }

    /// The customer with business id `customer_id`
    pub async fn customer_by_id(&self, customer_id: &str) -> Result<Stored<Customer>> {
        records::<Customer, _>(&self.store)
            .find_by_business_id(customer_id)
            .await?
            .ok_or_else(|| not_found("Customer", customer_id))
    }
}
