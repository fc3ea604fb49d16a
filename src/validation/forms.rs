use super::{
    FieldErrors, is_valid_email, is_valid_id_card, is_valid_password, is_valid_tax_id,
    is_valid_username,
};
use crate::model::{BranchType, CustomerType, IssueType};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a form creates a new record or edits an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub customer_name: String,
    pub customer_type: CustomerType,
    pub tax_id: String,
    pub id_card: String,
    pub branch_type: Option<BranchType>,
    pub address: String,
    pub zip_code: String,
    pub phone: String,
    pub fax: String,
    pub website: String,
    pub contact_name: String,
    pub mobile: String,
    pub contact_email: String,
}

impl CustomerForm {
    /// Checks every field and collects all failures.
    ///
    /// The account fields (username, email, password) are only checked when
    /// creating: an existing customer's sign-in account is not edited here.
    pub fn validate(&self, mode: FormMode, min_password_length: usize) -> FieldErrors {
        let mut errors = FieldErrors::new();

        if mode == FormMode::Create {
            if errors.require("username", &self.username, "Please enter a username.")
                && !is_valid_username(&self.username)
            {
                errors.insert("username", "Username can only contain letters and numbers.");
            }

            if errors.require("email", &self.email, "Please enter an email.")
                && !is_valid_email(&self.email)
            {
                errors.insert("email", "Invalid email format.");
            }

            if errors.require("password", &self.password, "Please enter a password.")
                && !is_valid_password(&self.password, min_password_length)
            {
                errors.insert(
                    "password",
                    format!("Password must be at least {min_password_length} characters long."),
                );
            }
        }

        errors.require("customerName", &self.customer_name, "Please enter a customer name.");

        match self.customer_type {
            CustomerType::Corporation => {
                if errors.require("taxId", &self.tax_id, "Please enter a tax ID.")
                    && !is_valid_tax_id(&self.tax_id)
                {
                    errors.insert("taxId", "Tax ID must be either 10 or 13 characters long.");
                }
                if self.branch_type.is_none() {
                    errors.insert("branchType", "Please select a branch type.");
                }
            }
            CustomerType::Individual => {
                if errors.require("idCard", &self.id_card, "Please enter an ID card.")
                    && !is_valid_id_card(&self.id_card)
                {
                    errors.insert("idCard", "ID Card must be 13 characters long.");
                }
            }
        }

        errors.require("address", &self.address, "Please enter an address.");
        errors.require("contactName", &self.contact_name, "Please enter a contact name.");
        errors.require("mobile", &self.mobile, "Please enter a mobile number.");
        errors.require("contactEmail", &self.contact_email, "Please enter a contact email.");

        errors
    }

    /// Tax id or id card, whichever applies to the customer type
    pub fn tax_id_or_id_card(&self) -> &str {
        match self.customer_type {
            CustomerType::Corporation => &self.tax_id,
            CustomerType::Individual => &self.id_card,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectForm {
    pub project_name: String,
    /// Business id of the owning customer
    pub customer_id: String,
}

impl ProjectForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("projectName", &self.project_name, "Project Name is required");
        errors.require("customerName", &self.customer_id, "Customer Name is required");
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementForm {
    pub customer_id: String,
    pub project_id: String,
    pub start_date: Option<NaiveDate>,
}

impl AgreementForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("customerName", &self.customer_id, "Customer Name is required");
        errors.require("projectName", &self.project_id, "Project Name is required");
        if self.start_date.is_none() {
            errors.insert("startDate", "Start Date is required");
        }
        errors
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TicketForm {
    pub ma_number: String,
    pub type_issue: Option<IssueType>,
    pub issue_description: String,
}

impl TicketForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require("maNumber", &self.ma_number, "MA Number is required");
        if self.type_issue.is_none() {
            errors.insert("typeIssue", "Type Issue is required");
        }
        errors.require(
            "issueDescription",
            &self.issue_description,
            "Issue Description is required",
        );
        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MIN_PASSWORD_LENGTH;

    fn corporation() -> CustomerForm {
        CustomerForm {
            username: "siamwidgets".into(),
            email: "it@siamwidgets.co.th".into(),
            password: "s3cretpass".into(),
            customer_name: "Siam Widgets".into(),
            customer_type: CustomerType::Corporation,
            tax_id: "0105551234567".into(),
            branch_type: Some(BranchType::HeadOffice),
            address: "99 Rama IV Rd".into(),
            contact_name: "Nok".into(),
            mobile: "0812345678".into(),
            contact_email: "nok@siamwidgets.co.th".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_corporation() {
        assert!(corporation().validate(FormMode::Create, MIN_PASSWORD_LENGTH).is_empty());
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = CustomerForm::default().validate(FormMode::Create, MIN_PASSWORD_LENGTH);
        for field in [
            "username",
            "email",
            "password",
            "customerName",
            "taxId",
            "branchType",
            "address",
            "contactName",
            "mobile",
            "contactEmail",
        ] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
        assert!(!errors.contains("idCard"));
        assert_eq!(errors.get("username"), Some("Please enter a username."));
    }

    #[test]
    fn test_format_errors() {
        let mut form = corporation();
        form.username = "siam widgets".into();
        form.email = "not-an-email".into();
        form.password = "short".into();
        form.tax_id = "123".into();

        let errors = form.validate(FormMode::Create, MIN_PASSWORD_LENGTH);
        assert_eq!(
            errors.get("username"),
            Some("Username can only contain letters and numbers.")
        );
        assert_eq!(errors.get("email"), Some("Invalid email format."));
        assert_eq!(
            errors.get("password"),
            Some("Password must be at least 8 characters long.")
        );
        assert_eq!(
            errors.get("taxId"),
            Some("Tax ID must be either 10 or 13 characters long.")
        );
    }

    #[test]
    fn test_individual_requires_id_card_not_tax_id() {
        let mut form = corporation();
        form.customer_type = CustomerType::Individual;
        form.tax_id.clear();
        form.branch_type = None;
        form.id_card = "12345".into();

        let errors = form.validate(FormMode::Create, MIN_PASSWORD_LENGTH);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("idCard"), Some("ID Card must be 13 characters long."));

        form.id_card = "1101700012345".into();
        assert!(form.validate(FormMode::Create, MIN_PASSWORD_LENGTH).is_empty());
        assert_eq!(form.tax_id_or_id_card(), "1101700012345");
    }

    #[test]
    fn test_edit_skips_account_fields() {
        let mut form = corporation();
        form.username.clear();
        form.email.clear();
        form.password.clear();

        assert!(form.validate(FormMode::Edit, MIN_PASSWORD_LENGTH).is_empty());
    }

    #[test]
    fn test_ticket_form() {
        let errors = TicketForm::default().validate();
        assert_eq!(errors.get("maNumber"), Some("MA Number is required"));
        assert_eq!(errors.get("typeIssue"), Some("Type Issue is required"));
        assert_eq!(
            errors.get("issueDescription"),
            Some("Issue Description is required")
        );

        let form = TicketForm {
            ma_number: "MA00001".into(),
            type_issue: Some(IssueType::DataIssues),
            issue_description: "Invoices missing since Monday".into(),
        };
        assert!(form.validate().is_empty());
    }

    #[test]
    fn test_agreement_form_requires_start_date() {
        let form = AgreementForm {
            customer_id: "CU000001".into(),
            project_id: "LS00001".into(),
            start_date: None,
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("startDate"));
    }
}
