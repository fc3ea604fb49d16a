use super::{Record, collections};
use crate::sequence::SequenceSpec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a reported issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueType {
    #[serde(rename = "User Error")]
    UserError,
    #[serde(rename = "System Bugs")]
    SystemBugs,
    #[serde(rename = "Performance Issues")]
    PerformanceIssues,
    #[serde(rename = "Integration Issues")]
    IntegrationIssues,
    #[serde(rename = "Data Issues")]
    DataIssues,
    #[serde(rename = "Security Issues")]
    SecurityIssues,
}

impl IssueType {
    pub const ALL: [IssueType; 6] = [
        IssueType::UserError,
        IssueType::SystemBugs,
        IssueType::PerformanceIssues,
        IssueType::IntegrationIssues,
        IssueType::DataIssues,
        IssueType::SecurityIssues,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IssueType::UserError => "User Error",
            IssueType::SystemBugs => "System Bugs",
            IssueType::PerformanceIssues => "Performance Issues",
            IssueType::IntegrationIssues => "Integration Issues",
            IssueType::DataIssues => "Data Issues",
            IssueType::SecurityIssues => "Security Issues",
        }
    }

    /// Help text shown next to the category picker
    pub fn description(&self) -> &'static str {
        match self {
            IssueType::UserError => {
                "Incorrect usage: the user misunderstood the workflow or entered wrong data"
            }
            IssueType::SystemBugs => {
                "Defect: the system crashes or stops working, some functions remain usable"
            }
            IssueType::PerformanceIssues => {
                "Slowness: work takes longer than usual or the system overuses resources"
            }
            IssueType::IntegrationIssues => {
                "Connection failure: the system cannot reach other software or services"
            }
            IssueType::DataIssues => "Data loss: data is missing, wrong or cannot be accessed",
            IssueType::SecurityIssues => {
                "Breach: the system was attacked or accessed without authorization"
            }
        }
    }

    pub fn from_label(label: &str) -> Option<IssueType> {
        IssueType::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub ticket_id: String,
    pub ma_number: String,
    /// Copied from the agreement when the ticket is opened
    pub project_name: String,
    #[serde(default)]
    pub customer_id: String,
    pub type_issue: IssueType,
    pub issue_description: String,
}

impl Record for SupportTicket {
    const COLLECTION: &'static str = collections::SUPPORT_TICKETS;
    const SEQUENCE: SequenceSpec = SequenceSpec::TICKET;
    const ID_FIELD: &'static str = "ticketId";

    fn business_id(&self) -> &str {
        &self.ticket_id
    }
}
