use super::{Record, collections};
use crate::sequence::SequenceSpec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: String,
    pub project_name: String,
    pub customer_id: String,
    /// Copied from the customer when the project is saved
    pub customer_name: String,
}

impl Record for Project {
    const COLLECTION: &'static str = collections::PROJECTS;
    const SEQUENCE: SequenceSpec = SequenceSpec::PROJECT;
    const ID_FIELD: &'static str = "projectId";

    fn business_id(&self) -> &str {
        &self.project_id
    }
}
