//! Secondary resource information shown in the scheduler tooltip

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDetails {
    pub job_title: Option<String>,
    pub years_experience: Option<i64>,
    pub years_with_company: Option<i64>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    /// Free text, may contain markup supplied by whoever filled it in
    pub additional_info: Option<String>,
}
