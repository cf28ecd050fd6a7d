use crate::error::ExportError;
use crate::types::{AssessmentInstance, Submission};
use async_trait::async_trait;

/// Read-only remote assessment platform collaborator.
///
/// Both operations are simple authenticated reads; implementations collapse
/// transport-level failures (network, non-2xx, undecodable body) into a
/// single [`ExportError::Transport`].
#[async_trait]
pub trait SubmissionApi: Send + Sync {
    /// All assessment instances for an assessment within a course scope.
    async fn list_assessment_instances(
        &self,
        course_instance_id: &str,
        assessment_id: &str,
    ) -> Result<Vec<AssessmentInstance>, ExportError>;

    /// All submissions belonging to one assessment instance.
    async fn list_submissions(
        &self,
        course_instance_id: &str,
        assessment_instance_id: &str,
    ) -> Result<Vec<Submission>, ExportError>;
}
