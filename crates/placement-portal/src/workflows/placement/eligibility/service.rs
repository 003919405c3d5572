use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::documents::{
    AppraisalInput, DocumentBody, JoiningReportInput, MisconductReportInput, PostHireDocument,
};
use super::gate::{EligibilityGate, HiredContext};
use super::repository::{JoiningReportLedger, PostHireRepository};
use crate::workflows::placement::applications::ApplicationRepository;
use crate::workflows::placement::ids::{next_identifier, DocumentId, StudentId};
use crate::workflows::placement::notifications::{
    Notification, NotificationKind, NotificationSink, Notifier,
};
use crate::workflows::placement::store::{Constraint, RepositoryError};
use crate::workflows::placement::PlacementError;

/// Files joining reports, appraisals and misconduct reports once the gate allows them.
pub struct PostHireDocumentService<A, D, N> {
    gate: EligibilityGate<A, D>,
    documents: Arc<D>,
    notifier: Notifier<N>,
}

impl<A, D, N> PostHireDocumentService<A, D, N>
where
    A: ApplicationRepository + 'static,
    D: PostHireRepository + 'static,
    N: NotificationSink + 'static,
{
    pub fn new(applications: Arc<A>, documents: Arc<D>, notifications: Arc<N>) -> Self {
        Self {
            gate: EligibilityGate::new(applications, Arc::clone(&documents)),
            documents,
            notifier: Notifier::new(notifications),
        }
    }

    pub fn gate(&self) -> &EligibilityGate<A, D> {
        &self.gate
    }

    /// Student-filed confirmation that the placement started. One per student.
    pub fn file_joining_report(
        &self,
        input: JoiningReportInput,
    ) -> Result<PostHireDocument, PlacementError> {
        let student_id = input.student_id.clone();
        if input.summary.trim().is_empty() {
            return Err(PlacementError::validation(
                "joining report requires a summary",
            ));
        }
        if !self.gate.is_eligible_for_joining_report(&student_id)? {
            if self.gate.ledger().has_joining_report(&student_id)? {
                return Err(PlacementError::DuplicateJoiningReport(student_id));
            }
            // Zero or several placements; let the resolver name which.
            return Err(match self.gate.resolve_hired_context(&student_id) {
                Err(err) => err,
                Ok(_) => PlacementError::NoCurrentPlacement(student_id),
            });
        }

        let context = self.gate.resolve_hired_context(&student_id)?;
        let body = DocumentBody::JoiningReport {
            reported_on: input.reported_on,
            summary: input.summary.trim().to_string(),
        };
        let document = self.store(&student_id, context, student_id.to_string(), body)?;

        self.notifier.dispatch(Notification::new(
            &document.context.supervisor_id,
            NotificationKind::JoiningReportFiled,
            &document.id,
            format!(
                "Student {student_id} filed a joining report for {} ({})",
                document.context.job_title, document.context.company_id
            ),
        ));
        Ok(document)
    }

    /// Company-filed appraisal of a student it hired.
    pub fn file_appraisal(&self, input: AppraisalInput) -> Result<PostHireDocument, PlacementError> {
        input.validate()?;
        let AppraisalInput {
            company_id,
            student_id,
            rating,
            comments,
        } = input;

        if !self.gate.is_eligible_for_appraisal(&student_id, &company_id)? {
            return Err(PlacementError::NotPlacedWith {
                student_id,
                company_id,
            });
        }
        let context = self.gate.hired_context_with(&student_id, &company_id)?;
        let body = DocumentBody::Appraisal {
            rating,
            comments: comments.trim().to_string(),
        };
        let document = self.store(&student_id, context, company_id.to_string(), body)?;

        let message = format!(
            "{company_id} filed an appraisal for {} (rating {rating}/5)",
            document.context.job_title
        );
        self.notifier.dispatch(Notification::new(
            &student_id,
            NotificationKind::AppraisalFiled,
            &document.id,
            message.clone(),
        ));
        self.notifier.dispatch(Notification::new(
            &document.context.supervisor_id,
            NotificationKind::AppraisalFiled,
            &document.id,
            format!("{message} for student {student_id}"),
        ));
        Ok(document)
    }

    /// Company-filed report about its current intern.
    pub fn file_misconduct_report(
        &self,
        input: MisconductReportInput,
    ) -> Result<PostHireDocument, PlacementError> {
        input.validate()?;
        let MisconductReportInput {
            company_id,
            student_id,
            incident_date,
            description,
        } = input;

        let context = self.gate.resolve_hired_context(&student_id)?;
        if context.company_id != company_id {
            return Err(PlacementError::NotPlacedWith {
                student_id,
                company_id,
            });
        }
        let body = DocumentBody::MisconductReport {
            incident_date,
            description: description.trim().to_string(),
        };
        let document = self.store(&student_id, context, company_id.to_string(), body)?;

        self.notifier.dispatch(Notification::new(
            &document.context.supervisor_id,
            NotificationKind::MisconductReported,
            &document.id,
            format!(
                "{company_id} reported misconduct by student {student_id} on {incident_date}"
            ),
        ));
        self.notifier.dispatch(Notification::new(
            &student_id,
            NotificationKind::MisconductReported,
            &document.id,
            format!("{company_id} filed a misconduct report dated {incident_date}"),
        ));
        Ok(document)
    }

    pub fn documents_for_student(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<PostHireDocument>, PlacementError> {
        let mut documents = self.documents.for_student(student_id)?;
        documents.sort_by(|a, b| a.filed_at.cmp(&b.filed_at).then_with(|| a.id.cmp(&b.id)));
        Ok(documents)
    }

    fn store(
        &self,
        student_id: &StudentId,
        context: HiredContext,
        filed_by: String,
        body: DocumentBody,
    ) -> Result<PostHireDocument, PlacementError> {
        let kind = body.kind();
        let document = PostHireDocument {
            id: DocumentId(next_identifier(kind.label())),
            student_id: student_id.clone(),
            context,
            filed_by,
            filed_at: Utc::now(),
            body,
        };
        let stored = self.documents.insert(document).map_err(|err| match err {
            RepositoryError::Constraint(Constraint::JoiningReportExists) => {
                PlacementError::DuplicateJoiningReport(student_id.clone())
            }
            other => other.into(),
        })?;

        info!(
            document_id = %stored.id,
            %student_id,
            kind = kind.label(),
            application_id = %stored.context.application_id,
            "post-hire document filed"
        );
        Ok(stored)
    }
}
