use crate::email_client::{ContactRecord, EmailClient, OutgoingEmail};
use crate::routes::error_chain_fmt;

/// How a failed job affects the request that scheduled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    /// Failure aborts the dispatch and the request fails.
    Critical,
    /// Failure is logged and otherwise ignored.
    BestEffort,
}

#[derive(Debug, Clone)]
pub struct NotificationJob {
    pub priority: Priority,
    pub email: OutgoingEmail,
}

impl NotificationJob {
    pub fn critical(email: OutgoingEmail) -> Self {
        Self {
            priority: Priority::Critical,
            email,
        }
    }

    pub fn best_effort(email: OutgoingEmail) -> Self {
        Self {
            priority: Priority::BestEffort,
            email,
        }
    }
}

/// Everything one submission sends out, in the order it is sent. The
/// contact upsert always goes last and is always best-effort.
#[derive(Debug, Clone, Default)]
pub struct DispatchPlan {
    pub jobs: Vec<NotificationJob>,
    pub contacts: Vec<ContactRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub delivered: usize,
    pub best_effort_failures: usize,
    pub contacts_upserted: bool,
    pub skipped: bool,
}

#[derive(thiserror::Error)]
pub enum DispatchError {
    #[error("Failed to deliver a critical notification to {recipient}.")]
    CriticalJobFailed {
        recipient: String,
        #[source]
        source: reqwest::Error,
    },
}

impl std::fmt::Debug for DispatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Runs dispatch plans against the email provider, one call at a time.
///
/// `None` means no API key was configured: plans are dropped with an error
/// log and the submission still succeeds.
#[derive(Clone)]
pub struct Dispatcher {
    email_client: Option<EmailClient>,
}

impl Dispatcher {
    pub fn new(email_client: Option<EmailClient>) -> Self {
        Self { email_client }
    }

    #[tracing::instrument(
        name = "Dispatching notifications",
        skip(self, plan),
        fields(jobs = plan.jobs.len(), contacts = plan.contacts.len())
    )]
    pub async fn dispatch(&self, plan: DispatchPlan) -> Result<DispatchReport, DispatchError> {
        let Some(email_client) = &self.email_client else {
            tracing::error!(
                "Email API key is not configured. Dropping {} notification(s) and {} contact(s).",
                plan.jobs.len(),
                plan.contacts.len()
            );
            return Ok(DispatchReport {
                skipped: true,
                ..Default::default()
            });
        };

        let mut report = DispatchReport::default();

        for job in &plan.jobs {
            match email_client.send_email(&job.email).await {
                Ok(()) => report.delivered += 1,
                Err(source) if job.priority == Priority::Critical => {
                    return Err(DispatchError::CriticalJobFailed {
                        recipient: job.email.to.email.clone(),
                        source,
                    });
                }
                Err(e) => {
                    report.best_effort_failures += 1;
                    tracing::warn!(
                        error.cause_chain = ?e,
                        error.message = %e,
                        recipient = %job.email.to.email,
                        subject = %job.email.subject,
                        "Failed to send a best-effort notification."
                    );
                }
            }
        }

        if !plan.contacts.is_empty() {
            match email_client.upsert_contacts(&plan.contacts).await {
                Ok(()) => report.contacts_upserted = true,
                Err(e) => {
                    tracing::warn!(
                        error.cause_chain = ?e,
                        error.message = %e,
                        "Failed to upsert marketing contacts."
                    );
                }
            }
        }

        Ok(report)
    }
}
