mod templates;

use std::collections::BTreeMap;

use tera::Context;

pub use templates::EmailTemplates;
use templates::context;

use crate::configuration::NotificationSettings;
use crate::dispatcher::{DispatchPlan, NotificationJob};
use crate::domain::{AlphaRequest, ReferralInvite, SubmissionRequest, WaitlistSignup};
use crate::email_client::{ContactRecord, Mailbox, OutgoingEmail};

/// Turns a validated submission into the emails and contact records it
/// should produce.
#[derive(Clone)]
pub struct NotificationComposer {
    templates: EmailTemplates,
    settings: NotificationSettings,
}

impl NotificationComposer {
    pub fn new(settings: NotificationSettings) -> Result<Self, tera::Error> {
        Ok(Self {
            templates: EmailTemplates::new()?,
            settings,
        })
    }

    #[tracing::instrument(
        name = "Composing notifications",
        skip(self, submission),
        fields(kind = submission.kind())
    )]
    pub fn compose(&self, submission: &SubmissionRequest) -> Result<DispatchPlan, tera::Error> {
        match submission {
            SubmissionRequest::Waitlist(signup) => self.waitlist(signup),
            SubmissionRequest::Referral(invite) => self.referral(invite),
            SubmissionRequest::Alpha(request) => self.alpha(request),
        }
    }

    fn waitlist(&self, signup: &WaitlistSignup) -> Result<DispatchPlan, tera::Error> {
        let site = &self.settings.site_name;
        let kind = signup.signup_type;
        let ctx = self.context(&[
            ("name", signup.name.as_deref().unwrap_or("there")),
            ("email", signup.email.as_ref()),
            ("signup_type", kind.as_str()),
            ("label", kind.label()),
            ("emoji", kind.emoji()),
        ]);

        let sender = self.settings.waitlist_sender.mailbox();
        let submitter = Mailbox::new(signup.email.to_string(), signup.name.clone());

        let welcome = OutgoingEmail {
            to: submitter.clone(),
            from: sender.clone(),
            reply_to: None,
            subject: format!("{} Welcome to the {site} {}", kind.emoji(), kind.label()),
            html: self.templates.render("waitlist_welcome.html", &ctx)?,
        };
        let admin = OutgoingEmail {
            to: self.admin(),
            from: sender,
            reply_to: Some(submitter),
            subject: format!("New {} signup: {}", kind.label(), signup.email),
            html: self.templates.render("waitlist_admin.html", &ctx)?,
        };

        Ok(DispatchPlan {
            jobs: vec![
                NotificationJob::critical(welcome),
                NotificationJob::best_effort(admin),
            ],
            contacts: vec![ContactRecord {
                email: signup.email.to_string(),
                first_name: signup.name.clone(),
                custom_fields: BTreeMap::from([("signup_type", kind.as_str().to_string())]),
            }],
        })
    }

    fn referral(&self, invite: &ReferralInvite) -> Result<DispatchPlan, tera::Error> {
        let site = &self.settings.site_name;
        let code = invite.referral_code();
        let join_link = format!(
            "{}/?ref={}",
            self.settings.site_url.trim_end_matches('/'),
            code
        );
        let mut ctx = self.context(&[
            ("referrer_name", invite.referrer_name.as_str()),
            ("referrer_email", invite.referrer_email.as_ref()),
            ("friend_name", invite.friend_name.as_str()),
            ("friend_email", invite.friend_email.as_ref()),
            ("referral_code", code.as_ref()),
            ("join_link", join_link.as_str()),
        ]);
        ctx.insert("counterparty_address", &invite.counterparty_address);

        let sender = self.settings.referral_sender.mailbox();
        let referrer = Mailbox::new(
            invite.referrer_email.to_string(),
            Some(invite.referrer_name.clone()),
        );
        let friend = Mailbox::new(invite.friend_email.to_string(), Some(invite.friend_name.clone()));

        let invitation = OutgoingEmail {
            to: friend,
            from: sender.clone(),
            reply_to: Some(referrer.clone()),
            subject: format!("🎁 {} invited you to join {site}", invite.referrer_name),
            html: self.templates.render("referral_invite.html", &ctx)?,
        };
        let admin = OutgoingEmail {
            to: self.admin(),
            from: sender.clone(),
            reply_to: Some(referrer.clone()),
            subject: format!(
                "New referral: {} invited {}",
                invite.referrer_email, invite.friend_email
            ),
            html: self.templates.render("referral_admin.html", &ctx)?,
        };
        let confirmation = OutgoingEmail {
            to: referrer,
            from: sender,
            reply_to: None,
            subject: format!("✅ Your invite to {} is on its way", invite.friend_name),
            html: self.templates.render("referral_sent.html", &ctx)?,
        };

        let mut referrer_fields = BTreeMap::from([
            ("signup_type", "referrer".to_string()),
            ("referral_code", code.to_string()),
        ]);
        if let Some(address) = &invite.counterparty_address {
            referrer_fields.insert("counterparty_address", address.clone());
        }
        let friend_fields = BTreeMap::from([
            ("signup_type", "referral".to_string()),
            ("referral_code", code.to_string()),
            ("referred_by", invite.referrer_email.to_string()),
        ]);

        Ok(DispatchPlan {
            jobs: vec![
                NotificationJob::critical(invitation),
                NotificationJob::best_effort(admin),
                NotificationJob::best_effort(confirmation),
            ],
            contacts: vec![
                ContactRecord {
                    email: invite.referrer_email.to_string(),
                    first_name: Some(invite.referrer_name.clone()),
                    custom_fields: referrer_fields,
                },
                ContactRecord {
                    email: invite.friend_email.to_string(),
                    first_name: Some(invite.friend_name.clone()),
                    custom_fields: friend_fields,
                },
            ],
        })
    }

    fn alpha(&self, request: &AlphaRequest) -> Result<DispatchPlan, tera::Error> {
        let site = &self.settings.site_name;
        let ctx = self.context(&[
            ("name", request.name.as_str()),
            ("email", request.email.as_ref()),
            ("github", request.github_handle.as_ref()),
            ("discovery_source", request.discovery_source.as_str()),
            ("motivation", request.motivation.as_ref()),
        ]);

        let sender = self.settings.alpha_sender.mailbox();
        let submitter = Mailbox::new(request.email.to_string(), Some(request.name.clone()));

        let welcome = OutgoingEmail {
            to: submitter.clone(),
            from: sender.clone(),
            reply_to: None,
            subject: format!("🚀 We received your {site} alpha access request"),
            html: self.templates.render("alpha_welcome.html", &ctx)?,
        };
        let admin = OutgoingEmail {
            to: self.admin(),
            from: sender,
            reply_to: Some(submitter),
            subject: format!(
                "New alpha request: {} (@{})",
                request.name, request.github_handle
            ),
            html: self.templates.render("alpha_admin.html", &ctx)?,
        };

        Ok(DispatchPlan {
            jobs: vec![
                NotificationJob::critical(welcome),
                NotificationJob::best_effort(admin),
            ],
            contacts: vec![ContactRecord {
                email: request.email.to_string(),
                first_name: Some(request.name.clone()),
                custom_fields: BTreeMap::from([
                    ("signup_type", "alpha".to_string()),
                    ("github_username", request.github_handle.to_string()),
                    ("discovery_source", request.discovery_source.clone()),
                ]),
            }],
        })
    }

    fn admin(&self) -> Mailbox {
        Mailbox::new(self.settings.admin_email.clone(), None)
    }

    fn context(&self, entries: &[(&str, &str)]) -> Context {
        let mut ctx = context(entries);
        ctx.insert("site_name", &self.settings.site_name);
        ctx.insert("site_url", &self.settings.site_url);
        ctx
    }
}
