pub const INVITATION_SUBJECT: &str = "Activity Monitoring Registration";

/// Rendered invitation ready for a `NotificationSender`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvitationMessage {
    pub subject: String,
    pub html_body: String,
}

/// Builds the registration invitation around a link to `{url_base}/{token}`
#[derive(Debug, Clone)]
pub struct InvitationTemplate {
    url_base: String,
}

impl InvitationTemplate {
    pub fn new(url_base: impl Into<String>) -> Self {
        let url_base: String = url_base.into();
        Self {
            url_base: url_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn registration_link(&self, token: &str) -> String {
        format!("{}/{}", self.url_base, token)
    }

    pub fn render(&self, token: &str) -> InvitationMessage {
        let link = self.registration_link(token);
        let html_body = format!(
            r#"<!DOCTYPE html>
<html>
  <body style="font-family: Arial, sans-serif; color: #333333;">
    <p>Hello,</p>
    <p>You have been invited to join the Activity Monitoring platform. Click the button below to complete your registration. The link expires in 7 days.</p>
    <p>
      <a href="{link}" style="display: inline-block; padding: 10px 20px; background-color: #1a73e8; color: #ffffff; text-decoration: none; border-radius: 4px;">Register Now</a>
    </p>
    <p>If you did not expect this invitation you can ignore this email.</p>
  </body>
</html>
"#
        );

        InvitationMessage {
            subject: INVITATION_SUBJECT.to_string(),
            html_body,
        }
    }
}
