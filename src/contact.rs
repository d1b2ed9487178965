// Agency contact channels offered on the landing page

use crate::notify::{Notification, Notifier};

pub const AGENCY_EMAIL: &str = "Himalayantrailesandtales@gmail.com";
pub const AGENCY_PHONE: &str = "+91 8630113945";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactChannel {
    Email,
    Phone,
}

impl ContactChannel {
    pub fn value(self) -> &'static str {
        match self {
            ContactChannel::Email => AGENCY_EMAIL,
            ContactChannel::Phone => AGENCY_PHONE,
        }
    }

    fn copied_title(self) -> &'static str {
        match self {
            ContactChannel::Email => "Email Copied!",
            ContactChannel::Phone => "Phone Copied!",
        }
    }
}

/// Returns the text to place on the clipboard and confirms the copy.
pub fn show_contact(channel: ContactChannel, notifier: &dyn Notifier) -> &'static str {
    notifier.notify(Notification::success(channel.copied_title(), channel.value()));
    channel.value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;

    #[test]
    fn test_show_contact_confirms_copy() {
        let notifier = RecordingNotifier::new();

        assert_eq!(show_contact(ContactChannel::Phone, &notifier), AGENCY_PHONE);
        assert_eq!(show_contact(ContactChannel::Email, &notifier), AGENCY_EMAIL);

        let seen = notifier.notifications();
        assert_eq!(seen[0].title, "Phone Copied!");
        assert_eq!(seen[1].description, AGENCY_EMAIL);
        assert!(notifier.errors().is_empty());
    }
}
