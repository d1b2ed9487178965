// Three-step booking flow for a single package.
// Travel details, then personal information, then review. The wizard
// shares the booking record with the landing-page dialog; the package
// reference, traveller id, total and status are added on submit.

use crate::catalog::Package;
use crate::form::{BookingForm, FormState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    TravelDetails = 1,
    PersonalInformation = 2,
    Review = 3,
}

impl WizardStep {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn title(self) -> &'static str {
        match self {
            WizardStep::TravelDetails => "Travel Details",
            WizardStep::PersonalInformation => "Personal Information",
            WizardStep::Review => "Review & Confirm",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            WizardStep::TravelDetails => "When would you like to travel?",
            WizardStep::PersonalInformation => "Tell us about yourself",
            WizardStep::Review => "Review your booking details",
        }
    }

    fn next(self) -> Self {
        match self {
            WizardStep::TravelDetails => WizardStep::PersonalInformation,
            WizardStep::PersonalInformation | WizardStep::Review => WizardStep::Review,
        }
    }

    fn prev(self) -> Self {
        match self {
            WizardStep::Review => WizardStep::PersonalInformation,
            WizardStep::PersonalInformation | WizardStep::TravelDetails => {
                WizardStep::TravelDetails
            }
        }
    }
}

/// The signed-in traveller, if any. Used to prefill the contact fields.
#[derive(Debug, Clone, PartialEq)]
pub struct TravellerProfile {
    pub id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BookingWizard {
    package: Package,
    user_id: Option<String>,
    step: WizardStep,
    open: bool,
    pub form: FormState<BookingForm>,
}

impl BookingWizard {
    pub fn new(package: Package, profile: Option<TravellerProfile>) -> Self {
        let mut defaults = BookingForm::default();
        let user_id = profile.map(|profile| {
            defaults.name = profile.full_name.unwrap_or_default();
            defaults.email = profile.email.unwrap_or_default();
            profile.id
        });

        Self {
            package,
            user_id,
            step: WizardStep::TravelDetails,
            open: true,
            form: FormState::with_defaults(defaults),
        }
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn next_step(&mut self) -> WizardStep {
        self.step = self.step.next();
        self.step
    }

    pub fn prev_step(&mut self) -> WizardStep {
        self.step = self.step.prev();
        self.step
    }

    pub fn can_go_back(&self) -> bool {
        self.step != WizardStep::TravelDetails
    }

    pub fn is_final_step(&self) -> bool {
        self.step == WizardStep::Review
    }

    /// Package price times the number of travellers.
    pub fn total_amount(&self) -> f64 {
        self.package.total_for(self.form.current().group_size.get())
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
        self.step = WizardStep::TravelDetails;
        self.form.reset();
    }
}
