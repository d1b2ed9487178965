// Form State Container
// One in-progress submission per open dialog. Field updates never validate
// beyond type coercion; required-ness is only reported, never enforced here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Group size must be a whole number from {min} to {max}, got {value:?}")]
    GroupSize { value: String, min: u8, max: u8 },

    #[error("Field {0} does not hold a set of values")]
    NotASet(String),
}

/// Number of travellers, limited to what the selector offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct GroupSize(u8);

impl GroupSize {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, FormError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(FormError::GroupSize {
                value: value.to_string(),
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    /// Every value the selector offers, smallest first.
    pub fn options() -> impl Iterator<Item = GroupSize> {
        (Self::MIN..=Self::MAX).map(GroupSize)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn label(self) -> String {
        if self.0 == 1 {
            "1 Person".to_string()
        } else {
            format!("{} People", self.0)
        }
    }
}

impl Default for GroupSize {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for GroupSize {
    type Error = FormError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GroupSize> for u8 {
    fn from(size: GroupSize) -> Self {
        size.0
    }
}

impl FromStr for GroupSize {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormError::GroupSize {
            value: s.to_string(),
            min: Self::MIN,
            max: Self::MAX,
        };
        let value: u8 = s.trim().parse().map_err(|_| invalid())?;
        Self::new(value).map_err(|_| invalid())
    }
}

impl fmt::Display for GroupSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetOption {
    pub value: &'static str,
    pub label: &'static str,
}

// Offered by the landing-page booking dialog and the contact form.
pub const TRIP_BUDGETS: [BudgetOption; 5] = [
    BudgetOption { value: "under-10k", label: "Under ₹10,000" },
    BudgetOption { value: "10k-25k", label: "₹10,000 - ₹25,000" },
    BudgetOption { value: "25k-50k", label: "₹25,000 - ₹50,000" },
    BudgetOption { value: "50k-100k", label: "₹50,000 - ₹1,00,000" },
    BudgetOption { value: "above-100k", label: "Above ₹1,00,000" },
];

// Offered by the package booking wizard.
pub const PACKAGE_TIERS: [BudgetOption; 3] = [
    BudgetOption { value: "standard", label: "Standard Package" },
    BudgetOption { value: "premium", label: "Premium Upgrade" },
    BudgetOption { value: "luxury", label: "Luxury Experience" },
];

pub fn budget_label(value: &str) -> Option<&'static str> {
    TRIP_BUDGETS
        .iter()
        .chain(PACKAGE_TIERS.iter())
        .find(|option| option.value == value)
        .map(|option| option.label)
}

/// A record backing one input dialog.
pub trait Form: Clone + Default + PartialEq + Serialize + Send + Sync {
    type Field: 'static + Copy + fmt::Debug + PartialEq + FromStr<Err = FormError>;

    fn set_field(&mut self, field: Self::Field, value: &str) -> Result<(), FormError>;

    fn toggle_member(
        &mut self,
        field: Self::Field,
        _item: &str,
        _included: bool,
    ) -> Result<(), FormError> {
        Err(FormError::NotASet(format!("{:?}", field)))
    }

    /// Fields an input widget marks as required.
    fn required_fields() -> &'static [Self::Field];

    fn is_blank(&self, field: Self::Field) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingField {
    Name,
    Email,
    Phone,
    TravelDates,
    GroupSize,
    BudgetRange,
    PackageId,
    DestinationId,
    SpecialRequirements,
}

impl FromStr for BookingField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "name" => BookingField::Name,
            "email" => BookingField::Email,
            "phone" => BookingField::Phone,
            "travel_dates" => BookingField::TravelDates,
            "group_size" => BookingField::GroupSize,
            "budget_range" => BookingField::BudgetRange,
            "package_id" => BookingField::PackageId,
            "destination_id" => BookingField::DestinationId,
            "special_requirements" => BookingField::SpecialRequirements,
            other => return Err(FormError::UnknownField(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub travel_dates: String,
    pub group_size: GroupSize,
    pub budget_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_id: Option<String>,
    pub special_requirements: String,
}

fn optional_ref(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

impl Form for BookingForm {
    type Field = BookingField;

    fn set_field(&mut self, field: BookingField, value: &str) -> Result<(), FormError> {
        match field {
            BookingField::Name => self.name = value.to_string(),
            BookingField::Email => self.email = value.to_string(),
            BookingField::Phone => self.phone = value.to_string(),
            BookingField::TravelDates => self.travel_dates = value.to_string(),
            BookingField::GroupSize => self.group_size = value.parse()?,
            BookingField::BudgetRange => self.budget_range = value.to_string(),
            BookingField::PackageId => self.package_id = optional_ref(value),
            BookingField::DestinationId => self.destination_id = optional_ref(value),
            BookingField::SpecialRequirements => self.special_requirements = value.to_string(),
        }
        Ok(())
    }

    fn required_fields() -> &'static [BookingField] {
        &[BookingField::Name, BookingField::Email, BookingField::Phone]
    }

    fn is_blank(&self, field: BookingField) -> bool {
        match field {
            BookingField::Name => self.name.trim().is_empty(),
            BookingField::Email => self.email.trim().is_empty(),
            BookingField::Phone => self.phone.trim().is_empty(),
            BookingField::TravelDates => self.travel_dates.trim().is_empty(),
            BookingField::GroupSize => false,
            BookingField::BudgetRange => self.budget_range.trim().is_empty(),
            BookingField::PackageId => self.package_id.is_none(),
            BookingField::DestinationId => self.destination_id.is_none(),
            BookingField::SpecialRequirements => self.special_requirements.trim().is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    TravelDates,
    GroupSize,
    BudgetRange,
    ServiceInterests,
    SpecialRequirements,
}

impl FromStr for ContactField {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "name" => ContactField::Name,
            "email" => ContactField::Email,
            "phone" => ContactField::Phone,
            "travel_dates" => ContactField::TravelDates,
            "group_size" => ContactField::GroupSize,
            "budget_range" => ContactField::BudgetRange,
            "service_interests" => ContactField::ServiceInterests,
            "special_requirements" => ContactField::SpecialRequirements,
            other => return Err(FormError::UnknownField(other.to_string())),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub travel_dates: String,
    pub group_size: GroupSize,
    pub budget_range: String,
    /// Category names, in the order they were ticked.
    pub service_interests: Vec<String>,
    pub special_requirements: String,
}

impl Form for ContactForm {
    type Field = ContactField;

    fn set_field(&mut self, field: ContactField, value: &str) -> Result<(), FormError> {
        match field {
            ContactField::Name => self.name = value.to_string(),
            ContactField::Email => self.email = value.to_string(),
            ContactField::Phone => self.phone = value.to_string(),
            ContactField::TravelDates => self.travel_dates = value.to_string(),
            ContactField::GroupSize => self.group_size = value.parse()?,
            ContactField::BudgetRange => self.budget_range = value.to_string(),
            ContactField::ServiceInterests => {
                return Err(FormError::NotASet(
                    "service_interests is updated by toggling members".to_string(),
                ))
            }
            ContactField::SpecialRequirements => self.special_requirements = value.to_string(),
        }
        Ok(())
    }

    fn toggle_member(
        &mut self,
        field: ContactField,
        item: &str,
        included: bool,
    ) -> Result<(), FormError> {
        if field != ContactField::ServiceInterests {
            return Err(FormError::NotASet(format!("{:?}", field)));
        }
        let present = self.service_interests.iter().any(|s| s == item);
        if included && !present {
            self.service_interests.push(item.to_string());
        } else if !included {
            self.service_interests.retain(|s| s != item);
        }
        Ok(())
    }

    fn required_fields() -> &'static [ContactField] {
        &[ContactField::Name, ContactField::Email]
    }

    fn is_blank(&self, field: ContactField) -> bool {
        match field {
            ContactField::Name => self.name.trim().is_empty(),
            ContactField::Email => self.email.trim().is_empty(),
            ContactField::Phone => self.phone.trim().is_empty(),
            ContactField::TravelDates => self.travel_dates.trim().is_empty(),
            ContactField::GroupSize => false,
            ContactField::BudgetRange => self.budget_range.trim().is_empty(),
            ContactField::ServiceInterests => self.service_interests.is_empty(),
            ContactField::SpecialRequirements => self.special_requirements.trim().is_empty(),
        }
    }
}

/// Holds the current record and the defaults it resets to.
#[derive(Debug, Clone, PartialEq)]
pub struct FormState<F: Form> {
    defaults: F,
    current: F,
}

impl<F: Form> Default for FormState<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Form> FormState<F> {
    pub fn new() -> Self {
        Self::with_defaults(F::default())
    }

    /// Starts from prefilled defaults (e.g. a signed-in traveller's name).
    pub fn with_defaults(defaults: F) -> Self {
        Self {
            current: defaults.clone(),
            defaults,
        }
    }

    pub fn current(&self) -> &F {
        &self.current
    }

    pub fn defaults(&self) -> &F {
        &self.defaults
    }

    pub fn set_field(&mut self, field: F::Field, value: &str) -> Result<(), FormError> {
        self.current.set_field(field, value)
    }

    /// Same as [`FormState::set_field`], addressed by the wire name.
    pub fn set_named(&mut self, name: &str, value: &str) -> Result<(), FormError> {
        let field = name.parse()?;
        self.set_field(field, value)
    }

    pub fn toggle_set_membership(
        &mut self,
        field: F::Field,
        item: &str,
        included: bool,
    ) -> Result<(), FormError> {
        self.current.toggle_member(field, item, included)
    }

    pub fn reset(&mut self) {
        self.current = self.defaults.clone();
    }

    pub fn is_pristine(&self) -> bool {
        self.current == self.defaults
    }

    /// Required fields that are still blank, in declaration order.
    pub fn missing_required(&self) -> Vec<F::Field> {
        F::required_fields()
            .iter()
            .copied()
            .filter(|field| self.current.is_blank(*field))
            .collect()
    }
}

/// An input dialog owning its form exclusively. Closing discards the draft.
#[derive(Debug, Clone, Default)]
pub struct Dialog<F: Form> {
    open: bool,
    pub form: FormState<F>,
}

impl<F: Form> Dialog<F> {
    pub fn new(form: FormState<F>) -> Self {
        Self { open: false, form }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.form.reset();
    }

    pub fn is_open(&self) -> bool {
        self.open
    }
}
