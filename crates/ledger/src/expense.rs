use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use splitledger_core::{
    CURRENCY_SCALE, DomainError, DomainResult, Entity, ExpenseId, MAX_AMOUNT, Money, PersonId,
};

use crate::split::{SplitValidation, compute_shares_with};

/// Policy determining how an expense amount is divided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SplitType {
    /// Divide evenly across `participants`.
    #[default]
    Equal,
    /// Each share carries a percentage of the total.
    Percentage,
    /// Each share carries its exact owed amount.
    ExactAmount,
}

/// One person's portion of an expense.
///
/// For PERCENTAGE splits the caller supplies `percentage` and the amount is
/// derived; for EXACT_AMOUNT splits the caller supplies `amount`. After share
/// calculation `amount` is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitShare {
    pub person: PersonId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
}

impl SplitShare {
    /// Share input for a PERCENTAGE split.
    pub fn with_percentage(person: impl Into<PersonId>, percentage: Decimal) -> Self {
        Self {
            person: person.into(),
            amount: None,
            percentage: Some(percentage),
        }
    }

    /// Share input (or calculated share) with a known amount.
    pub fn with_amount(person: impl Into<PersonId>, amount: Money) -> Self {
        Self {
            person: person.into(),
            amount: Some(amount),
            percentage: None,
        }
    }

    /// Owed amount, zero when not yet calculated.
    pub fn owed(&self) -> Money {
        self.amount.unwrap_or(Money::ZERO)
    }
}

/// Caller-supplied expense input (create and update).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub description: String,
    pub amount: Money,
    pub paid_by: PersonId,
    /// Only consulted by EQUAL splits.
    #[serde(default)]
    pub participants: Vec<PersonId>,
    /// Defaults to EQUAL when omitted.
    #[serde(default)]
    pub split_type: Option<SplitType>,
    /// Only consulted by PERCENTAGE and EXACT_AMOUNT splits.
    #[serde(default, rename = "splitShares")]
    pub shares: Vec<SplitShare>,
}

impl NewExpense {
    pub fn new(description: impl Into<String>, amount: Money, paid_by: impl Into<PersonId>) -> Self {
        Self {
            description: description.into(),
            amount,
            paid_by: paid_by.into(),
            participants: Vec::new(),
            split_type: None,
            shares: Vec::new(),
        }
    }

    pub fn split_equally<I, P>(mut self, participants: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PersonId>,
    {
        self.split_type = Some(SplitType::Equal);
        self.participants = participants.into_iter().map(Into::into).collect();
        self
    }

    pub fn split_by_percentage<I, P>(mut self, percentages: I) -> Self
    where
        I: IntoIterator<Item = (P, Decimal)>,
        P: Into<PersonId>,
    {
        self.split_type = Some(SplitType::Percentage);
        self.shares = percentages
            .into_iter()
            .map(|(person, pct)| SplitShare::with_percentage(person, pct))
            .collect();
        self
    }

    pub fn split_exactly<I, P>(mut self, amounts: I) -> Self
    where
        I: IntoIterator<Item = (P, Money)>,
        P: Into<PersonId>,
    {
        self.split_type = Some(SplitType::ExactAmount);
        self.shares = amounts
            .into_iter()
            .map(|(person, amount)| SplitShare::with_amount(person, amount))
            .collect();
        self
    }

    fn validate(&self) -> DomainResult<()> {
        check_amount(self.amount)?;
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("description is required"));
        }
        if self.paid_by.is_blank() {
            return Err(DomainError::validation("paid by is required"));
        }
        if self.split_type.unwrap_or_default() == SplitType::Equal && self.participants.is_empty() {
            return Err(DomainError::invalid_split(
                "equal split requires at least one participant",
            ));
        }
        if self.split_type == Some(SplitType::ExactAmount) {
            for share in &self.shares {
                if let Some(amount) = share.amount {
                    check_precision(&format!("share for '{}'", share.person), amount)?;
                }
            }
        }
        Ok(())
    }
}

fn check_amount(amount: Money) -> DomainResult<()> {
    if !amount.is_positive() {
        return Err(DomainError::validation("amount must be positive"));
    }
    check_precision("amount", amount)
}

fn check_precision(what: &str, amount: Money) -> DomainResult<()> {
    if !amount.has_currency_scale() {
        return Err(DomainError::validation(format!(
            "{what} {amount} has more than {CURRENCY_SCALE} decimal places"
        )));
    }
    if amount.exceeds_limit() {
        return Err(DomainError::validation(format!(
            "{what} {amount} exceeds {MAX_AMOUNT}"
        )));
    }
    Ok(())
}

/// A recorded expense with its calculated shares.
///
/// Immutable once recorded: a revision produces a new value with the same id.
/// Deserialization re-checks the amount and requires every share to carry its
/// calculated amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredExpense")]
pub struct Expense {
    id: ExpenseId,
    description: String,
    amount: Money,
    paid_by: PersonId,
    participants: Vec<PersonId>,
    split_type: SplitType,
    #[serde(rename = "splitShares")]
    shares: Vec<SplitShare>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Expense {
    /// Validate the input, calculate shares and build the record.
    pub fn record(
        id: ExpenseId,
        input: NewExpense,
        validation: SplitValidation,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::build(id, input, validation, at, at)
    }

    /// Replace every attribute from `input`, keeping identity and creation time.
    pub fn revise(
        &self,
        input: NewExpense,
        validation: SplitValidation,
        at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        Self::build(self.id, input, validation, self.created_at, at)
    }

    fn build(
        id: ExpenseId,
        input: NewExpense,
        validation: SplitValidation,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        input.validate()?;

        // Participants are a set; keep first occurrence order.
        let mut participants: Vec<PersonId> = Vec::with_capacity(input.participants.len());
        for p in input.participants {
            if !participants.contains(&p) {
                participants.push(p);
            }
        }

        let mut expense = Self {
            id,
            description: input.description,
            amount: input.amount,
            paid_by: input.paid_by,
            participants,
            split_type: input.split_type.unwrap_or_default(),
            shares: input.shares,
            created_at,
            updated_at,
        };
        expense.shares = compute_shares_with(&expense, validation)?;
        Ok(expense)
    }

    pub fn id_typed(&self) -> ExpenseId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn paid_by(&self) -> &PersonId {
        &self.paid_by
    }

    pub fn participants(&self) -> &[PersonId] {
        &self.participants
    }

    pub fn split_type(&self) -> SplitType {
        self.split_type
    }

    pub fn shares(&self) -> &[SplitShare] {
        &self.shares
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Everyone this expense touches: the payer, then participants and share holders.
    pub fn people(&self) -> impl Iterator<Item = &PersonId> {
        core::iter::once(&self.paid_by)
            .chain(self.participants.iter())
            .chain(self.shares.iter().map(|s| &s.person))
    }
}

/// Wire shape of a persisted [`Expense`], checked before it becomes one.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredExpense {
    id: ExpenseId,
    description: String,
    amount: Money,
    paid_by: PersonId,
    #[serde(default)]
    participants: Vec<PersonId>,
    split_type: SplitType,
    #[serde(rename = "splitShares")]
    shares: Vec<SplitShare>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<StoredExpense> for Expense {
    type Error = DomainError;

    fn try_from(stored: StoredExpense) -> DomainResult<Self> {
        check_amount(stored.amount)?;
        if let Some(share) = stored.shares.iter().find(|s| s.amount.is_none()) {
            return Err(DomainError::invalid_split(format!(
                "stored share for '{}' has no amount",
                share.person
            )));
        }

        Ok(Self {
            id: stored.id,
            description: stored.description,
            amount: stored.amount,
            paid_by: stored.paid_by,
            participants: stored.participants,
            split_type: stored.split_type,
            shares: stored.shares,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        })
    }
}

impl Entity for Expense {
    type Id = ExpenseId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn dinner() -> NewExpense {
        NewExpense::new("dinner", money("90.00"), "alice").split_equally(["alice", "bob", "carol"])
    }

    #[test]
    fn record_calculates_equal_shares() {
        let expense =
            Expense::record(ExpenseId::new(), dinner(), SplitValidation::Permissive, Utc::now())
                .unwrap();

        assert_eq!(expense.split_type(), SplitType::Equal);
        assert_eq!(expense.shares().len(), 3);
        for share in expense.shares() {
            assert_eq!(share.amount, Some(money("30.00")));
        }
    }

    #[test]
    fn split_type_defaults_to_equal() {
        let mut input = dinner();
        input.split_type = None;
        let expense =
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now())
                .unwrap();
        assert_eq!(expense.split_type(), SplitType::Equal);
    }

    #[test]
    fn non_positive_amount_is_rejected() {
        let input = NewExpense::new("refund", money("0"), "alice").split_equally(["alice"]);
        let err = Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_payer_and_description_are_rejected() {
        let input = NewExpense::new("taxi", money("12.00"), "  ").split_equally(["alice"]);
        assert!(matches!(
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now()),
            Err(DomainError::Validation(msg)) if msg.contains("paid by")
        ));

        let input = NewExpense::new("", money("12.00"), "alice").split_equally(["alice"]);
        assert!(matches!(
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now()),
            Err(DomainError::Validation(msg)) if msg.contains("description")
        ));
    }

    #[test]
    fn equal_split_without_participants_is_invalid_split() {
        let input = NewExpense::new("taxi", money("12.00"), "alice");
        let err = Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now())
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidSplit(_)));
    }

    #[test]
    fn duplicate_participants_collapse() {
        let input = NewExpense::new("taxi", money("12.00"), "alice")
            .split_equally(["alice", "bob", "alice"]);
        let expense =
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now())
                .unwrap();
        assert_eq!(expense.participants().len(), 2);
        assert_eq!(expense.shares()[0].amount, Some(money("6.00")));
    }

    #[test]
    fn revise_keeps_identity_and_creation_time() {
        let created = Utc::now();
        let original =
            Expense::record(ExpenseId::new(), dinner(), SplitValidation::Permissive, created)
                .unwrap();

        let later = created + Duration::minutes(5);
        let input = NewExpense::new("dinner + tip", money("100.00"), "bob")
            .split_equally(["alice", "bob"]);
        let revised = original
            .revise(input, SplitValidation::Permissive, later)
            .unwrap();

        assert_eq!(revised.id(), original.id());
        assert!(revised.is_revision_of(&original));
        assert_eq!(revised.created_at(), created);
        assert_eq!(revised.updated_at(), later);
        assert_eq!(revised.paid_by(), &PersonId::from("bob"));
        assert_eq!(revised.shares()[0].amount, Some(money("50.00")));
    }

    #[test]
    fn serializes_with_original_field_names() {
        let input = NewExpense::new("hotel", money("200.00"), "alice")
            .split_exactly([("alice", money("120.00")), ("bob", money("80.00"))]);
        let expense =
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now())
                .unwrap();

        let json = serde_json::to_value(&expense).unwrap();
        assert_eq!(json["paidBy"], "alice");
        assert_eq!(json["splitType"], "EXACT_AMOUNT");
        assert_eq!(json["splitShares"][1]["person"], "bob");
        assert_eq!(json["splitShares"][1]["amount"], "80.00");

        let back: Expense = serde_json::from_value(json).unwrap();
        assert_eq!(back, expense);
    }

    #[test]
    fn deserializing_rejects_uncalculated_shares() {
        let expense =
            Expense::record(ExpenseId::new(), dinner(), SplitValidation::Permissive, Utc::now())
                .unwrap();

        let mut json = serde_json::to_value(&expense).unwrap();
        json["splitShares"][1]
            .as_object_mut()
            .unwrap()
            .remove("amount");
        let err = serde_json::from_value::<Expense>(json).unwrap_err();
        assert!(err.to_string().contains("'bob' has no amount"));

        let mut json = serde_json::to_value(&expense).unwrap();
        json["amount"] = serde_json::Value::from("90.005");
        assert!(serde_json::from_value::<Expense>(json).is_err());
    }

    #[test]
    fn sub_cent_amount_is_rejected() {
        let input = NewExpense::new("gum", money("10.005"), "alice").split_equally(["alice"]);
        assert!(matches!(
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now()),
            Err(DomainError::Validation(msg)) if msg.contains("decimal places")
        ));

        // Trailing zeros beyond the minor unit are fine.
        let input = NewExpense::new("gum", money("10.500"), "alice").split_equally(["alice"]);
        assert!(
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now())
                .is_ok()
        );
    }

    #[test]
    fn sub_cent_exact_share_is_rejected() {
        let input = NewExpense::new("hotel", money("200.00"), "alice")
            .split_exactly([("alice", money("100.005")), ("bob", money("99.995"))]);
        assert!(matches!(
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now()),
            Err(DomainError::Validation(msg)) if msg.contains("share for 'alice'")
        ));
    }

    #[test]
    fn amounts_above_limit_are_rejected() {
        let input = NewExpense::new("big", money("70000000000000000000000000000"), "alice")
            .split_by_percentage([("alice", Decimal::from(200))]);
        assert!(matches!(
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now()),
            Err(DomainError::Validation(msg)) if msg.contains("exceeds")
        ));

        let input = NewExpense::new("big", money("100.00"), "alice")
            .split_exactly([("bob", money("1000000000000.01"))]);
        assert!(matches!(
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now()),
            Err(DomainError::Validation(_))
        ));

        let input = NewExpense::new("big", MAX_AMOUNT, "alice").split_equally(["bob"]);
        assert!(
            Expense::record(ExpenseId::new(), input, SplitValidation::Permissive, Utc::now())
                .is_ok()
        );
    }
}
